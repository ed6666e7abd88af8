//! Tick countdown for popups and menu timeouts

/// Signed tick countdown
///
/// `< 0` idle, `> 0` counting down. Armed with `n`, it fires on the `n`th
/// tick and goes idle. While counting, foreign changes neither redraw nor
/// relock, so a popup isn't painted over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupTimer(i32);

impl PopupTimer {
    pub const fn idle() -> Self {
        Self(-1)
    }

    /// Start (or restart) counting down from `ticks`
    pub fn arm(&mut self, ticks: i32) {
        self.0 = ticks;
    }

    /// Stop without firing
    pub fn cancel(&mut self) {
        self.0 = -1;
    }

    /// Counting down
    pub fn is_active(&self) -> bool {
        self.0 > 0
    }

    pub fn is_idle(&self) -> bool {
        self.0 < 0
    }

    /// Ticks left
    pub fn remaining(&self) -> i32 {
        self.0
    }

    /// Advance one tick; returns `true` exactly once, on the tick that
    /// brings the count to 0
    pub fn tick(&mut self) -> bool {
        match self.0 {
            n if n > 1 => {
                self.0 -= 1;
                false
            }
            n if n >= 0 => {
                self.0 = -1;
                true
            }
            _ => false,
        }
    }
}

impl Default for PopupTimer {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_then_idles() {
        let mut timer = PopupTimer::idle();
        timer.arm(5);
        assert!(timer.is_active());

        let fired: Vec<bool> = (0..10).map(|_| timer.tick()).collect();
        assert_eq!(fired.iter().filter(|f| **f).count(), 1);
        // Fires on the 5th tick
        assert!(fired[4]);
        assert!(timer.is_idle());
        assert_eq!(timer.remaining(), -1);
    }

    #[test]
    fn test_active_until_the_firing_tick() {
        let mut timer = PopupTimer::idle();
        timer.arm(2);
        assert!(!timer.tick());
        assert!(timer.is_active());
        assert_eq!(timer.remaining(), 1);
        assert!(timer.tick());
        assert!(!timer.is_active());
        assert!(timer.is_idle());
    }

    #[test]
    fn test_armed_at_zero_fires_on_next_tick() {
        let mut timer = PopupTimer::idle();
        timer.arm(0);
        assert!(!timer.is_active());
        assert!(timer.tick());
        assert!(!timer.tick());
    }

    #[test]
    fn test_cancel() {
        let mut timer = PopupTimer::idle();
        timer.arm(3);
        timer.cancel();
        assert!(!timer.tick());
        assert!(timer.is_idle());
    }
}
