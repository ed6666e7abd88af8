//! Pot value locking
//!
//! Pots are absolute controls: after a page switch or a change made
//! elsewhere, a pot's physical position no longer matches the value it
//! drives. Writing straight away would make the value jump. Instead each
//! pot is locked and only takes over once it has been turned across the
//! current value:
//!
//! ```text
//! Locked ──move above──► AwaitLesser  ──reach or cross──► Unlocked
//!        ──move at/below─► AwaitGreater ──reach or cross──► Unlocked
//! ```
//!
//! Page activation and foreign changes put a pot back to `Locked`.

use kontrol_model::{ParamValue, Parameter};
use std::cmp::Ordering;

/// Number of physical pots
pub const NUM_POTS: usize = 4;

/// Lock state of one pot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PotLock {
    /// Moving the pot writes the parameter
    Unlocked,
    /// Waiting for the first move
    #[default]
    Locked,
    /// Pot is below the value; unlocks once it reaches it
    AwaitGreater,
    /// Pot is above the value; unlocks once it comes down to it
    AwaitLesser,
}

/// Lock state for all pots of the surface
#[derive(Debug, Clone)]
pub struct PotLockTracker {
    locks: [PotLock; NUM_POTS],
    max_raw: f32,
}

impl PotLockTracker {
    /// Create a tracker for pots reading `0..=max_raw`
    pub fn new(max_raw: f32) -> Self {
        Self {
            locks: [PotLock::Locked; NUM_POTS],
            max_raw,
        }
    }

    /// Lock state of a pot, or `None` for an unknown pot
    pub fn get(&self, pot: usize) -> Option<PotLock> {
        self.locks.get(pot).copied()
    }

    /// Lock every pot (a new page was shown)
    pub fn on_page_activated(&mut self) {
        self.locks = [PotLock::Locked; NUM_POTS];
    }

    /// Re-lock a pot whose parameter was changed elsewhere
    pub fn on_remote_change(&mut self, pot: usize) {
        if let Some(lock) = self.locks.get_mut(pot) {
            if *lock != PotLock::Locked {
                log::trace!("Pot {}: relocked by foreign change", pot);
            }
            *lock = PotLock::Locked;
        }
    }

    /// Convert a raw pot reading to 0.0-1.0
    pub fn normalize(&self, raw: f32) -> f32 {
        if self.max_raw > 0.0 {
            (raw / self.max_raw).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Feed a physical pot reading
    ///
    /// Returns the value to write when the pot is (or just became) unlocked.
    pub fn on_physical_move(
        &mut self,
        pot: usize,
        raw: f32,
        param: &Parameter,
    ) -> Option<ParamValue> {
        let calc = param.calc_float(self.normalize(raw));
        let lock = self.locks.get_mut(pot)?;
        let ordering = param.compare(&calc, param.current());

        let next = match *lock {
            PotLock::Unlocked => PotLock::Unlocked,
            PotLock::Locked => {
                if ordering == Some(Ordering::Greater) {
                    PotLock::AwaitLesser
                } else {
                    PotLock::AwaitGreater
                }
            }
            PotLock::AwaitGreater => match ordering {
                Some(Ordering::Greater | Ordering::Equal) => PotLock::Unlocked,
                _ => PotLock::AwaitGreater,
            },
            PotLock::AwaitLesser => match ordering {
                Some(Ordering::Less | Ordering::Equal) => PotLock::Unlocked,
                _ => PotLock::AwaitLesser,
            },
        };

        if next != *lock {
            log::trace!("Pot {}: {:?} -> {:?}", pot, *lock, next);
        }
        *lock = next;

        (next == PotLock::Unlocked).then_some(calc)
    }
}

impl Default for PotLockTracker {
    fn default() -> Self {
        Self::new(1023.0)
    }
}
