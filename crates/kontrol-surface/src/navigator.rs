//! List navigation
//!
//! Menus show a four-line window onto a list of items. The cursor moves one
//! item per encoder event and the window follows it, jumping so the cursor
//! sits on the window edge it crossed.

use std::ops::Range;

/// Visible lines in a list window
pub const WINDOW: usize = 4;

/// Outcome of a cursor move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMove {
    /// The highlighted item changed
    pub changed: bool,
    /// The window scrolled, so every line must be redrawn
    pub full_redraw: bool,
    /// Item highlighted before the move
    pub previous: usize,
}

/// Cursor over a list with a scrolling window
///
/// Invariant: `top <= current < top + WINDOW` and `current < size` for a
/// non-empty list; both are 0 for an empty one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    current: usize,
    top: usize,
}

impl ListCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlighted item
    pub fn current(&self) -> usize {
        self.current
    }

    /// First visible item
    pub fn top(&self) -> usize {
        self.top
    }

    /// Move back to the first item
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Pull the cursor back inside a list that may have shrunk
    pub fn clamp_to(&mut self, size: usize) {
        if size == 0 {
            self.reset();
            return;
        }
        self.current = self.current.min(size - 1);
        self.top = self.top.min(self.current);
        if self.current >= self.top + WINDOW {
            self.top = self.current + 1 - WINDOW;
        }
    }

    /// Move one item in the direction of `direction`'s sign
    pub fn move_cursor(&mut self, direction: i32, size: usize) -> CursorMove {
        let previous = self.current;
        if size == 0 || direction == 0 {
            return CursorMove {
                changed: false,
                full_redraw: false,
                previous,
            };
        }

        self.current = if direction > 0 {
            (self.current + 1).min(size - 1)
        } else {
            self.current.saturating_sub(1)
        };

        let mut full_redraw = false;
        if self.current < self.top {
            self.top = self.current;
            full_redraw = true;
        } else if self.current >= self.top + WINDOW {
            self.top = self.current + 1 - WINDOW;
            full_redraw = true;
        }

        CursorMove {
            changed: self.current != previous,
            full_redraw,
            previous,
        }
    }

    /// Index of the highlighted item, if the list has one
    pub fn select(&self, size: usize) -> Option<usize> {
        (self.current < size).then_some(self.current)
    }

    /// Items inside the window
    pub fn visible(&self, size: usize) -> Range<usize> {
        let start = self.top.min(size);
        start..(self.top + WINDOW).min(size)
    }

    /// Screen line (1-based) showing `index`, if it is inside the window
    pub fn line_of(&self, index: usize) -> Option<u32> {
        if index >= self.top && index < self.top + WINDOW {
            Some((index - self.top) as u32 + 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariant(cursor: &ListCursor, size: usize) {
        if size == 0 {
            assert_eq!((cursor.current(), cursor.top()), (0, 0));
        } else {
            assert!(cursor.current() < size);
            assert!(cursor.top() <= cursor.current());
            assert!(cursor.current() < cursor.top() + WINDOW);
        }
    }

    #[test]
    fn test_invariant_holds_for_all_sizes() {
        for size in [0, 1, 3, 4, 5, 100] {
            let mut cursor = ListCursor::new();
            for _ in 0..150 {
                cursor.move_cursor(1, size);
                assert_invariant(&cursor, size);
            }
            for step in 0..300 {
                let dir = if step % 7 < 3 { 1 } else { -1 };
                cursor.move_cursor(dir, size);
                assert_invariant(&cursor, size);
            }
        }
    }

    #[test]
    fn test_clamps_at_ends() {
        let mut cursor = ListCursor::new();
        let mv = cursor.move_cursor(-1, 3);
        assert!(!mv.changed);
        assert!(!mv.full_redraw);

        cursor.move_cursor(1, 3);
        cursor.move_cursor(1, 3);
        let mv = cursor.move_cursor(1, 3);
        assert_eq!(cursor.current(), 2);
        assert!(!mv.changed);
    }

    #[test]
    fn test_scroll_up_jumps_window() {
        let mut cursor = ListCursor::new();
        for _ in 0..4 {
            cursor.move_cursor(1, 10);
        }
        assert_eq!((cursor.current(), cursor.top()), (4, 1));

        cursor.move_cursor(-1, 10);
        cursor.move_cursor(-1, 10);
        cursor.move_cursor(-1, 10);
        assert_eq!((cursor.current(), cursor.top()), (1, 1));

        let mv = cursor.move_cursor(-1, 10);
        assert_eq!((cursor.current(), cursor.top()), (0, 0));
        assert!(mv.changed);
        assert!(mv.full_redraw);
    }

    #[test]
    fn test_move_inside_window_is_two_line_diff() {
        let mut cursor = ListCursor::new();
        let mv = cursor.move_cursor(1, 10);
        assert_eq!(cursor.top(), 0);
        assert!(mv.changed);
        assert!(!mv.full_redraw);
        assert_eq!(mv.previous, 0);
        assert_eq!(cursor.line_of(mv.previous), Some(1));
        assert_eq!(cursor.line_of(cursor.current()), Some(2));
    }

    #[test]
    fn test_scroll_down_puts_cursor_on_last_line() {
        let mut cursor = ListCursor::new();
        for _ in 0..3 {
            assert!(!cursor.move_cursor(1, 10).full_redraw);
        }
        let mv = cursor.move_cursor(1, 10);
        assert!(mv.full_redraw);
        assert_eq!(cursor.line_of(cursor.current()), Some(4));
        assert_eq!(cursor.visible(10), 1..5);
    }

    #[test]
    fn test_select_and_visible_on_small_lists() {
        let cursor = ListCursor::new();
        assert_eq!(cursor.select(0), None);
        assert_eq!(cursor.visible(0), 0..0);
        assert_eq!(cursor.select(2), Some(0));
        assert_eq!(cursor.visible(2), 0..2);
    }

    #[test]
    fn test_clamp_to_shrunk_list() {
        let mut cursor = ListCursor::new();
        for _ in 0..9 {
            cursor.move_cursor(1, 10);
        }
        cursor.clamp_to(3);
        assert_invariant(&cursor, 3);
        assert_eq!(cursor.current(), 2);

        cursor.clamp_to(0);
        assert_invariant(&cursor, 0);
    }
}
