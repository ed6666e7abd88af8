//! Scrolling item list shared by the menu modes

use crate::navigator::ListCursor;
use crate::screen::Screen;
use crate::timer::PopupTimer;

/// Items, cursor and inactivity timeout of a menu
#[derive(Debug, Default)]
pub struct MenuList {
    items: Vec<String>,
    cursor: ListCursor,
    timeout: PopupTimer,
}

impl MenuList {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn cursor(&self) -> ListCursor {
        self.cursor
    }

    /// Highlighted item index
    pub fn selected(&self) -> Option<usize> {
        self.cursor.select(self.items.len())
    }

    /// Replace one item's text and redraw it if visible
    pub fn set_item(&mut self, screen: &mut Screen, index: usize, text: String) {
        if let Some(item) = self.items.get_mut(index) {
            *item = text;
            self.draw_item(screen, index);
        }
    }

    /// Restart the inactivity timeout
    pub fn arm_timeout(&mut self, ticks: i32) {
        self.timeout.arm(ticks);
    }

    /// Advance the timeout; `true` when it expires
    pub fn tick(&mut self) -> bool {
        self.timeout.tick()
    }

    /// Redraw the whole window
    pub fn draw(&self, screen: &mut Screen) {
        screen.clear();
        for index in self.cursor.visible(self.items.len()) {
            self.draw_item(screen, index);
        }
    }

    fn draw_item(&self, screen: &mut Screen, index: usize) {
        let (Some(line), Some(text)) = (self.cursor.line_of(index), self.items.get(index)) else {
            return;
        };
        screen.display_line(line, text);
        if index == self.cursor.current() {
            screen.invert_line(line);
        }
    }

    /// Move the highlight and redraw what changed
    pub fn move_cursor(&mut self, screen: &mut Screen, direction: i32) {
        let mv = self.cursor.move_cursor(direction, self.items.len());
        if !mv.changed {
            return;
        }
        if mv.full_redraw {
            self.draw(screen);
        } else {
            self.draw_item(screen, mv.previous);
            self.draw_item(screen, self.cursor.current());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{CaptureTransport, DrawCommand};

    fn items(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Item {}", i)).collect()
    }

    #[test]
    fn test_draw_highlights_current() {
        let capture = CaptureTransport::new();
        let mut screen = Screen::new(Box::new(capture.clone()), 21);
        let menu = MenuList::new(items(6));
        menu.draw(&mut screen);

        let commands = capture.take();
        // clear + 4 lines of (fill, print) + one invert
        assert_eq!(commands.len(), 1 + 4 * 2 + 1);
        assert_eq!(
            commands.iter().filter(|c| matches!(c, DrawCommand::InvertArea { y: 8, .. })).count(),
            1
        );
    }

    #[test]
    fn test_move_inside_window_redraws_two_lines() {
        let capture = CaptureTransport::new();
        let mut screen = Screen::new(Box::new(capture.clone()), 21);
        let mut menu = MenuList::new(items(6));

        menu.move_cursor(&mut screen, 1);
        let commands = capture.take();
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::FillArea { h: 45, .. })));
        let printed: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Println { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(printed, vec!["Item 0", "Item 1"]);
        assert_eq!(menu.selected(), Some(1));
    }

    #[test]
    fn test_scroll_redraws_everything() {
        let capture = CaptureTransport::new();
        let mut screen = Screen::new(Box::new(capture.clone()), 21);
        let mut menu = MenuList::new(items(6));
        for _ in 0..3 {
            menu.move_cursor(&mut screen, 1);
        }
        capture.take();

        menu.move_cursor(&mut screen, 1);
        let commands = capture.take();
        assert!(matches!(commands[0], DrawCommand::FillArea { h: 45, .. }));
        assert_eq!(menu.cursor().top(), 1);
    }

    #[test]
    fn test_empty_menu() {
        let mut screen = Screen::disconnected(21);
        let mut menu = MenuList::new(Vec::new());
        menu.move_cursor(&mut screen, 1);
        assert_eq!(menu.selected(), None);
    }
}
