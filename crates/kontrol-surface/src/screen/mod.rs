//! OLED screen renderer
//!
//! Turns surface state into draw commands for a 128x64 display with a
//! title bar and four text lines. Layout:
//!
//! ```text
//! y 0..8    title bar (owned by the host)
//! y 9       line 1
//! y 20      line 2
//! y 31      line 3
//! y 42      line 4
//! ```
//!
//! The renderer holds no display state of its own. Without a transport
//! every draw call is a no-op.

mod transport;

pub use transport::{
    encode_command, to_osc_message, CaptureTransport, OscScreenTransport, ScreenTransport,
    TransportError,
};

use crate::config::ScreenConfig;
use kontrol_model::Parameter;

/// Number of text lines below the title bar
pub const SCREEN_LINES: u32 = 4;

const SCREEN_PIXEL_WIDTH: i32 = 128;
const LINE_HEIGHT: i32 = 10;
const LINE_PITCH: i32 = 11;
const FIRST_LINE_Y: i32 = 9;
const TEXT_X: i32 = 2;
const TEXT_SIZE: i32 = 8;

const BLACK: i32 = 0;
const WHITE: i32 = 1;

/// A single display primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// Fill a rectangle with a solid colour
    FillArea { x: i32, y: i32, w: i32, h: i32, color: i32 },
    /// Outline a rectangle
    Box { x: i32, y: i32, w: i32, h: i32, color: i32 },
    /// Print a line of text
    Println { x: i32, y: i32, size: i32, color: i32, text: String },
    /// Invert every pixel in a rectangle
    InvertArea { x: i32, y: i32, w: i32, h: i32 },
}

impl DrawCommand {
    /// OSC address the display process listens on for this primitive
    pub fn address(&self) -> &'static str {
        match self {
            Self::FillArea { .. } => "/oled/gFillArea",
            Self::Box { .. } => "/oled/gBox",
            Self::Println { .. } => "/oled/gPrintln",
            Self::InvertArea { .. } => "/oled/gInvertArea",
        }
    }
}

/// Pixel row of a text line (lines are numbered from 1)
pub fn line_y(line: u32) -> i32 {
    (line as i32 - 1) * LINE_PITCH + FIRST_LINE_Y
}

/// Lay out a parameter as `name ... value unit` across `width` characters
///
/// The unit is cut or padded to exactly two characters. If the result is
/// wider than `width`, characters are dropped from the left so the value
/// stays visible.
pub fn format_param_line(name: &str, value: &str, unit: &str, width: usize) -> String {
    let unit: String = unit.chars().chain("  ".chars()).take(2).collect();
    let used = name.chars().count() + value.chars().count() + 1 + unit.chars().count();
    let pad = width.saturating_sub(used);

    let line = format!("{}{}{} {}", name, " ".repeat(pad), value, unit);
    let len = line.chars().count();
    if len > width {
        line.chars().skip(len - width).collect()
    } else {
        line
    }
}

/// Draw primitives for the surface's screen
pub struct Screen {
    transport: Option<Box<dyn ScreenTransport>>,
    width: usize,
}

impl Screen {
    /// Create a screen drawing through `transport`
    pub fn new(transport: Box<dyn ScreenTransport>, width: usize) -> Self {
        Self {
            transport: Some(transport),
            width,
        }
    }

    /// Create a screen with no transport; every draw is dropped
    pub fn disconnected(width: usize) -> Self {
        Self {
            transport: None,
            width,
        }
    }

    /// Open the OSC transport described by `config`
    ///
    /// If the transport can't be opened the screen stays disconnected.
    pub fn connect(config: &ScreenConfig) -> Self {
        match OscScreenTransport::connect(&config.host, config.port, config.screen_id) {
            Ok(transport) => Self::new(Box::new(transport), config.width_chars),
            Err(e) => {
                log::warn!("Screen: {}, drawing disabled", e);
                Self::disconnected(config.width_chars)
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Characters per text line
    pub fn width(&self) -> usize {
        self.width
    }

    fn send(&mut self, command: DrawCommand) {
        if let Some(transport) = self.transport.as_mut() {
            transport.send(&command);
        }
    }

    /// Blank the four text lines
    pub fn clear(&mut self) {
        self.send(DrawCommand::FillArea {
            x: 0,
            y: FIRST_LINE_Y - 1,
            w: SCREEN_PIXEL_WIDTH,
            h: 45,
            color: BLACK,
        });
    }

    /// Replace a line's contents with `text`
    pub fn display_line(&mut self, line: u32, text: &str) {
        if line == 0 || line > SCREEN_LINES {
            return;
        }
        let y = line_y(line);
        self.send(DrawCommand::FillArea {
            x: 0,
            y,
            w: SCREEN_PIXEL_WIDTH,
            h: LINE_HEIGHT,
            color: BLACK,
        });
        self.send(DrawCommand::Println {
            x: TEXT_X,
            y,
            size: TEXT_SIZE,
            color: WHITE,
            text: text.to_string(),
        });
    }

    /// Show a parameter's name, value and unit on a line
    pub fn display_param_line(&mut self, line: u32, param: &Parameter) {
        let text = format_param_line(
            param.display_name(),
            &param.display_value(),
            param.display_unit(),
            self.width,
        );
        self.display_line(line, &text);
    }

    /// Toggle the highlight on a line
    pub fn invert_line(&mut self, line: u32) {
        if line == 0 || line > SCREEN_LINES {
            return;
        }
        self.send(DrawCommand::InvertArea {
            x: 0,
            y: line_y(line) - 1,
            w: SCREEN_PIXEL_WIDTH,
            h: LINE_HEIGHT,
        });
    }

    /// Draw a boxed message over the middle of the screen
    pub fn display_popup(&mut self, text: &str) {
        self.send(DrawCommand::FillArea { x: 14, y: 14, w: 100, h: 34, color: BLACK });
        self.send(DrawCommand::Box { x: 14, y: 14, w: 100, h: 34, color: WHITE });
        self.send(DrawCommand::Println {
            x: 20,
            y: 24,
            size: 16,
            color: WHITE,
            text: text.to_string(),
        });
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("connected", &self.is_connected())
            .field("width", &self.width)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kontrol_model::ParamKind;

    fn capture_screen() -> (Screen, CaptureTransport) {
        let capture = CaptureTransport::new();
        (Screen::new(Box::new(capture.clone()), 21), capture)
    }

    #[test]
    fn test_line_positions() {
        assert_eq!(line_y(1), 9);
        assert_eq!(line_y(2), 20);
        assert_eq!(line_y(3), 31);
        assert_eq!(line_y(4), 42);
    }

    #[test]
    fn test_param_line_padding() {
        let line = format_param_line("Cutoff", "42.0", "%", 21);
        assert_eq!(line, "Cutoff        42.0 % ");
        assert_eq!(line.chars().count(), 21);

        // Unit is cut to two characters
        assert_eq!(format_param_line("Freq", "440", "Hz!", 21), "Freq           440 Hz");
    }

    #[test]
    fn test_param_line_overflow_keeps_value() {
        let line = format_param_line("Very Long Parameter Name", "100", "", 21);
        assert_eq!(line, " Parameter Name100   ");
        assert_eq!(line.chars().count(), 21);
    }

    #[test]
    fn test_param_line_counts_chars_not_bytes() {
        let line = format_param_line("Détune", "0.50", "", 21);
        assert_eq!(line.chars().count(), 21);
        assert!(line.starts_with("Détune"));
    }

    #[test]
    fn test_display_line_commands() {
        let (mut screen, capture) = capture_screen();
        screen.display_line(2, "Home");
        assert_eq!(
            capture.take(),
            vec![
                DrawCommand::FillArea { x: 0, y: 20, w: 128, h: 10, color: 0 },
                DrawCommand::Println { x: 2, y: 20, size: 8, color: 1, text: "Home".into() },
            ]
        );

        screen.invert_line(1);
        assert_eq!(
            capture.take(),
            vec![DrawCommand::InvertArea { x: 0, y: 8, w: 128, h: 10 }]
        );
    }

    #[test]
    fn test_out_of_range_lines_are_ignored() {
        let (mut screen, capture) = capture_screen();
        screen.display_line(0, "x");
        screen.display_line(5, "x");
        screen.invert_line(9);
        assert!(capture.commands().is_empty());
    }

    #[test]
    fn test_popup_and_clear() {
        let (mut screen, capture) = capture_screen();
        screen.clear();
        screen.display_popup("Page 2");
        assert_eq!(
            capture.take(),
            vec![
                DrawCommand::FillArea { x: 0, y: 8, w: 128, h: 45, color: 0 },
                DrawCommand::FillArea { x: 14, y: 14, w: 100, h: 34, color: 0 },
                DrawCommand::Box { x: 14, y: 14, w: 100, h: 34, color: 1 },
                DrawCommand::Println { x: 20, y: 24, size: 16, color: 1, text: "Page 2".into() },
            ]
        );
    }

    #[test]
    fn test_param_line_uses_parameter_formatting() {
        let (mut screen, capture) = capture_screen();
        let param = Parameter::new("mix", "Mix", ParamKind::Pct).with_value(50.0_f32);
        screen.display_param_line(1, &param);

        let commands = capture.take();
        assert_eq!(
            commands[1],
            DrawCommand::Println {
                x: 2,
                y: 9,
                size: 8,
                color: 1,
                text: "Mix           50.0 % ".into(),
            }
        );
    }

    #[test]
    fn test_disconnected_screen_is_silent() {
        let mut screen = Screen::disconnected(21);
        assert!(!screen.is_connected());
        screen.clear();
        screen.display_popup("nothing");
    }
}
