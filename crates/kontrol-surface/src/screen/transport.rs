//! Screen transports
//!
//! The display process listens for OSC messages on a local UDP port. Sends
//! are fire-and-forget: nothing is read back, failures are logged at trace
//! level and dropped.

use super::DrawCommand;
use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::{Arc, Mutex};

/// Error type for screen transport setup
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to open screen socket: {0}")]
    Socket(#[from] std::io::Error),

    #[error("Could not resolve screen address: {0}")]
    Address(String),

    #[error("Failed to encode OSC message: {0}")]
    Encode(String),
}

/// Sink for draw commands
pub trait ScreenTransport: Send {
    /// Send one command, best effort
    fn send(&mut self, command: &DrawCommand);
}

/// Build the OSC message for a draw command
///
/// Every message starts with the screen id, followed by the command's
/// integer geometry and, for text, the string.
pub fn to_osc_message(command: &DrawCommand, screen_id: i32) -> OscMessage {
    let mut args = vec![OscType::Int(screen_id)];
    match command {
        DrawCommand::FillArea { x, y, w, h, color } | DrawCommand::Box { x, y, w, h, color } => {
            args.extend([*x, *y, *w, *h, *color].map(OscType::Int));
        }
        DrawCommand::Println { x, y, size, color, text } => {
            args.extend([*x, *y, *size, *color].map(OscType::Int));
            args.push(OscType::String(text.clone()));
        }
        DrawCommand::InvertArea { x, y, w, h } => {
            args.extend([*x, *y, *w, *h].map(OscType::Int));
        }
    }

    OscMessage {
        addr: command.address().to_string(),
        args,
    }
}

/// Encode a draw command as an OSC packet
pub fn encode_command(command: &DrawCommand, screen_id: i32) -> Result<Vec<u8>, TransportError> {
    let packet = OscPacket::Message(to_osc_message(command, screen_id));
    encoder::encode(&packet).map_err(|e| TransportError::Encode(format!("{:?}", e)))
}

/// OSC-over-UDP transport to the display process
pub struct OscScreenTransport {
    socket: UdpSocket,
    target: SocketAddr,
    screen_id: i32,
}

impl OscScreenTransport {
    /// Open a socket aimed at the display process
    ///
    /// UDP is connectionless, so this only fails if the address can't be
    /// resolved or no local socket can be opened.
    pub fn connect(host: &str, port: u16, screen_id: i32) -> Result<Self, TransportError> {
        let target = (host, port)
            .to_socket_addrs()
            .map_err(|e| TransportError::Address(format!("{}:{}: {}", host, port, e)))?
            .next()
            .ok_or_else(|| TransportError::Address(format!("{}:{}", host, port)))?;

        let bind_addr = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.set_nonblocking(true)?;

        log::info!("Screen: sending draw commands to {} (screen {})", target, screen_id);

        Ok(Self {
            socket,
            target,
            screen_id,
        })
    }

    /// Address draw commands are sent to
    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl ScreenTransport for OscScreenTransport {
    fn send(&mut self, command: &DrawCommand) {
        let bytes = match encode_command(command, self.screen_id) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::trace!("Screen: {}", e);
                return;
            }
        };
        if let Err(e) = self.socket.send_to(&bytes, self.target) {
            log::trace!("Screen: send to {} failed: {}", self.target, e);
        }
    }
}

/// Transport that records commands in memory
///
/// Clones share the same buffer, so a host (or test) can keep one handle
/// while the surface owns another.
#[derive(Debug, Clone, Default)]
pub struct CaptureTransport {
    commands: Arc<Mutex<Vec<DrawCommand>>>,
}

impl CaptureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Remove and return everything recorded so far
    pub fn take(&self) -> Vec<DrawCommand> {
        self.commands
            .lock()
            .map(|mut c| std::mem::take(&mut *c))
            .unwrap_or_default()
    }
}

impl ScreenTransport for CaptureTransport {
    fn send(&mut self, command: &DrawCommand) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_osc_message_layout() {
        let msg = to_osc_message(
            &DrawCommand::Println {
                x: 2,
                y: 9,
                size: 8,
                color: 1,
                text: "Home".to_string(),
            },
            3,
        );
        assert_eq!(msg.addr, "/oled/gPrintln");
        assert_eq!(
            msg.args,
            vec![
                OscType::Int(3),
                OscType::Int(2),
                OscType::Int(9),
                OscType::Int(8),
                OscType::Int(1),
                OscType::String("Home".to_string()),
            ]
        );

        let msg = to_osc_message(&DrawCommand::InvertArea { x: 0, y: 8, w: 128, h: 10 }, 3);
        assert_eq!(msg.addr, "/oled/gInvertArea");
        assert_eq!(msg.args.len(), 5);
    }

    #[test]
    fn test_udp_send_reaches_listener() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut transport = OscScreenTransport::connect("127.0.0.1", port, 3).unwrap();
        transport.send(&DrawCommand::FillArea { x: 0, y: 8, w: 128, h: 45, color: 0 });

        let mut buf = [0u8; 1024];
        let (len, _) = listener.recv_from(&mut buf).unwrap();
        let (_, packet) = rosc::decoder::decode_udp(&buf[..len]).unwrap();
        match packet {
            OscPacket::Message(msg) => {
                assert_eq!(msg.addr, "/oled/gFillArea");
                assert_eq!(msg.args[0], OscType::Int(3));
            }
            other => panic!("unexpected packet {:?}", other),
        }
    }

    #[test]
    fn test_capture_transport_shares_buffer() {
        let capture = CaptureTransport::new();
        let mut sink = capture.clone();
        sink.send(&DrawCommand::InvertArea { x: 0, y: 8, w: 128, h: 10 });

        assert_eq!(capture.commands().len(), 1);
        assert_eq!(capture.take().len(), 1);
        assert!(capture.commands().is_empty());
    }
}
