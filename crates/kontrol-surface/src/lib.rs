//! Control surface runtime for kontrol racks
//!
//! This crate provides:
//! - Pot value locking so absolute pots never make parameters jump
//! - Parameter, main menu and preset menu modes driven by an encoder
//! - An OLED renderer sending draw commands as OSC over UDP
//! - Change routing that tells the surface's own writes from foreign ones
//! - MIDI learn and raw MIDI decoding via midly
//! - A flume event queue so hardware threads can feed a single-threaded core
//!
//! # Architecture
//!
//! ```text
//! pots/encoder/MIDI → SurfaceEvent → flume → Device::poll() → Mode → Screen → OSC/UDP
//!                                                   ▲           │
//!                   ParameterModel ── ParamChange ──┘           └── change_param(Local)
//! ```
//!
//! The host calls [`Device::poll`] at its own cadence; popup and menu
//! timeouts are counted in polls.

mod config;
mod context;
mod device;
mod events;
mod host;
pub mod modes;
mod navigator;
mod pots;
mod router;
pub mod screen;
mod timer;

pub use config::{
    default_surface_config_path, load_surface_config, save_surface_config, PotConfig,
    ScreenConfig, SurfaceConfig, TimingConfig,
};
pub use context::SurfaceContext;
pub use device::Device;
pub use events::SurfaceEvent;
pub use host::HostMessage;
pub use modes::ModeKind;
pub use navigator::{CursorMove, ListCursor, WINDOW};
pub use pots::{PotLock, PotLockTracker, NUM_POTS};
pub use router::{classify, Route};
pub use screen::{CaptureTransport, DrawCommand, OscScreenTransport, Screen, TransportError};
pub use timer::PopupTimer;

pub use kontrol_model::ModelError;

/// Error type for surface setup
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Screen transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Parameter model error: {0}")]
    Model(#[from] ModelError),
}
