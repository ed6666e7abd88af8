//! Kontrol Model - parameter tree shared by kontrol surfaces
//!
//! This crate provides:
//! - Value types for racks, modules, pages and parameters
//! - The [`ParameterModel`] trait that surface runtimes consume
//! - [`MemoryModel`], an in-memory implementation with presets and MIDI CC routes
//!
//! # Architecture
//!
//! ```text
//! surface → change_param(Local) → model → ParamChange → flume → surface.poll()
//! peer    → change_param(Remote) ─┘
//! ```

mod error;
mod memory;
mod model;
mod types;

pub use error::ModelError;
pub use memory::{MemoryModel, MidiTarget, PresetSnapshot, RackSettings, ValueMap};
pub use model::ParameterModel;
pub use types::{
    ChangeSource, EntityId, Module, Page, ParamChange, ParamKind, ParamValue, Parameter,
};
