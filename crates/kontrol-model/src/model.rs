//! The parameter model seam
//!
//! The surface runtime never owns parameter storage. It reads and writes
//! through this trait and receives every committed mutation back as a
//! [`ParamChange`] on a subscription channel.

use crate::error::ModelError;
use crate::types::{ChangeSource, Module, Page, ParamChange, ParamValue, Parameter};
use flume::Receiver;

/// Read/write access to a rack → module → page → parameter tree
///
/// All calls are synchronous, in-process and non-blocking. Implementations
/// must notify every subscriber of every committed change, whatever its
/// origin, including changes made through [`change_param`](Self::change_param).
pub trait ParameterModel: Send + Sync {
    /// Whether a rack with this id exists
    fn has_rack(&self, rack_id: &str) -> bool;

    /// Look up a module in a rack
    fn module(&self, rack_id: &str, module_id: &str) -> Option<Module>;

    /// Pages of a module, in display order
    fn pages(&self, module: &Module) -> Vec<Page> {
        module.pages.clone()
    }

    /// Parameters shown on a page, in slot order
    fn params(&self, rack_id: &str, module: &Module, page: &Page) -> Vec<Parameter>;

    /// Write a parameter value
    fn change_param(
        &self,
        source: ChangeSource,
        rack_id: &str,
        module_id: &str,
        param_id: &str,
        value: ParamValue,
    ) -> Result<(), ModelError>;

    /// Subscribe to change notifications
    fn subscribe(&self) -> Receiver<ParamChange>;

    /// Preset names stored for a rack, or `None` if the rack doesn't exist
    fn preset_list(&self, rack_id: &str) -> Option<Vec<String>>;

    /// Load a preset's values into the rack
    fn apply_preset(&self, rack_id: &str, name: &str) -> Result<(), ModelError>;

    /// Store the rack's current values under a preset name (creating it if needed)
    fn update_preset(&self, rack_id: &str, name: &str) -> Result<(), ModelError>;

    /// Persist the rack's settings
    fn save_settings(&self, rack_id: &str) -> Result<(), ModelError>;

    /// Restore the rack's settings from the last save
    ///
    /// Restored values are notified with [`ChangeSource::Preset`].
    fn load_settings(&self, rack_id: &str) -> Result<(), ModelError>;

    /// Route a MIDI CC number to a parameter
    fn add_midi_cc_mapping(
        &self,
        rack_id: &str,
        cc: u8,
        module_id: &str,
        param_id: &str,
    ) -> Result<(), ModelError>;

    /// Remove a MIDI CC route
    fn remove_midi_cc_mapping(
        &self,
        rack_id: &str,
        cc: u8,
        module_id: &str,
        param_id: &str,
    ) -> Result<(), ModelError>;

    /// Feed a MIDI CC value (0-127) through the rack's CC mapping table
    fn change_midi_cc(&self, rack_id: &str, cc: u8, value: u8);
}
