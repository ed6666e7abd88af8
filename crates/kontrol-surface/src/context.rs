//! State shared by all modes
//!
//! Modes come and go; everything that must survive a mode switch lives
//! here: the model handle, the screen, which rack/module/preset is active,
//! and the MIDI learn state.

use crate::config::SurfaceConfig;
use crate::host::HostMessage;
use crate::screen::Screen;
use flume::Sender;
use kontrol_model::{Module, ParameterModel};
use std::sync::Arc;

/// Surface state outliving any single mode
pub struct SurfaceContext<M: ParameterModel> {
    pub model: Arc<M>,
    pub screen: Screen,
    pub config: SurfaceConfig,

    /// Rack being edited
    pub rack_id: String,
    /// Module shown in parameter mode
    pub module_id: String,
    /// Preset last loaded or saved
    pub preset_id: String,
    /// Page shown in parameter mode, kept across menu visits
    pub page_index: usize,

    pub midi_learn: bool,
    /// Parameter the next learned CC will be mapped to
    pub last_param: Option<String>,

    host_tx: Sender<HostMessage>,
}

impl<M: ParameterModel> SurfaceContext<M> {
    pub fn new(
        model: Arc<M>,
        screen: Screen,
        config: SurfaceConfig,
        host_tx: Sender<HostMessage>,
    ) -> Self {
        Self {
            model,
            screen,
            rack_id: config.rack_id.clone(),
            module_id: config.initial_module.clone(),
            preset_id: String::new(),
            page_index: 0,
            midi_learn: false,
            last_param: None,
            host_tx,
            config,
        }
    }

    /// Queue a message for the host patch
    pub fn send_host(&self, message: HostMessage) {
        log::debug!("Host: {}", message);
        if self.host_tx.send(message).is_err() {
            log::trace!("Host: receiver gone, dropped {}", message);
        }
    }

    /// Look up the active module, warning if it's missing
    pub fn current_module(&self) -> Option<Module> {
        let module = self.model.module(&self.rack_id, &self.module_id);
        if module.is_none() {
            log::warn!(
                "Module '{}' not found in rack '{}'",
                self.module_id,
                self.rack_id
            );
        }
        module
    }
}
