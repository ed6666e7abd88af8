//! The surface device
//!
//! Owns the shared context and the active mode, applies mode switches, and
//! bridges the outside world in: hardware events from the host, change
//! notifications from the model, and the poll tick.
//!
//! # Architecture
//!
//! ```text
//! host thread ─► SurfaceEvent ─► flume ─┐
//! model ───────► ParamChange ──► flume ─┼─► poll() ─► active mode ─► Screen ─► OSC/UDP
//!                                       │                 │
//! host ◄──────── HostMessage ◄─ flume ◄─┘                 └─► model.change_param(Local)
//! ```

use crate::config::SurfaceConfig;
use crate::context::SurfaceContext;
use crate::events::SurfaceEvent;
use crate::host::HostMessage;
use crate::modes::{Mode, ModeKind};
use crate::pots::PotLock;
use crate::router::{classify, Route};
use crate::screen::{OscScreenTransport, Screen};
use crate::SurfaceError;
use flume::{Receiver, Sender};
use kontrol_model::{ChangeSource, ModelError, ParamChange, Parameter, ParameterModel};
use std::sync::Arc;

/// A control surface bound to one rack of a parameter model
pub struct Device<M: ParameterModel> {
    ctx: SurfaceContext<M>,
    mode: Mode,
    /// Change notifications from the model
    notifications: Receiver<ParamChange>,
    event_tx: Sender<SurfaceEvent>,
    event_rx: Receiver<SurfaceEvent>,
    host_rx: Receiver<HostMessage>,
}

impl<M: ParameterModel> Device<M> {
    /// Create a device and show the initial module
    ///
    /// Queues the host setup messages (`midiOutGate 0`, `enableSubMenu 1`)
    /// and enters parameter mode on the first page.
    pub fn new(model: Arc<M>, screen: Screen, config: SurfaceConfig) -> Self {
        let notifications = model.subscribe();
        let (event_tx, event_rx) = flume::unbounded();
        let (host_tx, host_rx) = flume::unbounded();

        log::info!(
            "Surface: rack '{}', module '{}', screen {}",
            config.rack_id,
            config.initial_module,
            if screen.is_connected() { "connected" } else { "disconnected" }
        );

        let mut ctx = SurfaceContext::new(model, screen, config, host_tx);
        ctx.send_host(HostMessage::MidiOutGate(false));
        ctx.send_host(HostMessage::EnableSubMenu(true));

        let mut mode = Mode::new(ModeKind::Parameter, &ctx);
        mode.activate(&mut ctx);

        Self {
            ctx,
            mode,
            notifications,
            event_tx,
            event_rx,
            host_rx,
        }
    }

    /// Create a device drawing over OSC to the configured screen
    ///
    /// Unlike [`Screen::connect`], a screen that can't be opened is an
    /// error, as is a rack the model doesn't know.
    pub fn connect(model: Arc<M>, config: SurfaceConfig) -> Result<Self, SurfaceError> {
        if !model.has_rack(&config.rack_id) {
            return Err(ModelError::RackNotFound(config.rack_id.clone()).into());
        }
        let transport = OscScreenTransport::connect(
            &config.screen.host,
            config.screen.port,
            config.screen.screen_id,
        )?;
        let screen = Screen::new(Box::new(transport), config.screen.width_chars);
        Ok(Self::new(model, screen, config))
    }

    fn apply(&mut self, next: Option<ModeKind>) {
        if let Some(kind) = next {
            self.switch_to(kind);
        }
    }

    fn switch_to(&mut self, kind: ModeKind) {
        log::info!("Mode: {} -> {}", self.mode.kind(), kind);
        self.mode = Mode::new(kind, &self.ctx);
        self.mode.activate(&mut self.ctx);
    }

    // ------------------------------------------------------------------
    // Hardware input
    // ------------------------------------------------------------------

    /// Pot `pot` (0-3) moved to a raw reading
    pub fn on_pot(&mut self, pot: usize, raw: f32) {
        let next = self.mode.on_pot(&mut self.ctx, pot, raw);
        self.apply(next);
    }

    /// Encoder turned; positive is clockwise
    pub fn on_encoder(&mut self, value: i32) {
        let next = self.mode.on_encoder(&mut self.ctx, value);
        self.apply(next);
    }

    /// Encoder button pressed or released
    pub fn on_button(&mut self, pressed: bool) {
        let next = self.mode.on_button(&mut self.ctx, pressed);
        self.apply(next);
    }

    /// MIDI control change
    ///
    /// With MIDI learn on, the CC is first mapped to (value > 0) or unmapped
    /// from (value 0) the last parameter that changed. The CC is then
    /// passed to the model's mapping table.
    pub fn on_midi_cc(&mut self, cc: u8, value: u8) {
        if self.ctx.midi_learn {
            if let Some(param_id) = self.ctx.last_param.take() {
                let (rack, module) = (&self.ctx.rack_id, &self.ctx.module_id);
                let result = if value > 0 {
                    log::debug!("MIDI learn: cc {} -> {}/{}", cc, module, param_id);
                    self.ctx.model.add_midi_cc_mapping(rack, cc, module, &param_id)
                } else {
                    log::debug!("MIDI learn: cc {} -/-> {}/{}", cc, module, param_id);
                    self.ctx.model.remove_midi_cc_mapping(rack, cc, module, &param_id)
                };
                if let Err(e) = result {
                    log::warn!("MIDI learn: cc {}: {}", cc, e);
                }
            }
        }
        self.ctx.model.change_midi_cc(&self.ctx.rack_id, cc, value);
    }

    /// Keyboard key; the host patch plays notes, the surface ignores keys
    pub fn on_key(&mut self, code: u8, value: u8) {
        log::trace!("Key {} = {} ignored in {} mode", code, value, self.mode.kind());
    }

    // ------------------------------------------------------------------
    // Model notifications and tick
    // ------------------------------------------------------------------

    /// Handle one change notification
    ///
    /// Normally called from [`poll`](Self::poll); hosts delivering changes
    /// another way can call it directly.
    pub fn changed(&mut self, change: &ParamChange) {
        let route = classify(&self.ctx.rack_id, &self.ctx.module_id, change);
        if route == Route::Discard {
            log::trace!(
                "Change to {}/{}/{} not for this surface",
                change.rack_id,
                change.module_id,
                change.parameter.id
            );
            return;
        }

        // A learned CC's own writes must not become the next learn target
        if self.ctx.midi_learn && change.source != ChangeSource::Midi {
            self.ctx.last_param = Some(change.parameter.id.clone());
        }

        let next = self.mode.on_changed(&mut self.ctx, change, route);
        self.apply(next);
    }

    /// Drain queued events and notifications, then advance timers one tick
    pub fn poll(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
        while let Ok(change) = self.notifications.try_recv() {
            self.changed(&change);
        }
        let next = self.mode.on_poll(&mut self.ctx);
        self.apply(next);
    }

    fn handle_event(&mut self, event: SurfaceEvent) {
        log::trace!("Event: {:?}", event);
        match event {
            SurfaceEvent::Pot { pot, raw } => self.on_pot(pot, raw),
            SurfaceEvent::Encoder(value) => self.on_encoder(value),
            SurfaceEvent::Button { pressed } => self.on_button(pressed),
            SurfaceEvent::MidiCc { cc, value } => self.on_midi_cc(cc, value),
            SurfaceEvent::RawMidi(bytes) => {
                if let Some(SurfaceEvent::MidiCc { cc, value }) = SurfaceEvent::from_midi(&bytes) {
                    self.on_midi_cc(cc, value);
                }
            }
            SurfaceEvent::Key { code, value } => self.on_key(code, value),
            SurfaceEvent::SetModule(module_id) => self.set_current_module(&module_id),
            SurfaceEvent::LoadPreset(name) => self.load_preset(&name),
            SurfaceEvent::LoadSettings => self.load_settings(),
        }
    }

    // ------------------------------------------------------------------
    // Host commands
    // ------------------------------------------------------------------

    /// Show another module of the rack, starting on its first page
    pub fn set_current_module(&mut self, module_id: &str) {
        if self.ctx.model.module(&self.ctx.rack_id, module_id).is_none() {
            log::warn!("Module '{}' not found in rack '{}'", module_id, self.ctx.rack_id);
            return;
        }
        log::info!("Module: {} -> {}", self.ctx.module_id, module_id);
        self.ctx.module_id = module_id.to_string();
        self.ctx.page_index = 0;
        self.ctx.last_param = None;
        self.switch_to(ModeKind::Parameter);
    }

    /// Apply a preset to the rack and make it current
    pub fn load_preset(&mut self, name: &str) {
        match self.ctx.model.apply_preset(&self.ctx.rack_id, name) {
            Ok(()) => {
                log::info!("Preset: {}", name);
                self.ctx.preset_id = name.to_string();
            }
            Err(e) => log::warn!("Load preset '{}' failed: {}", name, e),
        }
    }

    /// Restore the rack's saved settings
    ///
    /// Restored values arrive as preset-origin notifications on the next poll.
    pub fn load_settings(&mut self) {
        match self.ctx.model.load_settings(&self.ctx.rack_id) {
            Ok(()) => log::info!("Settings loaded for rack {}", self.ctx.rack_id),
            Err(e) => log::warn!("Load settings for '{}' failed: {}", self.ctx.rack_id, e),
        }
    }

    /// Sender for queueing events from other threads
    pub fn event_sender(&self) -> Sender<SurfaceEvent> {
        self.event_tx.clone()
    }

    /// Take all pending host messages
    pub fn drain_host_messages(&self) -> Vec<HostMessage> {
        self.host_rx.try_iter().collect()
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn rack_id(&self) -> &str {
        &self.ctx.rack_id
    }

    pub fn module_id(&self) -> &str {
        &self.ctx.module_id
    }

    pub fn preset_id(&self) -> &str {
        &self.ctx.preset_id
    }

    pub fn page_index(&self) -> usize {
        self.ctx.page_index
    }

    pub fn midi_learn(&self) -> bool {
        self.ctx.midi_learn
    }

    /// Parameter the next learned CC would be mapped to
    pub fn learn_target(&self) -> Option<&str> {
        self.ctx.last_param.as_deref()
    }

    /// Lock state of a pot (parameter mode only)
    pub fn pot_lock(&self, pot: usize) -> Option<PotLock> {
        match &self.mode {
            Mode::Parameter(mode) => mode.pot_lock(pot),
            _ => None,
        }
    }

    /// Parameters on the shown page (parameter mode only)
    pub fn params(&self) -> &[Parameter] {
        match &self.mode {
            Mode::Parameter(mode) => mode.params(),
            _ => &[],
        }
    }

    /// Items of the open menu
    pub fn menu_items(&self) -> &[String] {
        match &self.mode {
            Mode::MainMenu(menu) => menu.list().items(),
            Mode::PresetMenu(menu) => menu.list().items(),
            Mode::Parameter(_) => &[],
        }
    }

    /// Highlighted menu item
    pub fn menu_selection(&self) -> Option<usize> {
        match &self.mode {
            Mode::MainMenu(menu) => menu.list().selected(),
            Mode::PresetMenu(menu) => menu.list().selected(),
            Mode::Parameter(_) => None,
        }
    }
}
