//! In-memory parameter model
//!
//! A complete [`ParameterModel`] that keeps racks, presets and MIDI CC
//! routes in memory. Change notifications are pushed to every subscriber
//! over an unbounded flume channel, so committing a change never blocks and
//! never calls back into the subscriber.
//!
//! Settings snapshots are written to and read back from `<settings_dir>/<rack>-rack.yaml`
//! when a settings directory is configured.

use crate::error::ModelError;
use crate::model::ParameterModel;
use crate::types::{ChangeSource, EntityId, Module, Page, ParamChange, ParamValue, Parameter};
use flume::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

/// Values keyed by module id, then parameter id
pub type ValueMap = BTreeMap<EntityId, BTreeMap<EntityId, ParamValue>>;

/// A named set of stored values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSnapshot {
    pub name: String,
    pub values: ValueMap,
}

/// Target of a MIDI CC route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiTarget {
    pub module: EntityId,
    pub param: EntityId,
}

/// Everything persisted by [`ParameterModel::save_settings`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackSettings {
    pub rack: EntityId,
    pub values: ValueMap,
    #[serde(default)]
    pub presets: Vec<PresetSnapshot>,
    #[serde(default)]
    pub midi_mapping: BTreeMap<u8, Vec<MidiTarget>>,
}

struct ModuleState {
    module: Module,
    params: Vec<Parameter>,
}

impl ModuleState {
    fn param(&self, id: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.id == id)
    }

    fn param_mut(&mut self, id: &str) -> Option<&mut Parameter> {
        self.params.iter_mut().find(|p| p.id == id)
    }
}

#[derive(Default)]
struct RackState {
    modules: Vec<ModuleState>,
    presets: Vec<PresetSnapshot>,
    midi_mapping: BTreeMap<u8, Vec<MidiTarget>>,
}

impl RackState {
    fn module(&self, id: &str) -> Option<&ModuleState> {
        self.modules.iter().find(|m| m.module.id == id)
    }

    fn module_mut(&mut self, id: &str) -> Option<&mut ModuleState> {
        self.modules.iter_mut().find(|m| m.module.id == id)
    }

    fn snapshot_values(&self) -> ValueMap {
        self.modules
            .iter()
            .map(|m| {
                let values = m
                    .params
                    .iter()
                    .map(|p| (p.id.clone(), p.current.clone()))
                    .collect();
                (m.module.id.clone(), values)
            })
            .collect()
    }

    /// Commit a value, returning the notification if the value actually changed
    fn set_value(
        &mut self,
        source: ChangeSource,
        rack_id: &str,
        module_id: &str,
        param_id: &str,
        value: ParamValue,
    ) -> Result<Option<ParamChange>, ModelError> {
        let module = self
            .module_mut(module_id)
            .ok_or_else(|| ModelError::ModuleNotFound {
                rack: rack_id.to_string(),
                module: module_id.to_string(),
            })?;
        let param = module
            .param_mut(param_id)
            .ok_or_else(|| ModelError::ParamNotFound {
                module: module_id.to_string(),
                param: param_id.to_string(),
            })?;

        let rendered = value.to_string();
        let value = param.kind.clamp(value).ok_or_else(|| ModelError::InvalidValue {
            param: param_id.to_string(),
            value: rendered,
        })?;

        if param.current == value {
            return Ok(None);
        }
        param.current = value;

        Ok(Some(ParamChange {
            source,
            rack_id: rack_id.to_string(),
            module_id: module_id.to_string(),
            parameter: param.clone(),
        }))
    }
}

/// In-memory rack model
pub struct MemoryModel {
    racks: RwLock<HashMap<EntityId, RackState>>,
    subscribers: Mutex<Vec<Sender<ParamChange>>>,
    settings_dir: Option<PathBuf>,
}

impl Default for MemoryModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryModel {
    /// Create an empty model that doesn't persist settings
    pub fn new() -> Self {
        Self {
            racks: RwLock::new(HashMap::new()),
            subscribers: Mutex::new(Vec::new()),
            settings_dir: None,
        }
    }

    /// Create an empty model that writes settings snapshots into `dir`
    pub fn with_settings_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            settings_dir: Some(dir.into()),
            ..Self::new()
        }
    }

    /// Add an empty rack (no-op if it already exists)
    pub fn add_rack(&self, rack_id: &str) {
        if let Ok(mut racks) = self.racks.write() {
            racks.entry(rack_id.to_string()).or_default();
        }
    }

    /// Add or replace a module in a rack
    pub fn add_module(
        &self,
        rack_id: &str,
        module: Module,
        params: Vec<Parameter>,
    ) -> Result<(), ModelError> {
        let mut racks = self.racks.write().map_err(|_| ModelError::Unavailable)?;
        let rack = racks
            .get_mut(rack_id)
            .ok_or_else(|| ModelError::RackNotFound(rack_id.to_string()))?;

        log::debug!(
            "add_module: {} ({} pages, {} params) into rack {}",
            module.id,
            module.pages.len(),
            params.len(),
            rack_id
        );

        rack.modules.retain(|m| m.module.id != module.id);
        rack.modules.push(ModuleState { module, params });
        Ok(())
    }

    /// Look up a single parameter
    pub fn param(&self, rack_id: &str, module_id: &str, param_id: &str) -> Option<Parameter> {
        let racks = self.racks.read().ok()?;
        racks
            .get(rack_id)?
            .module(module_id)?
            .param(param_id)
            .cloned()
    }

    /// Current routes for a MIDI CC number
    pub fn midi_mappings(&self, rack_id: &str, cc: u8) -> Vec<MidiTarget> {
        self.racks
            .read()
            .ok()
            .and_then(|racks| racks.get(rack_id).and_then(|r| r.midi_mapping.get(&cc).cloned()))
            .unwrap_or_default()
    }

    /// Build the settings snapshot for a rack
    pub fn settings_snapshot(&self, rack_id: &str) -> Option<RackSettings> {
        let racks = self.racks.read().ok()?;
        let rack = racks.get(rack_id)?;
        Some(RackSettings {
            rack: rack_id.to_string(),
            values: rack.snapshot_values(),
            presets: rack.presets.clone(),
            midi_mapping: rack.midi_mapping.clone(),
        })
    }

    /// Push changes to all subscribers, dropping any that have gone away
    fn notify(&self, changes: Vec<ParamChange>) {
        if changes.is_empty() {
            return;
        }
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return;
        };
        subscribers.retain(|tx| changes.iter().all(|c| tx.send(c.clone()).is_ok()));
    }
}

impl ParameterModel for MemoryModel {
    fn has_rack(&self, rack_id: &str) -> bool {
        self.racks
            .read()
            .map(|racks| racks.contains_key(rack_id))
            .unwrap_or(false)
    }

    fn module(&self, rack_id: &str, module_id: &str) -> Option<Module> {
        let racks = self.racks.read().ok()?;
        racks
            .get(rack_id)?
            .module(module_id)
            .map(|m| m.module.clone())
    }

    fn params(&self, rack_id: &str, module: &Module, page: &Page) -> Vec<Parameter> {
        let Ok(racks) = self.racks.read() else {
            return Vec::new();
        };
        let Some(state) = racks.get(rack_id).and_then(|r| r.module(&module.id)) else {
            return Vec::new();
        };

        page.param_ids
            .iter()
            .filter_map(|id| {
                let param = state.param(id).cloned();
                if param.is_none() {
                    log::debug!("params: page {} references unknown param {}", page.id, id);
                }
                param
            })
            .collect()
    }

    fn change_param(
        &self,
        source: ChangeSource,
        rack_id: &str,
        module_id: &str,
        param_id: &str,
        value: ParamValue,
    ) -> Result<(), ModelError> {
        let change = {
            let mut racks = self.racks.write().map_err(|_| ModelError::Unavailable)?;
            let rack = racks
                .get_mut(rack_id)
                .ok_or_else(|| ModelError::RackNotFound(rack_id.to_string()))?;
            rack.set_value(source, rack_id, module_id, param_id, value)?
        };

        self.notify(change.into_iter().collect());
        Ok(())
    }

    fn subscribe(&self) -> Receiver<ParamChange> {
        let (tx, rx) = flume::unbounded();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }

    fn preset_list(&self, rack_id: &str) -> Option<Vec<String>> {
        let racks = self.racks.read().ok()?;
        let rack = racks.get(rack_id)?;
        Some(rack.presets.iter().map(|p| p.name.clone()).collect())
    }

    fn apply_preset(&self, rack_id: &str, name: &str) -> Result<(), ModelError> {
        let changes = {
            let mut racks = self.racks.write().map_err(|_| ModelError::Unavailable)?;
            let rack = racks
                .get_mut(rack_id)
                .ok_or_else(|| ModelError::RackNotFound(rack_id.to_string()))?;
            let preset = rack
                .presets
                .iter()
                .find(|p| p.name == name)
                .cloned()
                .ok_or_else(|| ModelError::PresetNotFound(name.to_string()))?;

            let mut changes = Vec::new();
            for (module_id, values) in &preset.values {
                for (param_id, value) in values {
                    // Presets may reference modules that have since been unloaded
                    match rack.set_value(ChangeSource::Preset, rack_id, module_id, param_id, value.clone()) {
                        Ok(Some(change)) => changes.push(change),
                        Ok(None) => {}
                        Err(e) => log::debug!("apply_preset: skipping {}: {}", param_id, e),
                    }
                }
            }
            changes
        };

        log::info!("apply_preset: {} ({} changes)", name, changes.len());
        self.notify(changes);
        Ok(())
    }

    fn update_preset(&self, rack_id: &str, name: &str) -> Result<(), ModelError> {
        let mut racks = self.racks.write().map_err(|_| ModelError::Unavailable)?;
        let rack = racks
            .get_mut(rack_id)
            .ok_or_else(|| ModelError::RackNotFound(rack_id.to_string()))?;

        let snapshot = PresetSnapshot {
            name: name.to_string(),
            values: rack.snapshot_values(),
        };
        match rack.presets.iter_mut().find(|p| p.name == name) {
            Some(existing) => *existing = snapshot,
            None => rack.presets.push(snapshot),
        }

        log::info!("update_preset: stored {} in rack {}", name, rack_id);
        Ok(())
    }

    fn save_settings(&self, rack_id: &str) -> Result<(), ModelError> {
        let settings = self
            .settings_snapshot(rack_id)
            .ok_or_else(|| ModelError::RackNotFound(rack_id.to_string()))?;

        let Some(dir) = &self.settings_dir else {
            log::info!("save_settings: no settings directory configured for rack {}", rack_id);
            return Ok(());
        };

        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}-rack.yaml", rack_id));
        let yaml = serde_yaml::to_string(&settings)?;
        std::fs::write(&path, yaml)?;

        log::info!("save_settings: wrote {:?}", path);
        Ok(())
    }

    fn load_settings(&self, rack_id: &str) -> Result<(), ModelError> {
        if !self.has_rack(rack_id) {
            return Err(ModelError::RackNotFound(rack_id.to_string()));
        }

        let Some(dir) = &self.settings_dir else {
            log::info!("load_settings: no settings directory configured for rack {}", rack_id);
            return Ok(());
        };

        let path = dir.join(format!("{}-rack.yaml", rack_id));
        let contents = std::fs::read_to_string(&path)?;
        let settings: RackSettings = serde_yaml::from_str(&contents)?;

        let changes = {
            let mut racks = self.racks.write().map_err(|_| ModelError::Unavailable)?;
            let rack = racks
                .get_mut(rack_id)
                .ok_or_else(|| ModelError::RackNotFound(rack_id.to_string()))?;

            rack.presets = settings.presets;
            rack.midi_mapping = settings.midi_mapping;

            let mut changes = Vec::new();
            for (module_id, values) in settings.values {
                for (param_id, value) in values {
                    match rack.set_value(ChangeSource::Preset, rack_id, &module_id, &param_id, value) {
                        Ok(Some(change)) => changes.push(change),
                        Ok(None) => {}
                        Err(e) => log::debug!("load_settings: skipping {}: {}", param_id, e),
                    }
                }
            }
            changes
        };

        log::info!("load_settings: read {:?} ({} changes)", path, changes.len());
        self.notify(changes);
        Ok(())
    }

    fn add_midi_cc_mapping(
        &self,
        rack_id: &str,
        cc: u8,
        module_id: &str,
        param_id: &str,
    ) -> Result<(), ModelError> {
        let mut racks = self.racks.write().map_err(|_| ModelError::Unavailable)?;
        let rack = racks
            .get_mut(rack_id)
            .ok_or_else(|| ModelError::RackNotFound(rack_id.to_string()))?;

        let target = MidiTarget {
            module: module_id.to_string(),
            param: param_id.to_string(),
        };
        let targets = rack.midi_mapping.entry(cc).or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
        Ok(())
    }

    fn remove_midi_cc_mapping(
        &self,
        rack_id: &str,
        cc: u8,
        module_id: &str,
        param_id: &str,
    ) -> Result<(), ModelError> {
        let mut racks = self.racks.write().map_err(|_| ModelError::Unavailable)?;
        let rack = racks
            .get_mut(rack_id)
            .ok_or_else(|| ModelError::RackNotFound(rack_id.to_string()))?;

        if let Some(targets) = rack.midi_mapping.get_mut(&cc) {
            targets.retain(|t| !(t.module == module_id && t.param == param_id));
            if targets.is_empty() {
                rack.midi_mapping.remove(&cc);
            }
        }
        Ok(())
    }

    fn change_midi_cc(&self, rack_id: &str, cc: u8, value: u8) {
        let changes = {
            let Ok(mut racks) = self.racks.write() else {
                return;
            };
            let Some(rack) = racks.get_mut(rack_id) else {
                return;
            };
            let Some(targets) = rack.midi_mapping.get(&cc).cloned() else {
                return;
            };

            let normalized = value.min(127) as f32 / 127.0;
            let mut changes = Vec::new();
            for target in targets {
                let Some(scaled) = rack
                    .module(&target.module)
                    .and_then(|m| m.param(&target.param))
                    .map(|p| p.calc_float(normalized))
                else {
                    continue;
                };
                match rack.set_value(ChangeSource::Midi, rack_id, &target.module, &target.param, scaled) {
                    Ok(Some(change)) => changes.push(change),
                    Ok(None) => {}
                    Err(e) => log::debug!("change_midi_cc: cc {} -> {}: {}", cc, target.param, e),
                }
            }
            changes
        };

        self.notify(changes);
    }
}
