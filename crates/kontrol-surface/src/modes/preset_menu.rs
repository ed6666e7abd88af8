//! Preset menu: save, create, or load a preset

use super::menu::MenuList;
use super::ModeKind;
use crate::context::SurfaceContext;
use kontrol_model::ParameterModel;

const SAVE_PRESET: usize = 0;
const NEW_PRESET: usize = 1;
const SEPARATOR: usize = 2;
/// Index of the first preset name in the item list
const FIRST_PRESET: usize = 3;

#[derive(Debug, Default)]
pub struct PresetMenu {
    list: MenuList,
    presets: Vec<String>,
}

impl PresetMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &MenuList {
        &self.list
    }

    /// Preset names as read on activation
    pub fn presets(&self) -> &[String] {
        &self.presets
    }

    pub fn activate<M: ParameterModel>(&mut self, ctx: &mut SurfaceContext<M>) {
        self.presets = ctx.model.preset_list(&ctx.rack_id).unwrap_or_else(|| {
            log::warn!("Preset list: rack '{}' not found", ctx.rack_id);
            Vec::new()
        });

        let mut items = vec![
            "Save Preset".to_string(),
            "New Preset".to_string(),
            "-".repeat(20),
        ];
        items.extend(self.presets.iter().cloned());

        self.list = MenuList::new(items);
        self.list.arm_timeout(ctx.config.timing.menu_timeout_ticks);
        self.list.draw(&mut ctx.screen);
    }

    pub fn on_encoder<M: ParameterModel>(
        &mut self,
        ctx: &mut SurfaceContext<M>,
        value: i32,
    ) -> Option<ModeKind> {
        if value != 0 {
            self.list.move_cursor(&mut ctx.screen, value);
            self.list.arm_timeout(ctx.config.timing.menu_timeout_ticks);
        }
        None
    }

    pub fn on_button<M: ParameterModel>(
        &mut self,
        ctx: &mut SurfaceContext<M>,
        pressed: bool,
    ) -> Option<ModeKind> {
        if pressed {
            return None;
        }
        let selected = self.list.selected()?;
        self.select(ctx, selected)
    }

    /// Act on item `index`
    pub fn select<M: ParameterModel>(
        &mut self,
        ctx: &mut SurfaceContext<M>,
        index: usize,
    ) -> Option<ModeKind> {
        match index {
            SAVE_PRESET => {
                if ctx.preset_id.is_empty() {
                    log::warn!("Save preset: no current preset");
                } else if let Err(e) = ctx.model.update_preset(&ctx.rack_id, &ctx.preset_id) {
                    log::warn!("Save preset '{}' failed: {}", ctx.preset_id, e);
                } else {
                    log::debug!("Saved preset '{}'", ctx.preset_id);
                }
                Some(ModeKind::MainMenu)
            }
            NEW_PRESET => {
                let name = format!("New {}", self.presets.len());
                match ctx.model.update_preset(&ctx.rack_id, &name) {
                    Ok(()) => {
                        log::debug!("Created preset '{}'", name);
                        ctx.preset_id = name;
                    }
                    Err(e) => log::warn!("Create preset '{}' failed: {}", name, e),
                }
                Some(ModeKind::MainMenu)
            }
            SEPARATOR => None,
            n => {
                let name = self.presets.get(n - FIRST_PRESET)?;
                match ctx.model.apply_preset(&ctx.rack_id, name) {
                    Ok(()) => {
                        log::debug!("Loaded preset '{}'", name);
                        ctx.preset_id = name.clone();
                    }
                    Err(e) => log::warn!("Load preset '{}' failed: {}", name, e),
                }
                None
            }
        }
    }

    pub fn on_poll<M: ParameterModel>(&mut self, _ctx: &mut SurfaceContext<M>) -> Option<ModeKind> {
        self.list.tick().then_some(ModeKind::Parameter)
    }
}
