//! Main menu: home, module, preset, MIDI learn, save

use super::menu::MenuList;
use super::ModeKind;
use crate::context::SurfaceContext;
use crate::host::HostMessage;
use kontrol_model::ParameterModel;

const HOME: usize = 0;
const MODULE: usize = 1;
const PRESET: usize = 2;
const MIDI_LEARN: usize = 3;
const SAVE_SETTINGS: usize = 4;

fn midi_learn_label(on: bool) -> String {
    format!("Midi Learn        [{}]", if on { 'X' } else { ' ' })
}

#[derive(Debug, Default)]
pub struct MainMenu {
    list: MenuList,
}

impl MainMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &MenuList {
        &self.list
    }

    pub fn activate<M: ParameterModel>(&mut self, ctx: &mut SurfaceContext<M>) {
        self.list = MenuList::new(vec![
            "Home".to_string(),
            ctx.module_id.clone(),
            ctx.preset_id.clone(),
            midi_learn_label(ctx.midi_learn),
            "Save Settings".to_string(),
        ]);
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

        match self.list.selected()? {
            HOME => {
                ctx.send_host(HostMessage::GoHome);
                Some(ModeKind::Parameter)
            }
            MODULE => Some(ModeKind::Parameter),
            PRESET => Some(ModeKind::PresetMenu),
            MIDI_LEARN => {
                ctx.midi_learn = !ctx.midi_learn;
                ctx.last_param = None;
                log::debug!("MIDI learn {}", if ctx.midi_learn { "on" } else { "off" });
                self.list
                    .set_item(&mut ctx.screen, MIDI_LEARN, midi_learn_label(ctx.midi_learn));
                None
            }
            SAVE_SETTINGS => {
                if let Err(e) = ctx.model.save_settings(&ctx.rack_id) {
                    log::warn!("Save settings for rack '{}' failed: {}", ctx.rack_id, e);
                }
                Some(ModeKind::Parameter)
            }
            _ => None,
        }
    }

    pub fn on_poll<M: ParameterModel>(&mut self, _ctx: &mut SurfaceContext<M>) -> Option<ModeKind> {
        self.list.tick().then_some(ModeKind::Parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_learn_label_fits_line() {
        assert_eq!(midi_learn_label(true), "Midi Learn        [X]");
        assert_eq!(midi_learn_label(false), "Midi Learn        [ ]");
        assert_eq!(midi_learn_label(true).len(), 21);
    }
}
