//! Parameter mode: four pots editing one page of the active module

use super::ModeKind;
use crate::context::SurfaceContext;
use crate::pots::{PotLock, PotLockTracker};
use crate::router::Route;
use crate::timer::PopupTimer;
use kontrol_model::{ChangeSource, Module, Page, ParamChange, ParameterModel, Parameter};

/// Page editing state
///
/// Page slot `i` is driven by pot `i` and shown on screen line `i + 1`.
#[derive(Debug)]
pub struct ParameterMode {
    module: Option<Module>,
    pages: Vec<Page>,
    /// Snapshot of the shown page's parameters, kept current from changes
    params: Vec<Parameter>,
    pots: PotLockTracker,
    popup: PopupTimer,
}

impl ParameterMode {
    pub fn new(max_raw: f32) -> Self {
        Self {
            module: None,
            pages: Vec::new(),
            params: Vec::new(),
            pots: PotLockTracker::new(max_raw),
            popup: PopupTimer::idle(),
        }
    }

    pub fn activate<M: ParameterModel>(&mut self, ctx: &mut SurfaceContext<M>) {
        self.module = ctx.current_module();
        self.pages = match &self.module {
            Some(module) => ctx.model.pages(module),
            None => Vec::new(),
        };
        ctx.page_index = ctx.page_index.min(self.pages.len().saturating_sub(1));
        self.popup.cancel();
        self.load_page(ctx);
        self.draw_page(ctx);
    }

    /// Parameters on the shown page
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn pot_lock(&self, pot: usize) -> Option<PotLock> {
        self.pots.get(pot)
    }

    pub fn popup(&self) -> PopupTimer {
        self.popup
    }

    fn load_page<M: ParameterModel>(&mut self, ctx: &SurfaceContext<M>) {
        self.params = match (&self.module, self.pages.get(ctx.page_index)) {
            (Some(module), Some(page)) => ctx.model.params(&ctx.rack_id, module, page),
            _ => Vec::new(),
        };
        self.pots.on_page_activated();
    }

    fn draw_page<M: ParameterModel>(&self, ctx: &mut SurfaceContext<M>) {
        ctx.screen.clear();
        for (slot, param) in self.params.iter().enumerate() {
            ctx.screen.display_param_line(slot as u32 + 1, param);
        }
    }

    pub fn on_pot<M: ParameterModel>(
        &mut self,
        ctx: &mut SurfaceContext<M>,
        pot: usize,
        raw: f32,
    ) -> Option<ModeKind> {
        let param = self.params.get_mut(pot)?;
        let value = self.pots.on_physical_move(pot, raw, param)?;

        match ctx.model.change_param(
            ChangeSource::Local,
            &ctx.rack_id,
            &ctx.module_id,
            param.id(),
            value.clone(),
        ) {
            Ok(()) => param.current = value,
            Err(e) => log::warn!("Pot {}: could not set {}: {}", pot, param.id(), e),
        }
        None
    }

    pub fn on_encoder<M: ParameterModel>(
        &mut self,
        ctx: &mut SurfaceContext<M>,
        value: i32,
    ) -> Option<ModeKind> {
        if value == 0 || self.pages.is_empty() {
            return None;
        }

        let last = self.pages.len() - 1;
        let next = if value > 0 {
            (ctx.page_index + 1).min(last)
        } else {
            ctx.page_index.saturating_sub(1)
        };
        if next == ctx.page_index {
            return None;
        }

        ctx.page_index = next;
        self.load_page(ctx);
        self.draw_page(ctx);

        if let Some(page) = self.pages.get(next) {
            log::debug!("Page {} ({}) of {}", next, page.display_name, ctx.module_id);
            ctx.screen.display_popup(&page.display_name);
            self.popup.arm(ctx.config.timing.page_switch_ticks);
        }
        None
    }

    pub fn on_button<M: ParameterModel>(
        &mut self,
        _ctx: &mut SurfaceContext<M>,
        pressed: bool,
    ) -> Option<ModeKind> {
        (!pressed).then_some(ModeKind::MainMenu)
    }

    pub fn on_poll<M: ParameterModel>(&mut self, ctx: &mut SurfaceContext<M>) -> Option<ModeKind> {
        if self.popup.tick() {
            self.draw_page(ctx);
        }
        None
    }

    pub fn on_changed<M: ParameterModel>(
        &mut self,
        ctx: &mut SurfaceContext<M>,
        change: &ParamChange,
        route: Route,
    ) -> Option<ModeKind> {
        let slot = self
            .params
            .iter()
            .position(|p| p.id == change.parameter.id)?;

        self.params[slot] = change.parameter.clone();

        // The popup owns the screen; the page is redrawn when it clears
        if self.popup.is_active() {
            return None;
        }
        if route.relocks() {
            self.pots.on_remote_change(slot);
        }
        ctx.screen.display_param_line(slot as u32 + 1, &self.params[slot]);
        None
    }
}
