//! Device modes
//!
//! Exactly one mode is active. Each handler returns the mode to switch to,
//! if any; the [`Device`](crate::Device) performs the switch, dropping the
//! outgoing mode's state and activating a fresh instance of the next one.
//!
//! ```text
//! Parameter ──button release──► MainMenu ──Preset──► PresetMenu
//!     ▲                           │  ▲                   │
//!     └──Home/Module/Save/timeout─┘  └────Save/New───────┘
//!     ▲                                                  │
//!     └──────────────────────timeout─────────────────────┘
//! ```

mod main_menu;
mod menu;
mod parameter;
mod preset_menu;

pub use main_menu::MainMenu;
pub use menu::MenuList;
pub use parameter::ParameterMode;
pub use preset_menu::PresetMenu;

use crate::context::SurfaceContext;
use crate::router::Route;
use kontrol_model::{ParamChange, ParameterModel};
use std::fmt;

/// Which mode is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Parameter,
    MainMenu,
    PresetMenu,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter => write!(f, "parameter"),
            Self::MainMenu => write!(f, "main menu"),
            Self::PresetMenu => write!(f, "preset menu"),
        }
    }
}

/// Active mode with its state
#[derive(Debug)]
pub enum Mode {
    Parameter(ParameterMode),
    MainMenu(MainMenu),
    PresetMenu(PresetMenu),
}

impl Mode {
    /// Fresh, not yet activated state for `kind`
    pub fn new<M: ParameterModel>(kind: ModeKind, ctx: &SurfaceContext<M>) -> Self {
        match kind {
            ModeKind::Parameter => Self::Parameter(ParameterMode::new(ctx.config.pots.max_raw)),
            ModeKind::MainMenu => Self::MainMenu(MainMenu::new()),
            ModeKind::PresetMenu => Self::PresetMenu(PresetMenu::new()),
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Parameter(_) => ModeKind::Parameter,
            Self::MainMenu(_) => ModeKind::MainMenu,
            Self::PresetMenu(_) => ModeKind::PresetMenu,
        }
    }

    pub fn activate<M: ParameterModel>(&mut self, ctx: &mut SurfaceContext<M>) {
        match self {
            Self::Parameter(mode) => mode.activate(ctx),
            Self::MainMenu(mode) => mode.activate(ctx),
            Self::PresetMenu(mode) => mode.activate(ctx),
        }
    }

    pub fn on_pot<M: ParameterModel>(
        &mut self,
        ctx: &mut SurfaceContext<M>,
        pot: usize,
        raw: f32,
    ) -> Option<ModeKind> {
        match self {
            Self::Parameter(mode) => mode.on_pot(ctx, pot, raw),
            Self::MainMenu(_) | Self::PresetMenu(_) => None,
        }
    }

    pub fn on_encoder<M: ParameterModel>(
        &mut self,
        ctx: &mut SurfaceContext<M>,
        value: i32,
    ) -> Option<ModeKind> {
        match self {
            Self::Parameter(mode) => mode.on_encoder(ctx, value),
            Self::MainMenu(mode) => mode.on_encoder(ctx, value),
            Self::PresetMenu(mode) => mode.on_encoder(ctx, value),
        }
    }

    pub fn on_button<M: ParameterModel>(
        &mut self,
        ctx: &mut SurfaceContext<M>,
        pressed: bool,
    ) -> Option<ModeKind> {
        match self {
            Self::Parameter(mode) => mode.on_button(ctx, pressed),
            Self::MainMenu(mode) => mode.on_button(ctx, pressed),
            Self::PresetMenu(mode) => mode.on_button(ctx, pressed),
        }
    }

    pub fn on_poll<M: ParameterModel>(&mut self, ctx: &mut SurfaceContext<M>) -> Option<ModeKind> {
        match self {
            Self::Parameter(mode) => mode.on_poll(ctx),
            Self::MainMenu(mode) => mode.on_poll(ctx),
            Self::PresetMenu(mode) => mode.on_poll(ctx),
        }
    }

    /// Feed a routed change notification
    pub fn on_changed<M: ParameterModel>(
        &mut self,
        ctx: &mut SurfaceContext<M>,
        change: &ParamChange,
        route: Route,
    ) -> Option<ModeKind> {
        match self {
            Self::Parameter(mode) => mode.on_changed(ctx, change, route),
            // Menus cover the parameter lines; the page is redrawn on return
            Self::MainMenu(_) | Self::PresetMenu(_) => None,
        }
    }
}
