//! Change notification routing
//!
//! Every committed parameter change comes back to the surface, including
//! the surface's own writes. The router drops changes for other
//! racks/modules and tells the active mode whether a change is its own echo
//! (redraw only) or came from somewhere else (redraw and relock the pot).

use kontrol_model::ParamChange;

/// What the active mode should do with a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Not for the active rack/module
    Discard,
    /// Written by this surface
    LocalEcho,
    /// Written by a peer, a preset or MIDI
    External,
}

impl Route {
    /// Whether the change should relock a pot
    pub fn relocks(&self) -> bool {
        matches!(self, Self::External)
    }
}

/// Classify a change against the active rack and module
pub fn classify(active_rack: &str, active_module: &str, change: &ParamChange) -> Route {
    if change.rack_id != active_rack || change.module_id != active_module {
        return Route::Discard;
    }
    if change.source.is_local() {
        Route::LocalEcho
    } else {
        Route::External
    }
}
