//! Site ambience crate.
//!
//! Two small behaviors for a static site, compiled to WASM:
//! - ambient floaters drifting across the `.bg-floaters` layer ([`floaters`]),
//! - an accordion menu ([`menu`]) whose entries can open a focused reading view
//!   that loads an HTML fragment and builds its outline ([`focus`]).
//!
//! `wasm_start` boots everything once the DOM is ready; `start()` / `stop()`
//! let page scripts pause the floaters.

use wasm_bindgen::prelude::*;

mod app;
pub mod config;
mod dom_util;
pub mod env;
pub mod floaters;
pub mod focus;
pub mod menu;

pub use config::{AmbienceConfig, ConfigError, FloaterConfig, MenuConfig};
pub use env::AmbientControl;
pub use focus::{LoadError, slugify};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    if let Err(e) = app::boot() {
        log::error!("site ambience failed to boot: {:?}", e);
    }
}

// -----------------------------------------------------------------------------
// Control surface for page scripts
// -----------------------------------------------------------------------------

/// Resume spawning floaters (ignored on narrow viewports).
#[wasm_bindgen]
pub fn start() {
    app::with_app(|app| app.ambience.start());
}

/// Stop spawning and remove every floater.
#[wasm_bindgen]
pub fn stop() {
    app::with_app(|app| app.ambience.stop());
}

/// Open the focus view for the `index`-th wired menu entry. Returns whether the
/// page is focused afterwards.
#[wasm_bindgen]
pub fn enter_focus_by_index(index: usize) -> bool {
    app::with_app(|app| {
        let (Some(menu), Some(focus)) = (&app.menu, &app.focus) else {
            return false;
        };
        if let Some(entry) = menu.entries().get(index) {
            focus.enter(&entry.item);
        }
        focus.is_focused()
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn exit_focus() {
    app::with_app(|app| {
        if let Some(focus) = &app.focus {
            focus.exit();
        }
    });
}

#[wasm_bindgen]
pub fn is_focused() -> bool {
    app::with_app(|app| app.focus.as_ref().is_some_and(|f| f.is_focused())).unwrap_or(false)
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
