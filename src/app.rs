//! Page boot: find the structural elements, wire each component, and keep the
//! result alive in a thread-local so the exported controls can reach it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window, window};

use crate::config::AmbienceConfig;
use crate::env::{self, Ambience, AmbientControl};
use crate::floaters::Floaters;
use crate::floaters::dom::DomLayer;
use crate::focus::FocusView;
use crate::menu::Menu;

pub struct App {
    pub ambience: Rc<Ambience<DomLayer>>,
    pub menu: Option<Rc<Menu>>,
    pub focus: Option<Rc<FocusView>>,
    _listeners: Vec<EventListener>,
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

/// Run `f` against the booted app, if any.
pub fn with_app<R>(f: impl FnOnce(&App) -> R) -> Option<R> {
    // Not borrowed while `f` runs, so handlers it triggers may re-enter.
    let app = APP.with(|cell| cell.borrow().clone())?;
    Some(f(&app))
}

/// Boot now, or once the DOM is parsed when the script ran early.
pub fn boot() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;
    if doc.ready_state() == "loading" {
        let target = doc.clone();
        EventListener::once(&target, "DOMContentLoaded", move |_| {
            if let Err(e) = mount(&win, &doc) {
                log::error!("boot failed: {:?}", e);
            }
        })
        .forget();
        return Ok(());
    }
    mount(&win, &doc)
}

/// Wire every component found in `doc` and make it the active app.
pub fn mount(win: &Window, doc: &Document) -> Result<(), JsValue> {
    let config = AmbienceConfig::from_page(doc);

    let floaters = match DomLayer::find(doc) {
        Some(layer) => match Floaters::new(layer, config.floaters.clone(), entropy_seed()) {
            Ok(floaters) => Some(floaters),
            Err(e) => {
                log::warn!("floaters disabled: {}", e);
                None
            }
        },
        None => {
            log::info!("no floater layer in page, floaters disabled");
            None
        }
    };
    let narrow = env::narrow_query(win).is_some_and(|mql| mql.matches());
    let ambience = Rc::new(Ambience::new(floaters, narrow));

    let menu = match Menu::wire(doc, config.menu.clone()) {
        Ok(menu) => Some(menu),
        Err(e) => {
            log::warn!("menu disabled: {:?}", e);
            None
        }
    };
    let focus = menu.as_ref().and_then(|menu| {
        let control: Rc<dyn AmbientControl> = ambience.clone();
        FocusView::wire(doc, menu, control)
    });

    let weak_focus: Option<Weak<FocusView>> = focus.as_ref().map(Rc::downgrade);
    let is_focused: Rc<dyn Fn() -> bool> = Rc::new(move || {
        weak_focus.as_ref().and_then(Weak::upgrade).is_some_and(|f| f.is_focused())
    });
    let listeners = env::watch(doc, win, ambience.clone(), is_focused);

    let previous = APP.with(|cell| cell.borrow_mut().take());
    if let Some(previous) = previous {
        previous.ambience.stop();
    }
    ambience.start();
    APP.with(|cell| {
        cell.replace(Some(Rc::new(App { ambience, menu, focus, _listeners: listeners })));
    });
    log::info!("site ambience ready");
    Ok(())
}

/// Seed for floater randomness; browser crypto with a clock fallback.
fn entropy_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(e) => {
            log::warn!("getrandom unavailable ({}), seeding from the clock", e);
            crate::performance_now().to_bits()
        }
    }
}
