//! Accordion menu: `.menu .menu-item` entries with a `.menu-toggle` button and a
//! `.panel-inner` panel. State lives in [`Accordion`]; this module renders it
//! (`open` class, `aria-expanded`, plus/minus indicator).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlImageElement};

pub mod accordion;

pub use accordion::{Accordion, Transition};

use crate::config::MenuConfig;
use crate::dom_util::select_all;

pub const ITEM_SELECTOR: &str = ".menu .menu-item";
pub const OPEN_CLASS: &str = "open";

/// DOM handles for one accordion entry.
pub struct MenuEntry {
    pub item: Element,
    pub button: Element,
    pub panel: Element,
    pub indicator: HtmlImageElement,
}

pub struct Menu {
    entries: Vec<MenuEntry>,
    state: RefCell<Accordion>,
    config: MenuConfig,
    listeners: RefCell<Vec<EventListener>>,
}

impl Menu {
    /// Find every entry, link buttons to panels, and install click handlers.
    pub fn wire(doc: &Document, config: MenuConfig) -> Result<Rc<Self>, JsValue> {
        let mut entries = Vec::new();
        for (index, item) in select_all(doc, ITEM_SELECTOR)?.into_iter().enumerate() {
            let button = item.query_selector(".menu-toggle")?;
            let panel = item.query_selector(".panel-inner")?;
            let (Some(button), Some(panel)) = (button, panel) else {
                log::debug!("menu item {} has no toggle or panel, skipped", index + 1);
                continue;
            };
            // Link button <-> panel for assistive tech
            if panel.id().is_empty() {
                panel.set_id(&format!("menu-panel-{}", index + 1));
            }
            button.set_attribute("aria-controls", &panel.id())?;
            let indicator = match ensure_indicator(doc, &button) {
                Ok(indicator) => indicator,
                Err(e) => {
                    log::warn!("menu item {} has no usable indicator, skipped: {:?}", index + 1, e);
                    continue;
                }
            };
            entries.push(MenuEntry { item, button, panel, indicator });
        }

        let initial: Vec<bool> =
            entries.iter().map(|e| e.item.class_list().contains(OPEN_CLASS)).collect();
        let menu = Rc::new(Self {
            entries,
            state: RefCell::new(Accordion::new(initial, config.single_open)),
            config,
            listeners: RefCell::new(Vec::new()),
        });

        for (index, entry) in menu.entries.iter().enumerate() {
            menu.render(Transition { index, open: menu.is_open(index) })?;
            let weak: Weak<Self> = Rc::downgrade(&menu);
            let listener = EventListener::new(&entry.button, "click", move |_| {
                if let Some(menu) = weak.upgrade() {
                    menu.toggle(index);
                }
            });
            menu.listeners.borrow_mut().push(listener);
        }
        log::info!("menu wired with {} entries", menu.entries.len());
        Ok(menu)
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.state.borrow().is_open(index)
    }

    pub fn toggle(&self, index: usize) {
        let changes = self.state.borrow_mut().toggle(index);
        for change in changes {
            if let Err(e) = self.render(change) {
                log::warn!("could not render menu entry {}: {:?}", change.index, e);
            }
        }
    }

    fn render(&self, t: Transition) -> Result<(), JsValue> {
        let Some(entry) = self.entries.get(t.index) else {
            return Ok(());
        };
        entry.item.class_list().toggle_with_force(OPEN_CLASS, t.open)?;
        entry.button.set_attribute("aria-expanded", if t.open { "true" } else { "false" })?;
        entry.indicator.set_src(if t.open { &self.config.minus_src } else { &self.config.plus_src });
        Ok(())
    }
}

/// Return the toggle's `img.indicator`, creating a decorative one as its first
/// child when the markup has none. A non-`img` `.indicator` is replaced.
fn ensure_indicator(doc: &Document, button: &Element) -> Result<HtmlImageElement, JsValue> {
    if let Some(existing) = button.query_selector(".indicator")? {
        match existing.dyn_into::<HtmlImageElement>() {
            Ok(img) => return Ok(img),
            Err(other) => {
                log::debug!("replacing <{}> indicator with an image", other.tag_name().to_lowercase());
                other.remove();
            }
        }
    }
    let indicator: HtmlImageElement = doc.create_element("img")?.dyn_into()?;
    indicator.set_class_name("indicator");
    indicator.set_alt("");
    indicator.set_attribute("aria-hidden", "true")?;
    indicator.set_attribute("decoding", "async")?;
    indicator.set_attribute("loading", "lazy")?;
    button.insert_before(&indicator, button.first_child().as_ref())?;
    Ok(indicator)
}
