// Small DOM helpers shared by the menu and focus modules.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, NodeList, ScrollBehavior, ScrollIntoViewOptions, ScrollToOptions};

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

pub fn select_all(doc: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    Ok(elements(doc.query_selector_all(selector)?))
}

pub fn select_all_in(root: &Element, selector: &str) -> Result<Vec<Element>, JsValue> {
    Ok(elements(root.query_selector_all(selector)?))
}

/// Non-empty attribute value.
pub fn attr(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(name).filter(|v| !v.trim().is_empty())
}

pub fn scroll_into_view_smooth(el: &Element) {
    let opts = ScrollIntoViewOptions::new();
    opts.set_behavior(ScrollBehavior::Smooth);
    el.scroll_into_view_with_scroll_into_view_options(&opts);
}

pub fn scroll_to_top_smooth() {
    let Some(win) = web_sys::window() else {
        return;
    };
    let opts = ScrollToOptions::new();
    opts.set_top(0.0);
    opts.set_behavior(ScrollBehavior::Smooth);
    win.scroll_to_with_scroll_to_options(&opts);
}
