//! DOM rendering of floaters: one `<img class="bg-floater">` per floater,
//! absolutely positioned inside the `.bg-floaters` layer and moved with the Web
//! Animations API.

use std::collections::HashMap;

use gloo::timers::callback::Interval;
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Animation, Document, Element, HtmlImageElement};

use super::path::MotionPath;
use super::{Bounds, FloaterId, FloaterLayer, FloaterSpec};

pub const LAYER_SELECTOR: &str = ".bg-floaters";
pub const FLOATER_CLASS: &str = "bg-floater";

pub struct DomLayer {
    doc: Document,
    container: Element,
    elements: HashMap<FloaterId, HtmlImageElement>,
}

impl DomLayer {
    /// `None` when the page has no floater layer.
    pub fn find(doc: &Document) -> Option<Self> {
        let container = doc.query_selector(LAYER_SELECTOR).ok().flatten()?;
        Some(Self { doc: doc.clone(), container, elements: HashMap::new() })
    }

    fn create_img(&self, spec: &FloaterSpec) -> Result<HtmlImageElement, JsValue> {
        let img: HtmlImageElement = self.doc.create_element("img")?.dyn_into()?;
        img.set_class_name(FLOATER_CLASS);
        img.set_src(&spec.image);
        img.set_alt("");
        let style = img.style();
        style.set_property("width", &format!("{}px", spec.size_px))?;
        style.set_property("left", &format!("{:.1}px", spec.left))?;
        style.set_property("top", &format!("{:.1}px", spec.top))?;
        Ok(img)
    }
}

impl FloaterLayer for DomLayer {
    type Timer = Interval;
    type Error = JsValue;

    fn bounds(&self) -> Bounds {
        let rect = self.container.get_bounding_client_rect();
        Bounds { width: rect.width(), height: rect.height() }
    }

    fn schedule(&self, every_ms: u32, mut tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(every_ms, move || tick())
    }

    fn mount(&mut self, spec: &FloaterSpec, finished: Box<dyn FnOnce()>) -> Result<(), JsValue> {
        let img = self.create_img(spec)?;
        self.container.append_child(&img)?;
        self.elements.insert(spec.id, img.clone());

        let animation = play(&img, &spec.path)?;
        // Frees itself after the single call.
        let on_finish = Closure::once_into_js(move || finished());
        animation.set_onfinish(Some(on_finish.unchecked_ref()));
        Ok(())
    }

    fn unmount(&mut self, id: FloaterId) {
        if let Some(img) = self.elements.remove(&id) {
            img.remove();
        }
    }

    fn clear(&mut self) {
        for (_, img) in self.elements.drain() {
            img.remove();
        }
        // Sweep strays (e.g. floaters from markup or a previous boot).
        if let Ok(list) = self.container.query_selector_all(&format!(".{}", FLOATER_CLASS)) {
            for i in 0..list.length() {
                if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    el.remove();
                }
            }
        }
    }
}

fn keyframes_js(path: &MotionPath) -> Result<Array, JsValue> {
    let frames = Array::new();
    for k in &path.keyframes {
        let frame = Object::new();
        Reflect::set(&frame, &"offset".into(), &k.offset.into())?;
        Reflect::set(&frame, &"transform".into(), &k.transform().into())?;
        Reflect::set(&frame, &"opacity".into(), &k.opacity.into())?;
        frames.push(&frame);
    }
    Ok(frames)
}

/// Play `path` once, linear, holding the last frame until the element is removed.
fn play(el: &Element, path: &MotionPath) -> Result<Animation, JsValue> {
    let options = Object::new();
    Reflect::set(&options, &"duration".into(), &f64::from(path.duration_ms).into())?;
    Reflect::set(&options, &"easing".into(), &"linear".into())?;
    Reflect::set(&options, &"fill".into(), &"forwards".into())?;

    let frames = JsValue::from(keyframes_js(path)?);
    let animate: Function = Reflect::get(el, &"animate".into())?.dyn_into()?;
    animate.call2(el, &frames, &options)?.dyn_into()
}
