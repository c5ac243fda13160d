//! DOM side of the focus view: `#focus-stage` with `#focus-image`,
//! `#focus-content` and `#focus-toc`, plus the `#focus-back` control.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, HtmlImageElement};

use super::loader::{self, LoadError};
use super::outline::{self, HeadingLevel, OutlineEntry};
use super::{FocusController, FocusImage, FocusSources, ImageCandidate, SessionToken};
use crate::dom_util::{attr, scroll_into_view_smooth, scroll_to_top_smooth, select_all_in};
use crate::env::AmbientControl;
use crate::menu::Menu;

pub const FOCUSED_CLASS: &str = "focused";
pub const OPEN_TRIGGER_SELECTOR: &str = "[data-focus-open]";
pub const EMPTY_CONTENT_TEXT: &str = "No additional content for this item.";
pub const LOADING_TEXT: &str = "Loading…";

/// Stage elements; all must be present for focus mode to work.
pub struct FocusStage {
    doc: Document,
    body: HtmlElement,
    image: HtmlImageElement,
    content: Element,
    toc: Element,
    back: Element,
}

impl FocusStage {
    pub fn find(doc: &Document) -> Option<Self> {
        let body = doc.body()?;
        doc.get_element_by_id("focus-stage")?;
        let image = doc.get_element_by_id("focus-image")?.dyn_into::<HtmlImageElement>().ok()?;
        let content = doc.get_element_by_id("focus-content")?;
        let toc = doc.get_element_by_id("focus-toc")?;
        let back = doc.get_element_by_id("focus-back")?;
        Some(Self { doc: doc.clone(), body, image, content, toc, back })
    }

    fn show_image(&self, image: &FocusImage) {
        self.image.remove_attribute("srcset").ok();
        self.image.remove_attribute("sizes").ok();
        if let Some(srcset) = &image.srcset {
            self.image.set_srcset(srcset);
        }
        if let Some(sizes) = &image.sizes {
            self.image.set_sizes(sizes);
        }
        self.image.set_src(&image.src);
        self.image.set_alt(&image.alt);
    }

    fn clear_image(&self) {
        for name in ["src", "srcset", "sizes"] {
            self.image.remove_attribute(name).ok();
        }
        self.image.set_alt("");
    }

    /// Replace the content area with a single paragraph of plain text.
    fn show_message(&self, class: &str, text: &str) -> Result<(), JsValue> {
        let p = self.doc.create_element("p")?;
        p.set_class_name(class);
        p.set_text_content(Some(text));
        self.content.set_inner_html("");
        self.content.append_child(&p)?;
        Ok(())
    }
}

/// Focus session controller wired to the page.
pub struct FocusView {
    stage: FocusStage,
    controller: RefCell<FocusController>,
    ambience: Rc<dyn AmbientControl>,
    listeners: RefCell<Vec<EventListener>>,
    toc_listeners: RefCell<Vec<EventListener>>,
}

impl FocusView {
    /// `None` when the page has no focus stage.
    pub fn wire(doc: &Document, menu: &Menu, ambience: Rc<dyn AmbientControl>) -> Option<Rc<Self>> {
        let Some(stage) = FocusStage::find(doc) else {
            log::info!("no focus stage in page, focus mode disabled");
            return None;
        };
        let view = Rc::new(Self {
            stage,
            controller: RefCell::new(FocusController::new()),
            ambience,
            listeners: RefCell::new(Vec::new()),
            toc_listeners: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::new();
        for entry in menu.entries() {
            let triggers = select_all_in(&entry.item, OPEN_TRIGGER_SELECTOR).unwrap_or_default();
            for trigger in triggers {
                let weak: Weak<Self> = Rc::downgrade(&view);
                let item = entry.item.clone();
                listeners.push(EventListener::new(&trigger, "click", move |event: &Event| {
                    event.prevent_default();
                    if let Some(view) = weak.upgrade() {
                        view.enter(&item);
                    }
                }));
            }
        }
        let weak = Rc::downgrade(&view);
        listeners.push(EventListener::new(&view.stage.back, "click", move |event: &Event| {
            event.prevent_default();
            if let Some(view) = weak.upgrade() {
                view.exit();
            }
        }));
        *view.listeners.borrow_mut() = listeners;
        Some(view)
    }

    pub fn is_focused(&self) -> bool {
        self.controller.borrow().is_focused()
    }

    /// Number of entries in the current outline.
    pub fn outline_len(&self) -> usize {
        self.toc_listeners.borrow().len()
    }

    /// Switch to focused mode for the menu entry `item`. Entries with no
    /// resolvable image leave the page untouched.
    pub fn enter(self: &Rc<Self>, item: &Element) {
        let sources = sources_from(item);
        let url = attr(item, "data-content-url");
        let (token, image, url) = {
            let mut ctl = self.controller.borrow_mut();
            let Some(session) = ctl.enter(&sources, url) else {
                log::debug!("focus skipped: entry has no image");
                return;
            };
            (session.token, session.image.clone(), session.content_url.clone())
        };

        let stage = &self.stage;
        stage.show_image(&image);
        stage.body.class_list().add_1(FOCUSED_CLASS).ok();
        self.ambience.stop();
        stage.back.remove_attribute("hidden").ok();
        self.clear_outline();

        match url {
            Some(url) => {
                stage.show_message("focus-loading", LOADING_TEXT).ok();
                let view = self.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let result = loader::fetch_fragment(&url).await;
                    view.finish_load(token, &url, result);
                });
            }
            None => {
                stage.show_message("focus-placeholder", EMPTY_CONTENT_TEXT).ok();
            }
        }
        scroll_to_top_smooth();
    }

    /// Back to browsing: clear the stage and resume the ambience. No-op while
    /// already browsing.
    pub fn exit(&self) {
        let ended = self.controller.borrow_mut().exit();
        if ended.is_none() {
            return;
        }
        let stage = &self.stage;
        stage.body.class_list().remove_1(FOCUSED_CLASS).ok();
        stage.back.set_attribute("hidden", "").ok();
        stage.clear_image();
        stage.content.set_inner_html("");
        self.clear_outline();
        self.ambience.start();
    }

    fn finish_load(&self, token: SessionToken, url: &str, result: Result<String, LoadError>) {
        if !self.controller.borrow().is_current(token) {
            log::debug!("dropping stale content from {}", url);
            return;
        }
        match result {
            Ok(html) => {
                if let Err(e) = self.inject(&html) {
                    log::warn!("could not build outline for {}: {:?}", url, e);
                }
            }
            Err(e) => {
                log::warn!("loading {} failed: {}", url, e);
                self.stage.show_message("focus-error", &e.user_message()).ok();
                self.clear_outline();
            }
        }
    }

    /// Insert fetched markup and build the outline from its headings.
    fn inject(&self, html: &str) -> Result<(), JsValue> {
        self.stage.content.set_inner_html(html);
        let mut outline = Vec::new();
        for heading in select_all_in(&self.stage.content, "h2, h3")? {
            let Some(level) = HeadingLevel::from_tag(&heading.tag_name()) else {
                continue;
            };
            let text = heading.text_content().unwrap_or_default();
            let entry = outline::entry_for(level, &text, &heading.id());
            if heading.id().is_empty() && !entry.anchor.is_empty() {
                heading.set_id(&entry.anchor);
            }
            outline.push((entry, heading));
        }
        self.render_outline(outline)
    }

    fn render_outline(&self, outline: Vec<(OutlineEntry, Element)>) -> Result<(), JsValue> {
        self.clear_outline();
        let doc = &self.stage.doc;
        let mut listeners = Vec::with_capacity(outline.len());
        for (entry, heading) in outline {
            let li = doc.create_element("li")?;
            li.set_class_name(entry.level.css_class());
            let link = doc.create_element("a")?;
            link.set_attribute("href", &entry.href())?;
            link.set_text_content(Some(&entry.text));
            li.append_child(&link)?;
            self.stage.toc.append_child(&li)?;
            listeners.push(EventListener::new(&link, "click", move |event: &Event| {
                event.prevent_default();
                scroll_into_view_smooth(&heading);
            }));
        }
        *self.toc_listeners.borrow_mut() = listeners;
        Ok(())
    }

    fn clear_outline(&self) {
        self.toc_listeners.borrow_mut().clear();
        self.stage.toc.set_inner_html("");
    }
}

fn first_image(root: &Element, selector: &str) -> Option<ImageCandidate> {
    let img = root.query_selector(selector).ok().flatten()?;
    let src = attr(&img, "src")?;
    Some(ImageCandidate { src, alt: img.get_attribute("alt").unwrap_or_default() })
}

/// Collect the focus image candidates an entry offers.
pub fn sources_from(item: &Element) -> FocusSources {
    FocusSources {
        src: attr(item, "data-focus-src"),
        srcset: attr(item, "data-focus-srcset"),
        sizes: attr(item, "data-focus-sizes"),
        alt: attr(item, "data-focus-alt"),
        panel: first_image(item, ".panel-inner img"),
        thumb: first_image(item, ".thumb img"),
    }
}
