//! Page environment signals that pause or resume the floaters: tab visibility
//! and the narrow-viewport breakpoint.

use std::cell::Cell;
use std::rc::Rc;

use gloo::events::EventListener;
use web_sys::{Document, MediaQueryList, Window};

use crate::config::NARROW_VIEWPORT_QUERY;
use crate::floaters::{FloaterLayer, Floaters};

/// The `start()` / `stop()` surface other components use to pause the ambience.
pub trait AmbientControl {
    fn start(&self);
    fn stop(&self);
}

impl<L: FloaterLayer> AmbientControl for Floaters<L> {
    fn start(&self) {
        Floaters::start(self)
    }

    fn stop(&self) {
        Floaters::stop(self)
    }
}

/// Floaters gated on the viewport: `start()` is refused while the viewport is
/// narrow. A missing floater layer makes every call a no-op.
pub struct Ambience<L: FloaterLayer> {
    floaters: Option<Floaters<L>>,
    narrow: Cell<bool>,
}

impl<L: FloaterLayer> Ambience<L> {
    pub fn new(floaters: Option<Floaters<L>>, narrow: bool) -> Self {
        Self { floaters, narrow: Cell::new(narrow) }
    }

    pub fn floaters(&self) -> Option<&Floaters<L>> {
        self.floaters.as_ref()
    }

    pub fn is_narrow(&self) -> bool {
        self.narrow.get()
    }

    /// Breakpoint crossed: narrow stops and clears, wide resumes unless `focused`.
    pub fn set_narrow(&self, narrow: bool, focused: bool) {
        self.narrow.set(narrow);
        if narrow {
            self.stop();
        } else if !focused {
            self.start();
        }
    }

    /// Tab visibility changed: hidden stops, visible resumes unless `focused`.
    pub fn set_hidden(&self, hidden: bool, focused: bool) {
        if hidden {
            self.stop();
        } else if !focused {
            self.start();
        }
    }
}

impl<L: FloaterLayer> AmbientControl for Ambience<L> {
    fn start(&self) {
        if self.narrow.get() {
            return;
        }
        if let Some(f) = &self.floaters {
            f.start();
        }
    }

    fn stop(&self) {
        if let Some(f) = &self.floaters {
            f.stop();
        }
    }
}

pub fn narrow_query(win: &Window) -> Option<MediaQueryList> {
    win.match_media(NARROW_VIEWPORT_QUERY).ok().flatten()
}

/// Install the visibility and breakpoint listeners. `is_focused` is consulted
/// on every change so the focus view stays in charge while it is open.
pub fn watch<L: FloaterLayer>(
    doc: &Document,
    win: &Window,
    ambience: Rc<Ambience<L>>,
    is_focused: Rc<dyn Fn() -> bool>,
) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    {
        let ambience = ambience.clone();
        let is_focused = is_focused.clone();
        let doc_hidden = doc.clone();
        listeners.push(EventListener::new(doc, "visibilitychange", move |_| {
            ambience.set_hidden(doc_hidden.hidden(), is_focused());
        }));
    }

    if let Some(mql) = narrow_query(win) {
        let mql_state = mql.clone();
        listeners.push(EventListener::new(&mql, "change", move |_| {
            ambience.set_narrow(mql_state.matches(), is_focused());
        }));
    } else {
        log::debug!("matchMedia unavailable, breakpoint not watched");
    }
    listeners
}
