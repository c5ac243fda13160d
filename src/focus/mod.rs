//! Focused reading view.
//!
//! Opening an entry in focus swaps the page into a single-image layout, pauses
//! the floaters and loads the entry's content fragment with an outline. The
//! session model ([`FocusController`]) is kept apart from the page so the
//! enter/exit rules and the stale-fetch guard are testable on the host.

pub mod loader;
pub mod outline;
pub mod stage;

pub use loader::LoadError;
pub use outline::{HeadingLevel, OutlineEntry, slugify};
pub use stage::FocusView;

/// An `<img>` found in the entry markup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageCandidate {
    pub src: String,
    pub alt: String,
}

/// Everything an entry offers for its focus image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusSources {
    pub src: Option<String>,    // data-focus-src
    pub srcset: Option<String>, // data-focus-srcset
    pub sizes: Option<String>,  // data-focus-sizes
    pub alt: Option<String>,    // data-focus-alt
    pub panel: Option<ImageCandidate>,
    pub thumb: Option<ImageCandidate>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusImage {
    pub src: String,
    pub srcset: Option<String>,
    pub sizes: Option<String>,
    pub alt: String,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

/// Pick the focus image: explicit attribute, then panel image, then thumbnail.
/// Responsive hints only ever come from the explicit attributes.
pub fn resolve_image(sources: &FocusSources) -> Option<FocusImage> {
    let candidates = [sources.panel.as_ref(), sources.thumb.as_ref()];
    let src = non_empty(&sources.src).map(str::to_string).or_else(|| {
        candidates.iter().flatten().map(|c| c.src.as_str()).find(|s| !s.is_empty()).map(str::to_string)
    })?;
    let alt = non_empty(&sources.alt)
        .map(str::to_string)
        .or_else(|| {
            candidates.iter().flatten().map(|c| c.alt.as_str()).find(|a| !a.is_empty()).map(str::to_string)
        })
        .unwrap_or_default();
    Some(FocusImage {
        src,
        srcset: non_empty(&sources.srcset).map(str::to_string),
        sizes: non_empty(&sources.sizes).map(str::to_string),
        alt,
    })
}

/// Identifies one focus session; results for an older token are discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionToken(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusSession {
    pub token: SessionToken,
    pub image: FocusImage,
    pub content_url: Option<String>,
}

#[derive(Debug, Default)]
pub struct FocusController {
    active: Option<FocusSession>,
    next_token: u64,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session, replacing any current one. `None` (and no state change)
    /// when no image can be resolved.
    pub fn enter(&mut self, sources: &FocusSources, content_url: Option<String>) -> Option<&FocusSession> {
        let image = resolve_image(sources)?;
        self.next_token += 1;
        let content_url = content_url.filter(|u| !u.is_empty());
        self.active = Some(FocusSession { token: SessionToken(self.next_token), image, content_url });
        self.active.as_ref()
    }

    pub fn exit(&mut self) -> Option<FocusSession> {
        self.active.take()
    }

    pub fn is_focused(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&FocusSession> {
        self.active.as_ref()
    }

    /// Whether a fetch started for `token` may still write to the page.
    pub fn is_current(&self, token: SessionToken) -> bool {
        self.active.as_ref().is_some_and(|s| s.token == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(src: &str, alt: &str) -> Option<ImageCandidate> {
        Some(ImageCandidate { src: src.into(), alt: alt.into() })
    }

    #[test]
    fn explicit_source_beats_nested_images() {
        let sources = FocusSources {
            src: Some("big.jpg".into()),
            srcset: Some("big.jpg 1x, big@2x.jpg 2x".into()),
            panel: img("panel.jpg", "panel"),
            thumb: img("thumb.jpg", "thumb"),
            ..Default::default()
        };
        let image = resolve_image(&sources).unwrap();
        assert_eq!(image.src, "big.jpg");
        assert_eq!(image.srcset.as_deref(), Some("big.jpg 1x, big@2x.jpg 2x"));
        assert_eq!(image.alt, "panel");
    }

    #[test]
    fn falls_back_panel_then_thumb() {
        let mut sources = FocusSources { panel: img("panel.jpg", ""), thumb: img("thumb.jpg", "T"), ..Default::default() };
        let image = resolve_image(&sources).unwrap();
        assert_eq!((image.src.as_str(), image.alt.as_str()), ("panel.jpg", "T"));

        sources.panel = None;
        assert_eq!(resolve_image(&sources).unwrap().src, "thumb.jpg");
    }

    #[test]
    fn responsive_hints_never_come_from_fallbacks() {
        let sources = FocusSources { thumb: img("t.jpg", ""), ..Default::default() };
        let image = resolve_image(&sources).unwrap();
        assert_eq!((image.srcset, image.sizes), (None, None));
        assert_eq!(image.alt, "");
    }

    #[test]
    fn nothing_to_show_aborts_without_state_change() {
        let mut ctl = FocusController::new();
        let empty = FocusSources { src: Some(String::new()), ..Default::default() };
        assert!(ctl.enter(&empty, Some("a.html".into())).is_none());
        assert!(!ctl.is_focused());
    }

    #[test]
    fn newer_session_invalidates_older_token() {
        let mut ctl = FocusController::new();
        let sources = FocusSources { src: Some("a.jpg".into()), ..Default::default() };
        let first = ctl.enter(&sources, Some("a.html".into())).unwrap().token;
        let second = ctl.enter(&sources, None).unwrap().token;
        assert!(!ctl.is_current(first));
        assert!(ctl.is_current(second));
        assert_eq!(ctl.active().unwrap().content_url, None);

        ctl.exit();
        assert!(!ctl.is_current(second));
        assert!(!ctl.is_focused());
    }
}
