//! Table of contents for injected content, built from its `h2`/`h3` headings.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadingLevel {
    Top, // h2
    Sub, // h3
}

impl HeadingLevel {
    /// Map an element tag name (any case) to a level; other tags are ignored.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "h2" => Some(Self::Top),
            "h3" => Some(Self::Sub),
            _ => None,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Top => "toc-top",
            Self::Sub => "toc-sub",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineEntry {
    pub text: String,
    pub anchor: String,
    pub level: HeadingLevel,
}

impl OutlineEntry {
    /// Link target; a bare `#` when the heading has no id to point at.
    pub fn href(&self) -> String {
        format!("#{}", self.anchor)
    }
}

/// Derive an anchor id from heading text.
///
/// Lower-cases and trims, turns each run of whitespace / punctuation into a
/// single hyphen, drops anything else outside `[a-z0-9-]` and collapses
/// repeated hyphens. Hyphens at either end are kept, so `"Why Rust?"` gives
/// `why-rust-`. May return an empty string.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_gap = false;
    for c in text.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            in_gap = false;
        } else if c == '-' || c.is_whitespace() || c.is_ascii_punctuation() {
            if !in_gap {
                slug.push('-');
                in_gap = true;
            }
        }
    }
    slug
}

/// Outline entry for one heading. `existing_id` wins when non-empty; otherwise
/// the derived id is returned and should be assigned to the heading. An empty
/// anchor means nothing usable was derived and the heading stays without id.
pub fn entry_for(level: HeadingLevel, text: &str, existing_id: &str) -> OutlineEntry {
    let text = text.trim();
    let anchor = if existing_id.is_empty() { slugify(text) } else { existing_id.to_string() };
    OutlineEntry { text: text.to_string(), anchor, level }
}
