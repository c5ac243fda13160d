//! Tunables for the floater animator and the accordion menu.
//!
//! Defaults match the values the site ships with. With the `serde_json` feature
//! a page may override any subset by embedding a JSON object in
//! `<script type="application/json" id="ambience-config">`.

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Keep floaters at least this far (px) from each layer edge.
pub const EDGE_MARGIN_PX: f64 = 24.0;
/// Per-axis random offset (px) applied to every waypoint.
pub const WAYPOINT_JITTER_PX: f64 = 30.0;
/// Latest normalized time a waypoint may sit at; leaves room for the fade-out.
pub const WAYPOINT_OFFSET_CAP: f64 = 0.85;
/// Viewports at or below this width get no floaters.
pub const NARROW_VIEWPORT_QUERY: &str = "(max-width: 480px)";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(feature = "serde_json")]
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("floater image pool is empty")]
    EmptyImagePool,
    #[error("max_floaters must be at least 1")]
    ZeroCap,
    #[error("spawn_every_ms must be greater than 0")]
    ZeroInterval,
    #[error("range `{name}` has min {min} > max {max}")]
    InvertedRange { name: &'static str, min: f64, max: f64 },
}

// --- Floaters ---------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FloaterConfig {
    pub images: Vec<String>,
    pub max_floaters: usize,    // cap on-screen at once
    pub spawn_every_ms: u32,    // how often to attempt a spawn
    pub size_px: (u32, u32),    // min/max width
    pub lifetime_ms: (u32, u32), // min/max total animation time
    pub drift_px: (f64, f64),   // how far they drift overall
    pub waypoints: (u32, u32),  // number of midpoints (path complexity)
}

impl Default for FloaterConfig {
    fn default() -> Self {
        Self {
            images: vec!["images/n_black.png".to_string()],
            max_floaters: 12,
            spawn_every_ms: 1200,
            size_px: (24, 48),
            lifetime_ms: (6000, 12000),
            drift_px: (120.0, 320.0),
            waypoints: (2, 4),
        }
    }
}

impl FloaterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.is_empty() {
            return Err(ConfigError::EmptyImagePool);
        }
        if self.max_floaters == 0 {
            return Err(ConfigError::ZeroCap);
        }
        if self.spawn_every_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        check_range("size_px", self.size_px.0 as f64, self.size_px.1 as f64)?;
        check_range("lifetime_ms", self.lifetime_ms.0 as f64, self.lifetime_ms.1 as f64)?;
        check_range("drift_px", self.drift_px.0, self.drift_px.1)?;
        check_range("waypoints", self.waypoints.0 as f64, self.waypoints.1 as f64)?;
        Ok(())
    }
}

fn check_range(name: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min > max {
        Err(ConfigError::InvertedRange { name, min, max })
    } else {
        Ok(())
    }
}

// --- Menu -------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MenuConfig {
    /// Only one entry may be open at a time.
    pub single_open: bool,
    pub plus_src: String,
    pub minus_src: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            single_open: true,
            plus_src: "images/nc_plus.png".to_string(),
            minus_src: "images/nc_minus.png".to_string(),
        }
    }
}

/// Whole-page configuration, read once at boot.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AmbienceConfig {
    pub floaters: FloaterConfig,
    pub menu: MenuConfig,
}

impl AmbienceConfig {
    pub const ELEMENT_ID: &'static str = "ambience-config";

    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.floaters.validate()?;
        Ok(cfg)
    }

    /// Read the page-embedded override, falling back to defaults on any problem.
    pub fn from_page(doc: &web_sys::Document) -> Self {
        let Some(el) = doc.get_element_by_id(Self::ELEMENT_ID) else {
            return Self::default();
        };
        #[cfg(feature = "serde_json")]
        {
            let text = el.text_content().unwrap_or_default();
            match Self::from_json(&text) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring #{}: {}", Self::ELEMENT_ID, e),
            }
        }
        #[cfg(not(feature = "serde_json"))]
        {
            let _ = el;
            log::warn!("#{} present but built without `serde_json`", Self::ELEMENT_ID);
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(FloaterConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_pool_and_zero_cap() {
        let mut cfg = FloaterConfig::default();
        cfg.images.clear();
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyImagePool)));

        let cfg = FloaterConfig { max_floaters: 0, ..FloaterConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroCap)));
    }

    #[test]
    fn rejects_inverted_range() {
        let cfg = FloaterConfig { waypoints: (5, 2), ..FloaterConfig::default() };
        match cfg.validate() {
            Err(ConfigError::InvertedRange { name, .. }) => assert_eq!(name, "waypoints"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_overrides_subset() {
        let cfg = AmbienceConfig::from_json(r#"{"floaters":{"max_floaters":3},"menu":{"single_open":false}}"#)
            .unwrap();
        assert_eq!(cfg.floaters.max_floaters, 3);
        assert_eq!(cfg.floaters.spawn_every_ms, 1200);
        assert!(!cfg.menu.single_open);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_with_invalid_values_is_rejected() {
        assert!(matches!(
            AmbienceConfig::from_json(r#"{"floaters":{"images":[]}}"#),
            Err(ConfigError::EmptyImagePool)
        ));
        assert!(matches!(
            AmbienceConfig::from_json(r#"{"floaters":{"max_floaters":"many"}}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
