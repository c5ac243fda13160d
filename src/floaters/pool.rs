//! In-memory bookkeeping for live floaters.
//!
//! The pool decides *whether* and *what* to spawn; rendering is left to a
//! [`FloaterLayer`](super::FloaterLayer). Every floater gets an id so a finish
//! callback arriving after `clear()` cannot decrement the live count twice.

use std::collections::BTreeSet;

use fastrand::Rng;

use super::path::{self, MotionPath, rand_f64, rand_u32};
use crate::config::{ConfigError, EDGE_MARGIN_PX, FloaterConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FloaterId(pub u64);

/// Size of the layer's content box at spawn time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

/// Everything needed to render one floater.
#[derive(Clone, Debug, PartialEq)]
pub struct FloaterSpec {
    pub id: FloaterId,
    pub image: String,
    pub size_px: u32,
    pub left: f64,
    pub top: f64,
    pub path: MotionPath,
}

pub struct FloaterPool {
    config: FloaterConfig,
    rng: Rng,
    live: BTreeSet<FloaterId>,
    next_id: u64,
}

impl FloaterPool {
    /// Rejects configs whose ranges the generator cannot sample from.
    pub fn new(config: FloaterConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rng: Rng::with_seed(seed), live: BTreeSet::new(), next_id: 0 })
    }

    pub fn config(&self) -> &FloaterConfig {
        &self.config
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, id: FloaterId) -> bool {
        self.live.contains(&id)
    }

    /// Register and describe a new floater, or `None` when the cap is reached.
    pub fn try_spawn(&mut self, bounds: Bounds) -> Option<FloaterSpec> {
        if self.live.len() >= self.config.max_floaters || self.config.images.is_empty() {
            return None;
        }
        let image = self.config.images[self.rng.usize(..self.config.images.len())].clone();
        let size_px = rand_u32(&mut self.rng, self.config.size_px);
        let (left, top) = spawn_position(&mut self.rng, bounds);

        let id = FloaterId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);

        let path = path::generate(&mut self.rng, &self.config);
        Some(FloaterSpec { id, image, size_px, left, top, path })
    }

    /// Animation finished. Returns false for floaters already cleared.
    pub fn finish(&mut self, id: FloaterId) -> bool {
        self.live.remove(&id)
    }

    /// Forget every live floater, returning their ids for removal.
    pub fn clear(&mut self) -> Vec<FloaterId> {
        std::mem::take(&mut self.live).into_iter().collect()
    }
}

/// Uniform position inside `bounds`, kept `EDGE_MARGIN_PX` away from the edges.
/// A box smaller than the margin pins the floater at the margin.
pub fn spawn_position(rng: &mut Rng, bounds: Bounds) -> (f64, f64) {
    let x_max = (bounds.width - EDGE_MARGIN_PX).max(EDGE_MARGIN_PX);
    let y_max = (bounds.height - EDGE_MARGIN_PX).max(EDGE_MARGIN_PX);
    (rand_f64(rng, EDGE_MARGIN_PX, x_max), rand_f64(rng, EDGE_MARGIN_PX, y_max))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: Bounds = Bounds { width: 800.0, height: 600.0 };

    fn pool(cap: usize) -> FloaterPool {
        FloaterPool::new(FloaterConfig { max_floaters: cap, ..FloaterConfig::default() }, 3).unwrap()
    }

    #[test]
    fn invalid_config_is_refused() {
        let cfg = FloaterConfig { size_px: (48, 24), ..FloaterConfig::default() };
        assert!(matches!(
            FloaterPool::new(cfg, 1),
            Err(ConfigError::InvertedRange { name: "size_px", .. })
        ));
        let cfg = FloaterConfig { images: Vec::new(), ..FloaterConfig::default() };
        assert!(FloaterPool::new(cfg, 1).is_err());
    }

    #[test]
    fn spawns_stop_at_cap() {
        let mut p = pool(4);
        let spawned = (0..10).filter_map(|_| p.try_spawn(BOX)).count();
        assert_eq!(spawned, 4);
        assert_eq!(p.live_count(), 4);
    }

    #[test]
    fn finish_frees_a_slot_once() {
        let mut p = pool(1);
        let spec = p.try_spawn(BOX).unwrap();
        assert!(p.try_spawn(BOX).is_none());
        assert!(p.finish(spec.id));
        assert!(!p.finish(spec.id));
        assert_eq!(p.live_count(), 0);
        assert!(p.try_spawn(BOX).is_some());
    }

    #[test]
    fn clear_ignores_late_finishes() {
        let mut p = pool(3);
        let ids: Vec<_> = (0..3).filter_map(|_| p.try_spawn(BOX)).map(|s| s.id).collect();
        assert_eq!(p.clear(), ids);
        assert_eq!(p.live_count(), 0);
        for id in ids {
            assert!(!p.finish(id));
        }
        assert_eq!(p.live_count(), 0);
    }

    #[test]
    fn specs_respect_config() {
        let mut p = pool(12);
        while let Some(spec) = p.try_spawn(BOX) {
            assert_eq!(spec.image, "images/n_black.png");
            assert!((24..=48).contains(&spec.size_px));
            assert!((24.0..=776.0).contains(&spec.left));
            assert!((24.0..=576.0).contains(&spec.top));
        }
    }

    #[test]
    fn tiny_box_pins_to_margin() {
        let mut rng = Rng::with_seed(9);
        let (x, y) = spawn_position(&mut rng, Bounds { width: 10.0, height: 0.0 });
        assert_eq!((x, y), (EDGE_MARGIN_PX, EDGE_MARGIN_PX));
    }

    #[test]
    fn picks_every_image_eventually() {
        let cfg = FloaterConfig {
            images: vec!["a.png".into(), "b.png".into()],
            max_floaters: 64,
            ..FloaterConfig::default()
        };
        let mut p = FloaterPool::new(cfg, 11).unwrap();
        let mut seen = BTreeSet::new();
        while let Some(spec) = p.try_spawn(BOX) {
            seen.insert(spec.image);
        }
        assert_eq!(seen.len(), 2);
    }
}
