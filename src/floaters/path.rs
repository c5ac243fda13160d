//! Randomized drift paths for floaters.
//!
//! A path is a straight drift vector bent by a few jittered waypoints, wrapped in
//! a fade-in / fade-out opacity envelope. Keyframes are offsets from the spawn
//! position, so the element's own `left`/`top` stay untouched while it animates.

use fastrand::Rng;

use crate::config::{FloaterConfig, WAYPOINT_JITTER_PX, WAYPOINT_OFFSET_CAP};

/// One Web Animations keyframe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub offset: f64, // normalized time 0..=1
    pub dx: f64,
    pub dy: f64,
    pub opacity: f64,
}

impl Keyframe {
    /// CSS `transform` value for this frame.
    pub fn transform(&self) -> String {
        format!("translate({:.1}px, {:.1}px)", self.dx, self.dy)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionPath {
    pub keyframes: Vec<Keyframe>,
    pub duration_ms: u32,
}

impl MotionPath {
    /// Total displacement at the end of the path.
    pub fn displacement(&self) -> (f64, f64) {
        self.keyframes.last().map(|k| (k.dx, k.dy)).unwrap_or((0.0, 0.0))
    }
}

/// Uniform float in `[min, max)`; a degenerate range yields `min`.
pub(crate) fn rand_f64(rng: &mut Rng, min: f64, max: f64) -> f64 {
    min + rng.f64() * (max - min)
}

/// Uniform integer in `[min, max]`.
pub(crate) fn rand_u32(rng: &mut Rng, (min, max): (u32, u32)) -> u32 {
    rng.u32(min..=max)
}

pub fn generate(rng: &mut Rng, cfg: &FloaterConfig) -> MotionPath {
    let total_drift = rand_f64(rng, cfg.drift_px.0, cfg.drift_px.1);
    let angle = rand_f64(rng, 0.0, std::f64::consts::TAU);
    let dx = angle.cos() * total_drift;
    let dy = angle.sin() * total_drift;
    let waypoints = rand_u32(rng, cfg.waypoints);

    let mut keyframes = Vec::with_capacity(waypoints as usize + 2);
    keyframes.push(Keyframe { offset: 0.0, dx: 0.0, dy: 0.0, opacity: 0.0 });
    for i in 1..=waypoints {
        let t = i as f64 / (waypoints as f64 + 1.0);
        keyframes.push(Keyframe {
            offset: t.min(WAYPOINT_OFFSET_CAP),
            dx: dx * t + rand_f64(rng, -WAYPOINT_JITTER_PX, WAYPOINT_JITTER_PX),
            dy: dy * t + rand_f64(rng, -WAYPOINT_JITTER_PX, WAYPOINT_JITTER_PX),
            opacity: 1.0,
        });
    }
    keyframes.push(Keyframe { offset: 1.0, dx, dy, opacity: 0.0 });

    MotionPath { keyframes, duration_ms: rand_u32(rng, cfg.lifetime_ms) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_starts_and_ends_transparent() {
        let cfg = FloaterConfig::default();
        let mut rng = Rng::with_seed(7);
        for _ in 0..200 {
            let path = generate(&mut rng, &cfg);
            let first = path.keyframes.first().unwrap();
            let last = path.keyframes.last().unwrap();
            assert_eq!((first.dx, first.dy, first.opacity, first.offset), (0.0, 0.0, 0.0, 0.0));
            assert_eq!(last.opacity, 0.0);
            assert_eq!(last.offset, 1.0);
            let dist = last.dx.hypot(last.dy);
            assert!((119.999..=320.001).contains(&dist), "drift {}", dist);
            let mid = &path.keyframes[1..path.keyframes.len() - 1];
            assert!((2..=4).contains(&mid.len()));
            for k in mid {
                assert!((0.0..=WAYPOINT_OFFSET_CAP).contains(&k.offset));
                assert_eq!(k.opacity, 1.0);
            }
            assert!((6000..=12000).contains(&path.duration_ms));
        }
    }

    #[test]
    fn waypoint_offsets_are_capped_for_long_paths() {
        let cfg = FloaterConfig { waypoints: (12, 12), ..FloaterConfig::default() };
        let path = generate(&mut Rng::with_seed(1), &cfg);
        let offsets: Vec<f64> = path.keyframes.iter().map(|k| k.offset).collect();
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(offsets[offsets.len() - 2], WAYPOINT_OFFSET_CAP);
    }

    #[test]
    fn waypoints_stay_near_the_drift_line() {
        let cfg = FloaterConfig::default();
        let path = generate(&mut Rng::with_seed(42), &cfg);
        let (dx, dy) = path.displacement();
        let n = path.keyframes.len() - 2;
        for (i, k) in path.keyframes[1..=n].iter().enumerate() {
            let t = (i + 1) as f64 / (n as f64 + 1.0);
            assert!((k.dx - dx * t).abs() <= WAYPOINT_JITTER_PX + 1e-9);
            assert!((k.dy - dy * t).abs() <= WAYPOINT_JITTER_PX + 1e-9);
        }
    }

    #[test]
    fn transform_formats_pixels() {
        let k = Keyframe { offset: 0.5, dx: 12.0, dy: -3.5, opacity: 1.0 };
        assert_eq!(k.transform(), "translate(12.0px, -3.5px)");
    }
}
