//! Ambient floaters: small decorative images that fade in, wander along a
//! randomized path inside a background layer, and fade out.
//!
//! [`Floaters`] owns the spawn timer and a [`FloaterPool`]; everything that
//! touches the page goes through a [`FloaterLayer`] (the DOM one lives in
//! [`dom`]). The handle is cheap to clone and is what `start()` / `stop()`
//! exported to JS operate on.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub mod dom;
pub mod path;
pub mod pool;

pub use pool::{Bounds, FloaterId, FloaterPool, FloaterSpec};

use crate::config::{ConfigError, FloaterConfig};

/// Rendering surface for floaters.
pub trait FloaterLayer: 'static {
    /// Repeating timer handle; dropping it cancels the timer.
    type Timer: 'static;
    type Error: std::fmt::Debug + 'static;

    fn bounds(&self) -> Bounds;
    fn schedule(&self, every_ms: u32, tick: Box<dyn FnMut()>) -> Self::Timer;
    /// Show a floater and play its path; `finished` runs once the animation ends.
    fn mount(&mut self, spec: &FloaterSpec, finished: Box<dyn FnOnce()>) -> Result<(), Self::Error>;
    fn unmount(&mut self, id: FloaterId);
    /// Remove every floater element immediately.
    fn clear(&mut self);
}

struct Inner<L: FloaterLayer> {
    pool: FloaterPool,
    layer: L,
    timer: Option<L::Timer>,
}

pub struct Floaters<L: FloaterLayer> {
    inner: Rc<RefCell<Inner<L>>>,
}

impl<L: FloaterLayer> Clone for Floaters<L> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<L: FloaterLayer> Floaters<L> {
    pub fn new(layer: L, config: FloaterConfig, seed: u64) -> Result<Self, ConfigError> {
        let pool = FloaterPool::new(config, seed)?;
        Ok(Self { inner: Rc::new(RefCell::new(Inner { pool, layer, timer: None })) })
    }

    fn from_weak(weak: &Weak<RefCell<Inner<L>>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Begin spawning; no-op while already running.
    pub fn start(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.timer.is_some() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let every_ms = inner.pool.config().spawn_every_ms;
        let timer = inner.layer.schedule(
            every_ms,
            Box::new(move || {
                if let Some(floaters) = Self::from_weak(&weak) {
                    floaters.spawn_one();
                }
            }),
        );
        inner.timer = Some(timer);
        log::debug!("floaters started (every {} ms)", every_ms);
    }

    /// Cancel spawning and drop every live floater at once. Safe to repeat.
    pub fn stop(&self) {
        let mut inner = self.inner.borrow_mut();
        let was_running = inner.timer.take().is_some();
        let cleared = inner.pool.clear();
        inner.layer.clear();
        if was_running || !cleared.is_empty() {
            log::debug!("floaters stopped, {} removed", cleared.len());
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().timer.is_some()
    }

    pub fn live_count(&self) -> usize {
        self.inner.borrow().pool.live_count()
    }

    /// One scheduler tick: spawn a floater unless the cap is reached.
    pub fn spawn_one(&self) {
        let mut inner = self.inner.borrow_mut();
        let bounds = inner.layer.bounds();
        let Some(spec) = inner.pool.try_spawn(bounds) else {
            return;
        };
        let id = spec.id;
        let weak = Rc::downgrade(&self.inner);
        let finished = Box::new(move || {
            if let Some(floaters) = Self::from_weak(&weak) {
                floaters.finish(id);
            }
        });
        if let Err(e) = inner.layer.mount(&spec, finished) {
            log::warn!("could not mount floater: {:?}", e);
            inner.pool.finish(id);
            inner.layer.unmount(id);
        }
    }

    fn finish(&self, id: FloaterId) {
        let mut inner = self.inner.borrow_mut();
        if inner.pool.finish(id) {
            inner.layer.unmount(id);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn start_twice_keeps_one_timer() {
        let (f, rec) = floaters(12);
        f.start();
        f.start();
        assert!(f.is_running());
        assert_eq!(rec.borrow().timers_created, 1);
        assert_eq!(rec.borrow().timers_alive, 1);
    }

    #[test]
    fn ticks_never_exceed_cap() {
        let (f, rec) = floaters(3);
        f.start();
        for _ in 0..10 {
            tick(&rec);
            assert!(f.live_count() <= 3);
            assert!(rec.borrow().elements.len() <= 3);
        }
        assert_eq!(f.live_count(), 3);
    }

    #[test]
    fn finished_animation_removes_element() {
        let (f, rec) = floaters(2);
        f.start();
        tick(&rec);
        let id = *rec.borrow().elements.iter().next().unwrap();
        finish(&rec, id);
        assert_eq!(f.live_count(), 0);
        assert!(rec.borrow().elements.is_empty());
    }

    #[test]
    fn stop_clears_everything_from_any_state() {
        let (f, rec) = floaters(5);
        f.stop();
        assert_eq!(f.live_count(), 0);

        f.start();
        for _ in 0..4 {
            tick(&rec);
        }
        let ids: Vec<_> = rec.borrow().elements.iter().copied().collect();
        f.stop();
        assert!(!f.is_running());
        assert_eq!(f.live_count(), 0);
        assert!(rec.borrow().elements.is_empty());
        assert_eq!(rec.borrow().timers_alive, 0);

        // Late finish callbacks from removed floaters are ignored.
        for id in ids {
            finish(&rec, id);
        }
        assert_eq!(f.live_count(), 0);
        f.stop();
        assert_eq!(f.live_count(), 0);
    }

    #[test]
    fn inverted_range_is_refused_up_front() {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        let cfg = FloaterConfig { lifetime_ms: (9000, 100), ..FloaterConfig::default() };
        assert!(Floaters::new(FakeLayer(rec.clone()), cfg, 1).is_err());
        assert_eq!(rec.borrow().timers_created, 0);
    }

    #[test]
    fn restart_after_stop_spawns_again() {
        let (f, rec) = floaters(2);
        f.start();
        tick(&rec);
        f.stop();
        f.start();
        tick(&rec);
        assert_eq!(f.live_count(), 1);
        assert_eq!(rec.borrow().timers_created, 2);
    }
}
