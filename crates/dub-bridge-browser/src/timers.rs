//! `TimerPlatform` on `setTimeout`, via `gloo-timers`.

use std::cell::OnceCell;
use std::rc::Rc;
use std::time::Duration;

use dub_bridge_core::{TimerKey, TimerPlatform};
use gloo_timers::callback::Timeout;
use web_sys::Element;

type FireFn = Box<dyn Fn(TimerKey<Element>, u64)>;

/// Browser timers. Each scheduled callback reports its key and generation
/// to the function passed to [`WebTimers::connect`].
///
/// The callback is connected after construction because it usually needs a
/// weak handle to the bridge that owns these timers.
#[derive(Clone, Default)]
pub struct WebTimers {
    on_fire: Rc<OnceCell<FireFn>>,
}

impl WebTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maturity callback. Returns false if one was already set.
    pub fn connect(&self, on_fire: impl Fn(TimerKey<Element>, u64) + 'static) -> bool {
        self.on_fire.set(Box::new(on_fire)).is_ok()
    }
}

impl TimerPlatform<TimerKey<Element>> for WebTimers {
    /// Dropping a `Timeout` clears it.
    type Handle = Timeout;

    fn schedule(&self, key: &TimerKey<Element>, generation: u64, delay: Duration) -> Timeout {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let on_fire = Rc::clone(&self.on_fire);
        let key = key.clone();
        Timeout::new(millis, move || match on_fire.get() {
            Some(f) => f(key, generation),
            None => tracing::warn!(target: "dub::debounce", "timer fired with no bridge connected"),
        })
    }
}
