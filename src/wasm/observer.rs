use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::Result;

use super::dom_err;

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Reports how much of an element is inside the viewport.
///
/// Disconnects on drop. The browser keeps calling back until then, so the
/// caller decides when it has seen enough and calls [`VisibilityObserver::stop`].
pub struct VisibilityObserver {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl VisibilityObserver {
    pub fn observe<F>(target: &Element, threshold: f64, mut on_ratio: F) -> Result<Self>
    where
        F: FnMut(f64) + 'static,
    {
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |entries: Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                        on_ratio(entry.intersection_ratio());
                    }
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(dom_err)?;
        observer.observe(target);

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn stop(&self) {
        self.observer.disconnect();
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
