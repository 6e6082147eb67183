use gloo::events::EventListener;
use web_sys::HtmlImageElement;

use crate::error::{Result, RevealError};

use super::{dom_err, js_message};

/// Fetches the full-resolution image off-screen.
///
/// Both listeners are removed when the loader is dropped, so a widget torn
/// down mid-download never hears back.
pub struct ImageLoader {
    image: HtmlImageElement,
    _on_load: EventListener,
    _on_error: EventListener,
}

impl ImageLoader {
    pub fn start<L, E>(url: &str, on_load: L, on_error: E) -> Result<Self>
    where
        L: Fn(&HtmlImageElement) + 'static,
        E: Fn(RevealError) + 'static,
    {
        let image = HtmlImageElement::new().map_err(dom_err)?;
        image.set_cross_origin(Some("anonymous"));

        let loaded = image.clone();
        let on_load = EventListener::once(&image, "load", move |_| on_load(&loaded));
        let failed_url = url.to_owned();
        let on_error = EventListener::once(&image, "error", move |_| {
            on_error(RevealError::AssetLoadFailed { url: failed_url })
        });

        image.set_src(url);
        log::debug!("loading {url}");

        Ok(Self {
            image,
            _on_load: on_load,
            _on_error: on_error,
        })
    }

    pub fn image(&self) -> &HtmlImageElement {
        &self.image
    }

    pub fn natural_size(&self) -> (f64, f64) {
        (
            self.image.natural_width() as f64,
            self.image.natural_height() as f64,
        )
    }
}

impl Drop for ImageLoader {
    fn drop(&mut self) {
        // abort any in-flight request
        if let Err(err) = self.image.remove_attribute("src") {
            log::debug!("could not clear image src: {}", js_message(&err));
        }
    }
}
