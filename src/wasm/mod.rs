use std::str::FromStr;

use log::LevelFilter;
use wasm_bindgen::prelude::*;

use crate::error::RevealError;

mod console;
mod loader;
mod observer;
mod render;
mod widget;

pub use widget::{PixelReveal, PixelRevealOptions};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console::init(LevelFilter::Info);
}

/// Change the console log level (`"off"`, `"error"`, ..., `"trace"`).
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level = LevelFilter::from_str(level)
        .map_err(|_| RevealError::InvalidConfig(format!("unknown log level `{level}`")))?;
    console::init(level);
    Ok(())
}

impl From<RevealError> for JsValue {
    fn from(err: RevealError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn dom_err(value: JsValue) -> RevealError {
    RevealError::Dom(js_message(&value))
}
