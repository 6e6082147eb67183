//! Canvas widget that de-pixelates an image once it scrolls into view.
//!
//! The pure pieces (sizing, block schedule, mosaic filter, visibility latch and
//! the animator state machine) build on every target so they can be tested on
//! the host. The DOM glue is only compiled for wasm32.

pub mod animator;
pub mod config;
pub mod error;
pub mod gate;
pub mod mosaic;
pub mod schedule;
pub mod sizing;

pub use animator::{AnimationState, Animator};
pub use config::{ImageSource, PixelRevealConfig};
pub use error::RevealError;
pub use schedule::{Frame, PixelationSchedule};
pub use sizing::{cover_fit, CanvasSize};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;
