//! Construction-time options for the reveal widget.
//!
//! Options can be built field by field or parsed from the JSON object the host
//! page passes in. Field names in JSON are camelCase to match the JS API.

use serde::Deserialize;

use crate::error::{Result, RevealError};

pub const DEFAULT_INITIAL_PIXELATION: u32 = 64;
pub const DEFAULT_THRESHOLD: u32 = 10;
pub const DEFAULT_TIMEOUT_MS: u32 = 100;
pub const DEFAULT_MIN_RESOLUTION: f64 = 1000.0;
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.5;
/// Largest canvas edge browsers reliably allocate.
pub const MAX_MIN_RESOLUTION: f64 = 16384.0;

/// The pair of images the widget shows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    /// Full-resolution asset that is animated in.
    pub src: String,
    /// Low-resolution image shown underneath the canvas from the start.
    pub placeholder: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelRevealConfig {
    #[serde(flatten)]
    pub image: ImageSource,
    #[serde(default = "default_initial_pixelation")]
    pub initial_pixelation: u32,
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    /// Delay between animation frames, in milliseconds.
    #[serde(default = "default_timeout", alias = "timeoutMs")]
    pub timeout: u32,
    #[serde(default = "default_min_resolution")]
    pub min_resolution: f64,
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f64,
}

fn default_initial_pixelation() -> u32 {
    DEFAULT_INITIAL_PIXELATION
}

fn default_threshold() -> u32 {
    DEFAULT_THRESHOLD
}

fn default_timeout() -> u32 {
    DEFAULT_TIMEOUT_MS
}

fn default_min_resolution() -> f64 {
    DEFAULT_MIN_RESOLUTION
}

fn default_visibility_threshold() -> f64 {
    DEFAULT_VISIBILITY_THRESHOLD
}

impl PixelRevealConfig {
    pub fn new(src: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            image: ImageSource {
                src: src.into(),
                placeholder: placeholder.into(),
                alt: String::new(),
            },
            initial_pixelation: DEFAULT_INITIAL_PIXELATION,
            threshold: DEFAULT_THRESHOLD,
            timeout: DEFAULT_TIMEOUT_MS,
            min_resolution: DEFAULT_MIN_RESOLUTION,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }

    /// Parse and validate options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RevealError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_initial_pixelation(mut self, initial: u32) -> Self {
        self.initial_pixelation = initial;
        self
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout = timeout_ms;
        self
    }

    pub fn with_min_resolution(mut self, floor: f64) -> Self {
        self.min_resolution = floor;
        self
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.image.alt = alt.into();
        self
    }

    pub fn with_visibility_threshold(mut self, ratio: f64) -> Self {
        self.visibility_threshold = ratio;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.image.src.is_empty() {
            return Err(RevealError::InvalidConfig("`src` must not be empty".into()));
        }
        if self.image.placeholder.is_empty() {
            return Err(RevealError::InvalidConfig(
                "`placeholder` must not be empty".into(),
            ));
        }
        if self.initial_pixelation == 0 {
            return Err(RevealError::InvalidConfig(
                "`initialPixelation` must be positive".into(),
            ));
        }
        if self.threshold == 0 {
            return Err(RevealError::InvalidConfig("`threshold` must be positive".into()));
        }
        if !(self.min_resolution >= 0.0 && self.min_resolution <= MAX_MIN_RESOLUTION) {
            return Err(RevealError::InvalidConfig(format!(
                "`minResolution` must be in [0, {MAX_MIN_RESOLUTION}], got {}",
                self.min_resolution
            )));
        }
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            return Err(RevealError::InvalidConfig(format!(
                "`visibilityThreshold` must be in (0, 1], got {}",
                self.visibility_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_defaults() {
        let config =
            PixelRevealConfig::from_json(r#"{"src":"full.jpg","placeholder":"blur.jpg"}"#)
                .unwrap();
        assert_eq!(config, PixelRevealConfig::new("full.jpg", "blur.jpg"));
        assert_eq!(config.initial_pixelation, 64);
        assert_eq!(config.threshold, 10);
        assert_eq!(config.timeout, 100);
        assert_eq!(config.min_resolution, 1000.0);
    }

    #[test]
    fn json_overrides() {
        let config = PixelRevealConfig::from_json(
            r#"{"src":"a.png","placeholder":"b.png","alt":"cat",
                "initialPixelation":32,"threshold":4,"timeout":50,"minResolution":500}"#,
        )
        .unwrap();
        assert_eq!(config.image.alt, "cat");
        assert_eq!(config.initial_pixelation, 32);
        assert_eq!(config.threshold, 4);
        assert_eq!(config.timeout, 50);
        assert_eq!(config.min_resolution, 500.0);
    }

    #[test]
    fn missing_src_is_rejected() {
        let err = PixelRevealConfig::from_json(r#"{"placeholder":"b.png"}"#).unwrap_err();
        assert!(matches!(err, RevealError::InvalidConfig(_)));
    }

    #[test]
    fn zero_block_sizes_are_rejected() {
        let config = PixelRevealConfig::new("a", "b").with_initial_pixelation(0);
        assert!(config.validate().is_err());
        let config = PixelRevealConfig::new("a", "b").with_threshold(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn min_resolution_is_capped() {
        let base = PixelRevealConfig::new("a", "b");
        assert!(base.clone().with_min_resolution(0.0).validate().is_ok());
        assert!(base.clone().with_min_resolution(MAX_MIN_RESOLUTION).validate().is_ok());
        for floor in [-1.0, MAX_MIN_RESOLUTION + 1.0, 1e308, f64::INFINITY, f64::NAN] {
            let err = base.clone().with_min_resolution(floor).validate().unwrap_err();
            assert!(matches!(err, RevealError::InvalidConfig(_)), "{floor}");
        }
        let err = PixelRevealConfig::from_json(
            r#"{"src":"a.png","placeholder":"b.png","minResolution":1e308}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RevealError::InvalidConfig(_)));
    }

    #[test]
    fn visibility_threshold_range() {
        let base = PixelRevealConfig::new("a", "b");
        assert!(base.clone().with_visibility_threshold(1.0).validate().is_ok());
        assert!(base.clone().with_visibility_threshold(0.0).validate().is_err());
        assert!(base.with_visibility_threshold(f64::NAN).validate().is_err());
    }
}
