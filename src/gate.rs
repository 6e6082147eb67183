use crate::config::DEFAULT_VISIBILITY_THRESHOLD;

/// One-shot latch that opens the first time enough of the surface is visible.
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    threshold: f64,
    open: bool,
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}

impl VisibilityGate {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Feed an intersection ratio in `[0, 1]`.
    ///
    /// Returns `true` only for the observation that opens the gate; once open
    /// it stays open and later observations return `false`.
    pub fn observe(&mut self, intersection_ratio: f64) -> bool {
        if self.open || !(intersection_ratio >= self.threshold) {
            return false;
        }
        self.open = true;
        true
    }
}
