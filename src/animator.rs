//! State machine behind the reveal animation.
//!
//! The animator owns no browser resources. The DOM layer feeds it events (load
//! finished, visibility changed, container resized, timer fired) and draws
//! whatever [`Frame`] it hands back.

use log::{debug, info, warn};

use crate::config::PixelRevealConfig;
use crate::error::{Result, RevealError};
use crate::gate::VisibilityGate;
use crate::schedule::{Frame, PixelationSchedule};
use crate::sizing::{cover_fit, CanvasSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Loading,
    Animating,
    Complete,
    Failed,
}

impl AnimationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Loading => "loading",
            AnimationState::Animating => "animating",
            AnimationState::Complete => "complete",
            AnimationState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AnimationState::Complete | AnimationState::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct Animator {
    state: AnimationState,
    gate: VisibilityGate,
    schedule: PixelationSchedule,
    min_resolution: f64,
    natural: Option<(f64, f64)>,
    container: (f64, f64),
    size: Option<CanvasSize>,
    last_frame: Option<Frame>,
    error: Option<RevealError>,
}

impl Animator {
    pub fn new(config: &PixelRevealConfig) -> Self {
        Self {
            state: AnimationState::Idle,
            gate: VisibilityGate::new(config.visibility_threshold),
            schedule: PixelationSchedule::new(config.initial_pixelation, config.threshold),
            min_resolution: config.min_resolution,
            natural: None,
            container: (0.0, 0.0),
            size: None,
            last_frame: None,
            error: None,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn error(&self) -> Option<&RevealError> {
        self.error.as_ref()
    }

    pub fn canvas_size(&self) -> Option<CanvasSize> {
        self.size
    }

    /// Frame most recently handed out by [`Animator::next_frame`].
    pub fn last_frame(&self) -> Option<Frame> {
        self.last_frame
    }

    pub fn is_visible(&self) -> bool {
        self.gate.is_open()
    }

    pub fn begin_loading(&mut self) {
        if self.state == AnimationState::Idle {
            self.state = AnimationState::Loading;
        }
    }

    /// Record the container size. Does not recompute anything on its own.
    pub fn set_container(&mut self, width: f64, height: f64) {
        self.container = (width, height);
    }

    /// The full-resolution image finished decoding.
    ///
    /// Returns `true` if this event starts the animation.
    pub fn asset_loaded(&mut self, natural_width: f64, natural_height: f64) -> Result<bool> {
        if self.state != AnimationState::Loading {
            warn!("ignoring image load in state {}", self.state.as_str());
            return Ok(false);
        }
        let size = match cover_fit(
            (natural_width, natural_height),
            self.container,
            self.min_resolution,
        ) {
            Ok(size) => size,
            Err(err) => {
                self.fail(err.clone());
                return Err(err);
            }
        };
        self.natural = Some((natural_width, natural_height));
        self.size = Some(size);
        info!(
            "image loaded ({natural_width}x{natural_height}), canvas {}x{}",
            size.width, size.height
        );
        Ok(self.try_start())
    }

    /// Feed a visibility ratio from the intersection observer.
    ///
    /// Returns `true` if this event starts the animation.
    pub fn observe_visibility(&mut self, intersection_ratio: f64) -> bool {
        if self.state.is_terminal() || !self.gate.observe(intersection_ratio) {
            return false;
        }
        debug!("visibility gate opened at ratio {intersection_ratio:.2}");
        self.try_start()
    }

    /// Container changed size; recompute the canvas size if the image is known.
    ///
    /// The animation sequence is left where it is.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<Option<CanvasSize>> {
        self.set_container(width, height);
        let Some(natural) = self.natural else {
            return Ok(None);
        };
        let size = cover_fit(natural, self.container, self.min_resolution)?;
        self.size = Some(size);
        Ok(Some(size))
    }

    /// Advance the animation by one frame.
    ///
    /// Returns `None` unless the animator is in [`AnimationState::Animating`].
    /// Handing out [`Frame::Clear`] moves the animator to `Complete`.
    pub fn next_frame(&mut self) -> Option<Frame> {
        if self.state != AnimationState::Animating {
            return None;
        }
        let frame = self.schedule.next()?;
        if frame == Frame::Clear {
            self.state = AnimationState::Complete;
            info!("reveal complete");
        } else {
            debug!("next frame {frame:?}");
        }
        self.last_frame = Some(frame);
        Some(frame)
    }

    pub fn fail(&mut self, err: RevealError) {
        if self.state == AnimationState::Failed {
            return;
        }
        warn!("reveal failed: {err}");
        self.state = AnimationState::Failed;
        self.error = Some(err);
    }

    fn try_start(&mut self) -> bool {
        if self.state == AnimationState::Loading && self.natural.is_some() && self.gate.is_open() {
            self.state = AnimationState::Animating;
            info!("starting reveal");
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator() -> Animator {
        let mut animator = Animator::new(&PixelRevealConfig::new("full.jpg", "blur.jpg"));
        animator.set_container(400.0, 300.0);
        animator.begin_loading();
        animator
    }

    #[test]
    fn load_then_visible_starts_once() {
        let mut a = animator();
        assert!(!a.asset_loaded(800.0, 400.0).unwrap());
        assert_eq!(a.state(), AnimationState::Loading);
        assert!(a.observe_visibility(0.6));
        assert_eq!(a.state(), AnimationState::Animating);
        assert!(!a.observe_visibility(1.0));
    }

    #[test]
    fn visible_then_load_starts() {
        let mut a = animator();
        assert!(!a.observe_visibility(0.9));
        assert!(a.asset_loaded(800.0, 400.0).unwrap());
        assert_eq!(a.state(), AnimationState::Animating);
    }

    #[test]
    fn no_frames_before_start() {
        let mut a = animator();
        a.asset_loaded(800.0, 400.0).unwrap();
        assert_eq!(a.next_frame(), None);
    }

    #[test]
    fn runs_to_completion() {
        let mut a = animator();
        a.observe_visibility(1.0);
        a.asset_loaded(800.0, 400.0).unwrap();
        let frames: Vec<_> = std::iter::from_fn(|| a.next_frame()).collect();
        assert_eq!(
            frames,
            vec![
                Frame::Mosaic { block: 64 },
                Frame::Mosaic { block: 32 },
                Frame::Mosaic { block: 16 },
                Frame::Clear,
            ]
        );
        assert_eq!(a.state(), AnimationState::Complete);
        assert_eq!(a.last_frame(), Some(Frame::Clear));
        assert!(!a.observe_visibility(1.0));
    }

    #[test]
    fn resize_keeps_progress() {
        let mut a = animator();
        a.observe_visibility(1.0);
        a.asset_loaded(800.0, 400.0).unwrap();
        assert_eq!(a.next_frame(), Some(Frame::Mosaic { block: 64 }));

        let size = a.resize(3000.0, 500.0).unwrap().unwrap();
        assert_eq!(size.width, 3000.0);
        assert_eq!(size.height, 1500.0);
        assert_eq!(a.state(), AnimationState::Animating);
        assert_eq!(a.last_frame(), Some(Frame::Mosaic { block: 64 }));
        assert_eq!(a.next_frame(), Some(Frame::Mosaic { block: 32 }));
    }

    #[test]
    fn resize_before_load_only_records_container() {
        let mut a = animator();
        assert_eq!(a.resize(10.0, 10.0).unwrap(), None);
        assert_eq!(a.canvas_size(), None);
    }

    #[test]
    fn empty_image_fails() {
        let mut a = animator();
        assert_eq!(a.asset_loaded(0.0, 0.0), Err(RevealError::EmptyImage));
        assert_eq!(a.state(), AnimationState::Failed);
        assert!(!a.observe_visibility(1.0));
        assert_eq!(a.next_frame(), None);
    }

    #[test]
    fn failure_keeps_first_error() {
        let mut a = animator();
        a.fail(RevealError::AssetLoadFailed {
            url: "full.jpg".into(),
        });
        a.fail(RevealError::DrawSurfaceUnavailable("2d".into()));
        assert!(matches!(a.error(), Some(RevealError::AssetLoadFailed { .. })));
    }
}
