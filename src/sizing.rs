use crate::error::{Result, RevealError};

/// Target drawing-surface size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Whole-pixel size for the canvas backing store, never smaller than 1x1.
    pub fn to_pixels(&self) -> (u32, u32) {
        let w = self.width.round().max(1.0) as u32;
        let h = self.height.round().max(1.0) as u32;
        (w, h)
    }
}

/// Size the canvas so the image covers the container without distortion.
///
/// The image is scaled along whichever axis leaves no gap in the container. The
/// fixed side is floored at `min_resolution`; if the derived side still ends up
/// under the floor, both sides are scaled up so the smaller one meets it.
pub fn cover_fit(
    natural: (f64, f64),
    container: (f64, f64),
    min_resolution: f64,
) -> Result<CanvasSize> {
    let (nw, nh) = natural;
    if !(nw > 0.0 && nh > 0.0) {
        return Err(RevealError::EmptyImage);
    }
    let floor = if min_resolution.is_finite() {
        min_resolution.max(0.0)
    } else {
        0.0
    };
    let (cw, ch) = (usable(container.0), usable(container.1));

    let image_ratio = nw / nh;
    let image_is_wider = match (cw > 0.0, ch > 0.0) {
        (true, true) => image_ratio > cw / ch,
        // a zero-height container is infinitely wide
        (true, false) => false,
        (false, true) => true,
        (false, false) => image_ratio >= 1.0,
    };

    let (mut width, mut height) = if image_is_wider {
        let height = ch.max(floor);
        (height * image_ratio, height)
    } else {
        let width = cw.max(floor);
        (width, width / image_ratio)
    };

    if !(width > 0.0 && height > 0.0) {
        // nothing to cover and no floor: keep the image's own size
        return Ok(CanvasSize::new(nw, nh));
    }

    let smaller = width.min(height);
    if smaller < floor {
        let scale = floor / smaller;
        width *= scale;
        height *= scale;
    }

    Ok(CanvasSize::new(width, height))
}

fn usable(side: f64) -> f64 {
    if side.is_finite() && side > 0.0 {
        side
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn wide_image_fixes_height() {
        let size = cover_fit((800.0, 400.0), (400.0, 300.0), 1000.0).unwrap();
        assert!(approx(size.height, 1000.0));
        assert!(approx(size.width, 2000.0));
    }

    #[test]
    fn tall_image_fixes_width() {
        let size = cover_fit((400.0, 800.0), (400.0, 300.0), 100.0).unwrap();
        assert!(approx(size.width, 400.0));
        assert!(approx(size.height, 800.0));
    }

    #[test]
    fn container_larger_than_floor_wins() {
        let size = cover_fit((1600.0, 900.0), (1200.0, 1200.0), 1000.0).unwrap();
        assert!(approx(size.height, 1200.0));
        assert!(approx(size.width, 1200.0 * 16.0 / 9.0));
    }

    #[test]
    fn derived_side_is_raised_to_floor() {
        // container 300x600 (ratio 0.5), image 800x1000 (ratio 0.8): image is wider,
        // height is fixed at 1000 and the width would be 800 without the rescale.
        let size = cover_fit((800.0, 1000.0), (300.0, 600.0), 1000.0).unwrap();
        assert!(approx(size.width, 1000.0));
        assert!(approx(size.height, 1250.0));
    }

    #[test]
    fn zero_sized_image_is_an_error() {
        assert_eq!(
            cover_fit((0.0, 100.0), (100.0, 100.0), 10.0),
            Err(RevealError::EmptyImage)
        );
    }

    #[test]
    fn collapsed_container_uses_floor() {
        let size = cover_fit((200.0, 100.0), (0.0, 0.0), 50.0).unwrap();
        assert!(approx(size.height, 50.0));
        assert!(approx(size.width, 100.0));
    }

    #[test]
    fn pixel_rounding() {
        assert_eq!(CanvasSize::new(999.6, 0.2).to_pixels(), (1000, 1));
    }
}
