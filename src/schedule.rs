/// One step of the reveal animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Draw the image as flat tiles of `block` x `block` pixels.
    Mosaic { block: u32 },
    /// Draw the image at full clarity. Always the last frame.
    Clear,
}

/// Halving sequence of block sizes ending in a clear frame.
///
/// Starting at `initial`, each mosaic frame halves the block size (integer
/// division) until it drops below `threshold`, at which point a single
/// [`Frame::Clear`] is yielded and the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct PixelationSchedule {
    block: u32,
    threshold: u32,
    done: bool,
}

impl PixelationSchedule {
    pub fn new(initial: u32, threshold: u32) -> Self {
        Self {
            block: initial,
            threshold,
            done: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }

    /// Number of mosaic frames drawn before the clear frame.
    pub fn mosaic_frame_count(initial: u32, threshold: u32) -> u32 {
        let mut count = 0;
        let mut block = initial;
        while block >= threshold && block > 0 {
            count += 1;
            block /= 2;
        }
        count
    }
}

impl Iterator for PixelationSchedule {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.done {
            return None;
        }
        if self.block < self.threshold || self.block == 0 {
            self.done = true;
            return Some(Frame::Clear);
        }
        let frame = Frame::Mosaic { block: self.block };
        self.block /= 2;
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sequence() {
        let frames: Vec<_> = PixelationSchedule::new(64, 10).collect();
        assert_eq!(
            frames,
            vec![
                Frame::Mosaic { block: 64 },
                Frame::Mosaic { block: 32 },
                Frame::Mosaic { block: 16 },
                Frame::Clear,
            ]
        );
    }

    #[test]
    fn initial_below_threshold_goes_straight_to_clear() {
        let frames: Vec<_> = PixelationSchedule::new(4, 10).collect();
        assert_eq!(frames, vec![Frame::Clear]);
    }

    #[test]
    fn block_equal_to_threshold_is_still_a_mosaic() {
        let frames: Vec<_> = PixelationSchedule::new(16, 8).collect();
        assert_eq!(
            frames,
            vec![
                Frame::Mosaic { block: 16 },
                Frame::Mosaic { block: 8 },
                Frame::Clear,
            ]
        );
    }

    #[test]
    fn exhausted_after_clear() {
        let mut schedule = PixelationSchedule::new(20, 10);
        assert_eq!(schedule.next(), Some(Frame::Mosaic { block: 20 }));
        assert_eq!(schedule.next(), Some(Frame::Mosaic { block: 10 }));
        assert_eq!(schedule.next(), Some(Frame::Clear));
        assert!(schedule.is_finished());
        assert_eq!(schedule.next(), None);
    }

    #[test]
    fn count_matches_iterator() {
        for (p, t) in [(64, 10), (100, 3), (7, 7), (1, 2), (1000, 1)] {
            let mosaics = PixelationSchedule::new(p, t)
                .filter(|f| matches!(f, Frame::Mosaic { .. }))
                .count() as u32;
            assert_eq!(mosaics, PixelationSchedule::mosaic_frame_count(p, t));
        }
    }
}
