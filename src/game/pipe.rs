use rand::Rng;

use crate::constants::game::{PIPE_GAP, PIPE_GAP_MAX, PIPE_GAP_MIN, PIPE_HEIGHT, PIPE_VELOCITY, PIPE_WIDTH};

/// A pair of pipes sharing one opening.
///
/// `gap_y` is where the top piece ends; the opening spans `gap_y..gap_y + PIPE_GAP`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipe {
    pub x: i32,
    gap_y: i32,
    pub passed: bool,
}

impl Pipe {
    pub fn new<R: Rng + ?Sized>(x: i32, rng: &mut R) -> Self {
        Self::with_gap(x, rng.gen_range(PIPE_GAP_MIN..PIPE_GAP_MAX))
    }

    pub fn with_gap(x: i32, gap_y: i32) -> Self {
        Pipe { x, gap_y: gap_y.clamp(PIPE_GAP_MIN, PIPE_GAP_MAX - 1), passed: false }
    }

    pub fn gap_y(&self) -> i32 {
        self.gap_y
    }

    /// Top-left corner of the upper piece.
    pub fn top_y(&self) -> i32 {
        self.gap_y - PIPE_HEIGHT
    }

    /// Top-left corner of the lower piece.
    pub fn bottom_y(&self) -> i32 {
        self.gap_y + PIPE_GAP
    }

    pub fn advance(&mut self) {
        self.x -= PIPE_VELOCITY;
    }

    pub fn is_offscreen(&self) -> bool {
        self.x + PIPE_WIDTH < 0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_edges_follow_gap() {
        let pipe = Pipe::with_gap(700, 300);

        assert_eq!(pipe.top_y(), 300 - 640);
        assert_eq!(pipe.bottom_y(), 500);
        assert!(!pipe.passed);
    }

    #[test]
    fn test_gap_is_clamped() {
        assert_eq!(Pipe::with_gap(0, -20).gap_y(), PIPE_GAP_MIN);
        assert_eq!(Pipe::with_gap(0, 9_000).gap_y(), PIPE_GAP_MAX - 1);
    }

    #[test]
    fn test_random_gaps_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let gap = Pipe::new(0, &mut rng).gap_y();
            assert!((PIPE_GAP_MIN..PIPE_GAP_MAX).contains(&gap));
        }
    }

    #[test]
    fn test_leaves_screen_once_right_edge_is_past_zero() {
        let mut pipe = Pipe::with_gap(-PIPE_WIDTH + PIPE_VELOCITY, 100);
        assert!(!pipe.is_offscreen());

        pipe.advance();
        assert_eq!(pipe.x, -PIPE_WIDTH);
        assert!(!pipe.is_offscreen());

        pipe.advance();
        assert!(pipe.is_offscreen());
    }
}
