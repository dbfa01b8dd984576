use crate::constants::game::{
    ANIMATION_TIME, DISPLACEMENT_LIMIT, DIVE_FLOOR, DIVE_POSE_TILT, GRAVITY, JUMP_VELOCITY, MAX_ROTATION, MIN_ROTATION,
    RISE_BOOST, ROTATION_VELOCITY, TILT_HOLD_MARGIN,
};

pub const FRAME_WINGS_DOWN: usize = 0;
pub const FRAME_WINGS_LEVEL: usize = 1;
pub const FRAME_WINGS_UP: usize = 2;

/// Vertical offset for the `ticks`-th tick after the last jump.
///
/// The kinematic value is clamped to `DISPLACEMENT_LIMIT` in magnitude first; the rise boost is
/// applied afterwards, so an ascent can move up to `DISPLACEMENT_LIMIT + RISE_BOOST` in one tick.
pub fn displacement(velocity: f32, ticks: u32) -> f32 {
    let t = ticks as f32;
    let mut displacement = velocity * t + 0.5 * GRAVITY * t * t;

    if displacement.abs() >= DISPLACEMENT_LIMIT {
        displacement = DISPLACEMENT_LIMIT.copysign(displacement);
    }
    if displacement < 0.0 {
        displacement -= RISE_BOOST;
    }

    displacement
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: i32,
    pub y: f32,
    velocity: f32,
    ticks: u32,
    height: f32,
    tilt: f32,
    frame_counter: u32,
    frame: usize,
}

impl Bird {
    pub fn new(x: i32, y: f32) -> Self {
        Bird { x, y, velocity: 0.0, ticks: 0, height: y, tilt: 0.0, frame_counter: 0, frame: FRAME_WINGS_DOWN }
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn ticks_since_jump(&self) -> u32 {
        self.ticks
    }

    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn jump(&mut self) {
        self.velocity = JUMP_VELOCITY;
        self.ticks = 0;
        self.height = self.y;
    }

    /// Moves the bird by one tick and returns the displacement that was applied.
    pub fn advance(&mut self) -> f32 {
        self.ticks += 1;

        let displacement = displacement(self.velocity, self.ticks);
        self.y += displacement;

        if displacement < 0.0 || self.y < self.height + TILT_HOLD_MARGIN {
            if self.tilt < MAX_ROTATION {
                self.tilt = MAX_ROTATION;
            }
        } else if self.tilt > DIVE_FLOOR {
            self.tilt -= ROTATION_VELOCITY;
        }
        self.tilt = self.tilt.clamp(MIN_ROTATION, MAX_ROTATION);

        displacement
    }

    /// Steps the wing animation: down, level, up, level, then around again.
    /// A nose-diving bird holds its wings level.
    pub fn animate(&mut self) {
        self.frame_counter += 1;

        self.frame = match self.frame_counter {
            n if n <= ANIMATION_TIME => FRAME_WINGS_DOWN,
            n if n <= ANIMATION_TIME * 2 => FRAME_WINGS_LEVEL,
            n if n <= ANIMATION_TIME * 3 => FRAME_WINGS_UP,
            n if n <= ANIMATION_TIME * 4 => FRAME_WINGS_LEVEL,
            _ => {
                self.frame_counter = 0;
                FRAME_WINGS_DOWN
            },
        };

        if self.tilt <= DIVE_POSE_TILT {
            self.frame = FRAME_WINGS_LEVEL;
            self.frame_counter = ANIMATION_TIME * 2;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_tilt(&mut self, tilt: f32) {
        self.tilt = tilt;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn test_jump_resets_motion() {
        let mut bird = Bird::new(230, 400.0);
        bird.advance();
        bird.advance();
        bird.jump();

        assert_eq!(bird.velocity(), -10.5);
        assert_eq!(bird.ticks_since_jump(), 0);
    }

    #[test]
    fn test_first_tick_after_jump() {
        let mut bird = Bird::new(230, 400.0);
        bird.jump();
        let moved = bird.advance();

        // -10.5 + 1.5 = -9, under the limit, then the rise boost.
        assert_eq!(moved, -11.0);
        assert_eq!(bird.y, 389.0);
    }

    #[test]
    fn test_clamp_happens_before_rise_boost() {
        // Second tick after a jump: -21 + 6 = -15, clamped to -10, boosted to -12.
        assert_eq!(displacement(JUMP_VELOCITY, 2), -12.0);
        // Falling is clamped and never boosted.
        assert_eq!(displacement(JUMP_VELOCITY, 20), 10.0);
        assert_eq!(displacement(0.0, 1), 1.5);
        assert_eq!(displacement(0.0, 0), 0.0);
    }

    #[test]
    fn test_displacement_stays_within_limits() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bird = Bird::new(230, 350.0);

        for _ in 0..5_000 {
            if rng.gen_bool(0.08) {
                bird.jump();
            }
            let before = bird.y;
            let moved = bird.advance();
            assert!((bird.y - before - moved).abs() < 1e-3);

            let raw = if moved < 0.0 { moved + RISE_BOOST } else { moved };
            assert!(raw.abs() <= DISPLACEMENT_LIMIT, "raw displacement {raw}");
            assert!(moved >= -(DISPLACEMENT_LIMIT + RISE_BOOST));
            assert!((MIN_ROTATION..=MAX_ROTATION).contains(&bird.tilt()));
        }
    }

    #[test]
    fn test_tilt_snaps_up_then_dives() {
        let mut bird = Bird::new(230, 350.0);
        bird.jump();
        bird.advance();
        assert_eq!(bird.tilt(), MAX_ROTATION);

        // Let it fall well below the jump height.
        let mut tilts = vec![];
        for _ in 0..40 {
            bird.advance();
            tilts.push(bird.tilt());
        }

        assert!(tilts.windows(2).all(|w| w[1] <= w[0]));
        // Keeps turning while above the floor, so it may overshoot by less than one step.
        assert_eq!(*tilts.last().unwrap(), -75.0);
    }

    #[test]
    fn test_tilt_holds_near_jump_height() {
        let mut bird = Bird::new(230, 350.0);
        bird.set_tilt(-40.0);
        // Falling, but still within the hold margin of the reference height.
        bird.advance();
        assert!(bird.y < 350.0 + TILT_HOLD_MARGIN);
        assert_eq!(bird.tilt(), MAX_ROTATION);
    }

    #[test]
    fn test_animation_cycle() {
        let mut bird = Bird::new(230, 350.0);
        let frames: Vec<usize> = (0..22)
            .map(|_| {
                bird.animate();
                bird.frame()
            })
            .collect();

        let expected: Vec<usize> = [
            vec![FRAME_WINGS_DOWN; 5],
            vec![FRAME_WINGS_LEVEL; 5],
            vec![FRAME_WINGS_UP; 5],
            vec![FRAME_WINGS_LEVEL; 5],
            vec![FRAME_WINGS_DOWN; 2],
        ]
        .concat();
        assert_eq!(frames, expected);
    }

    #[test]
    fn test_dive_pose_freezes_animation() {
        let mut bird = Bird::new(230, 350.0);
        bird.set_tilt(-85.0);

        for _ in 0..30 {
            bird.animate();
            assert_eq!(bird.frame(), FRAME_WINGS_LEVEL);
        }

        // Picks the cycle up again right after the held frame.
        bird.set_tilt(0.0);
        bird.animate();
        assert_eq!(bird.frame(), FRAME_WINGS_UP);
        for _ in 0..5 {
            bird.animate();
        }
        assert_eq!(bird.frame(), FRAME_WINGS_LEVEL);
    }
}
