use rand::Rng;

use crate::{
    constants::game::{PIPE_INITIAL_X, PIPE_SPAWN_X},
    game::{bird::Bird, collision, pipe::Pipe, sprite::Sprites},
};

/// Pipes in spawn order, which is also their left-to-right order on screen.
#[derive(Debug, Clone, Default)]
pub struct ObstacleStream {
    pipes: Vec<Pipe>,
    appended: usize,
}

impl ObstacleStream {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut stream = ObstacleStream::default();
        stream.reset(rng);
        stream
    }

    /// Back to a single pipe waiting off the right edge.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pipes.clear();
        self.pipes.push(Pipe::new(PIPE_INITIAL_X, rng));
        self.appended = 0;
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// Pipes added by pass events since the last reset.
    pub fn appended(&self) -> usize {
        self.appended
    }

    pub fn passed_count(&self) -> usize {
        self.pipes.iter().filter(|pipe| pipe.passed).count()
    }

    pub fn scroll(&mut self) {
        for pipe in self.pipes.iter_mut() {
            pipe.advance();
        }
    }

    pub fn collides(&self, bird: &Bird, sprites: &Sprites) -> bool {
        self.pipes.iter().any(|pipe| collision::collides(bird, pipe, sprites))
    }

    /// Flags every pipe that just moved behind `bird_x` and appends one new pipe per flag.
    /// Returns the number of pass events.
    pub fn mark_passes<R: Rng + ?Sized>(&mut self, bird_x: i32, rng: &mut R) -> usize {
        let mut passes = 0;
        for pipe in self.pipes.iter_mut().filter(|pipe| !pipe.passed && pipe.x < bird_x) {
            pipe.passed = true;
            passes += 1;
        }

        for _ in 0..passes {
            self.pipes.push(Pipe::new(PIPE_SPAWN_X, rng));
        }
        self.appended += passes;

        passes
    }

    /// Drops pipes that have fully left the screen. Returns how many were dropped.
    pub fn collect_offscreen(&mut self) -> usize {
        let before = self.pipes.len();
        self.pipes.retain(|pipe| !pipe.is_offscreen());
        before - self.pipes.len()
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, pipe: Pipe) {
        self.pipes.push(pipe);
    }
}
