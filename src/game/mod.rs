pub mod base;
pub mod bird;
pub mod collision;
pub mod mask;
pub mod pipe;
pub mod sprite;
pub mod stream;

use rand::{rngs::StdRng, SeedableRng};
use strum::Display;
use tracing::{debug, info, warn};

use crate::{
    constants::game::{BASE_Y, BIRD_INITIAL_X, BIRD_INITIAL_Y},
    game::{base::Base, bird::Bird, sprite::Sprites, stream::ObstacleStream},
    highscore::HighScore,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Scored(u32),
    GameOver { score: u32, new_high_score: bool },
}

/// Everything one game session owns: entities, score, assets and the random source.
#[derive(Debug)]
pub struct GameContext {
    state: GameState,
    bird: Bird,
    stream: ObstacleStream,
    base: Base,
    score: u32,
    high_score: HighScore,
    sprites: Sprites,
    rng: StdRng,
}

impl GameContext {
    pub fn new(high_score: HighScore, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        GameContext {
            state: GameState::Menu,
            bird: Bird::new(BIRD_INITIAL_X, BIRD_INITIAL_Y),
            stream: ObstacleStream::new(&mut rng),
            base: Base::new(BASE_Y),
            score: 0,
            high_score,
            sprites: Sprites::new(),
            rng,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn stream(&self) -> &ObstacleStream {
        &self.stream
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn sprites(&self) -> &Sprites {
        &self.sprites
    }

    /// The one input the game knows: starts a run from the menu, flaps while playing.
    pub fn jump(&mut self) {
        match self.state {
            GameState::Menu => self.start(),
            GameState::Playing => self.bird.jump(),
        }
    }

    pub fn tick(&mut self) -> Option<GameEvent> {
        match self.state {
            GameState::Menu => {
                self.base.advance();
                None
            },
            GameState::Playing => self.tick_playing(),
        }
    }

    /// Saves anything the high score record still owes the store.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.high_score.flush() {
            warn!("High score could not be saved on exit: {e:#}");
        }
    }

    fn start(&mut self) {
        self.bird = Bird::new(BIRD_INITIAL_X, BIRD_INITIAL_Y);
        self.stream.reset(&mut self.rng);
        self.score = 0;
        self.state = GameState::Playing;
        info!(high_score = self.high_score.best(), "Game started");
    }

    fn tick_playing(&mut self) -> Option<GameEvent> {
        self.stream.scroll();

        // The bird is tested where it was drawn last frame, before it moves.
        if collision::out_of_bounds(&self.bird) || self.stream.collides(&self.bird, &self.sprites) {
            return Some(self.game_over());
        }

        let passes = self.stream.mark_passes(self.bird.x, &mut self.rng);
        let removed = self.stream.collect_offscreen();
        if removed > 0 {
            debug!(removed, "Dropped off-screen pipes");
        }

        self.bird.advance();
        self.bird.animate();
        self.base.advance();

        if passes > 0 {
            self.score += passes as u32;
            debug!(score = self.score, "Scored");
            return Some(GameEvent::Scored(self.score));
        }
        None
    }

    fn game_over(&mut self) -> GameEvent {
        let score = self.score;
        let new_high_score = self.high_score.submit(score);
        info!(score, new_high_score, "Game over");

        self.score = 0;
        self.state = GameState::Menu;
        GameEvent::GameOver { score, new_high_score }
    }

    #[cfg(test)]
    pub(crate) fn bird_mut(&mut self) -> &mut Bird {
        &mut self.bird
    }

    #[cfg(test)]
    pub(crate) fn stream_mut(&mut self) -> &mut ObstacleStream {
        &mut self.stream
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}
