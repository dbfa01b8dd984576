use crate::constants::game::{BASE_VELOCITY, BASE_WIDTH};

/// Looping ground strip made of two copies of the same tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base {
    pub y: i32,
    pub x1: i32,
    pub x2: i32,
}

impl Base {
    pub fn new(y: i32) -> Self {
        Base { y, x1: 0, x2: BASE_WIDTH }
    }

    pub fn advance(&mut self) {
        self.x1 -= BASE_VELOCITY;
        self.x2 -= BASE_VELOCITY;

        // A tile that left the screen is queued up behind the other one.
        if self.x1 + BASE_WIDTH < 0 {
            self.x1 = self.x2 + BASE_WIDTH;
        }
        if self.x2 + BASE_WIDTH < 0 {
            self.x2 = self.x1 + BASE_WIDTH;
        }
    }
}
