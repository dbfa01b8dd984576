use crate::{
    constants::game::{
        BASE_HEIGHT, BASE_WIDTH, BIRD_SCALE, BIRD_TEXTS, PIPE_HEIGHT, PIPE_INSET, PIPE_RIM_HEIGHT, PIPE_WIDTH,
        TILE_SCALE,
    },
    game::mask::Mask,
};

const TRANSPARENT: char = '.';

/// A grid of palette characters. Transparent texels are stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sprite {
    width: usize,
    height: usize,
    texels: Vec<Option<char>>,
}

impl Sprite {
    /// Builds a sprite from ASCII art, blowing every character up into a `scale` x `scale` block.
    /// Blank lines are skipped and short lines are padded with transparency.
    pub fn from_art(art: &str, scale: usize) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        let columns = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);

        let width = columns * scale;
        let height = lines.len() * scale;
        let mut texels = vec![None; width * height];

        for (row, line) in lines.iter().enumerate() {
            for (column, c) in line.chars().enumerate() {
                if c == TRANSPARENT || c.is_whitespace() {
                    continue;
                }
                for y in row * scale..(row + 1) * scale {
                    for x in column * scale..(column + 1) * scale {
                        texels[y * width + x] = Some(c);
                    }
                }
            }
        }

        Sprite { width, height, texels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn texel(&self, x: i32, y: i32) -> Option<char> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.texels[y as usize * self.width + x as usize]
    }

    pub fn mask(&self) -> Mask {
        let mut mask = Mask::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                mask.set(x, y, self.texels[y * self.width + x].is_some());
            }
        }
        mask
    }

    pub fn flipped_vertical(&self) -> Self {
        let texels = self.texels.chunks(self.width.max(1)).rev().flatten().copied().collect();
        Sprite { texels, ..*self }
    }

    /// Rotates counter-clockwise by `degrees` about the centre. The result grows to fit the rotated
    /// corners, so callers re-centre it on the upright one.
    pub fn rotated(&self, degrees: f32) -> Self {
        if degrees == 0.0 {
            return self.clone();
        }

        let (sin, cos) = degrees.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        let width = (w * cos.abs() + h * sin.abs()).round() as usize;
        let height = (w * sin.abs() + h * cos.abs()).round() as usize;

        let (cx, cy) = (w / 2.0, h / 2.0);
        let (ncx, ncy) = (width as f32 / 2.0, height as f32 / 2.0);

        let mut texels = vec![None; width * height];
        for y in 0..height {
            for x in 0..width {
                let dx = x as f32 + 0.5 - ncx;
                let dy = y as f32 + 0.5 - ncy;
                // Screen y points down, so the inverse of a visual counter-clockwise turn is this.
                let sx = dx * cos - dy * sin + cx;
                let sy = dx * sin + dy * cos + cy;
                texels[y * width + x] = self.texel(sx.floor() as i32, sy.floor() as i32);
            }
        }

        Sprite { width, height, texels }
    }

    fn filled_rect(width: usize, height: usize, c: char) -> Self {
        Sprite { width, height, texels: vec![Some(c); width * height] }
    }

    fn paint(&mut self, x: usize, y: usize, c: Option<char>) {
        if x < self.width && y < self.height {
            self.texels[y * self.width + x] = c;
        }
    }
}

/// Every image the game draws or collides with, loaded once and handed around by reference.
#[derive(Debug, Clone)]
pub struct Sprites {
    pub bird: [Sprite; 3],
    pub bird_masks: [Mask; 3],
    pub pipe_top: Sprite,
    pub pipe_bottom: Sprite,
    pub pipe_top_mask: Mask,
    pub pipe_bottom_mask: Mask,
    pub base: Sprite,
}

impl Sprites {
    pub fn new() -> Self {
        let bird = BIRD_TEXTS.map(|art| Sprite::from_art(art, BIRD_SCALE));
        let bird_masks = [bird[0].mask(), bird[1].mask(), bird[2].mask()];

        let pipe_bottom = pipe_sprite();
        let pipe_top = pipe_bottom.flipped_vertical();

        Sprites {
            bird,
            bird_masks,
            pipe_top_mask: pipe_top.mask(),
            pipe_bottom_mask: pipe_bottom.mask(),
            pipe_top,
            pipe_bottom,
            base: base_sprite(),
        }
    }
}

impl Default for Sprites {
    fn default() -> Self {
        Self::new()
    }
}

// Rim at the top, narrower shaft below it. The top piece is this flipped.
fn pipe_sprite() -> Sprite {
    let (width, height) = (PIPE_WIDTH as usize, PIPE_HEIGHT as usize);
    let rim = PIPE_RIM_HEIGHT as usize;
    let inset = PIPE_INSET as usize;

    let mut sprite = Sprite::filled_rect(width, height, 'g');
    for y in 0..height {
        for x in 0..width {
            let texel = if y < rim {
                if y < TILE_SCALE || y >= rim - TILE_SCALE || x < TILE_SCALE || x >= width - TILE_SCALE {
                    Some('G')
                } else {
                    Some('g')
                }
            } else if x < inset || x >= width - inset {
                None
            } else if x < inset + TILE_SCALE || x >= width - inset - TILE_SCALE {
                Some('G')
            } else {
                Some('g')
            };
            sprite.paint(x, y, texel);
        }
    }
    sprite
}

fn base_sprite() -> Sprite {
    let (width, height) = (BASE_WIDTH as usize, BASE_HEIGHT as usize);
    let mut sprite = Sprite::filled_rect(width, height, 'd');
    for y in 0..2 * TILE_SCALE {
        for x in 0..width {
            // Diagonal stripes along the grass edge make the scrolling visible.
            let stripe = ((x + y) / (2 * TILE_SCALE)) % 2 == 0;
            sprite.paint(x, y, Some(if stripe { 'D' } else { 'g' }));
        }
    }
    sprite
}
