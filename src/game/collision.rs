use crate::{
    constants::game::{CEILING_Y, FLOOR_Y},
    game::{bird::Bird, pipe::Pipe, sprite::Sprites},
};

/// Pixel-accurate test of the bird's current wing frame against both pieces of a pipe.
///
/// The bird is tested unrotated, at its rounded position.
pub fn collides(bird: &Bird, pipe: &Pipe, sprites: &Sprites) -> bool {
    let bird_mask = &sprites.bird_masks[bird.frame()];
    let bird_y = bird.y.round() as i32;

    let top_offset = (pipe.x - bird.x, pipe.top_y() - bird_y);
    let bottom_offset = (pipe.x - bird.x, pipe.bottom_y() - bird_y);

    bird_mask.overlaps(&sprites.pipe_bottom_mask, bottom_offset)
        || bird_mask.overlaps(&sprites.pipe_top_mask, top_offset)
}

/// Leaving the playfield through the ceiling or into the ground ends the run like a crash.
pub fn out_of_bounds(bird: &Bird) -> bool {
    bird.y < CEILING_Y || bird.y > FLOOR_Y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::game::{BIRD_HEIGHT, BIRD_WIDTH, PIPE_GAP, PIPE_INSET, PIPE_WIDTH};

    fn bird_at(x: i32, y: f32) -> Bird {
        Bird::new(x, y)
    }

    #[test]
    fn test_bird_inside_gap_is_safe() {
        let sprites = Sprites::new();
        let pipe = Pipe::with_gap(200, 300);
        let bird = bird_at(230, (300 + (PIPE_GAP - BIRD_HEIGHT) / 2) as f32);

        assert!(!collides(&bird, &pipe, &sprites));
    }

    #[test]
    fn test_bird_hits_top_and_bottom_pieces() {
        let sprites = Sprites::new();
        let pipe = Pipe::with_gap(200, 300);

        assert!(collides(&bird_at(230, 280.0), &pipe, &sprites));
        assert!(collides(&bird_at(230, 480.0), &pipe, &sprites));
    }

    #[test]
    fn test_far_away_pipe_never_collides() {
        let sprites = Sprites::new();
        let pipe = Pipe::with_gap(700, 300);

        for y in (0..750).step_by(10) {
            assert!(!collides(&bird_at(230, y as f32), &pipe, &sprites));
        }
    }

    #[test]
    fn test_box_overlap_without_opaque_overlap() {
        let sprites = Sprites::new();
        // Below the rim the shaft is inset, so a bird whose box only reaches into the inset
        // columns touches nothing even though the boxes intersect.
        let pipe = Pipe::with_gap(0, 300);
        let x = -BIRD_WIDTH + PIPE_INSET;
        let bird = bird_at(x, (pipe.bottom_y() + 100) as f32);

        let bounding_boxes_touch = x + BIRD_WIDTH > pipe.x && x < pipe.x + PIPE_WIDTH;
        assert!(bounding_boxes_touch);
        assert!(!collides(&bird, &pipe, &sprites));
    }

    #[test]
    fn test_bounds() {
        assert!(out_of_bounds(&bird_at(230, -1.0)));
        assert!(out_of_bounds(&bird_at(230, 750.5)));
        assert!(!out_of_bounds(&bird_at(230, 0.0)));
        assert!(!out_of_bounds(&bird_at(230, 750.0)));
    }
}
