use std::collections::HashMap;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::{
    config::{RenderConfig, Styles},
    constants::game::PALETTE,
    game::sprite::Sprite,
};

const HALF_BLOCK: &str = "▀";

/// Terminal colour for each texel character.
#[derive(Debug, Clone, Default)]
pub struct Palette(HashMap<char, Color>);

impl Palette {
    /// Looks every palette entry up by name; a style without a foreground draws as the terminal
    /// default.
    pub fn from_styles(styles: &Styles) -> Self {
        Palette(
            PALETTE
                .iter()
                .map(|(texel, name)| (*texel, styles.get(*name).and_then(|style| style.fg).unwrap_or(Color::Reset)))
                .collect(),
        )
    }

    pub fn color(&self, texel: char) -> Color {
        self.0.get(&texel).copied().unwrap_or(Color::Reset)
    }
}

struct Layer<'a> {
    sprite: &'a Sprite,
    x: i32,
    y: i32,
}

/// Draws world-space sprites into a terminal area, back to front.
///
/// Every cell covers `cell_width` x `cell_height` design units and shows two samples, one per
/// half of the cell, with an upper half block.
pub struct Scene<'a> {
    palette: &'a Palette,
    sky: Color,
    cell_width: i32,
    cell_height: i32,
    layers: Vec<Layer<'a>>,
}

impl<'a> Scene<'a> {
    pub fn new(palette: &'a Palette, sky: Style, render: RenderConfig) -> Self {
        Scene {
            palette,
            sky: sky.bg.unwrap_or(Color::Reset),
            cell_width: render.cell_width.max(1) as i32,
            cell_height: render.cell_height.max(1) as i32,
            layers: vec![],
        }
    }

    /// Adds a sprite with its top-left corner at (`x`, `y`), above everything added before.
    pub fn sprite(mut self, sprite: &'a Sprite, x: i32, y: i32) -> Self {
        self.layers.push(Layer { sprite, x, y });
        self
    }

    fn sample(&self, x: i32, y: i32) -> Color {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.sprite.texel(x - layer.x, y - layer.y))
            .map(|texel| self.palette.color(texel))
            .unwrap_or(self.sky)
    }
}

impl Widget for Scene<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        for row in 0..area.height {
            let y = row as i32 * self.cell_height;
            let upper = y + self.cell_height / 4;
            let lower = y + self.cell_height * 3 / 4;
            for col in 0..area.width {
                let x = col as i32 * self.cell_width + self.cell_width / 2;
                let (fg, bg) = (self.sample(x, upper), self.sample(x, lower));
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(HALF_BLOCK).set_fg(fg).set_bg(bg);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::parse_style;

    fn palette() -> Palette {
        let mut styles = Styles::default();
        styles.insert("bird".to_string(), parse_style("yellow"));
        styles.insert("pipe".to_string(), parse_style("green"));
        Palette::from_styles(&styles)
    }

    fn render(scene: Scene<'_>, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        scene.render(area, &mut buf);
        buf
    }

    #[test]
    fn test_palette_lookup() {
        let palette = palette();
        assert_eq!(palette.color('y'), Color::Indexed(3));
        assert_eq!(palette.color('g'), Color::Indexed(2));
        // Named in the palette but not styled.
        assert_eq!(palette.color('k'), Color::Reset);
        assert_eq!(palette.color('?'), Color::Reset);
    }

    #[test]
    fn test_empty_scene_is_sky() {
        let palette = palette();
        let scene = Scene::new(&palette, parse_style("on blue"), RenderConfig { cell_width: 4, cell_height: 4 });
        let buf = render(scene, 3, 2);

        for cell in buf.content() {
            assert_eq!(cell.symbol(), HALF_BLOCK);
            assert_eq!(cell.fg, Color::Indexed(4));
            assert_eq!(cell.bg, Color::Indexed(4));
        }
    }

    #[test]
    fn test_sprite_lands_in_its_cells() {
        let palette = palette();
        let sprite = Sprite::from_art("gg\ngg", 4);
        let scene = Scene::new(&palette, parse_style("on blue"), RenderConfig { cell_width: 4, cell_height: 4 })
            .sprite(&sprite, 4, 4);
        let buf = render(scene, 4, 4);

        let green = Color::Indexed(2);
        let blue = Color::Indexed(4);
        assert_eq!(buf[(0, 0)].fg, blue);
        assert_eq!(buf[(1, 1)].fg, green);
        assert_eq!(buf[(2, 2)].bg, green);
        assert_eq!(buf[(3, 1)].fg, blue);
        assert_eq!(buf[(1, 3)].bg, blue);
    }

    #[test]
    fn test_later_sprites_cover_earlier_ones() {
        let palette = palette();
        let pipe = Sprite::from_art("g", 8);
        let bird = Sprite::from_art("y.", 4);
        let scene = Scene::new(&palette, Style::default(), RenderConfig { cell_width: 4, cell_height: 4 })
            .sprite(&pipe, 0, 0)
            .sprite(&bird, 0, 0);
        let buf = render(scene, 2, 1);

        assert_eq!(buf[(0, 0)].fg, Color::Indexed(3));
        // Transparent bird texels let the pipe through.
        assert_eq!(buf[(1, 0)].fg, Color::Indexed(2));
    }

    #[test]
    fn test_half_cells_sample_separately() {
        let palette = palette();
        let sprite = Sprite::from_art("g", 4);
        let scene = Scene::new(&palette, parse_style("on blue"), RenderConfig { cell_width: 4, cell_height: 8 })
            .sprite(&sprite, 0, 0);
        let buf = render(scene, 1, 1);

        assert_eq!(buf[(0, 0)].fg, Color::Indexed(2));
        assert_eq!(buf[(0, 0)].bg, Color::Indexed(4));
    }

    #[test]
    fn test_render_clips_to_buffer() {
        let palette = palette();
        let scene = Scene::new(&palette, parse_style("on blue"), RenderConfig::default());
        let mut buf = Buffer::empty(Rect::new(0, 0, 2, 2));
        scene.render(Rect::new(0, 0, 10, 10), &mut buf);

        assert_eq!(buf.content().len(), 4);
    }
}
