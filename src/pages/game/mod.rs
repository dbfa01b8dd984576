use std::collections::HashMap;

use color_eyre::eyre::Result;
use derive_builder::Builder;
use ratatui::{layout::Rect, style::Style, Frame};
use tracing::{debug, info};

use super::{Page, PageId};
use crate::{
    action::{Action, ActionState, Command, GameAction},
    components::{
        multiline::MultiLine,
        scene::{Palette, Scene},
    },
    config::{key_event_to_string, Config, PageKeyBindings, RenderConfig, Styles},
    constants::{
        game::{WORLD_HEIGHT, WORLD_WIDTH},
        TITLE_TEXT,
    },
    game::{GameContext, GameEvent, GameState},
    highscore::{FileStore, HighScore},
};

// Rows of the menu, in world units.
const TITLE_Y: i32 = 48;
const LAST_SCORE_Y: i32 = 520;
const HINT_Y: i32 = 568;

/// Terminal cells needed to show the whole world at the configured resolution.
pub fn canvas_size(render: RenderConfig) -> (u16, u16) {
    let (cell_width, cell_height) = (render.cell_width.max(1) as i32, render.cell_height.max(1) as i32);
    let width = (WORLD_WIDTH + cell_width - 1) / cell_width;
    let height = (WORLD_HEIGHT + cell_height - 1) / cell_height;
    (width as u16, height as u16)
}

#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct GamePage {
    #[builder(default)]
    keymap: PageKeyBindings,
    context: GameContext,
    #[builder(default)]
    palette: Palette,
    #[builder(default)]
    styles: Styles,
    #[builder(default)]
    render: RenderConfig,
    #[builder(default)]
    last_score: Option<u32>,
}

impl GamePage {
    pub fn new(config: &Config, seed: Option<u64>) -> Result<Self> {
        let store = FileStore::new(config.highscore_path());
        info!(path = %store.path().display(), "Loading high score");
        let context = GameContext::new(HighScore::load(Box::new(store)), seed);

        Ok(GamePageBuilder::default()
            .context(context)
            .palette(Palette::from_styles(&config.styles))
            .styles(config.styles.clone())
            .render(config.render)
            .build()?)
    }

    pub fn context(&self) -> &GameContext {
        &self.context
    }

    fn style(&self, name: &str) -> Style {
        self.styles.get(name).copied().unwrap_or_default()
    }

    /// One-row strip across `rect` at world height `y`, or `None` once that is below the area.
    fn row(&self, rect: Rect, y: i32, height: u16) -> Option<Rect> {
        let row = (y / self.render.cell_height.max(1) as i32) as u16;
        if row + height > rect.height {
            return None;
        }
        Some(Rect { y: rect.y + row, height, ..rect })
    }

    fn jump_keys(&self) -> String {
        let mut keys: Vec<String> = self
            .keymap
            .0
            .iter()
            .filter(|(_, action)| action.command == Command::Game(GameAction::Jump))
            .filter(|(_, action)| action.state == ActionState::Start)
            .map(|(key, _)| key_event_to_string(key))
            .collect();
        keys.sort();
        keys.join("/")
    }

    fn draw_world(&self, f: &mut Frame<'_>, rect: Rect) {
        let ctx = &self.context;
        let sprites = ctx.sprites();
        let bird = ctx.bird();

        // Rotation grows the image, so keep it centred on where the upright bird would be.
        let upright = &sprites.bird[bird.frame()];
        let rotated = upright.rotated(bird.tilt());
        let bird_x = bird.x + (upright.width() as i32 - rotated.width() as i32) / 2;
        let bird_y = bird.y.round() as i32 + (upright.height() as i32 - rotated.height() as i32) / 2;

        let mut scene = Scene::new(&self.palette, self.style("sky"), self.render);
        for pipe in ctx.stream().pipes() {
            scene = scene
                .sprite(&sprites.pipe_top, pipe.x, pipe.top_y())
                .sprite(&sprites.pipe_bottom, pipe.x, pipe.bottom_y());
        }
        let base = ctx.base();
        scene = scene.sprite(&sprites.base, base.x1, base.y).sprite(&sprites.base, base.x2, base.y);
        scene = scene.sprite(&rotated, bird_x, bird_y);

        f.render_widget(scene, rect);
    }

    fn draw_hud(&self, f: &mut Frame<'_>, rect: Rect) {
        let text = self.style("text");
        let high_score = format!("High Score: {}", self.context.high_score());
        let score = format!("Score: {}", self.context.score());

        let left = Rect { x: rect.x + 1, y: rect.y, width: high_score.len() as u16, height: 1 };
        let right_x = (rect.x + rect.width).saturating_sub(score.len() as u16 + 1);
        let right = Rect { x: right_x, y: rect.y, width: score.len() as u16, height: 1 };

        f.render_widget(MultiLine::new(vec![high_score]).style(text), left.intersection(rect));
        f.render_widget(MultiLine::new(vec![score]).style(text), right.intersection(rect));
    }

    fn draw_menu(&self, f: &mut Frame<'_>, rect: Rect) {
        let text = self.style("text");
        let title: Vec<&str> = TITLE_TEXT.lines().filter(|line| !line.trim().is_empty()).collect();
        let title_height = title.len() as u16;

        if let Some(area) = self.row(rect, TITLE_Y, title_height) {
            f.render_widget(MultiLine::new(title).ignore_whitespace(true).style(text), area);
            let high_score_y = TITLE_Y + (title_height as i32 + 1) * self.render.cell_height as i32;
            if let Some(area) = self.row(rect, high_score_y, 1) {
                let line = format!("High Score: {}", self.context.high_score());
                f.render_widget(MultiLine::new(vec![line]).style(text), area);
            }
        }
        if let (Some(score), Some(area)) = (self.last_score, self.row(rect, LAST_SCORE_Y, 1)) {
            f.render_widget(MultiLine::new(vec![format!("Score: {score}")]).style(text), area);
        }
        if let Some(area) = self.row(rect, HINT_Y, 1) {
            let hint = format!("Press {} to flap", self.jump_keys());
            f.render_widget(MultiLine::new(vec![hint]).style(text), area);
        }
    }
}

impl Page for GamePage {
    fn id(&self) -> PageId {
        PageId::Game
    }

    fn register_keymap(&mut self, keymaps: &HashMap<PageId, PageKeyBindings>) -> Result<()> {
        if let Some(keymap) = keymaps.get(&self.id()) {
            self.keymap = keymap.clone();
        }
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action.command {
            Command::Tick => match self.context.tick() {
                Some(GameEvent::GameOver { score, new_high_score }) => {
                    debug!(score, new_high_score, "Back to the menu");
                    self.last_score = Some(score);
                },
                Some(GameEvent::Scored(_)) | None => {},
            },
            // Holding the key down must not keep flapping.
            Command::Game(GameAction::Jump) if action.state == ActionState::Start => self.context.jump(),
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        self.draw_world(f, rect);
        match self.context.state() {
            GameState::Menu => self.draw_menu(f, rect),
            GameState::Playing => self.draw_hud(f, rect),
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.context.shutdown();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use super::*;
    use crate::{action::act, config::parse_style, highscore::tests::MemoryStore};

    fn page(store: &MemoryStore) -> GamePage {
        let mut styles = Styles::default();
        styles.insert("sky".to_string(), parse_style("on blue"));
        styles.insert("text".to_string(), parse_style("bold white"));
        styles.insert("pipe".to_string(), parse_style("green"));

        let context = GameContext::new(HighScore::load(Box::new(store.clone())), Some(7));
        let mut keymap = HashMap::new();
        keymap.insert(
            crossterm::event::KeyEvent::from(crossterm::event::KeyCode::Char(' ')),
            act!(Command::Game(GameAction::Jump)),
        );

        GamePageBuilder::default()
            .context(context)
            .palette(Palette::from_styles(&styles))
            .styles(styles)
            .keymap(PageKeyBindings(keymap))
            .build()
            .unwrap()
    }

    fn draw(page: &mut GamePage) -> Buffer {
        let (width, height) = canvas_size(RenderConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| page.draw(f, f.area()).unwrap()).unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_canvas_size() {
        assert_eq!(canvas_size(RenderConfig::default()), (48, 43));
        assert_eq!(canvas_size(RenderConfig { cell_width: 8, cell_height: 16 }), (72, 64));
    }

    #[test]
    fn test_jump_and_tick_drive_the_game() {
        let store = MemoryStore::default();
        let mut page = page(&store);
        assert_eq!(page.context().state(), GameState::Menu);

        let mut held = act!(Command::Game(GameAction::Jump));
        held.state = ActionState::Repeat;
        page.update(held).unwrap();
        assert_eq!(page.context().state(), GameState::Menu);

        page.update(act!(Command::Game(GameAction::Jump))).unwrap();
        assert_eq!(page.context().state(), GameState::Playing);

        let x = page.context().stream().pipes()[0].x;
        page.update(act!(Command::Tick)).unwrap();
        assert!(page.context().stream().pipes()[0].x < x);
    }

    #[test]
    fn test_crash_returns_to_menu_with_last_score() {
        let store = MemoryStore::default();
        let mut page = page(&store);
        page.update(act!(Command::Game(GameAction::Jump))).unwrap();

        let mut ticks = 0;
        while page.context().state() == GameState::Playing {
            page.update(act!(Command::Tick)).unwrap();
            ticks += 1;
            assert!(ticks < 200);
        }

        assert_eq!(page.last_score, Some(0));
        assert!(text(&draw(&mut page)).contains("Score: 0"));
    }

    #[test]
    fn test_menu_shows_high_score_and_hint() {
        let store = MemoryStore::with_value(12);
        let mut page = page(&store);
        let screen = text(&draw(&mut page));

        assert!(screen.contains("High Score: 12"));
        assert!(screen.contains("Press Space to flap"));
        assert!(!screen.contains("Score: 0"));
    }

    #[test]
    fn test_hud_while_playing() {
        let store = MemoryStore::with_value(3);
        let mut page = page(&store);
        page.update(act!(Command::Game(GameAction::Jump))).unwrap();
        let buf = draw(&mut page);
        let first_row = text(&buf).lines().next().unwrap_or_default().to_string();

        assert!(first_row.starts_with("▀High Score: 3"));
        assert!(first_row.ends_with("Score: 0▀"));
    }

    #[test]
    fn test_world_is_painted() {
        let store = MemoryStore::default();
        let mut page = page(&store);
        let buf = draw(&mut page);

        // Sky in the corner, and the text style never leaks into it.
        assert_eq!(buf[(0, 20)].bg, ratatui::style::Color::Indexed(4));
        assert_eq!(buf[(0, 20)].symbol(), "▀");
    }

    #[test]
    fn test_shutdown_flushes_pending_high_score() {
        let store = MemoryStore::default();
        store.inner.borrow_mut().fail_writes = true;
        let mut page = page(&store);
        page.update(act!(Command::Game(GameAction::Jump))).unwrap();
        page.context.set_score(4);
        page.context.bird_mut().y = -1.0;
        page.update(act!(Command::Tick)).unwrap();
        assert_eq!(page.last_score, Some(4));
        assert!(store.inner.borrow().writes.is_empty());

        store.inner.borrow_mut().fail_writes = false;
        page.shutdown().unwrap();
        assert_eq!(store.inner.borrow().writes, vec![4]);
    }
}
