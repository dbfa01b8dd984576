use color_eyre::eyre::{eyre, Result};
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Layout, Margin},
    prelude::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
    action::{act, Action, Command},
    components::help::Help,
    config::{normalize_key_event, Config, KeyBindings},
    pages::{
        game::{canvas_size, GamePage},
        Page, PageId,
    },
    tui,
};

pub struct App {
    config: Config,
    tick_rate: f64,
    frame_rate: f64,
    should_quit: bool,
    should_suspend: bool,
    show_help: bool,
    pages: Vec<Box<dyn Page>>,
    active_page_index: usize,
}

impl App {
    pub fn new(tick_rate: f64, frame_rate: f64, seed: Option<u64>) -> Result<Self> {
        let config = Config::new()?;
        let game_page = GamePage::new(&config, seed)?;

        Ok(Self {
            tick_rate,
            frame_rate,
            should_quit: false,
            should_suspend: false,
            show_help: false,
            config,
            pages: vec![Box::new(game_page)],
            active_page_index: 0,
        })
    }

    fn get_active_page(&mut self) -> Result<&mut Box<dyn Page>> {
        let index = self.active_page_index;
        self.pages.get_mut(index).ok_or_else(|| eyre!("No page at index {index}"))
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = tui::Tui::new()?;
        tui.tick_rate(self.tick_rate);
        tui.frame_rate(self.frame_rate);
        tui.enter()?;

        for page in self.pages.iter_mut() {
            page.register_keymap(&self.config.keybindings.pages)?;
        }

        for page in self.pages.iter_mut() {
            page.init()?;
        }

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Quit | tui::Event::Closed => action_tx.send(act!(Command::Quit))?,
                    tui::Event::Tick => action_tx.send(act!(Command::Tick))?,
                    tui::Event::Render => action_tx.send(act!(Command::Render))?,
                    tui::Event::Resize(x, y) => action_tx.send(act!(Command::Resize(x, y)))?,
                    tui::Event::Error => action_tx.send(act!(Command::Error("Terminal input failed".to_string())))?,
                    tui::Event::Key(key) => {
                        let page_id = self.get_active_page()?.id();
                        if let Some(action) = lookup_action(&self.config.keybindings, page_id, key) {
                            log::info!("Got action: {action:?}");
                            action_tx.send(action)?;
                        }
                    },
                    _ => {},
                }
                if let Some(action) = self.get_active_page()?.handle_events(Some(e))? {
                    action_tx.send(action)?;
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                let Action { command, .. } = &action;
                if *command != Command::Tick && *command != Command::Render {
                    log::debug!("{command:?}");
                }
                match command {
                    Command::Quit => self.should_quit = true,
                    Command::Suspend => self.should_suspend = true,
                    Command::Resume => self.should_suspend = false,
                    Command::ToggleShowHelp => self.show_help = !self.show_help,
                    Command::Error(message) => log::error!("{message}"),
                    Command::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, *w, *h))?;
                        self.render(&mut tui, &action_tx)?;
                    },
                    Command::Render => {
                        self.render(&mut tui, &action_tx)?;
                    },
                    _ => {},
                }
                // The game stands still while the help overlay is up.
                if !self.show_help {
                    if let Some(action) = self.get_active_page()?.update(action)? {
                        action_tx.send(action)?
                    }
                }
            }
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(act!(Command::Resume))?;
                tui = tui::Tui::new()?;
                tui.tick_rate(self.tick_rate);
                tui.frame_rate(self.frame_rate);
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }

        for page in self.pages.iter_mut() {
            page.shutdown()?;
        }
        tui.exit()?;
        Ok(())
    }

    fn render(&mut self, tui: &mut tui::Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
        let (width, height) = canvas_size(self.config.render);
        let mut draw_error = None;

        tui.draw(|f| {
            let area = f.area();

            // Canvas plus the border around it.
            if area.width < width + 2 || area.height < height + 2 {
                let message = format!(
                    "The terminal is {}x{}, the game needs {}x{}. Enlarge the window or lower the render resolution.",
                    area.width,
                    area.height,
                    width + 2,
                    height + 2
                );
                f.render_widget(Paragraph::new(message).wrap(Wrap { trim: true }), area);
                return;
            }

            let [_, area, _] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(height + 2), Constraint::Fill(1)])
                    .areas(area);
            let [_, area, _] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(width + 2), Constraint::Fill(1)])
                    .areas(area);

            let border = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(Color::Black));
            f.render_widget(border, area);

            let area = area.inner(Margin { horizontal: 1, vertical: 1 });

            if let Some(page) = self.pages.get_mut(self.active_page_index) {
                if let Err(e) = page.draw(f, area) {
                    draw_error = Some(e);
                }
            }

            if self.show_help {
                self.draw_help(f, area);
            };
        })?;

        if let Some(e) = draw_error {
            action_tx.send(act!(Command::Error(format!("Failed to draw: {:?}", e))))?;
        }
        Ok(())
    }

    fn draw_help(&self, f: &mut Frame<'_>, rect: Rect) {
        let Some(page) = self.pages.get(self.active_page_index) else {
            return;
        };
        let page_id = page.id();
        let help = Help::new(vec![
            ("System".to_string(), self.config.keybindings.global.clone()),
            (page_id.to_string(), self.config.keybindings.pages.get(&page_id).cloned().unwrap_or_default()),
        ]);

        f.render_widget(help, rect);
    }
}

/// Global bindings win over the page's own.
fn lookup_action(keybindings: &KeyBindings, page: PageId, key: KeyEvent) -> Option<Action> {
    let key = normalize_key_event(key);
    keybindings
        .global
        .0
        .get(&key)
        .or_else(|| keybindings.pages.get(&page).and_then(|keymap| keymap.0.get(&key)))
        .cloned()
}
