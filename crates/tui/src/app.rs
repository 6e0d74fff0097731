use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use bgcodex_core::{
    catalog::{apply_filters_and_search, COMPLEXITY_ALL},
    models::{text_or_dash, Game},
    CatalogStore,
};

use crate::detail::{self, DetailState, DetailTab, LightboxState};

const TICK_RATE: Duration = Duration::from_millis(250);
const CARD_HEIGHT: usize = 4;
const COMPLEXITY_TAGS: [&str; 4] = [COMPLEXITY_ALL, "easy", "medium", "hard"];

const LOAD_FAILED_NOTICE: &str = "⚠️ Не удалось загрузить игры";
const NO_MATCHES_NOTICE: &str = "Игры не найдены";

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary_fg: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub muted: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            accent_alt: Color::Blue,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            selection_fg: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Browse,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
}

/// Terminal front end over the catalog store.
pub struct CodexApp {
    store: CatalogStore,
    state: UiState,
    screen: Screen,
    detail: Option<DetailState>,
    lightbox: Option<LightboxState>,
    show_help: bool,
    theme: Theme,
}

impl CodexApp {
    pub fn new(store: CatalogStore, load_error: Option<String>) -> Self {
        let mut app = Self {
            store,
            state: UiState::default(),
            screen: Screen::Browse,
            detail: None,
            lightbox: None,
            show_help: false,
            theme: Theme::default(),
        };
        match load_error {
            Some(message) => {
                app.state.load_failed = true;
                app.state.set_status(message);
            }
            None => {
                app.sync_from_store();
                app.state
                    .set_status(format!("Loaded {} games", app.state.filtered.len()));
            }
        }
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event).await {
                break;
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    async fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event).await {
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => true,
            None => false,
        }
    }

    async fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key).await?,
            Event::Resize(_, _) => {}
            Event::Mouse(_) => {}
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
        }
        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.state.should_quit = true;
            return Ok(());
        }
        if self.show_help {
            self.show_help = false;
            return Ok(());
        }
        // overlays eat keys before the screen underneath sees them
        if self.lightbox.is_some() {
            self.handle_lightbox_key(key);
            return Ok(());
        }
        if self.state.mode == Mode::Search {
            self.handle_search_key(key);
            return Ok(());
        }
        match self.screen {
            Screen::Browse => self.handle_browse_key(key).await?,
            Screen::Detail => self.handle_detail_key(key),
        }
        Ok(())
    }

    async fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.state.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1),
            KeyCode::Char('g') if key.modifiers.is_empty() => self.state.move_to(0),
            KeyCode::Char('G') => self.state.move_to_end(),
            KeyCode::Home => self.state.move_to(0),
            KeyCode::End => self.state.move_to_end(),
            KeyCode::PageDown => self.state.page_down(),
            KeyCode::PageUp => self.state.page_up(),
            KeyCode::Char('/') => {
                self.state.mode = Mode::Search;
                self.state.set_status("Enter search text".to_string());
            }
            KeyCode::Tab => self.cycle_complexity(1),
            KeyCode::BackTab => self.cycle_complexity(-1),
            KeyCode::Char(ch @ '1'..='4') if key.modifiers.is_empty() => {
                self.select_complexity_index(ch as usize - '1' as usize);
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reload().await;
            }
            KeyCode::Esc => {
                if !self.state.search.is_empty() {
                    self.state.search.clear();
                    self.state.apply_filter();
                    self.state.set_status("Search cleared".to_string());
                }
            }
            KeyCode::Enter => self.open_selected(),
            _ => {}
        }
        Ok(())
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.close_detail();
                return;
            }
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.close_detail();
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            _ => {}
        }

        let Some(detail) = self.detail.as_mut() else {
            self.screen = Screen::Browse;
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => detail.next_tab(),
            KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => detail.prev_tab(),
            KeyCode::Char(ch @ '1'..='6') if key.modifiers.is_empty() => {
                if let Some(tab) = DetailTab::from_index(ch as usize - '1' as usize) {
                    detail.select_tab(tab);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if detail.tab.has_items() {
                    detail.move_item_cursor(1);
                } else {
                    detail.scroll = detail.scroll.saturating_add(1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if detail.tab.has_items() {
                    detail.move_item_cursor(-1);
                } else {
                    detail.scroll = detail.scroll.saturating_sub(1);
                }
            }
            KeyCode::PageDown => {
                if detail.tab.has_items() {
                    detail.move_item_cursor(5);
                } else {
                    detail.scroll = detail.scroll.saturating_add(10);
                }
            }
            KeyCode::PageUp => {
                if detail.tab.has_items() {
                    detail.move_item_cursor(-5);
                } else {
                    detail.scroll = detail.scroll.saturating_sub(10);
                }
            }
            KeyCode::Enter => {
                if let Some((image, caption)) = detail.selected_image() {
                    if let Some(lightbox) = LightboxState::open(&image, &caption) {
                        info!(image = %lightbox.image, "lightbox opened");
                        self.lightbox = Some(lightbox);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_lightbox_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.lightbox = None,
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.state
                    .set_status(format!("{} games match", self.state.filtered.len()));
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                self.state
                    .set_status(format!("{} games match", self.state.filtered.len()));
            }
            KeyCode::Backspace => {
                self.state.search.pop();
                self.state.apply_filter();
            }
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.state.search.push(ch);
                    self.state.apply_filter();
                }
            }
            _ => {}
        }
    }

    async fn reload(&mut self) {
        match self.store.load().await {
            Ok(count) => {
                self.sync_from_store();
                self.state.set_status(format!("Reloaded {count} games"));
            }
            Err(err) => {
                warn!(error = %err, "catalog reload failed");
                self.state.set_status(format!("Reload failed: {err}"));
            }
        }
    }

    fn sync_from_store(&mut self) {
        self.state.set_games(self.store.games());
    }

    fn cycle_complexity(&mut self, step: isize) {
        let current = COMPLEXITY_TAGS
            .iter()
            .position(|tag| *tag == self.state.complexity)
            .unwrap_or(0);
        let len = COMPLEXITY_TAGS.len() as isize;
        let next = (current as isize + step).rem_euclid(len) as usize;
        self.select_complexity_index(next);
    }

    fn select_complexity_index(&mut self, index: usize) {
        if let Some(tag) = COMPLEXITY_TAGS.get(index) {
            self.state.select_complexity(tag);
            self.state
                .set_status(format!("Filter: {}", complexity_label(tag)));
        }
    }

    fn open_selected(&mut self) {
        if let Some(game) = self.state.current_game() {
            let id = game.id;
            self.open_detail(id);
        }
    }

    fn open_detail(&mut self, id: i64) {
        let Some(game) = self.store.find(id) else {
            debug!(id, "detail requested for unknown id");
            return;
        };
        info!(id, name = %game.name, "detail opened");
        self.detail = Some(DetailState::new(game));
        self.screen = Screen::Detail;
    }

    fn close_detail(&mut self) {
        self.detail = None;
        self.screen = Screen::Browse;
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Browse => self.draw_browse(frame),
            Screen::Detail => self.draw_detail(frame),
        }
        if let Some(lightbox) = &self.lightbox {
            self.render_lightbox(frame, lightbox);
        }
        if self.show_help {
            self.render_help(frame);
        }
    }

    fn draw_browse(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(4),
            ])
            .split(size);

        self.render_filter_bar(frame, layout[0]);
        self.render_card_grid(frame, layout[1]);
        self.render_status(frame, layout[2]);
    }

    fn draw_detail(&mut self, frame: &mut Frame) {
        let Some(detail) = self.detail.as_ref() else {
            return;
        };
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(4),
            ])
            .split(size);

        let header = Paragraph::new(detail::header_lines(&detail.game, &self.theme))
            .block(Block::default().borders(Borders::ALL).title("Об игре"))
            .wrap(Wrap { trim: true });
        frame.render_widget(header, layout[0]);

        let titles: Vec<Line> = DetailTab::ALL
            .iter()
            .map(|tab| Line::from(tab.label()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(detail.tab.index())
            .block(Block::default().borders(Borders::ALL).title("Разделы"))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, layout[1]);

        match detail.tab {
            DetailTab::Rules => self.render_text_tab(
                frame,
                layout[2],
                detail::rules_lines(detail.game.basic_rules.as_ref(), &self.theme),
                detail,
            ),
            DetailTab::Components => self.render_text_tab(
                frame,
                layout[2],
                detail::components_lines(&detail.game.components, &self.theme),
                detail,
            ),
            DetailTab::Gameplay => self.render_text_tab(
                frame,
                layout[2],
                detail::gameplay_lines(detail.game.gameplay.as_ref(), &self.theme),
                detail,
            ),
            DetailTab::Victory => self.render_text_tab(
                frame,
                layout[2],
                detail::victory_lines(&detail.game.victory, &self.theme),
                detail,
            ),
            DetailTab::Clarifications => self.render_item_tab(
                frame,
                layout[2],
                detail::clarification_cards(&detail.game.clarifications, &self.theme),
                detail,
            ),
            DetailTab::Gallery => self.render_item_tab(
                frame,
                layout[2],
                detail::gallery_cards(&detail.game.gallery, &self.theme),
                detail,
            ),
        }

        self.render_detail_status(frame, layout[3]);
    }

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = COMPLEXITY_TAGS
            .iter()
            .map(|tag| Line::from(complexity_label(tag)))
            .collect();
        let selected = COMPLEXITY_TAGS
            .iter()
            .position(|tag| *tag == self.state.complexity)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .block(Block::default().borders(Borders::ALL).title("Сложность"))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn render_card_grid(&mut self, frame: &mut Frame, area: Rect) {
        let rows = (area.height.saturating_sub(2) as usize / CARD_HEIGHT).max(1);
        self.state.list_height = rows;
        self.state.clamp_cursor();
        self.state.ensure_cursor_visible();

        let block = Block::default().borders(Borders::ALL).title("Игры");

        if let Some(notice) = self.state.grid_notice() {
            let style = if self.state.load_failed {
                Style::default().fg(self.theme.danger)
            } else {
                Style::default().fg(self.theme.muted)
            };
            let paragraph = Paragraph::new(Line::from(Span::styled(notice.to_string(), style)))
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }

        let mut list_state = ListState::default();
        let games = self.state.visible_games(rows);
        if !games.is_empty() {
            let selected = self
                .state
                .cursor
                .saturating_sub(self.state.offset)
                .min(games.len().saturating_sub(1));
            list_state.select(Some(selected));
        }
        let width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = games
            .iter()
            .enumerate()
            .map(|(idx, game)| {
                let global_index = self.state.offset + idx;
                let is_selected = self.state.cursor == global_index;
                ListItem::new(card_lines(game, is_selected, width, &self.theme))
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(self.theme.selection_bg)
                .fg(self.theme.selection_fg),
        );
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = if self.state.mode == Mode::Search {
            format!("Search: {}", self.state.search)
        } else {
            self.state.status.clone()
        };
        let mut secondary = format!(
            "{} of {} games • filter: {}",
            self.state.filtered.len(),
            self.state.all_games.len(),
            complexity_label(&self.state.complexity),
        );
        if self.store.source().is_remote() {
            if let Some(fetched) = self
                .store
                .manifest()
                .and_then(|manifest| manifest.fetched_at)
            {
                let local = fetched.with_timezone(&Local);
                secondary.push_str(&format!(" • fetched {}", local.format("%Y-%m-%d %H:%M")));
            }
        }
        secondary.push_str(" • / search  Tab filter  Enter open  ? help");
        let paragraph = Paragraph::new(vec![Line::from(primary), Line::from(secondary)])
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_detail_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let secondary = "Tab/1-6 sections • j/k scroll • Enter image • Esc back";
        let paragraph = Paragraph::new(vec![
            Line::from(self.state.status.clone()),
            Line::from(secondary),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_text_tab(
        &self,
        frame: &mut Frame,
        area: Rect,
        lines: Vec<Line<'static>>,
        detail: &DetailState,
    ) {
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(detail.tab.label()),
            )
            .wrap(Wrap { trim: false })
            .scroll((detail.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_item_tab(
        &self,
        frame: &mut Frame,
        area: Rect,
        cards: Vec<Vec<Line<'static>>>,
        detail: &DetailState,
    ) {
        let mut list_state = ListState::default();
        if detail.item_count() > 0 {
            list_state.select(Some(detail.item_cursor.min(cards.len().saturating_sub(1))));
        }
        let items: Vec<ListItem> = cards.into_iter().map(ListItem::new).collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(detail.tab.label()),
            )
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_lightbox(&self, frame: &mut Frame, lightbox: &LightboxState) {
        let area = frame.size();
        let inner = lightbox.image.chars().count().min(100) as u16;
        let width = (inner + 8).max(40).min(area.width.saturating_sub(4).max(20));
        let rect = centered_rect(width, 7, area);
        frame.render_widget(Clear, rect);

        let mut lines = detail::lightbox_lines(lightbox, &self.theme);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Esc close",
            Style::default().fg(self.theme.muted),
        )));
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("📸 Просмотр"))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, rect);
    }

    fn render_help(&self, frame: &mut Frame) {
        let area = frame.size();
        let rect = centered_rect(52, 17, area);
        frame.render_widget(Clear, rect);

        let heading = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(Span::styled("Browse", heading)),
            Line::from("  j/k ↓/↑        move between cards"),
            Line::from("  g/G Home/End   first / last card"),
            Line::from("  /              search by name or description"),
            Line::from("  Tab, 1-4       complexity filter"),
            Line::from("  Enter          open game"),
            Line::from("  Ctrl+R         reload catalog"),
            Line::from(""),
            Line::from(Span::styled("Detail", heading)),
            Line::from("  Tab/h/l, 1-6   switch section"),
            Line::from("  j/k            scroll or pick item"),
            Line::from("  Enter          open image"),
            Line::from("  Esc            close top layer"),
            Line::from(""),
            Line::from("  q quit • ? help"),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, rect);
    }
}

fn card_lines(game: &Game, selected: bool, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let marker = if selected {
        Span::styled(
            "▶ ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw("  ")
    };
    let glyph = if game
        .cover_image
        .as_deref()
        .is_some_and(|image| !image.is_empty())
    {
        "🖼"
    } else {
        "🎲"
    };
    let name = Span::styled(
        format!("{glyph} {}", game.name),
        Style::default()
            .fg(theme.primary_fg)
            .add_modifier(Modifier::BOLD),
    );

    let meta = game.meta.clone().unwrap_or_default();
    let description = detail::truncate(game.card_description(), width.max(8));

    let mut meta_spans = vec![Span::raw(format!(
        "  👥 {}  ⏱️ {}",
        text_or_dash(meta.players.as_deref()),
        text_or_dash(meta.duration.as_deref())
    ))];
    if let Some(tag) = meta.complexity.as_deref().filter(|tag| !tag.is_empty()) {
        meta_spans.push(Span::styled(
            format!("  {}", complexity_label(tag)),
            Style::default().fg(theme.accent_alt),
        ));
    }

    vec![
        Line::from(vec![marker, name]),
        Line::from(Span::styled(
            format!("  {description}"),
            Style::default().fg(theme.muted),
        )),
        Line::from(meta_spans),
        Line::from(""),
    ]
}

fn complexity_label(tag: &str) -> &str {
    match tag {
        COMPLEXITY_ALL => "Все",
        "easy" => "Лёгкие",
        "medium" => "Средние",
        "hard" => "Сложные",
        other => other,
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    all_games: Vec<Game>,
    filtered: Vec<Game>,
    cursor: usize,
    offset: usize,
    list_height: usize,
    complexity: String,
    search: String,
    status: String,
    mode: Mode,
    should_quit: bool,
    load_failed: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            all_games: Vec::new(),
            filtered: Vec::new(),
            cursor: 0,
            offset: 0,
            list_height: 1,
            complexity: COMPLEXITY_ALL.to_string(),
            search: String::new(),
            status: String::new(),
            mode: Mode::Browse,
            should_quit: false,
            load_failed: false,
        }
    }
}

impl UiState {
    fn set_games(&mut self, games: Vec<Game>) {
        self.all_games = games;
        self.load_failed = false;
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        self.filtered = apply_filters_and_search(&self.all_games, &self.complexity, &self.search);
        self.cursor = 0;
        self.offset = 0;
    }

    fn select_complexity(&mut self, tag: &str) {
        self.complexity = tag.to_string();
        self.apply_filter();
    }

    fn grid_notice(&self) -> Option<&'static str> {
        if self.load_failed {
            Some(LOAD_FAILED_NOTICE)
        } else if self.filtered.is_empty() {
            Some(NO_MATCHES_NOTICE)
        } else {
            None
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let len = self.filtered.len() as isize;
        let mut idx = self.cursor as isize + delta;
        if idx < 0 {
            idx = 0;
        } else if idx >= len {
            idx = len - 1;
        }
        self.cursor = idx as usize;
        self.ensure_cursor_visible();
    }

    fn move_to(&mut self, index: usize) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = index.min(self.filtered.len() - 1);
        self.ensure_cursor_visible();
    }

    fn move_to_end(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = self.filtered.len() - 1;
        self.ensure_cursor_visible();
    }

    fn page_down(&mut self) {
        if self.filtered.is_empty() || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(self.filtered.len());
        self.move_cursor(delta as isize);
    }

    fn page_up(&mut self) {
        if self.filtered.is_empty() || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(self.filtered.len());
        self.move_cursor(-(delta as isize));
    }

    fn visible_games(&self, height: usize) -> &[Game] {
        if self.filtered.is_empty() {
            return &[];
        }
        let end = (self.offset + height).min(self.filtered.len());
        &self.filtered[self.offset..end]
    }

    fn current_game(&self) -> Option<&Game> {
        self.filtered.get(self.cursor)
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn clamp_cursor(&mut self) {
        if self.filtered.is_empty() {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len() - 1;
        }
    }

    fn ensure_cursor_visible(&mut self) {
        if self.filtered.is_empty() || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = self.filtered.len().saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgcodex_core::CatalogSource;
    use serde_json::json;

    const SAMPLE: &str = r#"[
        {
            "id": 1,
            "name": "Каркассон",
            "description": "Тайлы и дороги",
            "meta": { "complexity": "easy", "players": "2-5" },
            "gallery": [{ "title": "Старт" }]
        },
        {
            "id": 2,
            "name": "Терраформирование Марса",
            "meta": { "complexity": "hard" }
        }
    ]"#;

    async fn loaded_app() -> (tempfile::TempDir, CodexApp) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("games.json");
        std::fs::write(&path, SAMPLE).expect("write sample");
        let store = CatalogStore::new(CatalogSource::File(path), dir.path().join("cache"));
        store.load().await.expect("load sample");
        let app = CodexApp::new(store, None);
        (dir, app)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample_games(count: usize) -> Vec<Game> {
        (0..count)
            .map(|index| Game {
                id: index as i64,
                name: format!("Игра {index}"),
                ..Game::default()
            })
            .collect()
    }

    #[test]
    fn filter_and_search_reset_the_cursor() {
        let mut state = UiState::default();
        state.set_games(sample_games(6));
        state.cursor = 4;

        state.select_complexity("easy");
        assert_eq!(state.cursor, 0);
        assert!(state.filtered.is_empty());

        state.select_complexity(COMPLEXITY_ALL);
        assert_eq!(state.filtered.len(), 6);
    }

    #[test]
    fn grid_notice_prefers_load_failure() {
        let mut state = UiState::default();
        state.load_failed = true;
        assert_eq!(state.grid_notice(), Some(LOAD_FAILED_NOTICE));

        state.set_games(Vec::new());
        assert_eq!(state.grid_notice(), Some(NO_MATCHES_NOTICE));

        state.set_games(sample_games(1));
        assert_eq!(state.grid_notice(), None);
    }

    #[test]
    fn cursor_stays_within_the_visible_window() {
        let mut state = UiState::default();
        state.set_games(sample_games(10));
        state.list_height = 3;

        state.move_cursor(5);
        assert_eq!(state.cursor, 5);
        assert_eq!(state.offset, 3);
        assert_eq!(state.visible_games(3).len(), 3);

        state.move_to(0);
        assert_eq!(state.offset, 0);

        state.move_to_end();
        assert_eq!(state.cursor, 9);
        assert_eq!(state.offset, 7);
    }

    #[test]
    fn card_lines_substitute_placeholders() {
        let game: Game = serde_json::from_value(json!({ "id": 7, "name": "Уно" })).unwrap();
        let lines = card_lines(&game, false, 40, &Theme::default());
        let text: Vec<String> = lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect();
        assert_eq!(text[0], "  🎲 Уно");
        assert!(text[1].contains("Описание отсутствует"));
        assert!(text[2].contains("👥 —"));
        assert!(text[2].contains("⏱️ —"));
    }

    #[test]
    fn card_lines_tag_the_complexity() {
        let game: Game = serde_json::from_value(json!({
            "id": 8,
            "name": "Брасс",
            "meta": { "complexity": "hard" }
        }))
        .unwrap();
        let lines = card_lines(&game, false, 40, &Theme::default());
        let meta_row: String = lines[2]
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert!(meta_row.ends_with("Сложные"));

        let plain: Game = serde_json::from_value(json!({ "id": 9, "name": "Дженга" })).unwrap();
        let lines = card_lines(&plain, false, 40, &Theme::default());
        assert_eq!(lines[2].spans.len(), 1);
    }

    #[tokio::test]
    async fn open_detail_ignores_unknown_ids() {
        let (_dir, mut app) = loaded_app().await;

        app.open_detail(99);
        assert!(app.detail.is_none());
        assert_eq!(app.screen, Screen::Browse);

        app.open_detail(1);
        let detail = app.detail.as_ref().expect("detail open");
        assert_eq!(detail.game.name, "Каркассон");
        assert_eq!(detail.tab, DetailTab::Rules);
        assert_eq!(app.screen, Screen::Detail);
    }

    #[tokio::test]
    async fn reopening_a_game_resets_the_active_tab() {
        let (_dir, mut app) = loaded_app().await;

        app.open_detail(1);
        app.detail.as_mut().unwrap().select_tab(DetailTab::Gallery);
        app.close_detail();

        app.open_detail(1);
        assert_eq!(app.detail.as_ref().unwrap().tab, DetailTab::Rules);
    }

    #[tokio::test]
    async fn escape_closes_topmost_layer_only() {
        let (_dir, mut app) = loaded_app().await;
        app.open_detail(1);
        app.lightbox = LightboxState::open("img/board.png", "Поле");
        assert!(app.lightbox.is_some());

        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert!(app.lightbox.is_none());
        assert!(app.detail.is_some());
        assert_eq!(app.screen, Screen::Detail);

        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert!(app.detail.is_none());
        assert_eq!(app.screen, Screen::Browse);
    }

    #[tokio::test]
    async fn enter_without_an_image_keeps_the_lightbox_closed() {
        let (_dir, mut app) = loaded_app().await;
        app.open_detail(1);
        app.detail.as_mut().unwrap().select_tab(DetailTab::Gallery);

        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert!(app.lightbox.is_none());
    }

    #[tokio::test]
    async fn search_filters_on_every_keystroke() {
        let (_dir, mut app) = loaded_app().await;
        assert_eq!(app.state.filtered.len(), 2);

        app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
        app.handle_key(key(KeyCode::Char('т'))).await.unwrap();
        app.handle_key(key(KeyCode::Char('е'))).await.unwrap();
        assert_eq!(app.state.filtered.len(), 1);
        assert_eq!(app.state.filtered[0].name, "Терраформирование Марса");

        // leaving search mode keeps the query applied
        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state.mode, Mode::Browse);
        assert_eq!(app.state.search, "те");
        assert_eq!(app.state.filtered.len(), 1);

        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert!(app.state.search.is_empty());
        assert_eq!(app.state.filtered.len(), 2);
    }

    #[tokio::test]
    async fn complexity_keys_select_and_cycle() {
        let (_dir, mut app) = loaded_app().await;

        app.handle_key(key(KeyCode::Char('2'))).await.unwrap();
        assert_eq!(app.state.complexity, "easy");
        assert_eq!(app.state.filtered.len(), 1);
        assert_eq!(app.state.filtered[0].name, "Каркассон");

        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.state.complexity, "medium");
        assert_eq!(app.state.grid_notice(), Some(NO_MATCHES_NOTICE));

        app.handle_key(key(KeyCode::BackTab)).await.unwrap();
        assert_eq!(app.state.complexity, "easy");
    }
}
