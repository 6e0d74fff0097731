//! Detail view state and the per-section content builders.
//!
//! Each tab has one pure builder from record data to text lines, so the
//! placeholder behavior stays testable without a terminal.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use bgcodex_core::models::{
    text_or_dash, BasicRules, Clarification, Component, GalleryItem, Game, Gameplay,
    VictoryCondition, NOT_SPECIFIED,
};

use crate::app::Theme;

pub const NO_COMPONENTS: &str = "Компоненты не добавлены";
pub const NOT_LISTED: &str = "Не указаны";
pub const NO_PHASES: &str = "Фазы не указаны";
pub const NO_VICTORY: &str = "Условия победы не указаны";
pub const NO_CLARIFICATIONS: &str = "Дополнения не добавлены";
pub const EMPTY_GALLERY: &str = "Галерея пуста";

/// Tabs of the detail view, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Rules,
    Components,
    Gameplay,
    Victory,
    Clarifications,
    Gallery,
}

impl DetailTab {
    pub const ALL: [DetailTab; 6] = [
        DetailTab::Rules,
        DetailTab::Components,
        DetailTab::Gameplay,
        DetailTab::Victory,
        DetailTab::Clarifications,
        DetailTab::Gallery,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DetailTab::Rules => "Правила",
            DetailTab::Components => "Компоненты",
            DetailTab::Gameplay => "Ход игры",
            DetailTab::Victory => "Победа",
            DetailTab::Clarifications => "Дополнения",
            DetailTab::Gallery => "Галерея",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|tab| *tab == self)
            .unwrap_or_default()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        match self {
            DetailTab::Rules => DetailTab::Components,
            DetailTab::Components => DetailTab::Gameplay,
            DetailTab::Gameplay => DetailTab::Victory,
            DetailTab::Victory => DetailTab::Clarifications,
            DetailTab::Clarifications => DetailTab::Gallery,
            DetailTab::Gallery => DetailTab::Rules,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DetailTab::Rules => DetailTab::Gallery,
            DetailTab::Components => DetailTab::Rules,
            DetailTab::Gameplay => DetailTab::Components,
            DetailTab::Victory => DetailTab::Gameplay,
            DetailTab::Clarifications => DetailTab::Victory,
            DetailTab::Gallery => DetailTab::Clarifications,
        }
    }

    /// True when the tab holds a selectable item list instead of plain text.
    pub fn has_items(self) -> bool {
        matches!(self, DetailTab::Clarifications | DetailTab::Gallery)
    }
}

/// State of the open detail view. Holds its own copy of the record so a
/// reload underneath does not mutate the open view.
#[derive(Debug, Clone)]
pub struct DetailState {
    pub game: Game,
    pub tab: DetailTab,
    pub scroll: u16,
    pub item_cursor: usize,
}

impl DetailState {
    /// Opens the view on the rules tab with scroll and cursor reset.
    pub fn new(game: Game) -> Self {
        Self {
            game,
            tab: DetailTab::Rules,
            scroll: 0,
            item_cursor: 0,
        }
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        if self.tab != tab {
            self.tab = tab;
            self.scroll = 0;
            self.item_cursor = 0;
        }
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.tab.next());
    }

    pub fn prev_tab(&mut self) {
        self.select_tab(self.tab.prev());
    }

    /// Number of selectable items on the current tab.
    pub fn item_count(&self) -> usize {
        match self.tab {
            DetailTab::Clarifications => self.game.clarifications.len(),
            DetailTab::Gallery => self.game.gallery.len(),
            _ => 0,
        }
    }

    pub fn move_item_cursor(&mut self, delta: isize) {
        let total = self.item_count();
        if total == 0 {
            self.item_cursor = 0;
            return;
        }
        let len = total as isize;
        let mut idx = self.item_cursor as isize + delta;
        if idx < 0 {
            idx = 0;
        } else if idx >= len {
            idx = len - 1;
        }
        self.item_cursor = idx as usize;
    }

    /// Image reference and lightbox caption for the selected item. The
    /// reference is empty when the item carries no image.
    pub fn selected_image(&self) -> Option<(String, String)> {
        match self.tab {
            DetailTab::Clarifications => {
                self.game.clarifications.get(self.item_cursor).map(|item| {
                    (
                        item.image_url.clone().unwrap_or_default(),
                        item.question.clone(),
                    )
                })
            }
            DetailTab::Gallery => self.game.gallery.get(self.item_cursor).map(|item| {
                (item.image_url.clone().unwrap_or_default(), item.title.clone())
            }),
            _ => None,
        }
    }
}

/// Overlay state for the image lightbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxState {
    pub image: String,
    pub caption: String,
}

impl LightboxState {
    /// Builds the overlay state. An empty image reference yields `None`
    /// and the lightbox stays closed.
    pub fn open(image: &str, caption: &str) -> Option<Self> {
        if image.is_empty() {
            return None;
        }
        Some(Self {
            image: image.to_string(),
            caption: caption.to_string(),
        })
    }
}

/// Detail header: title, description (empty when absent), meta fields.
pub fn header_lines(game: &Game, theme: &Theme) -> Vec<Line<'static>> {
    let meta = game.meta.clone().unwrap_or_default();
    let mut lines = vec![Line::from(Span::styled(
        game.name.clone(),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    ))];

    let description = game.description.as_deref().unwrap_or_default();
    if !description.is_empty() {
        lines.push(Line::from(truncate(description, 120)));
    }

    lines.push(Line::from(vec![
        Span::raw(format!("👥 {}", text_or_dash(meta.players.as_deref()))),
        Span::raw("  "),
        Span::raw(format!("⏱️ {}", text_or_dash(meta.duration.as_deref()))),
        Span::raw("  "),
        Span::raw(format!("Возраст: {}", text_or_dash(meta.age.as_deref()))),
    ]));
    lines.push(Line::from(Span::styled(
        format!("Состав: {}", text_or_dash(meta.components.as_deref())),
        Style::default().fg(theme.muted),
    )));
    lines
}

/// Rules tab: three labelled blocks, each falling back independently.
pub fn rules_lines(rules: Option<&BasicRules>, theme: &Theme) -> Vec<Line<'static>> {
    let rules = rules.cloned().unwrap_or_default();
    let mut lines = Vec::new();
    push_rule_field(&mut lines, "Цель игры", rules.goal.as_deref(), theme);
    lines.push(Line::from(""));
    push_rule_field(&mut lines, "Как победить", rules.how_to_win.as_deref(), theme);
    lines.push(Line::from(""));
    push_rule_field(
        &mut lines,
        "Ключевые механики",
        rules.key_mechanics.as_deref(),
        theme,
    );
    lines
}

fn push_rule_field(
    lines: &mut Vec<Line<'static>>,
    label: &str,
    value: Option<&str>,
    theme: &Theme,
) {
    lines.push(Line::from(Span::styled(
        label.to_string(),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )));
    match value {
        Some(text) if !text.is_empty() => lines.push(Line::from(text.to_string())),
        _ => lines.push(placeholder_line(NOT_SPECIFIED, theme)),
    }
}

/// Components tab: one card per component, document order.
pub fn components_lines(components: &[Component], theme: &Theme) -> Vec<Line<'static>> {
    if components.is_empty() {
        return vec![placeholder_line(NO_COMPONENTS, theme)];
    }

    let mut lines = Vec::new();
    for (index, component) in components.iter().enumerate() {
        if index > 0 {
            lines.push(Line::from(""));
        }
        let glyph = if nonempty(component.image_url.as_deref()).is_some() {
            "🖼"
        } else {
            "📦"
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{glyph} ")),
            Span::styled(
                component.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        if let Some(kind) = nonempty(component.kind.as_deref()) {
            lines.push(Line::from(Span::styled(
                format!("   {kind}"),
                Style::default().fg(theme.muted),
            )));
        }
        lines.push(Line::from(format!("   Кол-во: {}", component.quantity_label())));
        if component.special {
            lines.push(Line::from(Span::styled(
                "   ⭐ Специальная карта".to_string(),
                Style::default().fg(theme.warning),
            )));
        }
        if let Some(description) = nonempty(component.description.as_deref()) {
            lines.push(Line::from(format!("   {description}")));
        }
    }
    lines
}

/// Gameplay tab: setup steps, phases, and strategies rendered
/// independently; one empty sub-section never affects the others.
pub fn gameplay_lines(gameplay: Option<&Gameplay>, theme: &Theme) -> Vec<Line<'static>> {
    let gameplay = gameplay.cloned().unwrap_or_default();
    let mut lines = Vec::new();

    push_section_heading(&mut lines, "Подготовка к игре", theme);
    let steps = gameplay.setup.map(|setup| setup.steps).unwrap_or_default();
    if steps.is_empty() {
        lines.push(placeholder_line(NOT_LISTED, theme));
    } else {
        for (index, step) in steps.iter().enumerate() {
            lines.push(Line::from(format!("{}. {step}", index + 1)));
        }
    }

    lines.push(Line::from(""));
    push_section_heading(&mut lines, "Фазы игры", theme);
    if gameplay.phases.is_empty() {
        lines.push(placeholder_line(NO_PHASES, theme));
    } else {
        for phase in &gameplay.phases {
            lines.push(Line::from(Span::styled(
                format!("• {}", phase.name),
                Style::default()
                    .fg(theme.accent_alt)
                    .add_modifier(Modifier::BOLD),
            )));
            if let Some(description) = nonempty(phase.description.as_deref()) {
                lines.push(Line::from(format!("  {description}")));
            }
        }
    }

    lines.push(Line::from(""));
    push_section_heading(&mut lines, "Стратегии", theme);
    if gameplay.strategies.is_empty() {
        lines.push(placeholder_line(NOT_LISTED, theme));
    } else {
        for tip in &gameplay.strategies {
            lines.push(Line::from(format!("• {tip}")));
        }
    }

    lines
}

/// Victory tab: ordered condition/description pairs.
pub fn victory_lines(conditions: &[VictoryCondition], theme: &Theme) -> Vec<Line<'static>> {
    if conditions.is_empty() {
        return vec![placeholder_line(NO_VICTORY, theme)];
    }

    let mut lines = Vec::new();
    for (index, condition) in conditions.iter().enumerate() {
        if index > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            condition.condition.clone(),
            Style::default()
                .fg(theme.success)
                .add_modifier(Modifier::BOLD),
        )));
        if let Some(description) = nonempty(condition.description.as_deref()) {
            lines.push(Line::from(description.to_string()));
        }
    }
    lines
}

/// Clarifications tab, one card of lines per item; the single placeholder
/// card is returned for an empty section.
pub fn clarification_cards(
    clarifications: &[Clarification],
    theme: &Theme,
) -> Vec<Vec<Line<'static>>> {
    if clarifications.is_empty() {
        return vec![vec![placeholder_line(NO_CLARIFICATIONS, theme)]];
    }

    clarifications
        .iter()
        .map(|item| {
            let mut lines = vec![Line::from(Span::styled(
                format!("❓ {}", item.question),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            if let Some(answer) = nonempty(item.answer.as_deref()) {
                lines.push(Line::from(format!("   {answer}")));
            }
            if let Some(image) = nonempty(item.image_url.as_deref()) {
                lines.push(Line::from(Span::styled(
                    format!("   🖼 {image}"),
                    Style::default().fg(theme.muted),
                )));
            }
            if let Some(solution) = nonempty(item.solution.as_deref()) {
                lines.push(Line::from(Span::styled(
                    format!("   ✓ Решение: {solution}"),
                    Style::default().fg(theme.success),
                )));
            }
            lines.push(Line::from(""));
            lines
        })
        .collect()
}

/// Gallery tab, one card of lines per item.
pub fn gallery_cards(gallery: &[GalleryItem], theme: &Theme) -> Vec<Vec<Line<'static>>> {
    if gallery.is_empty() {
        return vec![vec![placeholder_line(EMPTY_GALLERY, theme)]];
    }

    gallery
        .iter()
        .map(|item| {
            let glyph = if nonempty(item.image_url.as_deref()).is_some() {
                "🖼"
            } else {
                "📸"
            };
            let mut lines = vec![Line::from(vec![
                Span::raw(format!("{glyph} ")),
                Span::styled(
                    item.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])];
            if let Some(description) = nonempty(item.description.as_deref()) {
                lines.push(Line::from(Span::styled(
                    format!("   {description}"),
                    Style::default().fg(theme.muted),
                )));
            }
            if let Some(date) = nonempty(item.date.as_deref()) {
                lines.push(Line::from(Span::styled(
                    format!("   {date}"),
                    Style::default().fg(theme.accent_alt),
                )));
            }
            lines.push(Line::from(""));
            lines
        })
        .collect()
}

/// Lightbox overlay body: caption plus the image reference.
pub fn lightbox_lines(lightbox: &LightboxState, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            lightbox.caption.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("🖼 {}", lightbox.image),
            Style::default().fg(theme.accent),
        )),
    ]
}

pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}

fn push_section_heading(lines: &mut Vec<Line<'static>>, label: &str, theme: &Theme) {
    lines.push(Line::from(Span::styled(
        label.to_string(),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )));
}

fn placeholder_line(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(theme.muted),
    ))
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
