//! Catalog record models.
//!
//! Field names follow the catalog JSON document. Optional fields fall back
//! to fixed placeholder strings at render time; the field-level
//! substitutions live here so they stay testable without a terminal.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for a missing metadata value.
pub const DASH: &str = "—";

/// Placeholder for a missing basic-rules field.
pub const NOT_SPECIFIED: &str = "Не указано";

/// Placeholder for a record without a description.
pub const NO_DESCRIPTION: &str = "Описание отсутствует";

/// Substitutes the dash placeholder for an absent or empty value.
pub fn text_or_dash(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => DASH,
    }
}

/// A single catalog record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Game {
    /// Unique numeric identifier; the detail view looks records up by it.
    pub id: i64,
    /// Game title.
    pub name: String,
    /// Short description shown on the card and in the detail header.
    #[serde(default)]
    pub description: Option<String>,
    /// Cover image reference.
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Summary metadata block.
    #[serde(default)]
    pub meta: Option<GameMeta>,
    /// Basic rules section.
    #[serde(default)]
    pub basic_rules: Option<BasicRules>,
    /// Component list, document order preserved.
    #[serde(default)]
    pub components: Vec<Component>,
    /// Gameplay section: setup, phases, strategy tips.
    #[serde(default)]
    pub gameplay: Option<Gameplay>,
    /// Victory conditions, document order preserved.
    #[serde(default)]
    pub victory: Vec<VictoryCondition>,
    /// Rule clarifications, document order preserved.
    #[serde(default)]
    pub clarifications: Vec<Clarification>,
    /// Photo gallery, document order preserved.
    #[serde(default)]
    pub gallery: Vec<GalleryItem>,
}

impl Game {
    /// Card description with the placeholder applied.
    pub fn card_description(&self) -> &str {
        match self.description.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => NO_DESCRIPTION,
        }
    }

    /// Complexity tag from the metadata block, if any.
    pub fn complexity_tag(&self) -> Option<&str> {
        self.meta.as_ref()?.complexity.as_deref()
    }
}

/// Summary metadata shown on cards and in the detail header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameMeta {
    /// Player count, free text (e.g. `2-4`).
    #[serde(default)]
    pub players: Option<String>,
    /// Typical play time, free text.
    #[serde(default)]
    pub duration: Option<String>,
    /// Recommended minimum age, free text.
    #[serde(default)]
    pub age: Option<String>,
    /// One-line component summary.
    #[serde(default)]
    pub components: Option<String>,
    /// Complexity tag used by the filter bar (`easy`, `medium`, `hard`).
    #[serde(default)]
    pub complexity: Option<String>,
}

/// Basic rules: goal, winning condition, key mechanics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicRules {
    /// What the players are trying to achieve.
    #[serde(default)]
    pub goal: Option<String>,
    /// How the game is won.
    #[serde(default)]
    pub how_to_win: Option<String>,
    /// Core mechanics in a sentence or two.
    #[serde(default)]
    pub key_mechanics: Option<String>,
}

/// One physical component of the game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Component {
    /// Component name.
    #[serde(default)]
    pub name: String,
    /// Component kind, free text (cards, dice, boards).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Quantity as found in the document: a JSON string or number.
    #[serde(default)]
    pub quantity: Option<Value>,
    /// Illustration reference.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Marks a special card highlighted with a badge.
    #[serde(default)]
    pub special: bool,
    /// Longer free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Component {
    /// Quantity rendered for display; absent or empty values become `1`.
    pub fn quantity_label(&self) -> String {
        match &self.quantity {
            Some(Value::String(text)) if !text.is_empty() => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            _ => "1".to_string(),
        }
    }
}

/// Gameplay section of a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gameplay {
    /// Setup instructions.
    #[serde(default)]
    pub setup: Option<SetupGuide>,
    /// Ordered play phases.
    #[serde(default)]
    pub phases: Vec<GamePhase>,
    /// Strategy tips.
    #[serde(default)]
    pub strategies: Vec<String>,
}

/// Ordered setup steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupGuide {
    /// Steps in play order.
    #[serde(default)]
    pub steps: Vec<String>,
}

/// A named phase of play.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamePhase {
    /// Phase name.
    #[serde(default)]
    pub name: String,
    /// What happens during the phase.
    #[serde(default)]
    pub description: Option<String>,
}

/// One way to win the game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VictoryCondition {
    /// The condition itself.
    #[serde(default)]
    pub condition: String,
    /// Longer explanation.
    #[serde(default)]
    pub description: Option<String>,
}

/// A clarified rules question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clarification {
    /// The question as asked.
    #[serde(default)]
    pub question: String,
    /// The answer.
    #[serde(default)]
    pub answer: Option<String>,
    /// Agreed table ruling, if one was recorded.
    #[serde(default)]
    pub solution: Option<String>,
    /// Illustration reference.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One gallery entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryItem {
    /// Image reference.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Caption title.
    #[serde(default)]
    pub title: String,
    /// Longer caption.
    #[serde(default)]
    pub description: Option<String>,
    /// Free-text date label.
    #[serde(default)]
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quantity_label_defaults_to_one() {
        let mut component = Component::default();
        assert_eq!(component.quantity_label(), "1");

        component.quantity = Some(json!(""));
        assert_eq!(component.quantity_label(), "1");
    }

    #[test]
    fn quantity_label_renders_strings_and_numbers() {
        let mut component = Component::default();
        component.quantity = Some(json!("2 колоды"));
        assert_eq!(component.quantity_label(), "2 колоды");

        component.quantity = Some(json!(32));
        assert_eq!(component.quantity_label(), "32");
    }

    #[test]
    fn card_description_substitutes_placeholder() {
        let mut game = Game {
            id: 1,
            name: "Шахматы".to_string(),
            ..Game::default()
        };
        assert_eq!(game.card_description(), NO_DESCRIPTION);

        game.description = Some(String::new());
        assert_eq!(game.card_description(), NO_DESCRIPTION);

        game.description = Some("Классическая стратегия".to_string());
        assert_eq!(game.card_description(), "Классическая стратегия");
    }

    #[test]
    fn complexity_tag_requires_meta() {
        let mut game = Game::default();
        assert_eq!(game.complexity_tag(), None);

        game.meta = Some(GameMeta::default());
        assert_eq!(game.complexity_tag(), None);

        game.meta = Some(GameMeta {
            complexity: Some("hard".to_string()),
            ..GameMeta::default()
        });
        assert_eq!(game.complexity_tag(), Some("hard"));
    }

    #[test]
    fn text_or_dash_handles_empty_values() {
        assert_eq!(text_or_dash(None), DASH);
        assert_eq!(text_or_dash(Some("")), DASH);
        assert_eq!(text_or_dash(Some("2-4")), "2-4");
    }

    #[test]
    fn minimal_record_parses_with_defaults() {
        let game: Game = serde_json::from_value(json!({
            "id": 7,
            "name": "Го"
        }))
        .unwrap();

        assert_eq!(game.id, 7);
        assert_eq!(game.name, "Го");
        assert!(game.meta.is_none());
        assert!(game.components.is_empty());
        assert!(game.victory.is_empty());
        assert!(game.clarifications.is_empty());
        assert!(game.gallery.is_empty());
    }

    #[test]
    fn component_type_field_maps_to_kind() {
        let component: Component = serde_json::from_value(json!({
            "name": "Кубики",
            "type": "dice",
            "quantity": 2,
            "special": true
        }))
        .unwrap();

        assert_eq!(component.kind.as_deref(), Some("dice"));
        assert!(component.special);
        assert_eq!(component.quantity_label(), "2");
    }
}
