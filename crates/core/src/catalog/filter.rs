//! Pure complexity filter and substring search over the loaded catalog.

use crate::models::Game;

/// Sentinel complexity tag that disables filtering.
pub const COMPLEXITY_ALL: &str = "all";

/// Keeps the records whose complexity tag equals `tag` exactly.
///
/// The sentinel `"all"` returns the input unchanged. Records without a
/// metadata block or complexity tag never match. Order is preserved.
pub fn filter_by_complexity(games: &[Game], tag: &str) -> Vec<Game> {
    if tag == COMPLEXITY_ALL {
        return games.to_vec();
    }
    games
        .iter()
        .filter(|game| game.complexity_tag() == Some(tag))
        .cloned()
        .collect()
}

/// Runs the complexity filter, then a case-insensitive substring search
/// over name and description. An empty query skips the search stage.
/// Pure and order-preserving; rendering the result is a separate step.
pub fn apply_filters_and_search(games: &[Game], tag: &str, query: &str) -> Vec<Game> {
    let filtered = filter_by_complexity(games, tag);
    if query.is_empty() {
        return filtered;
    }
    let needle = query.to_lowercase();
    filtered
        .into_iter()
        .filter(|game| matches_query(game, &needle))
        .collect()
}

fn matches_query(game: &Game, needle: &str) -> bool {
    if game.name.to_lowercase().contains(needle) {
        return true;
    }
    game.description
        .as_deref()
        .unwrap_or_default()
        .to_lowercase()
        .contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameMeta;
    use proptest::prelude::*;

    fn sample(id: i64, name: &str, complexity: Option<&str>) -> Game {
        Game {
            id,
            name: name.to_string(),
            meta: complexity.map(|tag| GameMeta {
                complexity: Some(tag.to_string()),
                ..GameMeta::default()
            }),
            ..Game::default()
        }
    }

    fn ids(games: &[Game]) -> Vec<i64> {
        games.iter().map(|game| game.id).collect()
    }

    #[test]
    fn all_sentinel_returns_input_unchanged() {
        let games = vec![
            sample(1, "Шахматы", Some("medium")),
            sample(2, "Го", Some("hard")),
            sample(3, "Дженга", None),
        ];
        assert_eq!(ids(&filter_by_complexity(&games, COMPLEXITY_ALL)), [1, 2, 3]);
    }

    #[test]
    fn tag_keeps_exact_matches_only() {
        let mut games = vec![
            sample(1, "Шахматы", Some("medium")),
            sample(2, "Го", Some("hard")),
            sample(3, "Дженга", None),
            sample(4, "Каркассон", Some("medium")),
            sample(5, "Уно", None),
        ];
        // a metadata block without a complexity tag must not match either
        games[4].meta = Some(GameMeta::default());

        assert_eq!(ids(&filter_by_complexity(&games, "medium")), [1, 4]);
        assert!(filter_by_complexity(&games, "extreme").is_empty());
    }

    #[test]
    fn tag_comparison_is_case_sensitive() {
        let games = vec![sample(1, "Шахматы", Some("medium"))];
        assert!(filter_by_complexity(&games, "Medium").is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let games = vec![sample(1, "Catan", Some("medium")), sample(2, "Го", None)];
        let result = apply_filters_and_search(&games, COMPLEXITY_ALL, "CATAN");
        assert_eq!(ids(&result), [1]);
    }

    #[test]
    fn search_matches_description_when_name_does_not() {
        let mut games = vec![sample(1, "Каркассон", None), sample(2, "Го", None)];
        games[0].description = Some("Выкладывайте плитки и стройте дороги".to_string());

        let result = apply_filters_and_search(&games, COMPLEXITY_ALL, "дороги");
        assert_eq!(ids(&result), [1]);
    }

    #[test]
    fn missing_description_is_treated_as_empty() {
        let games = vec![sample(1, "Го", None)];
        assert!(apply_filters_and_search(&games, COMPLEXITY_ALL, "тигр").is_empty());
    }

    #[test]
    fn empty_query_skips_the_search_stage() {
        let games = vec![
            sample(1, "Шахматы", Some("medium")),
            sample(2, "Го", Some("hard")),
        ];
        assert_eq!(ids(&apply_filters_and_search(&games, "hard", "")), [2]);
    }

    #[test]
    fn pipeline_preserves_document_order() {
        let games = vec![
            sample(3, "Игра А", Some("easy")),
            sample(1, "Игра Б", Some("easy")),
            sample(2, "Игра В", Some("easy")),
        ];
        let result = apply_filters_and_search(&games, "easy", "игра");
        assert_eq!(ids(&result), [3, 1, 2]);
    }

    proptest! {
        #[test]
        fn all_filter_is_identity(
            tags in proptest::collection::vec(proptest::option::of("easy|medium|hard"), 0..16),
        ) {
            let games: Vec<Game> = tags
                .iter()
                .enumerate()
                .map(|(index, tag)| sample(index as i64, &format!("Game {index}"), tag.as_deref()))
                .collect();

            let result = filter_by_complexity(&games, COMPLEXITY_ALL);
            prop_assert_eq!(ids(&result), ids(&games));
        }

        #[test]
        fn filtering_then_searching_equals_staged_composition(
            tags in proptest::collection::vec(proptest::option::of("easy|medium|hard"), 0..16),
            tag in "all|easy|medium|hard",
            query in "[a-c]{0,2}",
        ) {
            let games: Vec<Game> = tags
                .iter()
                .enumerate()
                .map(|(index, t)| sample(index as i64, &format!("abc {index}"), t.as_deref()))
                .collect();

            let combined = apply_filters_and_search(&games, &tag, &query);
            let staged = apply_filters_and_search(
                &filter_by_complexity(&games, &tag),
                COMPLEXITY_ALL,
                &query,
            );
            prop_assert_eq!(ids(&combined), ids(&staged));
        }

        #[test]
        fn pipeline_is_idempotent(
            tags in proptest::collection::vec(proptest::option::of("easy|medium|hard"), 0..16),
            tag in "all|easy|medium|hard",
            query in "[a-c]{0,2}",
        ) {
            let games: Vec<Game> = tags
                .iter()
                .enumerate()
                .map(|(index, t)| sample(index as i64, &format!("abc {index}"), t.as_deref()))
                .collect();

            let once = apply_filters_and_search(&games, &tag, &query);
            let twice = apply_filters_and_search(&once, &tag, &query);
            prop_assert_eq!(ids(&once), ids(&twice));
        }
    }
}
