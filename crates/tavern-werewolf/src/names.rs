use std::sync::LazyLock;

use regex::Regex;

const PLAYER_PATTERN: &str = r"Player\s*(\d+)";

/// `None` only if the pattern fails to compile, in which case nothing is extracted.
static PLAYER_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(PLAYER_PATTERN).ok());

/// Seat name for a zero-based seat index.
pub fn seat_name(index: usize) -> String {
    format!("Player{}", index + 1)
}

/// Find the first `Player<N>` mention in free text.
///
/// Returns the normalized name and its zero-based seat index.
pub fn extract_player(text: &str) -> Option<(String, usize)> {
    PLAYER_NAME.as_ref()?.captures_iter(text).find_map(|caps| {
        let number: usize = caps.get(1)?.as_str().parse().ok()?;
        let index = number.checked_sub(1)?;
        Some((seat_name(index), index))
    })
}

/// Every distinct player mentioned in the text, in order of appearance.
pub fn mentioned_players(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let Some(pattern) = PLAYER_NAME.as_ref() else {
        return names;
    };
    for caps in pattern.captures_iter(text) {
        let Some(number) = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) else {
            continue;
        };
        if number == 0 {
            continue;
        }
        let name = seat_name(number - 1);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_compiles() {
        assert!(Regex::new(PLAYER_PATTERN).is_ok());
        assert!(PLAYER_NAME.is_some());
    }

    #[test]
    fn test_extract_player() {
        assert_eq!(
            extract_player("I suggest we kill Player3 tonight."),
            Some(("Player3".to_string(), 2))
        );
        assert_eq!(
            extract_player("Player 12 is suspicious"),
            Some(("Player12".to_string(), 11))
        );
        assert_eq!(extract_player("I have no idea."), None);
    }

    #[test]
    fn test_player_zero_skipped() {
        assert_eq!(
            extract_player("Player0 or Player2?"),
            Some(("Player2".to_string(), 1))
        );
    }

    #[test]
    fn test_mentioned_players() {
        assert_eq!(
            mentioned_players("Player1, Player4 and Player1 again, then Player 2"),
            vec!["Player1", "Player4", "Player2"]
        );
    }
}
