/// Count non-empty votes per candidate, in the order candidates were first named.
pub fn tally<S: AsRef<str>>(votes: &[S]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for vote in votes.iter().map(AsRef::as_ref).filter(|v| !v.is_empty()) {
        match counts.iter_mut().find(|(name, _)| name == vote) {
            Some((_, count)) => *count += 1,
            None => counts.push((vote.to_string(), 1)),
        }
    }
    counts
}

/// The candidate with the most votes, or `None` when nobody voted.
///
/// Empty strings are abstentions. A tie goes to whichever tied candidate
/// was named first.
pub fn majority<S: AsRef<str>>(votes: &[S]) -> Option<String> {
    let mut best: Option<(String, usize)> = None;
    for (name, count) in tally(votes) {
        match &best {
            Some((_, top)) if *top >= count => {}
            _ => best = Some((name, count)),
        }
    }
    best.map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_simple_majority() {
        assert_eq!(majority(&["A", "B", "A"]), Some("A".to_string()));
    }

    #[test]
    fn test_no_votes() {
        let votes: [&str; 0] = [];
        assert_eq!(majority(&votes), None);
        assert_eq!(majority(&["", ""]), None);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        assert_eq!(majority(&["A", "B"]), Some("A".to_string()));
        assert_eq!(majority(&["B", "A", "A", "B"]), Some("B".to_string()));
    }

    #[test]
    fn test_abstentions_ignored() {
        assert_eq!(majority(&["", "B", "", "", "A", "B"]), Some("B".to_string()));
    }

    #[test]
    fn test_tally_order() {
        let counts = tally(&["Player3", "", "Player1", "Player3"]);
        assert_eq!(
            counts,
            vec![("Player3".to_string(), 2), ("Player1".to_string(), 1)]
        );
    }

    proptest! {
        #[test]
        fn prop_winner_has_top_count(votes in proptest::collection::vec("[ABC]?", 0..20)) {
            let counts = tally(&votes);
            match majority(&votes) {
                None => prop_assert!(counts.is_empty()),
                Some(winner) => {
                    let top = counts.iter().map(|(_, c)| *c).max().unwrap();
                    let first_top = counts.iter().find(|(_, c)| *c == top).unwrap();
                    prop_assert_eq!(&first_top.0, &winner);
                }
            }
        }
    }
}
