//! Fuzzy name matching.
//!
//! Grand Prix names, driver names, and team names arrive in whatever form the
//! user or model typed ("Monaco", "monaco gp", "Abu Dhabi"). Matching is
//! case-insensitive: exact and substring matches win outright, otherwise the
//! highest Jaro-Winkler score above a floor is taken.

const MIN_SCORE: f64 = 0.75;

/// Find the best match for `query` among `items`, where `candidates` yields
/// the searchable strings for an item (an event matches on name, location,
/// and country). Returns None when nothing clears the score floor.
pub fn best_match<'a, T, F>(query: &str, items: &'a [T], candidates: F) -> Option<&'a T>
where
    F: Fn(&T) -> Vec<&str>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut best: Option<(&T, f64)> = None;
    for item in items {
        for candidate in candidates(item) {
            let hay = candidate.to_lowercase();
            let score = if hay == needle {
                return Some(item);
            } else if hay.contains(&needle) || needle.contains(&hay) {
                0.95
            } else {
                strsim::jaro_winkler(&needle, &hay)
            };
            if score >= MIN_SCORE && best.map(|(_, s)| score > s).unwrap_or(true) {
                best = Some((item, score));
            }
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, &'static str);

    fn events() -> Vec<Named> {
        vec![
            Named("Monaco Grand Prix", "Monte-Carlo"),
            Named("British Grand Prix", "Silverstone"),
            Named("Abu Dhabi Grand Prix", "Yas Island"),
        ]
    }

    #[test]
    fn test_exact_name() {
        let items = events();
        let hit = best_match("Monaco Grand Prix", &items, |e| vec![e.0, e.1]).unwrap();
        assert_eq!(hit.0, "Monaco Grand Prix");
    }

    #[test]
    fn test_substring() {
        let items = events();
        let hit = best_match("monaco", &items, |e| vec![e.0, e.1]).unwrap();
        assert_eq!(hit.0, "Monaco Grand Prix");
        let hit = best_match("Abu Dhabi", &items, |e| vec![e.0, e.1]).unwrap();
        assert_eq!(hit.0, "Abu Dhabi Grand Prix");
    }

    #[test]
    fn test_typo() {
        let items = events();
        let hit = best_match("Monacco GP", &items, |e| vec![e.0, e.1]).unwrap();
        assert_eq!(hit.0, "Monaco Grand Prix");
    }

    #[test]
    fn test_no_match() {
        let items = events();
        assert!(best_match("xyzzy", &items, |e| vec![e.0, e.1]).is_none());
        assert!(best_match("", &items, |e| vec![e.0, e.1]).is_none());
    }
}
