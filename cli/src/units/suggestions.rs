use crate::units::table::SPELLINGS;

/// Autocomplete candidates for partial unit input
///
/// Nothing is computed until iterated, and `iter()` can be called again to
/// restart from the first candidate. Order: exact match, then prefix
/// matches, then substring matches, each group alphabetical.
#[derive(Debug, Clone)]
pub struct UnitSuggestions {
    query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchRank {
    Exact,
    Prefix,
    Substring,
}

impl MatchRank {
    const ORDER: [MatchRank; 3] = [MatchRank::Exact, MatchRank::Prefix, MatchRank::Substring];

    fn of(candidate: &str, query: &str) -> Option<MatchRank> {
        if candidate == query {
            Some(MatchRank::Exact)
        } else if candidate.starts_with(query) {
            Some(MatchRank::Prefix)
        } else if candidate.contains(query) {
            Some(MatchRank::Substring)
        } else {
            None
        }
    }
}

impl UnitSuggestions {
    pub fn new(partial_input: &str) -> Self {
        Self {
            query: partial_input.trim().to_lowercase(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        MatchRank::ORDER.into_iter().flat_map(move |rank| {
            SPELLINGS
                .iter()
                .copied()
                .filter(move |candidate| MatchRank::of(candidate, &self.query) == Some(rank))
        })
    }
}

impl<'a> IntoIterator for &'a UnitSuggestions {
    type Item = &'static str;
    type IntoIter = Box<dyn Iterator<Item = &'static str> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

pub fn get_unit_suggestions(partial_input: &str) -> UnitSuggestions {
    UnitSuggestions::new(partial_input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(list: &[&str], item: &str) -> usize {
        list.iter()
            .position(|s| *s == item)
            .unwrap_or_else(|| panic!("'{}' missing from {:?}", item, list))
    }

    #[test]
    fn test_prefix_before_substring() {
        let suggestions: Vec<&str> = get_unit_suggestions("o").iter().collect();
        // "oz" starts with "o"; "pound" and "floz" only contain it
        assert!(position(&suggestions, "oz") < position(&suggestions, "pound"));
        assert!(position(&suggestions, "oz") < position(&suggestions, "floz"));
        assert!(!suggestions.contains(&"lb"));
    }

    #[test]
    fn test_exact_match_first() {
        let suggestions: Vec<&str> = get_unit_suggestions("Gal").iter().collect();
        assert_eq!(suggestions, vec!["gal", "gallon"]);

        let suggestions: Vec<&str> = get_unit_suggestions("c").iter().collect();
        assert_eq!(suggestions[0], "c");
    }

    #[test]
    fn test_groups_alphabetical() {
        let suggestions: Vec<&str> = get_unit_suggestions("oun").iter().collect();
        assert_eq!(
            suggestions,
            vec!["ounce", "ounces", "count", "fluid ounce", "pound", "pounds"]
        );
    }

    #[test]
    fn test_restartable() {
        let suggestions = get_unit_suggestions("l");
        let first: Vec<&str> = suggestions.iter().collect();
        let second: Vec<&str> = (&suggestions).into_iter().collect();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_no_match_and_empty_query() {
        assert_eq!(get_unit_suggestions("xyz").iter().count(), 0);
        assert_eq!(get_unit_suggestions("  ").iter().count(), SPELLINGS.len());
    }
}
