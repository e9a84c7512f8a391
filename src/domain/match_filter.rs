//! Derived views over an accumulated match list.
//!
//! Both views are pure and recomputed from the full list on every call.

use std::collections::BTreeSet;

use super::Match;

/// Free-text search plus an optional exact competition selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    search: String,
    competition: Option<String>,
}

impl MatchFilter {
    /// Builds a filter. An empty competition means "all competitions".
    #[must_use]
    pub fn new(search: impl Into<String>, competition: Option<String>) -> Self {
        Self {
            search: search.into().to_lowercase(),
            competition: competition.filter(|c| !c.is_empty()),
        }
    }

    /// Whether this filter lets every match through.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.competition.is_none()
    }

    /// Whether `m` passes the filter.
    ///
    /// The search term must appear, case-insensitively, in the title or
    /// the competition name. The competition selection must match exactly.
    #[must_use]
    pub fn matches(&self, m: &Match) -> bool {
        let title = m.title.as_deref().unwrap_or_default().to_lowercase();
        let competition = m.competition.as_deref().unwrap_or_default();
        let found =
            title.contains(&self.search) || competition.to_lowercase().contains(&self.search);
        let selected = self
            .competition
            .as_deref()
            .is_none_or(|wanted| m.competition.as_deref() == Some(wanted));
        found && selected
    }

    /// Returns the matches that pass the filter, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, matches: &'a [Match]) -> Vec<&'a Match> {
        matches.iter().filter(|m| self.matches(m)).collect()
    }
}

/// Distinct non-empty competition names, sorted.
#[must_use]
pub fn competitions(matches: &[Match]) -> Vec<String> {
    matches
        .iter()
        .filter_map(|m| m.competition.as_deref())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(title: &str, competition: Option<&str>) -> Match {
        Match {
            title: Some(title.to_string()),
            competition: competition.map(str::to_string),
            ..Match::default()
        }
    }

    fn sample() -> Vec<Match> {
        vec![
            fixture("Arsenal - Chelsea", Some("ENGLAND: Premier League")),
            fixture("Barcelona - Sevilla", Some("SPAIN: La Liga")),
            fixture("Liverpool - Everton", Some("ENGLAND: Premier League")),
            fixture("Unknown - Match", None),
            fixture("Empty - Comp", Some("")),
        ]
    }

    fn titles(matches: &[&Match]) -> Vec<String> {
        matches
            .iter()
            .filter_map(|m| m.title.clone())
            .collect()
    }

    #[test]
    fn competitions_are_distinct_sorted_and_non_empty() {
        assert_eq!(
            competitions(&sample()),
            vec!["ENGLAND: Premier League", "SPAIN: La Liga"]
        );
        assert!(competitions(&[]).is_empty());
    }

    #[test]
    fn empty_filter_returns_everything() {
        let all = sample();
        let filter = MatchFilter::new("", Some(String::new()));
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&all).len(), all.len());
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_competition() {
        let all = sample();
        let by_title = MatchFilter::new("CHELSEA", None);
        assert_eq!(titles(&by_title.apply(&all)), vec!["Arsenal - Chelsea"]);

        let by_competition = MatchFilter::new("la liga", None);
        assert_eq!(titles(&by_competition.apply(&all)), vec!["Barcelona - Sevilla"]);
    }

    #[test]
    fn competition_selection_is_exact_and_preserves_order() {
        let all = sample();
        let filter = MatchFilter::new("", Some("ENGLAND: Premier League".to_string()));
        assert_eq!(
            titles(&filter.apply(&all)),
            vec!["Arsenal - Chelsea", "Liverpool - Everton"]
        );

        let lowercase = MatchFilter::new("", Some("england: premier league".to_string()));
        assert!(lowercase.apply(&all).is_empty());
    }

    #[test]
    fn search_and_competition_combine() {
        let all = sample();
        let filter = MatchFilter::new("liver", Some("ENGLAND: Premier League".to_string()));
        assert_eq!(titles(&filter.apply(&all)), vec!["Liverpool - Everton"]);

        let disjoint = MatchFilter::new("barcelona", Some("ENGLAND: Premier League".to_string()));
        assert!(disjoint.apply(&all).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let all = sample();
        let filter = MatchFilter::new("e", Some("ENGLAND: Premier League".to_string()));
        let once: Vec<Match> = filter.apply(&all).into_iter().cloned().collect();
        let twice: Vec<Match> = filter.apply(&once).into_iter().cloned().collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_title_still_searchable_by_competition() {
        let m = Match {
            competition: Some("ITALY: Serie A".to_string()),
            ..Match::default()
        };
        assert!(MatchFilter::new("serie", None).matches(&m));
        assert!(!MatchFilter::new("juventus", None).matches(&m));
    }
}
