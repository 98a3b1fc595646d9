//! Name Filter
//!
//! Free-text filter for object scanners. The raw text is a comma-separated
//! list of terms; each term is trimmed and blank terms are dropped. A
//! candidate matches when any term is a case-insensitive substring of its
//! display name or its stable identifier. No terms means everything matches.

/// Parsed free-text filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    terms: Vec<String>,
}

impl NameFilter {
    pub fn parse(raw: &str) -> Self {
        let terms = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { terms }
    }

    /// Lowercased terms in input order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, name: &str, stable_id: &str) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let name = name.to_lowercase();
        let id = stable_id.to_lowercase();
        self.terms
            .iter()
            .any(|term| name.contains(term.as_str()) || id.contains(term.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_trim() {
        let f = NameFilter::parse("a, ,b");
        assert_eq!(f.terms(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_blank_filter_matches_everything() {
        for raw in ["", "   ", ",", " , ,"] {
            let f = NameFilter::parse(raw);
            assert!(f.is_empty());
            assert!(f.matches("Anything", "any_id"));
            assert!(f.matches("", ""));
        }
    }

    #[test]
    fn test_case_insensitive_name_or_id() {
        let f = NameFilter::parse("LEDGER, bolt");
        assert!(f.matches("Bank Ledger", "item_1"));
        assert!(f.matches("Hardware", "BOLTS"));
        assert!(!f.matches("Wires", "wires"));
    }

    #[test]
    fn test_substring_match() {
        let f = NameFilter::parse("med");
        assert!(f.matches("Medkit", "x"));
        assert!(f.matches("Armed case", "x"));
        assert!(!f.matches("Bandage", "bandage"));
    }
}
