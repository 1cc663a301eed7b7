//! Literal Swedish → English substitution for business vocabulary.
//! Deliberately naive: no case folding, no word boundaries.

/// Applied top to bottom; each entry sees the output of the ones above it.
pub const TRANSLATIONS: &[(&str, &str)] = &[
    ("företag", "company"),
    ("till salu", "for sale"),
    ("omsättning", "revenue"),
    ("resultat", "profit"),
    ("anställda", "employees"),
    ("prisidé", "asking price"),
    ("mkr", "MSEK"),
    ("sek", "SEK"),
    ("kr", "SEK"),
];

#[derive(Debug, Clone, Copy)]
pub struct TextNormalizer {
    table: &'static [(&'static str, &'static str)],
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self { table: TRANSLATIONS }
    }
}

impl TextNormalizer {
    /// Absent input stays absent.
    pub fn normalize(&self, text: Option<&str>) -> Option<String> {
        text.map(|t| self.apply(t))
    }

    pub fn apply(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        self.table
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_unchanged() {
        let n = TextNormalizer::default();
        assert_eq!(n.apply(""), "");
        assert_eq!(n.normalize(None), None);
        assert_eq!(n.normalize(Some("")).as_deref(), Some(""));
    }

    #[test]
    fn identity_without_table_terms() {
        let n = TextNormalizer::default();
        let s = "Profitable bakery in Gothenburg, 12 staff";
        assert_eq!(n.apply(s), s);
    }

    #[test]
    fn replaces_every_occurrence() {
        let n = TextNormalizer::default();
        assert_eq!(
            n.apply("företag till salu, företag med omsättning 5 mkr"),
            "company for sale, company med revenue 5 MSEK"
        );
    }

    #[test]
    fn matches_inside_words_and_is_case_sensitive() {
        let n = TextNormalizer::default();
        assert_eq!(n.apply("kraft"), "SEKaft");
        assert_eq!(n.apply("Kraft"), "Kraft");
    }

    #[test]
    fn substitution_is_sequential() {
        let n = TextNormalizer::default();
        // "omsättning" → "revenue" leaves "k" + "r…", which the later "kr" rule then hits.
        assert_eq!(n.apply("komsättning"), "SEKevenue");
    }

    #[test]
    fn mkr_wins_over_kr() {
        let n = TextNormalizer::default();
        assert_eq!(n.apply("5 mkr"), "5 MSEK");
        assert_eq!(n.apply("2,000,000 kr"), "2,000,000 SEK");
    }
}
