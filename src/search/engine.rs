//! Scoring, filtering and ranking of search records.
//!
//! Every term must match some field of a record (AND semantics). A term is
//! credited to the first field it is found in, checked in the order title,
//! description, keywords, so a term never scores twice for one record.

use crate::config::SearchWeights;
use crate::search::catalog::SearchRecord;
use crate::search::normalize::normalize;

/// Field a term was credited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedField {
    Title,
    Description,
    Keywords,
}

impl MatchedField {
    #[must_use]
    pub const fn weight(self, weights: &SearchWeights) -> u32 {
        match self {
            Self::Title => weights.title,
            Self::Description => weights.description,
            Self::Keywords => weights.keywords,
        }
    }
}

/// A record together with its normalized fields.
#[derive(Debug, Clone)]
pub struct IndexedRecord {
    /// Record as shown to the visitor.
    record: SearchRecord,
    /// Normalized title.
    title: String,
    /// Normalized description.
    description: String,
    /// Normalized keyword string.
    keywords: String,
}

impl IndexedRecord {
    #[must_use]
    pub fn new(record: SearchRecord) -> Self {
        let title = normalize(&record.title);
        let description = normalize(&record.description);
        let keywords = normalize(&record.keywords);
        Self { record, title, description, keywords }
    }

    #[must_use]
    pub const fn record(&self) -> &SearchRecord {
        &self.record
    }

    /// First field containing `term`, in priority order.
    #[must_use]
    pub fn matched_field(&self, term: &str) -> Option<MatchedField> {
        if self.title.contains(term) {
            Some(MatchedField::Title)
        } else if self.description.contains(term) {
            Some(MatchedField::Description)
        } else if self.keywords.contains(term) {
            Some(MatchedField::Keywords)
        } else {
            None
        }
    }

    /// Total score over all `terms`, or `None` when any term is missing.
    #[must_use]
    pub fn score(&self, terms: &[&str], weights: &SearchWeights) -> Option<u32> {
        terms.iter().try_fold(0_u32, |total, term| {
            self.matched_field(term).map(|field| total.saturating_add(field.weight(weights)))
        })
    }
}

/// Normalizes a record list in its original order.
#[must_use]
pub fn build_index(records: &[SearchRecord]) -> Vec<IndexedRecord> {
    records.iter().cloned().map(IndexedRecord::new).collect()
}

/// A surviving record, by position in the index it was ranked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedHit {
    pub position: usize,
    pub score: u32,
}

/// Scores every record, drops the ones missing a term, and sorts by
/// descending score. Equal scores keep index order.
///
/// No terms means nothing to match, so the result is empty.
#[must_use]
pub fn rank(index: &[IndexedRecord], terms: &[&str], weights: &SearchWeights) -> Vec<RankedHit> {
    if terms.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<RankedHit> = index
        .iter()
        .enumerate()
        .filter_map(|(position, record)| {
            record.score(terms, weights).map(|score| RankedHit { position, score })
        })
        .collect();

    // `sort_by` is stable.
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    fn record(title: &str, description: &str, keywords: &str) -> SearchRecord {
        SearchRecord {
            title: title.to_string(),
            description: description.to_string(),
            url: format!("{}.html", title.to_lowercase().replace(' ', "-")),
            keywords: keywords.to_string(),
        }
    }

    fn titles(index: &[IndexedRecord], hits: &[RankedHit]) -> Vec<String> {
        hits.iter().map(|hit| index[hit.position].record().title.clone()).collect()
    }

    #[rstest]
    #[case::title("music", Some(MatchedField::Title))]
    #[case::description("tastes", Some(MatchedField::Description))]
    #[case::keywords("dragons", Some(MatchedField::Keywords))]
    #[case::title_wins_over_keywords("hobbies", Some(MatchedField::Title))]
    #[case::missing("cinema", None)]
    fn matched_field_priority(#[case] term: &str, #[case] expected: Option<MatchedField>) {
        let indexed = IndexedRecord::new(record(
            "Music (Hobbies)",
            "My musical tastes.",
            "songs bands imagine dragons hobbies",
        ));

        assert_that!(indexed.matched_field(term), eq(expected));
    }

    #[rstest]
    fn fields_are_normalized() {
        let indexed = IndexedRecord::new(record("Música (Aficiones)", "Mis gustos.", "canciones"));

        assert_that!(indexed.matched_field("musica"), some(eq(MatchedField::Title)));
    }

    #[rstest]
    fn term_is_credited_once() {
        let weights = SearchWeights::default();
        let indexed = IndexedRecord::new(record("Web", "Web development", "web"));

        assert_that!(indexed.score(&["web"], &weights), some(eq(weights.title)));
    }

    #[rstest]
    fn score_sums_terms() {
        let weights = SearchWeights::default();
        let indexed = IndexedRecord::new(record(
            "Máster en Ingeniería Web",
            "Universidad de Oviedo",
            "estudios",
        ));

        assert_that!(
            indexed.score(&["web", "oviedo", "estudios"], &weights),
            some(eq(weights.title + weights.description + weights.keywords))
        );
    }

    #[rstest]
    fn and_semantics() {
        let weights = SearchWeights::default();
        let index = build_index(&[
            record("Web", "Universidad de Oviedo", ""),
            record("Web only", "Nothing else", ""),
            record("Oviedo only", "Nothing else", ""),
        ]);

        let hits = rank(&index, &["web", "oviedo"], &weights);

        assert_that!(titles(&index, &hits), elements_are![eq("Web")]);
    }

    #[rstest]
    fn title_match_ranks_above_keyword_match() {
        let weights = SearchWeights::default();
        let index = build_index(&[
            record("Cars", "Motorsports world.", "vehicles photos"),
            record("Photos", "Gallery.", "images"),
        ]);

        let hits = rank(&index, &["photos"], &weights);

        assert_that!(titles(&index, &hits), elements_are![eq("Photos"), eq("Cars")]);
        assert_that!(hits[0].score, gt(hits[1].score));
    }

    #[rstest]
    fn ties_keep_index_order() {
        let weights = SearchWeights::default();
        let index = build_index(&[
            record("Alpha", "shared", ""),
            record("Beta", "shared", ""),
            record("Gamma", "nothing", "shared"),
            record("Delta", "shared", ""),
        ]);

        let hits = rank(&index, &["shared"], &weights);

        assert_that!(
            titles(&index, &hits),
            elements_are![eq("Alpha"), eq("Beta"), eq("Delta"), eq("Gamma")]
        );
    }

    #[rstest]
    fn no_terms_no_hits() {
        let index = build_index(&[record("Home", "Main page.", "")]);

        assert_that!(rank(&index, &[], &SearchWeights::default()), is_empty());
    }

    #[rstest]
    fn substring_matches_inside_words() {
        let index = build_index(&[record("Photography", "Photo gallery.", "")]);

        let hits = rank(&index, &["graph"], &SearchWeights::default());

        assert_that!(hits, len(eq(1)));
    }
}
