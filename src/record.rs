//! # Result Records
//!
//! The single data type that flows through the search pipeline: generated by
//! the mock generator or the AI summary fetcher, stored in the result cache,
//! and rendered by the search and article pages.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Author label stamped on every AI-produced record.
pub const AI_AUTHOR: &str = "Gemini AI";

/// Suffix appended to the source of every AI-produced record.
pub const AI_SOURCE_SUFFIX: &str = " (AI-Generated)";

/// A single search result as shown in the result list and detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Display title of the result
    pub title: String,
    /// Author line (forced to [`AI_AUTHOR`] for AI records)
    pub author: String,
    /// Publication year
    pub year: i32,
    /// Journal or publisher, carries [`AI_SOURCE_SUFFIX`] for AI records
    pub source: String,
    /// Short abstract shown on the result card and detail page
    pub summary: String,
    /// URL-safe lookup key into the result cache
    pub slug: String,
}

impl ResultRecord {
    /// Returns `true` if the record came from the AI enrichment path.
    pub fn is_ai_generated(&self) -> bool {
        self.source.ends_with(AI_SOURCE_SUFFIX)
    }

    /// Placeholder shown when an article slug is not (or no longer) cached.
    ///
    /// The detail page always renders something; this record makes the miss
    /// obvious to the reader instead of returning an error page.
    pub fn not_found(slug: &str, query: Option<&str>) -> Self {
        let hint = match query {
            Some(q) if !q.trim().is_empty() => {
                format!(" Try running the search for \"{}\" again.", q.trim())
            }
            _ => " Try running your search again.".to_string(),
        };

        Self {
            title: "Article Not Found".to_string(),
            author: "System Error".to_string(),
            year: Utc::now().year(),
            source: "MindWork (Error)".to_string(),
            summary: format!(
                "Error: the article '{}' could not be found. Result links are only valid for a \
                 limited time after a search.{}",
                slug, hint
            ),
            slug: slug.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_generated_detection() {
        let mut record = ResultRecord {
            title: "Quantum Error Correction".to_string(),
            author: AI_AUTHOR.to_string(),
            year: 2024,
            source: format!("Nature Physics{}", AI_SOURCE_SUFFIX),
            summary: "A summary.".to_string(),
            slug: "quantum-error-correction-0a1b".to_string(),
        };
        assert!(record.is_ai_generated());

        record.source = "Nature Physics".to_string();
        assert!(!record.is_ai_generated());
    }

    #[test]
    fn test_not_found_record_is_labeled() {
        let record = ResultRecord::not_found("missing-slug-ffff", Some("climate policy"));

        assert_eq!(record.title, "Article Not Found");
        assert_eq!(record.slug, "missing-slug-ffff");
        assert!(record.summary.starts_with("Error:"));
        assert!(record.summary.contains("climate policy"));
        assert!(!record.is_ai_generated());
    }

    #[test]
    fn test_not_found_record_without_query() {
        let record = ResultRecord::not_found("x-0000", Some("   "));
        assert!(record.summary.contains("Try running your search again."));

        let record = ResultRecord::not_found("x-0000", None);
        assert!(record.summary.contains("Try running your search again."));
    }

    #[test]
    fn test_record_serializes_with_expected_fields() {
        let record = ResultRecord::not_found("abc-1234", None);
        let value = serde_json::to_value(&record).unwrap();

        for field in ["title", "author", "year", "source", "summary", "slug"] {
            assert!(value.get(field).is_some(), "missing field {}", field);
        }
    }
}
