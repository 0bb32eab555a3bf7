//! # Mock Result Generator
//!
//! Synthesizes plausible-looking academic search results for a query. The
//! first few titles are fixed, query-bearing templates so the top of the
//! list always reads as relevant; everything after that is random template
//! composition.
//!
//! Titles are unique within one batch. Every generated record is inserted into
//! the [`ResultCache`] so its detail link resolves.

use chrono::{Datelike, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::cache::ResultCache;
use crate::record::ResultRecord;
use crate::slug::unique_slug;

/// Upper bound on random draws per requested result before giving up.
pub const MAX_ATTEMPTS_PER_RESULT: usize = 50;

/// Earliest publication year handed out to generated records.
const EARLIEST_YEAR: i32 = 1995;

/// Fixed titles that lead every result list. `{q}` is the verbatim query.
const LEADING_TITLES: &[&str] = &[
    "The Essential Guide to {q}",
    "{q}: A Comprehensive Literature Review",
    "Foundations of {q} for Students and Researchers",
];

const TITLE_FORMATS: &[&str] = &[
    "A Critical Analysis of",
    "Emerging Trends in",
    "Rethinking",
    "Empirical Perspectives on",
    "A Systematic Review of",
    "Case Studies in",
    "Theoretical Frameworks for",
    "Measuring the Impact of",
    "Comparative Approaches to",
    "New Directions in",
    "Methodological Challenges in",
    "Interdisciplinary Views on",
];

const TITLE_SUBJECTS: &[&str] = &[
    "{q} in Higher Education",
    "{q} and Public Policy",
    "{q} Across Cultures",
    "{q} in the Digital Age",
    "the History of {q}",
    "{q} and Social Change",
    "Quantitative Models of {q}",
    "{q} in Practice",
    "Ethics and {q}",
    "{q} in Developing Economies",
];

const FIRST_NAMES: &[&str] = &[
    "Amelia", "Benjamin", "Chen", "Daniela", "Elif", "Farid", "Grace", "Hiroshi", "Ingrid",
    "Jamal", "Katarzyna", "Luis", "Maya", "Nikolai", "Olivia", "Priya", "Rafael", "Sofia",
    "Tomasz", "Yara",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Becker", "Castillo", "Dubois", "Eriksson", "Fischer", "Gupta", "Hernandez",
    "Ivanova", "Johansson", "Kim", "Larsen", "Moreau", "Nakamura", "Okafor", "Petrov", "Rossi",
    "Schmidt", "Tanaka", "Williams",
];

const SOURCES: &[&str] = &[
    "Journal of Academic Research",
    "International Review of Education",
    "Oxford University Press",
    "Cambridge Scholarly Review",
    "Annals of Applied Science",
    "Nature Reviews",
    "Harvard Policy Quarterly",
    "IEEE Transactions",
    "Springer Handbooks",
    "The Social Science Journal",
    "Elsevier Research Letters",
    "MIT Press",
];

const SUMMARY_TEMPLATES: &[&str] = &[
    "This work examines {q} through a combination of archival research and contemporary case studies, highlighting open questions for future scholarship.",
    "The authors survey recent developments in {q} and propose a framework for evaluating competing approaches.",
    "Drawing on a multi-year dataset, this study measures how {q} shapes outcomes across several institutional settings.",
    "An accessible introduction to {q} that situates key debates within their historical and theoretical context.",
    "This paper critiques prevailing assumptions about {q} and outlines an agenda for interdisciplinary research.",
    "Using mixed methods, the study documents practical challenges in applying {q} and recommends evidence-based interventions.",
];

/// Builds mock search results from a query.
#[derive(Debug, Clone)]
pub struct MockResultGenerator {
    max_attempts_per_result: usize,
}

impl Default for MockResultGenerator {
    fn default() -> Self {
        Self {
            max_attempts_per_result: MAX_ATTEMPTS_PER_RESULT,
        }
    }
}

impl MockResultGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates `count` records for `query` using the thread-local RNG and
    /// inserts each of them into `cache`.
    pub fn generate(&self, query: &str, count: usize, cache: &ResultCache) -> Vec<ResultRecord> {
        let mut rng = rand::thread_rng();
        self.generate_with_rng(query, count, cache, &mut rng)
    }

    /// Generates up to `count` records with distinct titles.
    ///
    /// Duplicate titles are redrawn. If the attempt budget
    /// (`count * MAX_ATTEMPTS_PER_RESULT`) runs out first, the distinct
    /// records produced so far are returned and a warning is logged.
    ///
    /// # Arguments
    /// * `query` - User query, embedded verbatim in titles and summaries
    /// * `count` - Number of records requested
    /// * `cache` - Receives every returned record
    /// * `rng` - Random source
    pub fn generate_with_rng<R: Rng>(
        &self,
        query: &str,
        count: usize,
        cache: &ResultCache,
        rng: &mut R,
    ) -> Vec<ResultRecord> {
        let query = query.trim();
        let max_attempts = count.saturating_mul(self.max_attempts_per_result);
        let mut seen_titles: HashSet<String> = HashSet::with_capacity(count);
        let mut results = Vec::with_capacity(count);
        let mut attempts = 0;

        while results.len() < count && attempts < max_attempts {
            let title = self.draw_title(query, attempts, rng);
            attempts += 1;

            if !seen_titles.insert(title.clone()) {
                continue;
            }

            let record = self.build_record(query, title, cache, rng);
            cache.insert(record.clone());
            results.push(record);
        }

        if results.len() < count {
            warn!(
                "⚠️ GENERATOR: only {} of {} distinct results for '{}' after {} attempts",
                results.len(),
                count,
                query,
                attempts
            );
        } else {
            debug!(
                "Generated {} mock results for '{}' in {} attempts",
                results.len(),
                query,
                attempts
            );
        }

        results
    }

    fn draw_title<R: Rng>(&self, query: &str, attempt: usize, rng: &mut R) -> String {
        if let Some(template) = LEADING_TITLES.get(attempt) {
            return template.replace("{q}", query);
        }

        let format = pick(TITLE_FORMATS, rng);
        let subject = pick(TITLE_SUBJECTS, rng).replace("{q}", query);
        let volume: u32 = rng.gen_range(1..=999);
        format!("{} {}, Vol. {}", format, subject, volume)
    }

    fn build_record<R: Rng>(
        &self,
        query: &str,
        title: String,
        cache: &ResultCache,
        rng: &mut R,
    ) -> ResultRecord {
        let author = format!(
            "{} {}, {} {}",
            pick(FIRST_NAMES, rng),
            pick(LAST_NAMES, rng),
            pick(FIRST_NAMES, rng),
            pick(LAST_NAMES, rng)
        );
        let year = rng.gen_range(EARLIEST_YEAR..=Utc::now().year().max(EARLIEST_YEAR));
        let source = pick(SOURCES, rng).to_string();
        let summary = pick(SUMMARY_TEMPLATES, rng).replace("{q}", query);
        // A live slug from an earlier search must keep resolving to its own record
        let slug = unique_slug(&title, |s| cache.contains(s), rng);

        ResultRecord {
            title,
            author,
            year,
            source,
            summary,
            slug,
        }
    }
}

fn pick<'a, R: Rng>(items: &[&'a str], rng: &mut R) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generates_exact_count_with_distinct_titles() {
        let generator = MockResultGenerator::new();
        let cache = ResultCache::default();
        let mut rng = StdRng::seed_from_u64(11);

        for count in [1, 10, 100, 105] {
            let results = generator.generate_with_rng("machine learning", count, &cache, &mut rng);
            assert_eq!(results.len(), count);

            let titles: HashSet<&str> = results.iter().map(|r| r.title.as_str()).collect();
            assert_eq!(titles.len(), count, "duplicate titles for count {}", count);
        }
    }

    #[test]
    fn test_first_result_is_essential_guide() {
        let generator = MockResultGenerator::new();
        let cache = ResultCache::default();
        let mut rng = StdRng::seed_from_u64(5);

        let results = generator.generate_with_rng("Renewable Energy", 5, &cache, &mut rng);

        assert_eq!(results[0].title, "The Essential Guide to Renewable Energy");
        assert_eq!(
            results[1].title,
            "Renewable Energy: A Comprehensive Literature Review"
        );
        for record in &results {
            assert!(record.title.contains("Renewable Energy"));
            assert!(record.summary.contains("Renewable Energy"));
        }
    }

    #[test]
    fn test_slugs_unique_within_batch() {
        let generator = MockResultGenerator::new();
        let cache = ResultCache::default();
        let mut rng = StdRng::seed_from_u64(1234);

        let results = generator.generate_with_rng("climate", 105, &cache, &mut rng);
        let slugs: HashSet<&str> = results.iter().map(|r| r.slug.as_str()).collect();

        assert_eq!(slugs.len(), results.len());
    }

    #[test]
    fn test_every_record_is_cached() {
        let generator = MockResultGenerator::new();
        let cache = ResultCache::default();
        let mut rng = StdRng::seed_from_u64(77);

        let results = generator.generate_with_rng("neuroscience", 20, &cache, &mut rng);

        assert_eq!(cache.len(), 20);
        for record in &results {
            assert_eq!(cache.get(&record.slug).as_ref(), Some(record));
        }
    }

    #[test]
    fn test_fields_are_plausible() {
        let generator = MockResultGenerator::new();
        let cache = ResultCache::default();
        let mut rng = StdRng::seed_from_u64(8);
        let current_year = Utc::now().year();

        for record in generator.generate_with_rng("ethics", 50, &cache, &mut rng) {
            assert!(record.year >= EARLIEST_YEAR && record.year <= current_year);
            assert!(SOURCES.contains(&record.source.as_str()));
            assert!(!record.author.is_empty());
            assert!(!record.is_ai_generated());
        }
    }

    #[test]
    fn test_query_is_trimmed() {
        let generator = MockResultGenerator::new();
        let cache = ResultCache::default();
        let mut rng = StdRng::seed_from_u64(2);

        let results = generator.generate_with_rng("  history  ", 1, &cache, &mut rng);
        assert_eq!(results[0].title, "The Essential Guide to history");
    }

    #[test]
    fn test_zero_count_yields_nothing() {
        let generator = MockResultGenerator::new();
        let cache = ResultCache::default();

        assert!(generator.generate("anything", 0, &cache).is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_exhausted_attempts_returns_distinct_shortfall() {
        // One attempt per result leaves no room to redraw duplicates
        let generator = MockResultGenerator {
            max_attempts_per_result: 1,
        };
        let cache = ResultCache::default();
        let mut rng = StdRng::seed_from_u64(9);

        let results = generator.generate_with_rng("x", 5000, &cache, &mut rng);

        // ~120k possible titles, so 5000 single draws always repeat some
        assert!(results.len() < 5000);
        assert!(results.len() > 4500);
        let titles: HashSet<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles.len(), results.len());

        // Only returned records reach the cache
        assert_eq!(cache.len(), results.len());
        for record in &results {
            assert!(cache.contains(&record.slug));
        }
    }

    #[test]
    fn test_no_attempt_budget_yields_nothing() {
        let generator = MockResultGenerator {
            max_attempts_per_result: 0,
        };
        let cache = ResultCache::default();
        let mut rng = StdRng::seed_from_u64(3);

        assert!(generator
            .generate_with_rng("anything", 10, &cache, &mut rng)
            .is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_repeat_search_keeps_earlier_records_resolvable() {
        let generator = MockResultGenerator::new();
        let cache = ResultCache::default();

        // Same seed twice: identical titles and, without a re-roll, identical slugs
        let first = generator.generate_with_rng("oceans", 10, &cache, &mut StdRng::seed_from_u64(21));
        let second =
            generator.generate_with_rng("oceans", 10, &cache, &mut StdRng::seed_from_u64(21));

        assert_eq!(first[0].title, second[0].title);
        assert_ne!(first[0].slug, second[0].slug);
        assert_eq!(cache.len(), 20);
        for record in first.iter().chain(second.iter()) {
            assert_eq!(cache.get(&record.slug).as_ref(), Some(record));
        }
    }

    #[test]
    fn test_thread_rng_entry_point() {
        let generator = MockResultGenerator::new();
        let cache = ResultCache::default();

        let results = generator.generate("public health", 100, &cache);
        assert_eq!(results.len(), 100);
        assert_eq!(results[0].title, "The Essential Guide to public health");
    }
}
