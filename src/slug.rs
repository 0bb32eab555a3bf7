//! # Slug Generation
//!
//! Turns a free-text title into the URL-safe key used by `/article/<slug>`.

use rand::Rng;

/// Converts a title into a lowercase, hyphen-separated slug with a random
/// 4-hex-digit suffix.
///
/// Every run of characters outside `[a-z0-9]` collapses to a single hyphen,
/// and the body never starts or ends with one. An empty (or all-symbol)
/// title yields just the suffix.
///
/// # Arguments
/// * `title` - Free-text title to convert
/// * `rng` - Random source for the suffix
///
/// # Returns
/// A slug such as `the-essential-guide-to-rust-3fa9`.
pub fn slugify<R: Rng>(title: &str, rng: &mut R) -> String {
    let mut body = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !body.is_empty() {
                body.push('-');
            }
            pending_hyphen = false;
            body.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    let suffix: u16 = rng.gen();
    if body.is_empty() {
        format!("{:04x}", suffix)
    } else {
        format!("{}-{:04x}", body, suffix)
    }
}

/// Re-rolls the suffix this many times before accepting a taken slug.
pub const MAX_SLUG_ATTEMPTS: usize = 16;

/// Like [`slugify`], but redraws the suffix while `is_taken` reports the slug
/// as already in use.
///
/// After [`MAX_SLUG_ATTEMPTS`] taken draws the last candidate is returned
/// anyway; inserting it replaces the existing entry.
pub fn unique_slug<R, F>(title: &str, is_taken: F, rng: &mut R) -> String
where
    R: Rng,
    F: Fn(&str) -> bool,
{
    let mut slug = slugify(title, rng);
    for _ in 1..MAX_SLUG_ATTEMPTS {
        if !is_taken(&slug) {
            break;
        }
        slug = slugify(title, rng);
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn split_suffix(slug: &str) -> (&str, &str) {
        match slug.rsplit_once('-') {
            Some((body, suffix)) => (body, suffix),
            None => ("", slug),
        }
    }

    #[test]
    fn test_slugify_basic_title() {
        let mut rng = StdRng::seed_from_u64(7);
        let slug = slugify("The Essential Guide to Rust", &mut rng);

        let (body, suffix) = split_suffix(&slug);
        assert_eq!(body, "the-essential-guide-to-rust");
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_slugify_collapses_symbols_and_trims_hyphens() {
        let mut rng = StdRng::seed_from_u64(1);
        let slug = slugify("  --Machine Learning: A (Very) Brief Review!!  ", &mut rng);

        let (body, _) = split_suffix(&slug);
        assert_eq!(body, "machine-learning-a-very-brief-review");
        assert!(!slug.starts_with('-'));
        assert!(!slug.contains("--"));
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        let mut rng = StdRng::seed_from_u64(3);
        let slug = slugify("Café Économie 2024", &mut rng);

        let (body, _) = split_suffix(&slug);
        assert_eq!(body, "caf-conomie-2024");
    }

    #[test]
    fn test_slugify_empty_title_yields_suffix_only() {
        let mut rng = StdRng::seed_from_u64(42);

        for title in ["", "   ", "!!!", "日本語"] {
            let slug = slugify(title, &mut rng);
            assert_eq!(slug.len(), 4, "unexpected slug {:?} for {:?}", slug, title);
            assert!(slug.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_slugify_output_is_url_safe() {
        let mut rng = StdRng::seed_from_u64(99);
        let slug = slugify("C++ & Rust: <Systems> Programming / 2nd ed.", &mut rng);

        assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn test_slugify_same_title_differs_by_suffix() {
        let mut rng = StdRng::seed_from_u64(2024);
        let slugs: HashSet<String> = (0..50)
            .map(|_| slugify("Duplicate Title", &mut rng))
            .collect();

        // 50 draws from 65536 suffixes; a seeded run keeps this deterministic
        assert!(slugs.len() >= 48);
    }

    #[test]
    fn test_unique_slug_redraws_taken_suffix() {
        let mut rng = StdRng::seed_from_u64(31);
        let taken = slugify("Ethics and History", &mut rng.clone());

        let slug = unique_slug("Ethics and History", |s| s == taken, &mut rng);

        assert_ne!(slug, taken);
        assert!(slug.starts_with("ethics-and-history-"));
    }

    #[test]
    fn test_unique_slug_gives_up_after_bounded_attempts() {
        let mut rng = StdRng::seed_from_u64(4);
        let calls = std::cell::Cell::new(0);

        let slug = unique_slug(
            "Always Taken",
            |_| {
                calls.set(calls.get() + 1);
                true
            },
            &mut rng,
        );

        assert!(slug.starts_with("always-taken-"));
        assert_eq!(calls.get(), MAX_SLUG_ATTEMPTS - 1);
    }
}
