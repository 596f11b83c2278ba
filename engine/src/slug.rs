//! Human readable identifiers derived from names and titles.

/// Converts free text into a lowercase, hyphen separated token.
///
/// ASCII letters are lowercased and ASCII digits kept. Every run of anything else
/// (whitespace, punctuation, symbols, and non-ASCII characters, which are dropped
/// rather than transliterated) collapses into a single hyphen. Leading and
/// trailing hyphens are stripped, so text with no ASCII alphanumerics yields an
/// empty slug.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;
    use rstest::rstest;

    #[rstest]
    #[case::simple("Hello World", "hello-world")]
    #[case::already_slug("hello-world", "hello-world")]
    #[case::digits("Top 10 Stories of 2024", "top-10-stories-of-2024")]
    #[case::consecutive_whitespace("Hello \t\n  World", "hello-world")]
    #[case::edge_punctuation("  --Rust & Go!!  ", "rust-go")]
    #[case::inner_punctuation("what's new?", "what-s-new")]
    #[case::non_ascii_dropped("Café Olé", "caf-ol")]
    #[case::non_ascii_only("日本語", "")]
    #[case::empty("", "")]
    #[case::only_separators(" - _ . ", "")]
    fn slugify_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(expected, slugify(input));
    }

    #[test]
    fn slugify_is_deterministic() {
        let title = "Breaking News: Markets Rally";
        assert_eq!(slugify(title), slugify(title));
    }

    #[test]
    fn slug_contains_only_url_safe_characters() {
        let slug = slugify("¿Qué pasa? <script>alert(1)</script> 100% ~fun~");
        assert!(
            slug.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        );
        assert!(!slug.starts_with('-'));
        assert!(!slug.ends_with('-'));
        assert!(!slug.contains("--"));
    }
}
