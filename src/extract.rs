//! Release extraction rules.
//!
//! Turns one raw message body into a structured release, or nothing. The
//! sole match criterion is a fixed vocabulary of release-quality tags:
//! a body without one is not a release and yields `None`, no matter what
//! else it contains. Missing year or language tags never block emission.
//!
//! All rules are first-occurrence-wins and position-based, matching the
//! upstream archive posting conventions. They are deliberately not "smart"
//! (no longest match, no most-specific tag); changing that changes which
//! record a message produces.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{ParsedRelease, ReleaseRecord};

/// Title used when no boundary precedes the matched tags, or when the
/// boundary sits at the very start of the body.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Release-quality vocabulary in canonical casing.
///
/// Matched case-insensitively as whole words; the matched tag is always
/// reported in the casing listed here, not the casing found in the body.
pub const QUALITY_TAGS: &[&str] = &[
    "1080p", "720p", "480p", "HD", "BluRay", "DVDScr", "WebDL", "HDRip", "BRRip", "TS", "TC", "CAM",
];

static QUALITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = QUALITY_TAGS.join("|");
    Regex::new(&format!(r"(?i)\b({})\b", alternation)).unwrap()
});

static BARE_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());

static PAREN_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((\d{4})\)").unwrap());

static LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]").unwrap());

/// Parse one message body into a release.
///
/// Deterministic and free of I/O: the same body always yields the same
/// release. Returns `None` only when no quality tag is present.
pub fn extract(text: &str) -> Option<ParsedRelease> {
    let quality = QUALITY_RE.find(text)?;

    let boundary = title_boundary(text, quality.start());
    let title = text[..boundary].trim();
    let title = if title.is_empty() {
        UNKNOWN_TITLE.to_string()
    } else {
        title.to_string()
    };

    let year = PAREN_YEAR_RE
        .captures(text)
        .map(|caps| caps[1].to_string());

    let language_tags = LANGUAGE_RE.captures(text).map(|caps| caps[1].to_string());

    Some(ParsedRelease {
        title,
        year,
        quality: canonical_quality(quality.as_str()),
        language_tags,
    })
}

/// Byte offset where the title ends: the earliest of the first 4-digit run,
/// the first `[`, the first `(`, and the first quality tag. The quality tag
/// position is always a candidate, so a boundary always exists once the
/// vocabulary gate has passed.
fn title_boundary(text: &str, quality_start: usize) -> usize {
    let mut boundary = quality_start;
    if let Some(m) = BARE_YEAR_RE.find(text) {
        boundary = boundary.min(m.start());
    }
    if let Some(pos) = text.find('[') {
        boundary = boundary.min(pos);
    }
    if let Some(pos) = text.find('(') {
        boundary = boundary.min(pos);
    }
    boundary
}

/// Map a case-insensitive match back to its vocabulary casing.
fn canonical_quality(matched: &str) -> String {
    QUALITY_TAGS
        .iter()
        .find(|tag| tag.eq_ignore_ascii_case(matched))
        .map(|tag| tag.to_string())
        .unwrap_or_else(|| matched.to_string())
}

/// Render one record as its display line.
pub fn format_record(record: &ReleaseRecord) -> String {
    let year = record
        .release
        .year
        .as_ref()
        .map(|y| format!("({})", y))
        .unwrap_or_default();
    let languages = record
        .release
        .language_tags
        .as_ref()
        .map(|l| format!("[{}]", l))
        .unwrap_or_default();

    format!(
        "🍿 {} {} {} {}\n🔗 📥 Download Here ({})",
        record.release.title, year, languages, record.release.quality, record.link
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_quality_tag_yields_nothing() {
        assert_eq!(extract("Great movie, loved it"), None);
        assert_eq!(extract(""), None);
        assert_eq!(extract("Avengers Endgame (2019) [English]"), None);
    }

    #[test]
    fn test_full_record() {
        let release = extract("Avengers Endgame (2019) [English] 1080p BluRay").unwrap();
        assert_eq!(release.title, "Avengers Endgame");
        assert_eq!(release.year.as_deref(), Some("2019"));
        assert_eq!(release.language_tags.as_deref(), Some("English"));
        assert_eq!(release.quality, "1080p");
    }

    #[test]
    fn test_quality_is_whole_word() {
        // "HDTV" and "BATS" contain vocabulary substrings but no whole word.
        assert_eq!(extract("Some HDTV capture of BATS"), None);
    }

    #[test]
    fn test_quality_reported_in_canonical_casing() {
        let release = extract("Old Classic bluray rip").unwrap();
        assert_eq!(release.quality, "BluRay");

        let release = extract("Night Watch WEBDL").unwrap();
        assert_eq!(release.quality, "WebDL");
    }

    #[test]
    fn test_first_quality_tag_wins() {
        let release = extract("Grainy Feature CAM 1080p BluRay").unwrap();
        assert_eq!(release.quality, "CAM");
    }

    #[test]
    fn test_title_stops_at_earliest_boundary() {
        // Bare year precedes the quality tag.
        let release = extract("The Heist 2021 720p").unwrap();
        assert_eq!(release.title, "The Heist");
        // Bare years bound the title but only parenthesized ones are captured.
        assert_eq!(release.year, None);

        // Bracket precedes everything else.
        let release = extract("Night Run [Dual Audio] (2020) HDRip").unwrap();
        assert_eq!(release.title, "Night Run");
        assert_eq!(release.language_tags.as_deref(), Some("Dual Audio"));
    }

    #[test]
    fn test_boundary_at_start_uses_placeholder() {
        let release = extract("1080p BluRay").unwrap();
        assert_eq!(release.title, UNKNOWN_TITLE);
        assert_eq!(release.quality, "1080p");
    }

    #[test]
    fn test_whitespace_before_boundary_uses_placeholder() {
        let release = extract("  (2019) 720p").unwrap();
        assert_eq!(release.title, UNKNOWN_TITLE);
        assert_eq!(release.year.as_deref(), Some("2019"));
    }

    #[test]
    fn test_first_bracket_group_wins() {
        let release = extract("Film [Hindi] [x265] 480p").unwrap();
        assert_eq!(release.language_tags.as_deref(), Some("Hindi"));
    }

    #[test]
    fn test_first_parenthesized_year_wins() {
        let release = extract("Remake (1954) (2016) HDRip").unwrap();
        assert_eq!(release.year.as_deref(), Some("1954"));
    }

    #[test]
    fn test_year_must_be_parenthesized_four_digits() {
        let release = extract("Serial (123) part 720p").unwrap();
        assert_eq!(release.year, None);
    }

    #[test]
    fn test_missing_fields_do_not_block_emission() {
        let release = extract("Lone Feature CAM").unwrap();
        assert_eq!(release.title, "Lone Feature");
        assert_eq!(release.year, None);
        assert_eq!(release.language_tags, None);
        assert_eq!(release.quality, "CAM");
    }

    #[test]
    fn test_deterministic_and_idempotent() {
        let text = "Avengers Endgame (2019) [English] 1080p BluRay";
        let first = extract(text).unwrap();
        let second = extract(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_format_full_record() {
        let record = ReleaseRecord {
            release: ParsedRelease {
                title: "Avengers Endgame".to_string(),
                year: Some("2019".to_string()),
                quality: "1080p".to_string(),
                language_tags: Some("English".to_string()),
            },
            link: "https://t.me/c/74849/12".to_string(),
        };

        assert_eq!(
            format_record(&record),
            "🍿 Avengers Endgame (2019) [English] 1080p\n🔗 📥 Download Here (https://t.me/c/74849/12)"
        );
    }

    #[test]
    fn test_format_partial_record() {
        let record = ReleaseRecord {
            release: ParsedRelease {
                title: "Lone Feature".to_string(),
                year: None,
                quality: "CAM".to_string(),
                language_tags: None,
            },
            link: "https://t.me/c/74849/13".to_string(),
        };

        assert_eq!(
            format_record(&record),
            "🍿 Lone Feature   CAM\n🔗 📥 Download Here (https://t.me/c/74849/13)"
        );
    }
}
