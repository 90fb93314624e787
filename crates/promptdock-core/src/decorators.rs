//! Decorator source parsing.
//!
//! The source is a flat UTF-8 blob: segments separated by runs of three or
//! more hyphens, each segment carrying a ``#### `command` `` heading whose
//! backtick-quoted command starts with `+`. The free text after the heading
//! is the entry's description. Segments without a valid heading are skipped;
//! duplicate commands are kept as-is so the panel mirrors the source.

use smol_str::SmolStr;

/// Upstream decorator list fetched at widget startup.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/TaewonyNet/prompt-decorators-kor/refs/heads/main/prompt-decorators-kor.txt";

/// Built-in list used when the remote source is unreachable.
pub const FALLBACK_SOURCE: &str =
    "#### `++기본`\n기본 데코레이터입니다.\n-------------------\n#### `++요약`\n위 내용을 요약해줘.";

/// One entry from the decorator source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoratorEntry {
    /// The insertable command, `++` prefixed.
    pub command: SmolStr,
    /// Human-readable description, shown as the entry's tooltip.
    pub description: String,
}

impl DecoratorEntry {
    pub fn new(command: impl Into<SmolStr>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
        }
    }
}

/// Parse a decorator source blob into its entries, in source order.
pub fn parse_decorators(source: &str) -> Vec<DecoratorEntry> {
    split_segments(source)
        .into_iter()
        .filter_map(parse_segment)
        .collect()
}

/// Split on every run of three or more hyphens, wherever it appears.
fn split_segments(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut segments = Vec::new();
    let mut segment_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'-' {
            let run_start = i;
            while i < bytes.len() && bytes[i] == b'-' {
                i += 1;
            }
            if i - run_start >= 3 {
                segments.push(&source[segment_start..run_start]);
                segment_start = i;
            }
        } else {
            i += 1;
        }
    }
    segments.push(&source[segment_start..]);
    segments
}

/// Find the first well-formed heading in a segment.
fn parse_segment(segment: &str) -> Option<DecoratorEntry> {
    let mut search = 0;
    while let Some(found) = segment[search..].find("####") {
        let hashes = search + found;
        if let Some(entry) = parse_heading(segment, hashes + 4) {
            return Some(entry);
        }
        search = hashes + 1;
    }
    None
}

/// Try to read `` `command` `` starting just past the hashes at `pos`.
/// The command must open with `+` immediately after the backtick and be at
/// least two characters long once trailing padding is dropped; everything
/// after the closing backtick becomes the description.
fn parse_heading(segment: &str, pos: usize) -> Option<DecoratorEntry> {
    let rest = &segment[pos..];
    let open = pos + (rest.len() - rest.trim_start().len());
    if !segment[open..].starts_with('`') {
        return None;
    }
    let command_start = open + 1;
    if !segment[command_start..].starts_with('+') {
        return None;
    }
    let close = command_start + segment[command_start..].find('`')?;
    let command = segment[command_start..close].trim_end();
    if command.chars().count() < 2 {
        return None;
    }
    Some(DecoratorEntry {
        command: SmolStr::new(command),
        description: segment[close + 1..].trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_source_parses_to_two_entries() {
        let entries = parse_decorators(FALLBACK_SOURCE);
        assert_eq!(
            entries,
            vec![
                DecoratorEntry::new("++기본", "기본 데코레이터입니다."),
                DecoratorEntry::new("++요약", "위 내용을 요약해줘."),
            ]
        );
    }

    #[test]
    fn test_multi_line_description_is_kept() {
        let source = "#### `++review`\nLine one.\nLine two.\n---\n#### `++fix`\nFix it.";
        let entries = parse_decorators(source);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "Line one.\nLine two.");
    }

    #[test]
    fn test_segments_without_headings_are_skipped() {
        let source = "preamble text\n----\n#### `++only`\ndesc\n----\ntrailing notes";
        let entries = parse_decorators(source);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].command, "++only");
    }

    #[test]
    fn test_command_must_start_with_plus() {
        assert!(parse_decorators("#### `nope`\ndesc").is_empty());
        // A bare `+` is too short to be a command.
        assert!(parse_decorators("#### `+`\ndesc").is_empty());
        assert_eq!(parse_decorators("#### `++`\ndesc").len(), 1);
    }

    #[test]
    fn test_two_hyphens_do_not_split() {
        let source = "#### `++a`\nuses -- a dash pair\n#### `++b`\nsecond heading same segment";
        let entries = parse_decorators(source);
        // Only the first heading of the segment counts.
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].command, "++a");
        assert!(entries[0].description.contains("-- a dash pair"));
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let source = "#### `++same`\nfirst\n---\n#### `++same`\nsecond";
        let entries = parse_decorators(source);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command, entries[1].command);
        assert_ne!(entries[0].description, entries[1].description);
    }

    #[test]
    fn test_trailing_pad_inside_backticks_is_trimmed() {
        let entries = parse_decorators("####   `++padded `  \n  desc  ");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].command, "++padded");
        assert_eq!(entries[0].description, "desc");
    }

    #[test]
    fn test_leading_pad_inside_backticks_is_rejected() {
        // The command has to open right at the backtick.
        assert!(parse_decorators("#### ` ++padded`\ndesc").is_empty());
    }

    #[test]
    fn test_unterminated_heading_yields_nothing() {
        assert!(parse_decorators("#### `++broken\nno closing tick").is_empty());
    }

    #[test]
    fn test_empty_source() {
        assert!(parse_decorators("").is_empty());
        assert!(parse_decorators("--------").is_empty());
    }
}
