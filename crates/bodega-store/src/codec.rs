//! # Field Codec
//!
//! Escaping and splitting for the `;`-delimited flat format every store
//! writes.
//!
//! ## Escape Set
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   character        on disk        reason                                │
//! │   ─────────        ───────        ──────────────────────────────        │
//! │   \                \\             the escape character itself           │
//! │   ;                \;             the field delimiter                   │
//! │   newline          \n             records are one physical line         │
//! │                                                                         │
//! │   escape → unescape and escape-join → split are mutually inverse        │
//! │   for every input string; the codec is total (it never fails).          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// Field delimiter used by every store file.
pub const DELIMITER: char = ';';

/// Escapes one field for embedding in a record line.
pub fn escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Reverses [`escape`] on a single field.
///
/// Unknown escape sequences decode to the escaped character itself, and a
/// trailing lone backslash is dropped, so the function is total.
pub fn unescape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut escaped = false;
    for c in field.chars() {
        if escaped {
            out.push(if c == 'n' { '\n' } else { c });
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// Splits a record line into its unescaped fields.
///
/// The inverse of joining escaped fields with [`DELIMITER`]; an empty line
/// yields one empty field.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in line.chars() {
        if escaped {
            current.push(if c == 'n' { '\n' } else { c });
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            ';' => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}

/// Joins fields into one record line, escaping each.
pub fn join_fields(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(";")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_unescape_inverse() {
        let cases = [
            "plain",
            "",
            "semi;colon",
            "back\\slash",
            "new\nline",
            "all;of\\them\ntogether;;\\\\",
            "trailing\\",
        ];
        for case in cases {
            assert_eq!(unescape(&escape(case)), case, "round-trip of {case:?}");
        }
    }

    #[test]
    fn test_escaped_delimiter_does_not_split() {
        let line = join_fields(&["a;b", "c"]);
        assert_eq!(line, "a\\;b;c");
        assert_eq!(split_fields(&line), vec!["a;b", "c"]);
    }

    #[test]
    fn test_split_join_inverse() {
        let fields = vec!["id-1", "name; with delimiter", "line\nbreak", "", "x\\y"];
        let line = join_fields(&fields);
        assert!(!line.contains('\n'));
        assert_eq!(split_fields(&line), fields);
    }

    #[test]
    fn test_split_plain_line() {
        assert_eq!(split_fields("a;b;c"), vec!["a", "b", "c"]);
        assert_eq!(split_fields(""), vec![""]);
        assert_eq!(split_fields(";"), vec!["", ""]);
    }

    #[test]
    fn test_unescape_is_total() {
        // unknown escapes decode to the character, a lone trailing backslash
        // is dropped
        assert_eq!(unescape("\\x"), "x");
        assert_eq!(unescape("abc\\"), "abc");
    }
}
