//! Hide framework macros from the grammar.
//!
//! Qt headers use `Q_OBJECT`, `public slots:`, `signals:` and friends,
//! none of which is valid C++ to a parser that does not expand macros.
//! Each occurrence is rewritten in place into a marker comment
//! (`/*@mw:...*/`) so that line numbers are unchanged and the extractor can
//! still see where the macro was.

use std::sync::LazyLock;

use regex::Regex;

/// Marker comment prefix.
pub const MARKER_PREFIX: &str = "/*@mw:";

static SLOT_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(public|protected|private)\s+(slots|Q_SLOTS)\s*:").expect("slot section regex")
});

static SIGNAL_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s*)(signals|Q_SIGNALS)\s*:").expect("signal section regex")
});

static OBJECT_MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(Q_OBJECT|Q_GADGET)\b").expect("object macro regex")
});

static PREFIX_MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(Q_SLOT|Q_SIGNAL|Q_INVOKABLE)\b").expect("prefix macro regex")
});

static CALL_MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(Q_PROPERTY|Q_ENUM|Q_FLAG|Q_INTERFACES|Q_CLASSINFO|Q_DISABLE_COPY|Q_DISABLE_MOVE|Q_DISABLE_COPY_MOVE|Q_DECLARE_PRIVATE)\s*\(([^()\n]|\([^()\n]*\))*\)",
    )
    .expect("call macro regex")
});

/// A marker left behind by [`hide_framework_macros`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// Applies to every member up to the next access specifier.
    Section(String),
    /// Applies to the next member only.
    Prefix(String),
    /// `Q_OBJECT` or `Q_GADGET`.
    Object,
    /// A macro call with no effect on members.
    Ignored(String),
}

/// Rewrite framework macros into marker comments. Comments and string or
/// character literals are left untouched.
#[must_use]
pub fn hide_framework_macros(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for (is_code, piece) in segments(source) {
        if is_code {
            out.push_str(&rewrite_code(piece));
        } else {
            out.push_str(piece);
        }
    }
    out
}

fn rewrite_code(code: &str) -> String {
    let out = SLOT_SECTION.replace_all(code, "$1: /*@mw:section:slots*/");
    let out = SIGNAL_SECTION.replace_all(&out, "${1}public: /*@mw:section:signals*/");
    let out = OBJECT_MACRO.replace_all(&out, "/*@mw:object:$1*/");
    let out = PREFIX_MACRO.replace_all(&out, "/*@mw:prefix:$1*/");
    let out = CALL_MACRO.replace_all(&out, "/*@mw:ignored:$1*/");
    out.into_owned()
}

/// Split `source` into code and non-code pieces, in order. Non-code pieces
/// are comments and string, raw string and character literals.
fn segments(source: &str) -> Vec<(bool, &str)> {
    let bytes = source.as_bytes();
    let mut pieces = Vec::new();
    let mut code_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let end = match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                Some(find_from(source, i + 2, "\n").unwrap_or(bytes.len()))
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                Some(find_from(source, i + 2, "*/").map_or(bytes.len(), |end| end + 2))
            }
            b'"' if i > 0 && bytes[i - 1] == b'R' => Some(raw_string_end(source, i)),
            b'"' => Some(quoted_end(bytes, i)),
            // `1'000` is a digit separator, not a character literal.
            b'\'' if i == 0 || !bytes[i - 1].is_ascii_alphanumeric() => Some(quoted_end(bytes, i)),
            _ => None,
        };
        let Some(end) = end else {
            i += 1;
            continue;
        };
        if code_start < i {
            pieces.push((true, &source[code_start..i]));
        }
        pieces.push((false, &source[i..end]));
        code_start = end;
        i = end;
    }
    if code_start < bytes.len() {
        pieces.push((true, &source[code_start..]));
    }
    pieces
}

fn find_from(source: &str, from: usize, needle: &str) -> Option<usize> {
    source.get(from..)?.find(needle).map(|pos| pos + from)
}

/// End of the literal opened by the quote at `open`. An unterminated
/// literal ends at the end of its line.
fn quoted_end(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let mut j = open + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// End of `R"delim( ... )delim"` opened at `open`.
fn raw_string_end(source: &str, open: usize) -> usize {
    let Some(paren) = find_from(source, open + 1, "(") else {
        return source.len();
    };
    let closing = format!("){}\"", &source[open + 1..paren]);
    find_from(source, paren + 1, &closing).map_or(source.len(), |end| end + closing.len())
}

/// Decode a comment written by [`hide_framework_macros`].
#[must_use]
pub fn parse_marker(comment: &str) -> Option<Marker> {
    let body = comment.trim().strip_prefix(MARKER_PREFIX)?.strip_suffix("*/")?;
    let (kind, value) = body.split_once(':')?;
    match kind {
        "section" => Some(Marker::Section(value.to_string())),
        "prefix" => Some(Marker::Prefix(value.to_string())),
        "object" => Some(Marker::Object),
        "ignored" => Some(Marker::Ignored(value.to_string())),
        _ => None,
    }
}

/// All prefix markers appearing inside `text` (e.g. `virtual Q_INVOKABLE`
/// written after other specifiers).
pub fn inline_prefix_markers(text: &str) -> impl Iterator<Item = String> + '_ {
    text.match_indices(MARKER_PREFIX).filter_map(|(idx, _)| {
        let rest = &text[idx..];
        let end = rest.find("*/")? + 2;
        match parse_marker(&rest[..end]) {
            Some(Marker::Prefix(name)) => Some(name),
            _ => None,
        }
    })
}
