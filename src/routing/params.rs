//! `:name` route parameters in slugs, React-Router style.

use std::collections::{BTreeMap, HashSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Param(&'a str),
}

/// Split `slug` into literal text and `:name` parameters.
///
/// A name starts with an ASCII letter or `_` and continues with ASCII alphanumerics or
/// `_`; a `:` not followed by a valid name stays literal.
fn pieces(slug: &str) -> Vec<Piece<'_>> {
    let bytes = slug.as_bytes();
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let starts_name = bytes[i] == b':'
            && bytes
                .get(i + 1)
                .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_');
        if !starts_name {
            i += 1;
            continue;
        }
        let mut end = i + 2;
        while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
            end += 1;
        }
        if literal_start < i {
            out.push(Piece::Literal(&slug[literal_start..i]));
        }
        out.push(Piece::Param(&slug[i + 1..end]));
        literal_start = end;
        i = end;
    }
    if literal_start < slug.len() {
        out.push(Piece::Literal(&slug[literal_start..]));
    }
    out
}

/// Parameter names in `slug`, in order of appearance.
pub fn extract_dynamic_params(slug: &str) -> Vec<String> {
    pieces(slug)
        .into_iter()
        .filter_map(|p| match p {
            Piece::Param(name) => Some(name.to_string()),
            Piece::Literal(_) => None,
        })
        .collect()
}

/// Whether `slug` contains at least one parameter.
pub fn has_dynamic_params(slug: &str) -> bool {
    pieces(slug).iter().any(|p| matches!(p, Piece::Param(_)))
}

/// Substitute known parameters; unknown ones stay as `:name`.
pub fn fill_dynamic_params(slug: &str, params: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(slug.len());
    for piece in pieces(slug) {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Param(name) => match params.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push(':');
                    out.push_str(name);
                }
            },
        }
    }
    out
}

/// Match `url` against `pattern`, returning parameter values on a full match.
///
/// Each parameter matches one or more characters other than `/`. Failed
/// `(piece, offset)` states are remembered, so adjacent parameters stay polynomial.
pub fn match_dynamic_url(pattern: &str, url: &str) -> Option<BTreeMap<String, String>> {
    let mut matcher = Matcher {
        pieces: pieces(pattern),
        url,
        failed: HashSet::new(),
        params: BTreeMap::new(),
    };
    matcher.matches(0, 0).then_some(matcher.params)
}

struct Matcher<'p, 'u> {
    pieces: Vec<Piece<'p>>,
    url: &'u str,
    failed: HashSet<(usize, usize)>,
    params: BTreeMap<String, String>,
}

impl Matcher<'_, '_> {
    fn matches(&mut self, piece: usize, at: usize) -> bool {
        let Some(&current) = self.pieces.get(piece) else {
            return at == self.url.len();
        };
        if self.failed.contains(&(piece, at)) {
            return false;
        }
        let url = self.url;
        let rest = &url[at..];
        let hit = match current {
            Piece::Literal(text) => {
                rest.starts_with(text) && self.matches(piece + 1, at + text.len())
            }
            Piece::Param(name) => {
                let limit = rest.find('/').unwrap_or(rest.len());
                // Greedy: try the longest value first.
                let ends: Vec<usize> = rest[..limit]
                    .char_indices()
                    .map(|(i, c)| i + c.len_utf8())
                    .rev()
                    .collect();
                let found = ends.into_iter().find(|&end| self.matches(piece + 1, at + end));
                if let Some(end) = found {
                    self.params
                        .entry(name.to_string())
                        .or_insert_with(|| rest[..end].to_string());
                }
                found.is_some()
            }
        };
        if !hit {
            self.failed.insert((piece, at));
        }
        hit
    }
}

#[cfg(test)]
#[path = "../../tests/unit/routing/params.rs"]
mod tests;
