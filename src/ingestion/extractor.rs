use crate::domain::Tuple;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// A bracketed group without nested brackets: `( ... )` or `[ ... ]`.
static TRIPLE_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^()]*)\)|\[([^\[\]]*)\]").unwrap());

/// Extracts every well-formed `(subject, predicate, object)` triple from a model completion.
///
/// Each line is scanned for bracketed groups; a group becomes a tuple when it splits into
/// exactly three non-empty comma-separated fields. Groups that still contain brackets, such
/// as `[(a, b, c), (d, e, f)]`, are scanned again for the triples inside them. Anything else
/// is skipped, so the worst case is an empty result. Output order follows the input.
pub fn extract_tuples(text: &str) -> Vec<Tuple> {
    let mut tuples = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let before = tuples.len();
        scan_groups(line, &mut tuples);
        if tuples.len() == before && !line.trim().is_empty() {
            debug!(line = index + 1, "no tuple found on line");
        }
    }
    tuples
}

fn scan_groups(text: &str, tuples: &mut Vec<Tuple>) {
    for captures in TRIPLE_GROUP.captures_iter(text) {
        let inner = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map_or("", |m| m.as_str());
        if inner.contains(['(', ')', '[', ']']) {
            scan_groups(inner, tuples);
        } else if let Some(tuple) = parse_group(inner) {
            tuples.push(tuple);
        }
    }
}

fn parse_group(inner: &str) -> Option<Tuple> {
    let fields: Vec<&str> = inner.split(',').map(strip_quotes).collect();
    let [subject, predicate, object] = fields.as_slice() else {
        return None;
    };
    Tuple::from_fields(subject, predicate, object)
}

fn strip_quotes(field: &str) -> &str {
    field
        .trim()
        .trim_matches(|c: char| {
            matches!(
                c,
                '"' | '\'' | '`' | '\u{201c}' | '\u{201d}' | '\u{2018}' | '\u{2019}'
            )
        })
}
