//! Pretty printer that remembers where every node landed.
//!
//! Produces exactly the text of `serde_json::to_string_pretty` (two-space
//! indentation) and records, for every path, the byte span of the member key
//! and of the value, plus token spans used for syntax colouring. The text
//! view highlights by offsets into this text instead of rewriting it.

use crate::domain::JsonPath;
use serde_json::Value;
use std::collections::HashMap;
use std::ops::Range;

/// Syntax class of a token in the printed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Key,
    String,
    Number,
    Literal,
}

/// Byte spans of one node in the printed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpan {
    /// Quoted member name, for object members only.
    pub key: Option<Range<usize>>,
    /// The whole value, brackets and quotes included.
    pub value: Range<usize>,
}

/// Printed document with its offset tables.
#[derive(Debug, Clone, Default)]
pub struct PrettyText {
    text: String,
    spans: HashMap<JsonPath, NodeSpan>,
    tokens: Vec<(Range<usize>, TokenKind)>,
    line_starts: Vec<usize>,
}

impl PrettyText {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn span(&self, path: &JsonPath) -> Option<&NodeSpan> {
        self.spans.get(path)
    }

    /// Token spans in text order.
    #[must_use]
    pub fn tokens(&self) -> &[(Range<usize>, TokenKind)] {
        &self.tokens
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte range of `line` without its trailing newline.
    #[must_use]
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |next| next - 1);
        Some(start..end)
    }

    /// Zero-based line containing byte `offset`.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }
}

enum Step<'a> {
    Value {
        value: &'a Value,
        path: JsonPath,
        key: Option<&'a str>,
        depth: usize,
        last: bool,
    },
    Close {
        path: JsonPath,
        key: Option<Range<usize>>,
        start: usize,
        bracket: char,
        depth: usize,
        last: bool,
    },
}

struct Printer {
    out: PrettyText,
}

impl Printer {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.text.push_str("  ");
        }
    }

    fn token(&mut self, fragment: &str, kind: TokenKind) -> Range<usize> {
        let start = self.out.text.len();
        self.out.text.push_str(fragment);
        let range = start..self.out.text.len();
        self.out.tokens.push((range.clone(), kind));
        range
    }

    fn record(&mut self, path: JsonPath, key: Option<Range<usize>>, start: usize) {
        let value = start..self.out.text.len();
        self.out.spans.insert(path, NodeSpan { key, value });
    }

    fn end_entry(&mut self, depth: usize, last: bool) {
        if depth == 0 {
            return;
        }
        if !last {
            self.out.text.push(',');
        }
        self.out.text.push('\n');
    }
}

fn quoted(raw: &str) -> String {
    serde_json::to_string(raw).unwrap_or_else(|_| format!("\"{raw}\""))
}

fn scalar_token(value: &Value) -> (String, TokenKind) {
    let kind = match value {
        Value::String(_) => TokenKind::String,
        Value::Number(_) => TokenKind::Number,
        _ => TokenKind::Literal,
    };
    let text = serde_json::to_string(value).unwrap_or_else(|_| value.to_string());
    (text, kind)
}

/// Prints `document` and records its spans.
///
/// # Example
///
/// ```
/// use jsonscope::domain::JsonPath;
/// use jsonscope::views::pretty::pretty_print;
/// use serde_json::json;
///
/// let doc = json!({"topic": "5G+ networks"});
/// let printed = pretty_print(&doc);
///
/// assert_eq!(printed.text(), "{\n  \"topic\": \"5G+ networks\"\n}");
/// let span = printed.span(&JsonPath::root().child_key("topic")).unwrap();
/// assert_eq!(&printed.text()[span.value.clone()], "\"5G+ networks\"");
/// ```
#[must_use]
pub fn pretty_print(document: &Value) -> PrettyText {
    let mut printer = Printer {
        out: PrettyText::default(),
    };
    let mut stack = vec![Step::Value {
        value: document,
        path: JsonPath::root(),
        key: None,
        depth: 0,
        last: true,
    }];

    while let Some(step) = stack.pop() {
        match step {
            Step::Value { value, path, key, depth, last } => {
                printer.indent(depth);
                let key_span = key.map(|k| {
                    let span = printer.token(&quoted(k), TokenKind::Key);
                    printer.out.text.push_str(": ");
                    span
                });
                let start = printer.out.text.len();

                match value {
                    Value::Object(map) if !map.is_empty() => {
                        printer.out.text.push_str("{\n");
                        let children: Vec<Step<'_>> = map
                            .iter()
                            .enumerate()
                            .map(|(i, (k, v))| Step::Value {
                                value: v,
                                path: path.child_key(k),
                                key: Some(k.as_str()),
                                depth: depth + 1,
                                last: i + 1 == map.len(),
                            })
                            .collect();
                        stack.push(Step::Close { path, key: key_span, start, bracket: '}', depth, last });
                        stack.extend(children.into_iter().rev());
                    }
                    Value::Array(items) if !items.is_empty() => {
                        printer.out.text.push_str("[\n");
                        let children: Vec<Step<'_>> = items
                            .iter()
                            .enumerate()
                            .map(|(i, v)| Step::Value {
                                value: v,
                                path: path.child_index(i),
                                key: None,
                                depth: depth + 1,
                                last: i + 1 == items.len(),
                            })
                            .collect();
                        stack.push(Step::Close { path, key: key_span, start, bracket: ']', depth, last });
                        stack.extend(children.into_iter().rev());
                    }
                    Value::Object(_) => {
                        printer.out.text.push_str("{}");
                        printer.record(path, key_span, start);
                        printer.end_entry(depth, last);
                    }
                    Value::Array(_) => {
                        printer.out.text.push_str("[]");
                        printer.record(path, key_span, start);
                        printer.end_entry(depth, last);
                    }
                    scalar => {
                        let (text, kind) = scalar_token(scalar);
                        printer.token(&text, kind);
                        printer.record(path, key_span, start);
                        printer.end_entry(depth, last);
                    }
                }
            }
            Step::Close { path, key, start, bracket, depth, last } => {
                printer.indent(depth);
                printer.out.text.push(bracket);
                printer.record(path, key, start);
                printer.end_entry(depth, last);
            }
        }
    }

    let mut out = printer.out;
    out.line_starts = std::iter::once(0)
        .chain(out.text.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "name": "Ünïcode \"quoted\"\n",
            "empty_obj": {},
            "empty_arr": [],
            "nested": {"list": [1, 2.5, -3, true, null, {"k": "v"}]},
            "last": false
        })
    }

    #[test]
    fn output_matches_serde_pretty() {
        for doc in [sample(), json!([]), json!({}), json!("solo"), json!([[[]], {"a": {}}])] {
            let expected = serde_json::to_string_pretty(&doc).unwrap();
            assert_eq!(pretty_print(&doc).text(), expected);
        }
    }

    #[test]
    fn spans_cover_keys_and_values() {
        let printed = pretty_print(&sample());
        let text = printed.text();

        let nested = printed.span(&JsonPath::root().child_key("nested")).unwrap();
        assert_eq!(&text[nested.key.clone().unwrap()], "\"nested\"");
        assert!(text[nested.value.clone()].starts_with('{'));
        assert!(text[nested.value.clone()].ends_with('}'));

        let k = JsonPath::root().child_key("nested").child_key("list").child_index(5).child_key("k");
        assert_eq!(&text[printed.span(&k).unwrap().value.clone()], "\"v\"");

        let element = JsonPath::root().child_key("nested").child_key("list").child_index(1);
        let span = printed.span(&element).unwrap();
        assert!(span.key.is_none());
        assert_eq!(&text[span.value.clone()], "2.5");

        let root = printed.span(&JsonPath::root()).unwrap();
        assert_eq!(root.value, 0..text.len());
    }

    #[test]
    fn every_node_has_a_span() {
        let doc = sample();
        let printed = pretty_print(&doc);
        // 1 root + 5 members + list container + 6 elements + "k"
        assert_eq!(printed.spans.len(), 1 + 5 + 1 + 6 + 1);
    }

    #[test]
    fn line_table_is_consistent() {
        let printed = pretty_print(&json!({"a": [1, 2]}));
        assert_eq!(printed.line_count(), 6);
        let lines: Vec<&str> = (0..printed.line_count())
            .map(|i| &printed.text()[printed.line_range(i).unwrap()])
            .collect();
        assert_eq!(lines, vec!["{", "  \"a\": [", "    1,", "    2", "  ]", "}"]);

        let two = printed.span(&JsonPath::root().child_key("a").child_index(1)).unwrap();
        assert_eq!(printed.line_of(two.value.start), 3);
        assert!(printed.line_range(6).is_none());
    }

    #[test]
    fn tokens_classify_scalars() {
        let printed = pretty_print(&json!({"n": 1, "s": "x", "b": null}));
        let kinds: Vec<(String, TokenKind)> = printed
            .tokens()
            .iter()
            .map(|(r, k)| (printed.text()[r.clone()].to_string(), *k))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("\"n\"".into(), TokenKind::Key),
                ("1".into(), TokenKind::Number),
                ("\"s\"".into(), TokenKind::Key),
                ("\"x\"".into(), TokenKind::String),
                ("\"b\"".into(), TokenKind::Key),
                ("null".into(), TokenKind::Literal),
            ]
        );
    }
}
