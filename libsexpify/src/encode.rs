//! Encode a [`Value`] tree as S-expression text.
//!
//! Mappings become `(prefix:key value)` forms, sequences become a list of
//! `(prefix:item value)` forms, and scalars are rendered according to
//! [`classify`](crate::classify::classify).

use crate::classify::{classify, ScalarKind};
use crate::Value;
use chrono::Datelike;

/// Prefix used when none is given.
pub const DEFAULT_PREFIX: &str = "yaml";

/// Whether the value being encoded sits directly under a mapping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Document root or sequence item: mapping pairs go on separate lines.
    Unkeyed,
    /// Value of a key: mapping pairs share one line.
    Keyed,
}

/// Recursive tree-to-text encoder.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'p> {
    prefix: &'p str,
}

impl Default for Encoder<'static> {
    fn default() -> Self {
        Encoder::new(DEFAULT_PREFIX)
    }
}

impl<'p> Encoder<'p> {
    pub fn new(prefix: &'p str) -> Self {
        Encoder { prefix }
    }

    /// Encode `value` as a document root.
    pub fn encode(&self, value: &Value) -> String {
        self.encode_value(value, Position::Unkeyed)
    }

    fn encode_value(&self, value: &Value, position: Position) -> String {
        match value {
            Value::Null => "'nil".to_string(),
            Value::Bool(true) => "#t".to_string(),
            Value::Bool(false) => "#f".to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => encode_float(*f),
            Value::String(s) => encode_string(s),
            Value::Date(d) => format!("(make-date {} {:02} {:02})", d.year(), d.month(), d.day()),
            Value::Sequence(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|v| {
                        format!(
                            "({}:item {})",
                            self.prefix,
                            self.encode_value(v, Position::Unkeyed)
                        )
                    })
                    .collect();
                format!("(\n{})", items.join("\n"))
            }
            Value::Mapping(pairs) => {
                let items: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "({}:{} {})",
                            self.prefix,
                            k,
                            self.encode_value(v, Position::Keyed)
                        )
                    })
                    .collect();
                let separator = match position {
                    Position::Unkeyed => "\n",
                    Position::Keyed => " ",
                };
                items.join(separator)
            }
        }
    }
}

/// Encode a single value with the given prefix.
pub fn encode(value: &Value, prefix: &str) -> String {
    Encoder::new(prefix).encode(value)
}

/// Encode loaded data with its outer parentheses.
///
/// A sequence whose items are all mappings (typically a multi-document
/// file) has each item parenthesized on its own, and the group wrapped once
/// more. Anything else is wrapped in a single pair.
pub fn encode_documents(value: &Value, prefix: &str) -> String {
    let encoder = Encoder::new(prefix);
    match value {
        Value::Sequence(docs) if docs.iter().all(Value::is_mapping) => {
            let docs: Vec<String> = docs
                .iter()
                .map(|doc| format!("({})", encoder.encode(doc)))
                .collect();
            format!("({})", docs.join(" "))
        }
        _ => format!("({})", encoder.encode(value)),
    }
}

/// Render a float the way its shortest round-trip text reads: positional
/// for decimal exponents in `-4..16`, otherwise `<mantissa>e<sign><exp>`
/// with at least two exponent digits.
pub(crate) fn encode_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{:e}", f);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..16).contains(&exponent) {
        let s = format!("{}", f);
        if s.contains('.') {
            s
        } else {
            format!("{}.0", s)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
    }
}

fn encode_string(s: &str) -> String {
    match classify(s) {
        ScalarKind::Date { year, month, day } => format!("(make-date {} {} {})", year, month, day),
        ScalarKind::Symbol => format!("'{}", s),
        ScalarKind::Placeholder | ScalarKind::Plain => quote_string(s),
    }
}

/// Double-quote a string. Line breaks are escaped so they cannot be taken
/// for structure by the pretty printer.
fn quote_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}
