//! Loading YAML/JSON files into a [`Value`] tree.
//!
//! Mapping from YAML to `Value`:
//!   - YAML null                  -> Value::Null
//!   - YAML bool                  -> Value::Bool
//!   - YAML integer               -> Value::Integer (BigInt, up to 128 bits)
//!   - YAML float                 -> Value::Float
//!   - YAML string `YYYY-MM-DD`   -> Value::Date (when a valid calendar date)
//!   - YAML string                -> Value::String
//!   - YAML sequence              -> Value::Sequence
//!   - YAML mapping               -> Value::Mapping (source key order)
//!   - tagged value               -> its inner value
//!
//! Aliases are expanded by the parser and merge keys (`<<`) are resolved
//! here, so the resulting tree has no shared nodes.

use crate::classify::is_iso_date;
use crate::encode::encode_float;
use crate::error::{Error, Result};
use crate::value::Value;
use chrono::NaiveDate;
use num_bigint::BigInt;
use regex::{Captures, Regex};
use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, instrument, trace};

const MERGE_KEY: &str = "<<";

/// Input format of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Yaml,
    /// Read through the YAML parser; JSON is a subset of YAML.
    Json,
}

impl InputFormat {
    /// Infer a format from a file extension. Only YAML is inferred; JSON
    /// input has to be asked for explicitly.
    pub fn from_extension(path: &Path) -> Option<InputFormat> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(InputFormat::Yaml),
            _ => None,
        }
    }

    /// Pick the explicit format if given, otherwise infer from `path`.
    pub fn resolve(explicit: Option<InputFormat>, path: &Path) -> Result<InputFormat> {
        explicit
            .or_else(|| InputFormat::from_extension(path))
            .ok_or_else(|| Error::Format(path.to_path_buf()))
    }
}

/// Options controlling how a file is loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Explicit format; inferred from the extension when `None`.
    pub format: Option<InputFormat>,
    /// Replace `${NAME}` tokens before parsing.
    pub substitute_env: bool,
}

/// Environment lookup backed by the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\$\{(\w+)\}").expect("valid env token pattern"))
}

/// Replace every `${NAME}` in `raw` with `lookup(NAME)`, or nothing if unset.
///
/// This is a textual substitution on the raw source, so a value may
/// introduce YAML structure of its own.
pub fn substitute_env<'a, F>(raw: &'a str, lookup: F) -> Cow<'a, str>
where
    F: Fn(&str) -> Option<String>,
{
    env_token().replace_all(raw, |caps: &Captures| {
        let var = &caps[1];
        let value = lookup(var);
        if value.is_none() {
            trace!(var, "environment variable not set, substituting empty string");
        }
        value.unwrap_or_default()
    })
}

/// Load a file using the process environment for substitution.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Value> {
    load_file_with(path, options, process_env)
}

/// Load a file, resolving `${NAME}` tokens through `lookup`.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_file_with<F>(path: &Path, options: &LoadOptions, lookup: F) -> Result<Value>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = fs::read_to_string(path).map_err(|e| Error::reading(path, e))?;
    let text = if options.substitute_env {
        substitute_env(&raw, lookup)
    } else {
        Cow::Borrowed(raw.as_str())
    };

    let format = InputFormat::resolve(options.format, path)?;
    debug!(?format, bytes = text.len(), "parsing input");
    parse_documents(&text)
}

/// Parse every `---` separated document in `input`.
///
/// No documents yields `Null`, a single document yields its value, and
/// several yield a `Sequence` with one item per document.
pub fn parse_documents(input: &str) -> Result<Value> {
    let mut docs = Vec::new();
    for document in serde_yaml::Deserializer::from_str(input) {
        let node = Node::deserialize(document)?;
        docs.push(node_to_value(node)?);
    }
    debug!(documents = docs.len(), "parsed input");

    Ok(match docs.len() {
        0 => Value::Null,
        1 => docs.pop().unwrap_or(Value::Null),
        _ => Value::Sequence(docs),
    })
}

/// Parsed YAML node before merge keys and mapping keys are resolved.
///
/// `serde_yaml::Value` only holds 64-bit integers, while the parser hands
/// out anything up to 128 bits, so nodes are collected here instead.
/// Mappings keep every entry in source order; a repeated key overrides the
/// earlier one when the mapping is converted.
#[derive(Debug)]
enum Node {
    Null,
    Bool(bool),
    Integer(BigInt),
    Float(f64),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Vec<(Node, Node)>),
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        Node::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> std::result::Result<Node, E> {
        Ok(Node::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> std::result::Result<Node, E> {
        Ok(Node::Integer(BigInt::from(n)))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> std::result::Result<Node, E> {
        Ok(Node::Integer(BigInt::from(n)))
    }

    fn visit_i128<E: de::Error>(self, n: i128) -> std::result::Result<Node, E> {
        Ok(Node::Integer(BigInt::from(n)))
    }

    fn visit_u128<E: de::Error>(self, n: u128) -> std::result::Result<Node, E> {
        Ok(Node::Integer(BigInt::from(n)))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> std::result::Result<Node, E> {
        Ok(Node::Float(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Node, E> {
        Ok(Node::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> std::result::Result<Node, E> {
        Ok(Node::String(s))
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items: Vec<Node> = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries: Vec<(Node, Node)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry()? {
            entries.push(entry);
        }
        Ok(Node::Mapping(entries))
    }

    /// Tagged values arrive as single-variant enums; the tag is dropped.
    fn visit_enum<A>(self, data: A) -> std::result::Result<Node, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (_tag, contents): (String, A::Variant) = data.variant()?;
        contents.newtype_variant()
    }
}

fn node_to_value(node: Node) -> Result<Value> {
    Ok(match node {
        Node::Null => Value::Null,
        Node::Bool(b) => Value::Bool(b),
        Node::Integer(n) => Value::Integer(n),
        Node::Float(f) => Value::Float(f),
        Node::String(s) => string_to_value(s),
        Node::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(node_to_value)
                .collect::<Result<Vec<Value>>>()?,
        ),
        Node::Mapping(entries) => Value::Mapping(mapping_pairs(entries)?),
    })
}

fn is_merge_key(key: &Node) -> bool {
    matches!(key, Node::String(s) if s == MERGE_KEY)
}

/// Convert a mapping, resolving `<<` merge keys.
///
/// Merged keys come first, in the order of their source mappings; the
/// mapping's own keys then override in place or are appended.
fn mapping_pairs(entries: Vec<(Node, Node)>) -> Result<Vec<(String, Value)>> {
    let mut merged = Vec::new();
    let mut own = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        if is_merge_key(&k) {
            merged = merge_sources(v)?;
        } else {
            own.push((mapping_key(k)?, node_to_value(v)?));
        }
    }

    let mut pairs = merged;
    for (k, v) in own {
        insert_pair(&mut pairs, k, v);
    }
    Ok(pairs)
}

/// Pairs contributed by a `<<` value. In a sequence, earlier mappings
/// take precedence over later ones.
fn merge_sources(value: Node) -> Result<Vec<(String, Value)>> {
    match value {
        Node::Mapping(entries) => mapping_pairs(entries),
        Node::Sequence(items) => {
            let mut pairs = Vec::new();
            for item in items.into_iter().rev() {
                match item {
                    Node::Mapping(entries) => {
                        for (k, v) in mapping_pairs(entries)? {
                            insert_pair(&mut pairs, k, v);
                        }
                    }
                    _ => {
                        return Err(Error::Parse(
                            "Merge sequence items must be mappings".to_string(),
                        ))
                    }
                }
            }
            Ok(pairs)
        }
        _ => Err(Error::Parse(
            "Merge value must be a mapping or a sequence of mappings".to_string(),
        )),
    }
}

fn insert_pair(pairs: &mut Vec<(String, Value)>, key: String, value: Value) {
    match pairs.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => pairs.push((key, value)),
    }
}

/// Stringify a scalar mapping key. Booleans and null are spelled
/// `True`, `False` and `None`.
fn mapping_key(key: Node) -> Result<String> {
    match key {
        Node::String(s) => Ok(s),
        Node::Integer(n) => Ok(n.to_string()),
        Node::Float(f) => Ok(encode_float(f)),
        Node::Bool(true) => Ok("True".to_string()),
        Node::Bool(false) => Ok("False".to_string()),
        Node::Null => Ok("None".to_string()),
        _ => Err(Error::Parse(format!(
            "Unsupported YAML mapping key type: {:?}",
            key
        ))),
    }
}

/// Re-tag bare ISO dates, which serde_yaml leaves as strings.
fn string_to_value(s: String) -> Value {
    if is_iso_date(&s) {
        if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Value::Date(date);
        }
    }
    Value::String(s)
}
