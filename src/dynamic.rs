//! Lossless conversion of arbitrary JSON into [`DynamicValue`].
//!
//! Upstream analysis documents change shape between versions, so the
//! normalizer never deserializes them into fixed structs. Every node is
//! converted into a tagged union instead, keeping the integer/float
//! distinction and the key order of the source document.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Insertion-ordered mapping of keys to dynamic values.
pub type DynamicMap = IndexMap<String, DynamicValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DynamicValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<DynamicValue>),
    Object(DynamicMap),
}

impl DynamicValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            DynamicValue::Null => "null",
            DynamicValue::Bool(_) => "bool",
            DynamicValue::Int(_) => "int",
            DynamicValue::Float(_) => "float",
            DynamicValue::String(_) => "string",
            DynamicValue::Array(_) => "array",
            DynamicValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DynamicValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynamicValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view. Floats are not truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DynamicValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DynamicValue::Int(i) => Some(*i as f64),
            DynamicValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DynamicValue]> {
        match self {
            DynamicValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DynamicMap> {
        match self {
            DynamicValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl From<&Value> for DynamicValue {
    fn from(node: &Value) -> Self {
        to_dynamic_value(node)
    }
}

impl From<DynamicValue> for Value {
    fn from(value: DynamicValue) -> Self {
        match value {
            DynamicValue::Null => Value::Null,
            DynamicValue::Bool(b) => Value::Bool(b),
            DynamicValue::Int(i) => Value::Number(i.into()),
            DynamicValue::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            DynamicValue::String(s) => Value::String(s),
            DynamicValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            DynamicValue::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for DynamicValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let node = Value::deserialize(deserializer)?;
        Ok(to_dynamic_value(&node))
    }
}

/// Deepest container nesting [`parse_json`] accepts.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Parses JSON text nested up to [`MAX_NESTING_DEPTH`] levels.
///
/// serde_json's parser recurses per level, so its default 128-level limit is
/// replaced by a pre-scan that rejects deeper documents with an error instead
/// of exhausting the stack.
pub fn parse_json(text: &str) -> serde_json::Result<Value> {
    let depth = nesting_depth(text);
    if depth > MAX_NESTING_DEPTH {
        return Err(<serde_json::Error as serde::de::Error>::custom(format!(
            "document nests {} levels deep, the limit is {}",
            depth, MAX_NESTING_DEPTH
        )));
    }

    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let node = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(node)
}

// Deepest bracket nesting outside string literals. Malformed text is left
// for the parser to report.
fn nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

// Partially built container on the conversion work stack.
enum Frame<'a> {
    Array {
        items: Vec<DynamicValue>,
        rest: std::slice::Iter<'a, Value>,
    },
    Object {
        entries: DynamicMap,
        rest: serde_json::map::Iter<'a>,
        key: Option<&'a String>,
    },
}

impl<'a> Frame<'a> {
    fn next_child(&mut self) -> Option<&'a Value> {
        match self {
            Frame::Array { rest, .. } => rest.next(),
            Frame::Object { rest, key, .. } => rest.next().map(|(k, v)| {
                *key = Some(k);
                v
            }),
        }
    }

    fn accept(&mut self, value: DynamicValue) {
        match self {
            Frame::Array { items, .. } => items.push(value),
            Frame::Object { entries, key, .. } => {
                if let Some(k) = key.take() {
                    entries.insert(k.clone(), value);
                }
            }
        }
    }

    fn finish(self) -> DynamicValue {
        match self {
            Frame::Array { items, .. } => DynamicValue::Array(items),
            Frame::Object { entries, .. } => DynamicValue::Object(entries),
        }
    }
}

fn number(n: &Number) -> DynamicValue {
    if let Some(i) = n.as_i64() {
        DynamicValue::Int(i)
    } else if let Some(f) = n.as_f64() {
        // Covers fractional values and unsigned integers above i64::MAX.
        DynamicValue::Float(f)
    } else {
        DynamicValue::Null
    }
}

// Leaves convert immediately; containers push a frame and return None.
fn open<'a>(node: &'a Value, stack: &mut Vec<Frame<'a>>) -> Option<DynamicValue> {
    match node {
        Value::Null => Some(DynamicValue::Null),
        Value::Bool(b) => Some(DynamicValue::Bool(*b)),
        Value::Number(n) => Some(number(n)),
        Value::String(s) => Some(DynamicValue::String(s.clone())),
        Value::Array(items) => {
            stack.push(Frame::Array {
                items: Vec::with_capacity(items.len()),
                rest: items.iter(),
            });
            None
        }
        Value::Object(map) => {
            stack.push(Frame::Object {
                entries: DynamicMap::with_capacity(map.len()),
                rest: map.iter(),
                key: None,
            });
            None
        }
    }
}

/// Converts any JSON node into a [`DynamicValue`].
///
/// Total: every node maps to exactly one variant. Containers are walked with
/// an explicit work stack, so nesting depth does not consume call stack.
pub fn to_dynamic_value(node: &Value) -> DynamicValue {
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut completed = open(node, &mut stack);

    loop {
        if let Some(value) = completed.take() {
            match stack.last_mut() {
                Some(parent) => parent.accept(value),
                None => return value,
            }
        }

        let Some(top) = stack.last_mut() else {
            return DynamicValue::Null;
        };

        completed = match top.next_child() {
            Some(child) => open(child, &mut stack),
            None => stack.pop().map(Frame::finish),
        };
    }
}

/// Projects an object node into a mapping.
///
/// Absent, null and non-object nodes all yield an empty mapping.
pub fn to_mapping(node: Option<&Value>) -> DynamicMap {
    match node.filter(|n| n.is_object()).map(to_dynamic_value) {
        Some(DynamicValue::Object(map)) => map,
        _ => DynamicMap::new(),
    }
}

/// Projects an array of objects into a sequence of mappings.
///
/// Elements that are not objects are skipped.
pub fn to_sequence(node: Option<&Value>) -> Vec<DynamicMap> {
    match node {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| item.is_object())
            .map(|item| to_mapping(Some(item)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Projects an object of objects into a mapping of mappings.
///
/// Entries whose value is not an object are skipped.
pub fn to_mapping_of_mappings(node: Option<&Value>) -> IndexMap<String, DynamicMap> {
    match node {
        Some(Value::Object(map)) => map
            .iter()
            .filter(|(_, inner)| inner.is_object())
            .map(|(key, inner)| (key.clone(), to_mapping(Some(inner))))
            .collect(),
        _ => IndexMap::new(),
    }
}
