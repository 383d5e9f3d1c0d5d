use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Type tag written between braces in `@apiBody {Tag}` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Object,
    List,
    String,
    Number,
    Bool,
    /// Anything without a more specific tag, i.e. `null`.
    Opaque,
}

impl FieldType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::List,
            Value::String(_) => Self::String,
            // bool before number: some decoders treat booleans as integers
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::Null => Self::Opaque,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::List => "List",
            Self::String => "String",
            Self::Number => "Number",
            Self::Bool => "Bool",
            Self::Opaque => "type",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dotted field paths in discovery order, each recorded once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTypeMap {
    entries: Vec<(String, FieldType)>,
    seen: HashSet<String>,
}

impl FieldTypeMap {
    /// Records `path` unless it is already present; returns whether it was new.
    pub fn insert_if_absent(&mut self, path: String, field_type: FieldType) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.entries.push((path, field_type));
        true
    }

    pub fn get(&self, path: &str) -> Option<FieldType> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, t)| *t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.entries.iter().map(|(p, t)| (p.as_str(), *t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flattens a decoded JSON value into its dotted field paths.
///
/// Object keys are recorded before their children. Array elements are
/// recorded at the array's own path, so the first element decides the type
/// of every path below it. A scalar at the top level is recorded under the
/// empty path.
pub fn infer(value: &Value) -> FieldTypeMap {
    let mut fields = FieldTypeMap::default();
    let mut keys = Vec::new();
    walk(value, &mut keys, &mut fields);
    fields
}

fn walk<'a>(value: &'a Value, keys: &mut Vec<&'a str>, fields: &mut FieldTypeMap) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                keys.push(key);
                fields.insert_if_absent(keys.join("."), FieldType::of(child));
                walk(child, keys, fields);
                keys.pop();
            }
        }
        Value::Array(items) => {
            for item in items {
                fields.insert_if_absent(keys.join("."), FieldType::of(item));
                walk(item, keys, fields);
            }
        }
        scalar => {
            fields.insert_if_absent(keys.join("."), FieldType::of(scalar));
        }
    }
}
