use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

/// Opaque user identifier.
///
/// Comparison is strict: a numeric id never equals its string spelling, and an
/// integer never equals a float with the same magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(Number),
    String(String),
}

impl Identifier {
    /// Reads an identifier out of a loosely typed value.
    ///
    /// Values that count as empty (null, false, zero, `""`, `"0"`, empty
    /// containers) and values that cannot identify anything (booleans,
    /// containers) yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        identifier_of(value).filter(|id| !id.is_empty())
    }

    /// Zero, `""` and `"0"`.
    pub fn is_empty(&self) -> bool {
        match self {
            Identifier::Number(n) => n.as_f64() == Some(0.0),
            Identifier::String(s) => s.is_empty() || s == "0",
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{n}"),
            Identifier::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Number(Number::from(value))
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Identifier::Number(Number::from(value))
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::String(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::String(value)
    }
}

impl From<Uuid> for Identifier {
    fn from(value: Uuid) -> Self {
        Identifier::String(value.to_string())
    }
}

/// The requesting user, normalized from whatever the authentication layer
/// handed over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: Option<Identifier>,
    pub role: Option<String>,
    pub attributes: Map<String, Value>,
}

impl User {
    /// The unauthenticated caller.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(id: impl Into<Identifier>) -> Self {
        let id = id.into();
        let mut attributes = Map::new();
        attributes.insert("id".to_string(), identifier_to_value(&id));
        Self {
            id: Some(id),
            role: None,
            attributes,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        let role = role.into();
        self.attributes
            .insert("role".to_string(), Value::String(role.clone()));
        self.role = if role.is_empty() { None } else { Some(role) };
        self
    }

    /// Normalizes a loosely typed user record.
    ///
    /// Objects are read as-is. Arrays keep their elements under their index so
    /// that a non-empty array still counts as a present user. Null and scalars
    /// become the anonymous user.
    pub fn from_value(value: &Value) -> Self {
        let attributes = match value {
            Value::Object(map) => map.clone(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| (idx.to_string(), item.clone()))
                .collect(),
            _ => Map::new(),
        };

        // `_id` covers document-store records
        let id = attributes
            .get("id")
            .and_then(identifier_of)
            .or_else(|| attributes.get("_id").and_then(identifier_of));

        let role = attributes
            .get("role")
            .and_then(Value::as_str)
            .filter(|role| !role.is_empty())
            .map(str::to_string);

        Self {
            id,
            role,
            attributes,
        }
    }

    /// `true` when the record carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

impl From<Value> for User {
    fn from(value: Value) -> Self {
        User::from_value(&value)
    }
}

impl From<&Value> for User {
    fn from(value: &Value) -> Self {
        User::from_value(value)
    }
}

// A user id of zero is still an id; only owner rules treat zero as empty.
fn identifier_of(value: &Value) -> Option<Identifier> {
    match value {
        Value::Number(n) => Some(Identifier::Number(n.clone())),
        Value::String(s) => Some(Identifier::String(s.clone())),
        _ => None,
    }
}

pub(super) fn identifier_to_value(id: &Identifier) -> Value {
    match id {
        Identifier::Number(n) => Value::Number(n.clone()),
        Identifier::String(s) => Value::String(s.clone()),
    }
}
