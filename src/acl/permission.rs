use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::rules;
use super::user::{identifier_to_value, Identifier};

/// Who may access a resource.
///
/// Callers declare rules either as a list of role tokens (`["admin", "editor"]`)
/// or as a mapping that may carry an `owner` entry next to the role tokens
/// (`{"0": "admin", "owner": 444}`). Both shapes normalize into this struct.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionSet {
    pub owner: Option<Identifier>,
    pub tokens: Vec<String>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            owner: None,
            tokens: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds an owner rule. Empty identifiers (zero, `""`, `"0"`) are ignored,
    /// matching how loosely typed declarations are read.
    pub fn with_owner(mut self, owner: impl Into<Identifier>) -> Self {
        let owner = owner.into();
        self.owner = if owner.is_empty() { None } else { Some(owner) };
        self
    }

    /// Normalizes a loosely typed permission declaration.
    ///
    /// - a string is a single token
    /// - an array contributes each string element
    /// - an object contributes an `owner` entry plus the values of every other
    ///   entry; keys other than `owner` carry no meaning
    ///
    /// Non-string entries can never equal a role or a special token and are
    /// dropped.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(token) => Self::roles([token.as_str()]),
            Value::Array(items) => Self {
                owner: None,
                tokens: string_tokens(items.iter()),
            },
            Value::Object(map) => {
                let owner = map.get(rules::OWNER).and_then(Identifier::from_value);
                let tokens = string_tokens(
                    map.iter()
                        .filter(|(key, _)| key.as_str() != rules::OWNER)
                        .map(|(_, v)| v),
                );
                Self { owner, tokens }
            }
            _ => Self::default(),
        }
    }

    /// Back into the declaration shape: a plain list, or an object when an
    /// owner is present.
    pub fn to_value(&self) -> Value {
        let tokens = self.tokens.iter().cloned().map(Value::String);
        match &self.owner {
            None => Value::Array(tokens.collect()),
            Some(owner) => {
                let mut map: Map<String, Value> = tokens
                    .enumerate()
                    .map(|(idx, token)| (idx.to_string(), token))
                    .collect();
                map.insert(rules::OWNER.to_string(), identifier_to_value(owner));
                Value::Object(map)
            }
        }
    }

    /// No owner and no tokens: nothing can grant access.
    pub fn is_empty(&self) -> bool {
        self.owner.is_none() && self.tokens.is_empty()
    }

    /// Role tokens in evaluation order (ascending).
    pub fn sorted_tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.tokens.iter().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }
}

fn string_tokens<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<String> {
    values
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

impl From<&str> for PermissionSet {
    fn from(token: &str) -> Self {
        Self::roles([token])
    }
}

impl From<Vec<&str>> for PermissionSet {
    fn from(tokens: Vec<&str>) -> Self {
        Self::roles(tokens)
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(tokens: Vec<String>) -> Self {
        Self::roles(tokens)
    }
}

impl From<&Value> for PermissionSet {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

impl From<Value> for PermissionSet {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::roles(iter)
    }
}

impl Serialize for PermissionSet {
    fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}
