use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminators understood by the codec.
pub mod kind {
    pub const IDENTIFIER: &str = "d";
    pub const NAME: &str = "name";
    pub const SETTINGS: &str = "settings";
    pub const FIELD: &str = "field";
    pub const ALLOWED: &str = "allowed";
    pub const PUBKEY: &str = "p";
}

/// Ordered tuple whose first element names its kind; serialized as a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Tag(Vec<Value>);

impl Tag {
    /// Builds a tag from a discriminator and string payload.
    pub fn new<I, S>(kind: &str, payload: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = vec![Value::String(kind.to_string())];
        values.extend(payload.into_iter().map(|item| Value::String(item.into())));
        Self(values)
    }

    /// Wraps raw values; the first one should be the discriminator.
    pub fn from_values(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn kind(&self) -> Option<&str> {
        self.get_str(0)
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind() == Some(kind)
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn get_str(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(Value::as_str)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Tag {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}
