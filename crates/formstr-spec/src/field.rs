use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ident::make_tag;
use crate::tag::{Tag, kind};

pub const DEFAULT_ANSWER_TYPE: &str = "short_text";
pub const DEFAULT_QUESTION_LABEL: &str = "Click to edit question";

const TEMP_ID: usize = 1;
const ANSWER_TYPE: usize = 2;
const LABEL: usize = 3;
const ANSWER_SETTINGS: usize = 4;
const OPTIONS: usize = 5;

/// A question entry: `["field", tempId, answerType, label, answerSettings, options]`.
///
/// Only the tempId is interpreted by the builder; the rest is carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Field(Tag);

impl Field {
    /// Wraps a tag without checking its layout.
    pub fn from_tag(tag: Tag) -> Self {
        Self(tag)
    }

    pub fn tag(&self) -> &Tag {
        &self.0
    }

    pub fn into_tag(self) -> Tag {
        self.0
    }

    pub fn temp_id(&self) -> Option<&str> {
        self.0.get_str(TEMP_ID)
    }

    pub fn answer_type(&self) -> Option<&str> {
        self.0.get_str(ANSWER_TYPE)
    }

    pub fn label(&self) -> Option<&str> {
        self.0.get_str(LABEL)
    }

    /// Answer settings as an object; string payloads holding JSON are parsed.
    pub fn answer_settings(&self) -> Map<String, Value> {
        match self.0.get(ANSWER_SETTINGS).map(decode_embedded) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn options(&self) -> Vec<Value> {
        match self.0.get(OPTIONS).map(decode_embedded) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        }
    }
}

impl From<Field> for Tag {
    fn from(field: Field) -> Self {
        field.0
    }
}

fn decode_embedded(value: &Value) -> Value {
    match value {
        Value::String(raw) => serde_json::from_str(raw).unwrap_or(Value::Null),
        other => other.clone(),
    }
}

/// Creates a new question with a fresh tempId.
pub fn generate_question(
    answer_type: Option<&str>,
    label: Option<&str>,
    options: Vec<Value>,
    answer_settings: Option<Map<String, Value>>,
) -> Field {
    Field(Tag::from_values(vec![
        Value::String(kind::FIELD.into()),
        Value::String(make_tag(6)),
        Value::String(answer_type.unwrap_or(DEFAULT_ANSWER_TYPE).into()),
        Value::String(label.unwrap_or(DEFAULT_QUESTION_LABEL).into()),
        Value::Object(answer_settings.unwrap_or_default()),
        Value::Array(options),
    ]))
}
