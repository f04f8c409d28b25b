use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::field::Field;
use crate::ident::make_tag;

pub const SCHEMA_VERSION: &str = "v1";

/// Per-question answer settings; only `required` is interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A question as the filler sees it, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub question: String,
    pub answer_type: String,
    #[serde(default)]
    pub answer_settings: AnswerSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,
}

impl FieldSpec {
    pub fn is_required(&self) -> bool {
        self.answer_settings.required.unwrap_or(false)
    }
}

impl From<&Field> for FieldSpec {
    fn from(field: &Field) -> Self {
        let answer_settings = serde_json::from_value(Value::Object(field.answer_settings()))
            .unwrap_or_default();
        let options = field.options();
        Self {
            question: field.label().unwrap_or_default().to_string(),
            answer_type: field.answer_type().unwrap_or_default().to_string(),
            answer_settings,
            choices: (!options.is_empty()).then_some(options),
        }
    }
}

/// Unpublished form shape, used for previews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSpec {
    pub name: String,
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldSpec>>,
}

impl FormSpec {
    /// Builds a preview spec from builder questions.
    pub fn from_fields(name: &str, settings: Map<String, Value>, fields: &[Field]) -> Self {
        Self {
            name: name.to_string(),
            settings,
            fields: Some(fields.iter().map(FieldSpec::from).collect()),
        }
    }
}

/// Question with the id responses are keyed by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct V1Field {
    pub question_id: String,
    #[serde(flatten)]
    pub spec: FieldSpec,
}

/// Published template as returned by the template fetcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct V1FormSpec {
    pub schema_version: String,
    pub name: String,
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<V1Field>>,
}

/// Gives every field a fresh question id.
pub fn convert_from_spec_to_template(spec: FormSpec) -> V1FormSpec {
    let fields = spec.fields.map(|fields| {
        fields
            .into_iter()
            .map(|field| V1Field {
                question_id: make_tag(6),
                spec: field,
            })
            .collect()
    });
    V1FormSpec {
        schema_version: SCHEMA_VERSION.into(),
        name: spec.name,
        settings: spec.settings,
        fields,
    }
}
