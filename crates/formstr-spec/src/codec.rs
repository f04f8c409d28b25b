use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::access::{AccessList, partition_access};
use crate::field::Field;
use crate::settings::{FormSettings, normalize_legacy_settings};
use crate::tag::{Tag, kind};

/// Errors raised while encoding or decoding a form spec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("settings tag is corrupt: {0}")]
    CorruptSettings(String),
    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Input to decoding: a received spec plus key material carried beside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormInitData {
    pub spec: Vec<Tag>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_key: Option<String>,
}

/// Builder-ready form state recovered from a spec.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecodedForm {
    pub name: String,
    pub settings: FormSettings,
    pub fields: Vec<Field>,
    pub edit_list: AccessList,
    pub view_list: AccessList,
    pub secret_key: Option<String>,
    pub view_key: Option<String>,
}

/// Encodes a form as `d`, `name`, `settings`, then every question in order.
pub fn encode_form_spec(
    name: &str,
    settings: &FormSettings,
    questions: &[Field],
) -> Result<Vec<Tag>, CodecError> {
    let mut spec = Vec::with_capacity(questions.len() + 3);
    spec.push(Tag::new(kind::IDENTIFIER, [settings.form_id.as_str()]));
    spec.push(Tag::new(kind::NAME, [name]));
    spec.push(Tag::new(kind::SETTINGS, [serde_json::to_string(settings)?]));
    spec.extend(questions.iter().cloned().map(Tag::from));
    Ok(spec)
}

/// Decodes a spec, applying the legacy settings defaults.
///
/// The form id always comes from `form.id`, never from the `d` tag.
pub fn decode_form_spec(form: &FormInitData) -> Result<DecodedForm, CodecError> {
    let name = first_of(&form.spec, kind::NAME)
        .and_then(|tag| tag.get_str(1))
        .unwrap_or_default()
        .to_string();

    let raw_settings = parse_settings(first_of(&form.spec, kind::SETTINGS))?;
    let mut settings = resolve_settings(raw_settings)?;
    settings.form_id = form.id.clone();

    let fields = form
        .spec
        .iter()
        .filter(|tag| tag.is(kind::FIELD))
        .cloned()
        .map(Field::from_tag)
        .collect::<Vec<_>>();

    let (edit_list, view_list) = partition_access(&form.spec);

    tracing::debug!(
        form_id = %form.id,
        fields = fields.len(),
        editors = edit_list.len(),
        viewers = view_list.len(),
        "decoded form spec"
    );

    Ok(DecodedForm {
        name,
        settings,
        fields,
        edit_list,
        view_list,
        secret_key: form.secret.clone(),
        view_key: form.view_key.clone(),
    })
}

fn first_of<'a>(spec: &'a [Tag], wanted: &str) -> Option<&'a Tag> {
    spec.iter().find(|tag| tag.is(wanted))
}

fn parse_settings(tag: Option<&Tag>) -> Result<Map<String, Value>, CodecError> {
    let raw = match tag.and_then(|tag| tag.get(1)) {
        None => return Ok(Map::new()),
        Some(Value::String(raw)) if raw.is_empty() => return Ok(Map::new()),
        Some(Value::String(raw)) => raw,
        Some(other) => {
            return Err(CodecError::CorruptSettings(format!(
                "expected a json string payload, got {other}"
            )));
        }
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CodecError::CorruptSettings(format!(
            "expected a json object, got {other}"
        ))),
        Err(err) => Err(CodecError::CorruptSettings(err.to_string())),
    }
}

/// Applies the legacy defaults to a raw settings object and merges it over the
/// default settings; keys present in `raw` win.
pub fn resolve_settings(raw: Map<String, Value>) -> Result<FormSettings, CodecError> {
    let parsed = normalize_legacy_settings(raw);
    let mut merged = match serde_json::to_value(FormSettings::default())? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merged.extend(parsed);
    serde_json::from_value(Value::Object(merged))
        .map_err(|err| CodecError::CorruptSettings(err.to_string()))
}
