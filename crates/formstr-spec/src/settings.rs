use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::ident::make_tag;

pub const DEFAULT_TITLE_IMAGE_URL: &str =
    "https://images.pexels.com/photos/733857/pexels-photo-733857.jpeg";
pub const DEFAULT_TITLE_BACKGROUND_COLOR: &str = "#f17124";
pub const DEFAULT_TITLE_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_TITLE_TEXT_SIZE: f64 = 24.0;
pub const DEFAULT_TITLE_TEXT_X_OFFSET: f64 = 16.0;
pub const DEFAULT_TITLE_TEXT_Y_OFFSET: f64 = 10.0;
/// Settings keys backed by a typed `FormSettings` field.
const MODELED_KEYS: &[&str] = &[
    "titleImageUrl",
    "titleBackgroundType",
    "titleBackgroundColor",
    "titleTextSize",
    "titleTextColor",
    "titleTextXOffset",
    "titleTextYOffset",
    "showBanner",
    "description",
    "thankYouPage",
    "formId",
    "encryptForm",
    "viewKeyInUrl",
    "disallowAnonymous",
];

pub const DEFAULT_DESCRIPTION: &str = "This is the description, you can use markdown while editing it! tap anywhere on the form to edit, including this description.";

/// Which of the two banner backgrounds is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    #[default]
    Image,
    Color,
}

impl BackgroundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundType::Image => "image",
            BackgroundType::Color => "color",
        }
    }
}

/// Presentation and publishing settings stored in the `settings` tag.
///
/// Both `title_image_url` and `title_background_color` are kept when inactive so
/// switching `title_background_type` back and forth restores the previous value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSettings {
    pub title_image_url: String,
    pub title_background_type: BackgroundType,
    pub title_background_color: String,
    #[serde(serialize_with = "compact_number")]
    #[schemars(with = "f64")]
    pub title_text_size: f64,
    pub title_text_color: String,
    #[serde(serialize_with = "compact_number")]
    #[schemars(with = "f64")]
    pub title_text_x_offset: f64,
    #[serde(serialize_with = "compact_number")]
    #[schemars(with = "f64")]
    pub title_text_y_offset: f64,
    pub show_banner: bool,
    pub description: String,
    pub thank_you_page: bool,
    pub form_id: String,
    pub encrypt_form: bool,
    pub view_key_in_url: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disallow_anonymous: Option<bool>,
    /// Keys this version does not model; carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for FormSettings {
    /// Initial settings with an empty form id.
    fn default() -> Self {
        Self {
            title_image_url: DEFAULT_TITLE_IMAGE_URL.into(),
            title_background_type: BackgroundType::Image,
            title_background_color: DEFAULT_TITLE_BACKGROUND_COLOR.into(),
            title_text_size: DEFAULT_TITLE_TEXT_SIZE,
            title_text_color: DEFAULT_TITLE_TEXT_COLOR.into(),
            title_text_x_offset: DEFAULT_TITLE_TEXT_X_OFFSET,
            title_text_y_offset: DEFAULT_TITLE_TEXT_Y_OFFSET,
            show_banner: true,
            description: DEFAULT_DESCRIPTION.into(),
            thank_you_page: true,
            form_id: String::new(),
            encrypt_form: true,
            view_key_in_url: true,
            disallow_anonymous: None,
            extra: Map::new(),
        }
    }
}

impl FormSettings {
    /// Settings for a brand new form, with a fresh form id.
    pub fn initial() -> Self {
        Self {
            form_id: make_tag(6),
            ..Self::default()
        }
    }

    /// Overwrites exactly the fields set in `patch`.
    ///
    /// Keys in `patch.extra` that name a typed field update that field; typed
    /// patch fields win over them. Such keys never land in `extra`.
    pub fn apply(&mut self, mut patch: SettingsPatch) {
        for (key, value) in MODELED_KEYS
            .iter()
            .filter_map(|key| patch.extra.remove_entry(*key))
        {
            let single = Map::from_iter([(key.clone(), value)]);
            match serde_json::from_value::<SettingsPatch>(Value::Object(single)) {
                Ok(typed) => self.apply(typed),
                Err(err) => tracing::warn!(key = %key, error = %err, "ignoring mistyped setting"),
            }
        }

        let SettingsPatch {
            title_image_url,
            title_background_type,
            title_background_color,
            title_text_size,
            title_text_color,
            title_text_x_offset,
            title_text_y_offset,
            show_banner,
            description,
            thank_you_page,
            form_id,
            encrypt_form,
            view_key_in_url,
            disallow_anonymous,
            extra,
        } = patch;

        set_if_some(&mut self.title_image_url, title_image_url);
        set_if_some(&mut self.title_background_type, title_background_type);
        set_if_some(&mut self.title_background_color, title_background_color);
        set_if_some(&mut self.title_text_size, title_text_size);
        set_if_some(&mut self.title_text_color, title_text_color);
        set_if_some(&mut self.title_text_x_offset, title_text_x_offset);
        set_if_some(&mut self.title_text_y_offset, title_text_y_offset);
        set_if_some(&mut self.show_banner, show_banner);
        set_if_some(&mut self.description, description);
        set_if_some(&mut self.thank_you_page, thank_you_page);
        set_if_some(&mut self.form_id, form_id);
        set_if_some(&mut self.encrypt_form, encrypt_form);
        set_if_some(&mut self.view_key_in_url, view_key_in_url);
        if disallow_anonymous.is_some() {
            self.disallow_anonymous = disallow_anonymous;
        }
        self.extra.extend(extra);
    }

    /// Returns a copy with `patch` applied.
    pub fn merged(&self, patch: SettingsPatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

fn set_if_some<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Partial settings update; `None` leaves the current value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_background_type: Option<BackgroundType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_text_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_text_x_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_text_y_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_banner: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thank_you_page: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypt_form: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_key_in_url: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disallow_anonymous: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JavaScript-style truthiness used by the legacy defaulting rules.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number
            .as_f64()
            .is_some_and(|value| value != 0.0 && !value.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Fills in fields introduced after the first settings format.
///
/// Null values are dropped first so they count as missing.
pub fn normalize_legacy_settings(mut settings: Map<String, Value>) -> Map<String, Value> {
    settings.retain(|_, value| !value.is_null());

    if !is_truthy(settings.get("titleBackgroundType")) {
        let kind = if is_truthy(settings.get("titleImageUrl")) {
            BackgroundType::Image
        } else {
            BackgroundType::Color
        };
        settings.insert("titleBackgroundType".into(), Value::from(kind.as_str()));
    }

    if !is_truthy(settings.get("titleBackgroundColor")) {
        settings.insert(
            "titleBackgroundColor".into(),
            Value::from(DEFAULT_TITLE_BACKGROUND_COLOR),
        );
    }

    let size = legacy_text_size(settings.get("titleTextSize"));
    settings.insert("titleTextSize".into(), size);

    settings
        .entry("titleTextXOffset")
        .or_insert_with(|| Value::from(DEFAULT_TITLE_TEXT_X_OFFSET as i64));
    settings
        .entry("titleTextYOffset")
        .or_insert_with(|| Value::from(DEFAULT_TITLE_TEXT_Y_OFFSET as i64));
    settings
        .entry("showBanner")
        .or_insert_with(|| Value::Bool(true));

    settings
}

fn legacy_text_size(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Value::from(match text.as_str() {
            "small" => 18,
            "large" => 32,
            _ => 24,
        }),
        Some(other) if is_truthy(Some(other)) => other.clone(),
        _ => Value::from(DEFAULT_TITLE_TEXT_SIZE as i64),
    }
}

fn compact_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
