use formstr_spec::{
    AccessList, BackgroundType, CodecError, Draft, Field, FormInitData, FormSettings, FormSpec,
    SettingsPatch, Tag, decode_form_spec, encode_form_spec, generate_question, make_tag,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::BuilderConfig;
use crate::drafts::store_draft;
use crate::store::{KeyValueStore, StoreError};

pub const DEFAULT_FORM_NAME: &str = "This is the title of your form! Tap to edit.";

/// Header tab shown in the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuilderTab {
    #[default]
    Builder,
    Preview,
}

/// Relay the form is published to; `temp_id` only identifies the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayEntry {
    pub url: String,
    pub temp_id: String,
}

impl RelayEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            temp_id: make_tag(6),
        }
    }
}

/// Scroll the rendering layer should perform once its layout has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    QuestionsBottom,
}

/// Inputs for a fresh builder.
#[derive(Debug, Clone, Default)]
pub struct BuilderOptions {
    pub user_pubkey: Option<String>,
    pub default_relays: Vec<String>,
}

impl BuilderOptions {
    pub fn from_config(config: &BuilderConfig, user_pubkey: Option<String>) -> Self {
        Self {
            user_pubkey,
            default_relays: config.default_relays.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// In-memory state of the form being built.
#[derive(Debug, Clone)]
pub struct FormBuilder {
    pub(crate) questions: Vec<Field>,
    pub(crate) question_in_focus: Option<String>,
    pub(crate) settings: FormSettings,
    pub(crate) form_name: String,
    pub(crate) is_right_settings_open: bool,
    pub(crate) is_left_menu_open: bool,
    pub(crate) relay_list: Vec<RelayEntry>,
    pub(crate) edit_list: AccessList,
    pub(crate) view_list: AccessList,
    pub(crate) selected_tab: BuilderTab,
    pub(crate) secret_key: Option<String>,
    pub(crate) view_key: Option<String>,
    pub(crate) pending_scroll: Option<ScrollRequest>,
    pub(crate) save_in_flight: bool,
}

impl FormBuilder {
    pub fn new(options: BuilderOptions) -> Self {
        let edit_list = options
            .user_pubkey
            .map(|pubkey| AccessList::new().with(pubkey))
            .unwrap_or_default();
        Self {
            questions: vec![generate_question(None, None, Vec::new(), None)],
            question_in_focus: None,
            settings: FormSettings::initial(),
            form_name: DEFAULT_FORM_NAME.to_string(),
            is_right_settings_open: false,
            is_left_menu_open: false,
            relay_list: options
                .default_relays
                .into_iter()
                .map(RelayEntry::new)
                .collect(),
            edit_list,
            view_list: AccessList::new(),
            selected_tab: BuilderTab::default(),
            secret_key: None,
            view_key: None,
            pending_scroll: None,
            save_in_flight: false,
        }
    }

    pub fn questions(&self) -> &[Field] {
        &self.questions
    }

    pub fn add_question(
        &mut self,
        answer_type: Option<&str>,
        label: Option<&str>,
        answer_settings: Option<Map<String, Value>>,
    ) -> &Field {
        self.is_left_menu_open = false;
        self.questions
            .push(generate_question(answer_type, label, Vec::new(), answer_settings));
        self.pending_scroll = Some(ScrollRequest::QuestionsBottom);
        let index = self.questions.len() - 1;
        &self.questions[index]
    }

    /// Replaces the question whose tempId is `temp_id`; returns whether one matched.
    pub fn edit_question(&mut self, question: Field, temp_id: &str) -> bool {
        match self
            .questions
            .iter_mut()
            .find(|existing| existing.temp_id() == Some(temp_id))
        {
            Some(existing) => {
                *existing = question;
                true
            }
            None => false,
        }
    }

    pub fn delete_question(&mut self, temp_id: &str) {
        if self.question_in_focus.as_deref() == Some(temp_id) {
            self.question_in_focus = None;
        }
        self.questions
            .retain(|question| question.temp_id() != Some(temp_id));
    }

    /// Replaces the whole list, e.g. after a drag-and-drop reorder.
    pub fn update_questions_list(&mut self, questions: Vec<Field>) {
        self.questions = questions;
    }

    pub fn question_in_focus(&self) -> Option<&str> {
        self.question_in_focus.as_deref()
    }

    pub fn set_question_in_focus(&mut self, temp_id: Option<String>) {
        self.question_in_focus = temp_id;
    }

    /// Hands the pending scroll to the rendering layer, once.
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.pending_scroll.take()
    }

    pub fn form_name(&self) -> &str {
        &self.form_name
    }

    pub fn update_form_name(&mut self, name: impl Into<String>) {
        self.form_name = name.into();
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn update_form_setting(&mut self, patch: SettingsPatch) {
        tracing::debug!(?patch, "updating form settings");
        self.settings.apply(patch);
    }

    pub fn update_form_title_image(&mut self, image_url: &str) {
        self.update_form_setting(SettingsPatch {
            title_image_url: Some(image_url.to_string()),
            title_background_type: Some(BackgroundType::Image),
            ..SettingsPatch::default()
        });
    }

    pub fn update_form_title_background_color(&mut self, color: &str) {
        let switch_type = self.settings.title_background_type != BackgroundType::Color;
        self.update_form_setting(SettingsPatch {
            title_background_color: Some(color.to_string()),
            title_background_type: switch_type.then_some(BackgroundType::Color),
            ..SettingsPatch::default()
        });
    }

    /// Switches the active background, restoring a default for an empty slot.
    pub fn update_form_background_type(&mut self, kind: BackgroundType) {
        let mut patch = SettingsPatch {
            title_background_type: Some(kind),
            ..SettingsPatch::default()
        };
        match kind {
            BackgroundType::Color if self.settings.title_background_color.is_empty() => {
                patch.title_background_color =
                    Some(formstr_spec::settings::DEFAULT_TITLE_BACKGROUND_COLOR.to_string());
            }
            BackgroundType::Image if self.settings.title_image_url.is_empty() => {
                patch.title_image_url =
                    Some(formstr_spec::settings::DEFAULT_TITLE_IMAGE_URL.to_string());
            }
            _ => {}
        }
        self.update_form_setting(patch);
    }

    pub fn is_right_settings_open(&self) -> bool {
        self.is_right_settings_open
    }

    pub fn is_left_menu_open(&self) -> bool {
        self.is_left_menu_open
    }

    pub fn toggle_settings_window(&mut self) {
        self.is_right_settings_open = !self.is_right_settings_open;
    }

    pub fn close_settings_on_outside_click(&mut self) {
        if self.is_right_settings_open {
            self.toggle_settings_window();
        }
    }

    pub fn close_menu_on_outside_click(&mut self) {
        self.is_left_menu_open = false;
    }

    pub fn set_left_menu_open(&mut self, open: bool) {
        self.is_left_menu_open = open;
    }

    pub fn selected_tab(&self) -> BuilderTab {
        self.selected_tab
    }

    pub fn set_selected_tab(&mut self, tab: BuilderTab) {
        self.selected_tab = tab;
    }

    pub fn relay_list(&self) -> &[RelayEntry] {
        &self.relay_list
    }

    pub fn set_relay_list(&mut self, relays: Vec<RelayEntry>) {
        self.relay_list = relays;
    }

    pub fn add_relay(&mut self, url: impl Into<String>) -> &RelayEntry {
        self.relay_list.push(RelayEntry::new(url));
        let index = self.relay_list.len() - 1;
        &self.relay_list[index]
    }

    pub fn remove_relay(&mut self, temp_id: &str) {
        self.relay_list.retain(|relay| relay.temp_id != temp_id);
    }

    pub fn relay_urls(&self) -> Vec<String> {
        self.relay_list.iter().map(|relay| relay.url.clone()).collect()
    }

    pub fn edit_list(&self) -> &AccessList {
        &self.edit_list
    }

    pub fn set_edit_list(&mut self, keys: AccessList) {
        self.edit_list = keys;
    }

    pub fn view_list(&self) -> &AccessList {
        &self.view_list
    }

    pub fn set_view_list(&mut self, keys: AccessList) {
        self.view_list = keys;
    }

    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    pub fn view_key(&self) -> Option<&str> {
        self.view_key.as_deref()
    }

    pub fn get_form_spec(&self) -> Result<Vec<Tag>, CodecError> {
        encode_form_spec(&self.form_name, &self.settings, &self.questions)
    }

    /// Replaces the form from a published or drafted spec.
    ///
    /// On error nothing is changed.
    pub fn initialize_form(&mut self, form: &FormInitData) -> Result<(), CodecError> {
        let decoded = decode_form_spec(form)?;
        self.form_name = decoded.name;
        self.settings = decoded.settings;
        self.questions = decoded.fields;
        self.view_list = decoded.view_list;
        self.edit_list = decoded.edit_list;
        self.secret_key = decoded.secret_key;
        self.view_key = decoded.view_key;
        Ok(())
    }

    /// Persists the current form as a draft keyed by its form id.
    ///
    /// Returns `false` without touching the store when the form id is empty.
    pub fn save_draft<S: KeyValueStore>(&self, store: &mut S) -> Result<bool, DraftError> {
        if self.settings.form_id.is_empty() {
            return Ok(false);
        }
        let draft = Draft {
            form_spec: self.get_form_spec()?,
            temp_id: self.settings.form_id.clone(),
        };
        store_draft(store, draft)?;
        Ok(true)
    }

    /// Shape consumed by the filler when previewing the form.
    pub fn preview_spec(&self) -> Result<FormSpec, CodecError> {
        let settings = match serde_json::to_value(&self.settings)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(FormSpec::from_fields(
            &self.form_name,
            settings,
            &self.questions,
        ))
    }
}
