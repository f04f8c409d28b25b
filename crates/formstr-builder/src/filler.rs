use std::collections::BTreeMap;

use async_trait::async_trait;
use formstr_spec::{
    BackgroundType, CodecError, FormSpec, V1FormSpec, convert_from_spec_to_template,
    resolve_settings,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::form_urlencoded;

/// Answer to one question, as sent to the form's relays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub question_id: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SourceError(pub String);

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Fetching templates and delivering responses, provided by the protocol SDK.
#[async_trait]
pub trait FormSource: Send + Sync {
    async fn get_form_template(&self, form_id: &str) -> Result<Option<V1FormSpec>, SourceError>;

    /// Returns the id of the responding user, when the SDK reports one.
    async fn send_responses(
        &self,
        form_id: &str,
        responses: &[Response],
        anonymous: bool,
    ) -> Result<Option<String>, SourceError>;

    async fn send_notification(
        &self,
        template: &V1FormSpec,
        responses: &[Response],
    ) -> Result<(), SourceError>;
}

#[derive(Debug, Error)]
pub enum FillerError {
    #[error("a form id or a preview spec is required")]
    MissingFormId,
    #[error("form template is not loaded yet")]
    NotLoaded,
    #[error("required questions are unanswered: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
    #[error("preview forms cannot be submitted")]
    PreviewOnly,
    #[error("responses were already submitted")]
    AlreadySubmitted,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Display switches read from the filler URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillerOptions {
    pub hide_title_image: bool,
    pub hide_description: bool,
    pub embedded: bool,
}

impl FillerOptions {
    /// Parses `hideTitleImage=true` and `hideDescription=true` from a query string.
    pub fn from_query(query: &str) -> Self {
        let mut options = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "hideTitleImage" => options.hide_title_image = value == "true",
                "hideDescription" => options.hide_description = value == "true",
                _ => {}
            }
        }
        options
    }

    pub fn embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }
}

/// Title banner properties after legacy settings are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub title: String,
    pub image_url: String,
    pub background_type: BackgroundType,
    pub background_color: String,
    pub text_size: f64,
    pub text_color: String,
    pub text_x_offset: f64,
    pub text_y_offset: f64,
    pub show_banner: bool,
}

/// Where the filler goes after the thank-you screen is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillerExit {
    Dashboard,
    Stay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub user_id: Option<String>,
    pub responses: Vec<Response>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Answer {
    value: String,
    message: Option<String>,
}

/// One visitor filling one form.
#[derive(Debug, Clone)]
pub struct FillerSession {
    form_id: Option<String>,
    template: Option<V1FormSpec>,
    is_preview: bool,
    options: FillerOptions,
    answers: BTreeMap<String, Answer>,
    submitted: bool,
    show_thank_you: bool,
}

impl FillerSession {
    /// Opens a session from a preview spec, or by fetching the template for `form_id`.
    ///
    /// A preview spec takes precedence. A template the source cannot find leaves the
    /// session loading.
    pub async fn load<S>(
        source: &S,
        form_id: Option<&str>,
        preview: Option<FormSpec>,
        options: FillerOptions,
    ) -> Result<Self, FillerError>
    where
        S: FormSource + ?Sized,
    {
        let mut session = Self {
            form_id: form_id.map(str::to_string),
            template: None,
            is_preview: false,
            options,
            answers: BTreeMap::new(),
            submitted: false,
            show_thank_you: false,
        };
        match (preview, form_id) {
            (Some(spec), _) => {
                session.template = Some(convert_from_spec_to_template(spec));
                session.is_preview = true;
            }
            (None, Some(id)) => {
                session.template = source.get_form_template(id).await?;
                if session.template.is_none() {
                    tracing::debug!(form_id = %id, "form template not found");
                }
            }
            (None, None) => return Err(FillerError::MissingFormId),
        }
        Ok(session)
    }

    pub fn is_loading(&self) -> bool {
        self.template.is_none()
    }

    pub fn is_preview(&self) -> bool {
        self.is_preview
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn show_thank_you(&self) -> bool {
        self.show_thank_you
    }

    pub fn template(&self) -> Option<&V1FormSpec> {
        self.template.as_ref()
    }

    /// Records an answer; an empty answer clears it.
    pub fn handle_input(&mut self, question_id: &str, answer: &str, message: Option<String>) {
        if answer.is_empty() {
            self.answers.remove(question_id);
            return;
        }
        self.answers.insert(
            question_id.to_string(),
            Answer {
                value: answer.to_string(),
                message,
            },
        );
    }

    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers
            .get(question_id)
            .map(|answer| answer.value.as_str())
    }

    /// Title component props; `None` when `hideTitleImage` hides the title.
    pub fn banner(&self) -> Result<Option<Banner>, FillerError> {
        let template = self.template.as_ref().ok_or(FillerError::NotLoaded)?;
        if self.options.hide_title_image {
            return Ok(None);
        }
        let settings = resolve_settings(template.settings.clone())?;
        Ok(Some(Banner {
            title: template.name.clone(),
            image_url: settings.title_image_url,
            background_type: settings.title_background_type,
            background_color: settings.title_background_color,
            text_size: settings.title_text_size,
            text_color: settings.title_text_color,
            text_x_offset: settings.title_text_x_offset,
            text_y_offset: settings.title_text_y_offset,
            show_banner: settings.show_banner,
        }))
    }

    /// Markdown description, unless hidden or absent.
    pub fn description(&self) -> Option<&str> {
        if self.options.hide_description {
            return None;
        }
        self.template
            .as_ref()?
            .settings
            .get("description")
            .and_then(Value::as_str)
    }

    /// Ids of required questions that have no answer, in form order.
    pub fn missing_required(&self) -> Vec<String> {
        self.fields()
            .filter(|field| field.spec.is_required() && !self.answers.contains_key(&field.question_id))
            .map(|field| field.question_id.clone())
            .collect()
    }

    /// Captured answers in form order.
    pub fn responses(&self) -> Vec<Response> {
        self.fields()
            .filter_map(|field| {
                self.answers.get(&field.question_id).map(|answer| Response {
                    question_id: field.question_id.clone(),
                    answer: answer.value.clone(),
                    message: answer.message.clone(),
                })
            })
            .collect()
    }

    pub async fn submit<S>(
        &mut self,
        source: &S,
        anonymous: bool,
    ) -> Result<SubmitReceipt, FillerError>
    where
        S: FormSource + ?Sized,
    {
        if self.submitted {
            return Err(FillerError::AlreadySubmitted);
        }
        if self.is_preview {
            return Err(FillerError::PreviewOnly);
        }
        let template = self.template.as_ref().ok_or(FillerError::NotLoaded)?;
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(FillerError::MissingRequired(missing));
        }

        let responses = self.responses();
        let user_id = match &self.form_id {
            Some(form_id) => source.send_responses(form_id, &responses, anonymous).await?,
            None => None,
        };
        if let Err(err) = source.send_notification(template, &responses).await {
            tracing::warn!(error = %err, "failed to notify form owners");
        }

        self.submitted = true;
        self.show_thank_you = true;
        tracing::info!(responses = responses.len(), anonymous, "submitted responses");
        Ok(SubmitReceipt { user_id, responses })
    }

    pub fn close_thank_you(&mut self) -> FillerExit {
        if self.options.embedded {
            self.show_thank_you = false;
            FillerExit::Stay
        } else {
            FillerExit::Dashboard
        }
    }

    fn fields(&self) -> impl Iterator<Item = &formstr_spec::V1Field> {
        self.template
            .iter()
            .flat_map(|template| template.fields.iter().flatten())
    }
}
