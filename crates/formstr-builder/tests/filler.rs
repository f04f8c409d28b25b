mod common;

use serde_json::json;

use formstr_builder::{
    BuilderOptions, FillerError, FillerExit, FillerOptions, FillerSession, FormBuilder,
};
use formstr_spec::{BackgroundType, V1FormSpec, settings::DEFAULT_TITLE_IMAGE_URL};

use common::FakeSource;

fn template() -> V1FormSpec {
    serde_json::from_value(json!({
        "schemaVersion": "v1",
        "name": "Feedback",
        "settings": {
            "titleTextSize": "large",
            "description": "Tell us **everything**"
        },
        "fields": [
            {
                "questionId": "q1",
                "question": "Name",
                "answerType": "short_text",
                "answerSettings": {"required": true}
            },
            {
                "questionId": "q2",
                "question": "Comments",
                "answerType": "paragraph",
                "answerSettings": {}
            }
        ]
    }))
    .expect("template")
}

async fn session(source: &FakeSource, options: FillerOptions) -> FillerSession {
    FillerSession::load(source, Some("form-1"), None, options)
        .await
        .expect("load")
}

#[tokio::test]
async fn load_requires_form_id_or_preview() {
    let source = FakeSource::default();
    let err = FillerSession::load(&source, None, None, FillerOptions::default())
        .await
        .expect_err("nothing to load");
    assert!(matches!(err, FillerError::MissingFormId));
}

#[tokio::test]
async fn unknown_form_stays_loading() {
    let source = FakeSource::default();
    let session = session(&source, FillerOptions::default()).await;
    assert!(session.is_loading());
    assert!(matches!(session.banner(), Err(FillerError::NotLoaded)));
}

#[tokio::test]
async fn banner_applies_legacy_settings_and_hide_flags() {
    let source = FakeSource::serving(template());
    let shown = session(&source, FillerOptions::default()).await;
    let banner = shown.banner().expect("banner").expect("title shown");
    assert_eq!(banner.title, "Feedback");
    assert_eq!(banner.text_size, 32.0);
    assert_eq!(banner.background_type, BackgroundType::Color);
    assert_eq!(banner.image_url, DEFAULT_TITLE_IMAGE_URL);
    assert_eq!(shown.description(), Some("Tell us **everything**"));

    let hidden = session(
        &source,
        FillerOptions::from_query("hideTitleImage=true&hideDescription=true"),
    )
    .await;
    assert_eq!(hidden.banner().expect("banner"), None);
    assert_eq!(hidden.description(), None);
}

#[tokio::test]
async fn empty_input_clears_the_answer() {
    let source = FakeSource::serving(template());
    let mut session = session(&source, FillerOptions::default()).await;
    session.handle_input("q1", "Ada", None);
    assert_eq!(session.answer("q1"), Some("Ada"));
    session.handle_input("q1", "", None);
    assert_eq!(session.answer("q1"), None);
    assert_eq!(session.missing_required(), vec!["q1".to_string()]);
}

#[tokio::test]
async fn missing_required_answers_block_submit() {
    let source = FakeSource::serving(template());
    let mut session = session(&source, FillerOptions::default()).await;
    session.handle_input("q2", "great", None);
    let err = session.submit(&source, false).await.expect_err("blocked");
    assert!(matches!(err, FillerError::MissingRequired(ref ids) if ids == &["q1".to_string()]));
    assert_eq!(source.sent_count(), 0);
    assert!(!session.is_submitted());
}

#[tokio::test]
async fn submit_sends_responses_in_form_order() {
    let source = FakeSource::serving(template());
    let mut session = session(&source, FillerOptions::default()).await;
    session.handle_input("q2", "great", Some("note".into()));
    session.handle_input("q1", "Ada", None);

    let receipt = session.submit(&source, false).await.expect("submit");
    assert_eq!(receipt.user_id.as_deref(), Some("user-1"));
    let ids: Vec<_> = receipt
        .responses
        .iter()
        .map(|response| response.question_id.as_str())
        .collect();
    assert_eq!(ids, vec!["q1", "q2"]);
    assert_eq!(receipt.responses[1].message.as_deref(), Some("note"));
    assert_eq!(source.sent_count(), 1);
    assert_eq!(source.notification_count(), 1);
    assert!(session.is_submitted());
    assert!(session.show_thank_you());

    let again = session.submit(&source, false).await;
    assert!(matches!(again, Err(FillerError::AlreadySubmitted)));
    assert_eq!(source.sent_count(), 1);
}

#[tokio::test]
async fn notification_failure_does_not_fail_submit() {
    let source = FakeSource {
        fail_notifications: true,
        ..FakeSource::serving(template())
    };
    let mut session = session(&source, FillerOptions::default()).await;
    session.handle_input("q1", "Ada", None);
    let receipt = session.submit(&source, true).await.expect("submit");
    assert_eq!(receipt.user_id, None);
    assert_eq!(source.notification_count(), 1);
}

#[tokio::test]
async fn preview_submit_never_sends() {
    let source = FakeSource::serving(template());
    let preview = FormBuilder::new(BuilderOptions::default())
        .preview_spec()
        .expect("preview");
    let mut session = FillerSession::load(&source, None, Some(preview), FillerOptions::default())
        .await
        .expect("load");
    assert!(session.is_preview());
    assert!(!session.is_loading());

    let err = session.submit(&source, false).await.expect_err("preview");
    assert!(matches!(err, FillerError::PreviewOnly));
    assert_eq!(source.sent_count(), 0);
    assert_eq!(source.notification_count(), 0);
}

#[tokio::test]
async fn closing_thank_you_depends_on_embedding() {
    let source = FakeSource::serving(template());
    let mut standalone = session(&source, FillerOptions::default()).await;
    assert_eq!(standalone.close_thank_you(), FillerExit::Dashboard);

    let mut embedded = session(&source, FillerOptions::default().embedded(true)).await;
    embedded.handle_input("q1", "Ada", None);
    embedded.submit(&source, false).await.expect("submit");
    assert_eq!(embedded.close_thank_you(), FillerExit::Stay);
    assert!(!embedded.show_thank_you());
}
