#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use formstr_builder::{
    FormPublisher, FormSource, PublishArtifacts, PublishError, PublishRequest, RelayCallback,
    Response, SourceError,
};
use formstr_spec::V1FormSpec;

/// Records publish requests and answers with fixed key material.
#[derive(Default)]
pub struct FakePublisher {
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<PublishRequest>>,
    pub fail_with: Option<String>,
    pub accepted_relays: Vec<String>,
}

impl FakePublisher {
    pub fn accepting(relays: &[&str]) -> Self {
        Self {
            accepted_relays: relays.iter().map(|relay| relay.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FormPublisher for FakePublisher {
    async fn create_form(
        &self,
        request: PublishRequest,
        on_relay_accepted: Option<&RelayCallback>,
    ) -> Result<PublishArtifacts, PublishError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("lock").push(request);
        if let Some(message) = &self.fail_with {
            return Err(PublishError::new(message.clone()));
        }
        if let Some(callback) = on_relay_accepted {
            for relay in &self.accepted_relays {
                callback(relay);
            }
        }
        Ok(PublishArtifacts {
            signing_key: vec![0xab, 0xcd],
            view_key: Some(vec![0x01, 0x02]),
            accepted_relays: self.accepted_relays.clone(),
        })
    }

    fn public_key(&self, signing_key: &[u8]) -> Result<String, PublishError> {
        Ok(format!("pub-{}", hex::encode(signing_key)))
    }
}

/// Serves one template and records what the filler sends.
#[derive(Default)]
pub struct FakeSource {
    pub template: Option<V1FormSpec>,
    pub sent: Mutex<Vec<(String, Vec<Response>, bool)>>,
    pub notifications: AtomicUsize,
    pub fail_notifications: bool,
}

impl FakeSource {
    pub fn serving(template: V1FormSpec) -> Self {
        Self {
            template: Some(template),
            ..Self::default()
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("lock").len()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FormSource for FakeSource {
    async fn get_form_template(&self, _form_id: &str) -> Result<Option<V1FormSpec>, SourceError> {
        Ok(self.template.clone())
    }

    async fn send_responses(
        &self,
        form_id: &str,
        responses: &[Response],
        anonymous: bool,
    ) -> Result<Option<String>, SourceError> {
        self.sent
            .lock()
            .expect("lock")
            .push((form_id.to_string(), responses.to_vec(), anonymous));
        Ok((!anonymous).then(|| "user-1".to_string()))
    }

    async fn send_notification(
        &self,
        _template: &V1FormSpec,
        _responses: &[Response],
    ) -> Result<(), SourceError> {
        self.notifications.fetch_add(1, Ordering::SeqCst);
        if self.fail_notifications {
            return Err(SourceError::new("notification relay down"));
        }
        Ok(())
    }
}
