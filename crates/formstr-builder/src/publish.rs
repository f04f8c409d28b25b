use async_trait::async_trait;
use formstr_spec::{AccessList, Tag};
use thiserror::Error;

/// Failure reported by the signing/relay collaborator.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct PublishError(pub String);

impl PublishError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Invoked with each relay url that accepts the publication.
pub type RelayCallback = dyn Fn(&str) + Send + Sync;

/// Everything the collaborator needs to sign and publish a form.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    pub spec: Vec<Tag>,
    pub relay_urls: Vec<String>,
    pub view_list: AccessList,
    pub edit_list: AccessList,
    pub encrypt: bool,
    pub secret_key: Option<String>,
    pub view_key: Option<String>,
}

/// Key material and relay acceptance returned after publishing.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishArtifacts {
    pub signing_key: Vec<u8>,
    pub view_key: Option<Vec<u8>>,
    pub accepted_relays: Vec<String>,
}

/// Signing, encryption and relay publication, provided by the protocol SDK.
#[async_trait]
pub trait FormPublisher: Send + Sync {
    async fn create_form(
        &self,
        request: PublishRequest,
        on_relay_accepted: Option<&RelayCallback>,
    ) -> Result<PublishArtifacts, PublishError>;

    /// Public key (hex) for a signing key.
    fn public_key(&self, signing_key: &[u8]) -> Result<String, PublishError>;
}
