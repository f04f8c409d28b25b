use formstr_spec::CodecError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::FormBuilder;
use crate::publish::{FormPublisher, PublishError, PublishRequest, RelayCallback};

pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("form id is required")]
    MissingFormId,
    #[error("a save is already in progress")]
    AlreadyInFlight,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("error creating the form: {0}")]
    Publish(#[from] PublishError),
}

/// State handed to the dashboard after a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub pub_key: String,
    pub form_id: String,
    pub secret_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_key: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRoute {
    pub path: String,
    pub state: DashboardState,
}

/// Snapshot of the form taken when a save starts.
#[derive(Debug, Clone)]
#[must_use = "a started save must be published and finished"]
pub struct SaveTicket {
    request: PublishRequest,
    form_id: String,
    name: String,
    view_key_in_url: bool,
}

impl SaveTicket {
    pub fn request(&self) -> &PublishRequest {
        &self.request
    }

    pub async fn publish<P>(
        self,
        publisher: &P,
        on_relay_accepted: Option<&RelayCallback>,
    ) -> Result<DashboardRoute, SaveError>
    where
        P: FormPublisher + ?Sized,
    {
        let artifacts = publisher
            .create_form(self.request, on_relay_accepted)
            .await?;
        let pub_key = publisher.public_key(&artifacts.signing_key)?;
        let view_key = if self.view_key_in_url {
            artifacts.view_key.as_deref().map(hex::encode)
        } else {
            None
        };
        Ok(DashboardRoute {
            path: DASHBOARD_PATH.to_string(),
            state: DashboardState {
                pub_key,
                form_id: self.form_id,
                secret_key: hex::encode(&artifacts.signing_key),
                view_key,
                name: self.name,
                relay: artifacts.accepted_relays.into_iter().next(),
            },
        })
    }
}

impl FormBuilder {
    pub fn is_saving(&self) -> bool {
        self.save_in_flight
    }

    /// Validates the form and marks a save as in flight.
    ///
    /// Nothing is marked when validation fails.
    pub fn begin_save(&mut self) -> Result<SaveTicket, SaveError> {
        if self.save_in_flight {
            return Err(SaveError::AlreadyInFlight);
        }
        if self.settings.form_id.is_empty() {
            return Err(SaveError::MissingFormId);
        }
        let spec = self.get_form_spec()?;
        let request = PublishRequest {
            spec,
            relay_urls: self.relay_urls(),
            view_list: self.view_list.clone(),
            edit_list: self.edit_list.clone(),
            encrypt: self.settings.encrypt_form,
            secret_key: self.secret_key.clone(),
            view_key: self.view_key.clone(),
        };
        self.save_in_flight = true;
        tracing::debug!(form_id = %self.settings.form_id, relays = request.relay_urls.len(), "starting save");
        Ok(SaveTicket {
            request,
            form_id: self.settings.form_id.clone(),
            name: self.form_name.clone(),
            view_key_in_url: self.settings.view_key_in_url,
        })
    }

    /// Clears the in-flight flag and passes `outcome` through.
    pub fn finish_save(
        &mut self,
        outcome: Result<DashboardRoute, SaveError>,
    ) -> Result<DashboardRoute, SaveError> {
        self.save_in_flight = false;
        match &outcome {
            Ok(route) => {
                tracing::info!(form_id = %route.state.form_id, relay = ?route.state.relay, "form published")
            }
            Err(err) => tracing::warn!(error = %err, "form save failed"),
        }
        outcome
    }

    /// Clears the in-flight flag after a save future was dropped.
    pub fn abandon_save(&mut self) {
        self.save_in_flight = false;
    }

    pub async fn save_form<P>(
        &mut self,
        publisher: &P,
        on_relay_accepted: Option<&RelayCallback>,
    ) -> Result<DashboardRoute, SaveError>
    where
        P: FormPublisher + ?Sized,
    {
        let ticket = self.begin_save()?;
        let outcome = ticket.publish(publisher, on_relay_accepted).await;
        self.finish_save(outcome)
    }
}
