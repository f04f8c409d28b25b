use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tag::Tag;

/// Unpublished form kept in local storage, keyed by `temp_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub form_spec: Vec<Tag>,
    pub temp_id: String,
}

/// Replaces the draft with the same `temp_id` in place, or appends it.
pub fn upsert_draft(mut drafts: Vec<Draft>, draft: Draft) -> Vec<Draft> {
    match drafts.iter_mut().find(|existing| existing.temp_id == draft.temp_id) {
        Some(existing) => *existing = draft,
        None => drafts.push(draft),
    }
    drafts
}

pub fn remove_draft(mut drafts: Vec<Draft>, temp_id: &str) -> Vec<Draft> {
    drafts.retain(|draft| draft.temp_id != temp_id);
    drafts
}
