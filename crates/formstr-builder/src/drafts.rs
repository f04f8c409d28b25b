use formstr_spec::{Draft, remove_draft, upsert_draft};

use crate::store::{KeyValueStore, StoreError};

/// Storage key of the draft list.
pub const DRAFT_FORMS_KEY: &str = "formstr:draftForms";

pub fn load_drafts<S: KeyValueStore>(store: &S) -> Result<Vec<Draft>, StoreError> {
    Ok(store.get_item(DRAFT_FORMS_KEY)?.unwrap_or_default())
}

/// Upserts `draft` by `temp_id` and writes the list back.
pub fn store_draft<S: KeyValueStore>(store: &mut S, draft: Draft) -> Result<(), StoreError> {
    let temp_id = draft.temp_id.clone();
    let drafts = upsert_draft(load_drafts(store)?, draft);
    store.set_item(DRAFT_FORMS_KEY, &drafts)?;
    tracing::info!(temp_id = %temp_id, drafts = drafts.len(), "saved draft");
    Ok(())
}

/// Removes the draft with `temp_id`; returns whether one was removed.
pub fn delete_draft<S: KeyValueStore>(store: &mut S, temp_id: &str) -> Result<bool, StoreError> {
    let before = load_drafts(store)?;
    let count = before.len();
    let after = remove_draft(before, temp_id);
    let removed = after.len() != count;
    if removed {
        store.set_item(DRAFT_FORMS_KEY, &after)?;
        tracing::info!(temp_id = %temp_id, "deleted draft");
    }
    Ok(removed)
}
