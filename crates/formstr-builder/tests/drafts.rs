use formstr_builder::{
    BuilderOptions, DRAFT_FORMS_KEY, FormBuilder, JsonFileStore, KeyValueStore, MemoryStore,
    delete_draft, load_drafts,
};
use formstr_spec::{Draft, SettingsPatch, Tag};

fn builder() -> FormBuilder {
    FormBuilder::new(BuilderOptions::default())
}

#[test]
fn empty_form_id_skips_the_store() {
    let mut builder = builder();
    builder.update_form_setting(SettingsPatch {
        form_id: Some(String::new()),
        ..SettingsPatch::default()
    });
    let mut store = MemoryStore::new();
    assert!(!builder.save_draft(&mut store).expect("no-op"));
    assert_eq!(store.get_raw(DRAFT_FORMS_KEY).expect("read"), None);
}

#[test]
fn saving_twice_replaces_the_draft_in_place() {
    let mut builder = builder();
    let mut store = MemoryStore::new();
    store
        .set_item(
            DRAFT_FORMS_KEY,
            &vec![Draft {
                form_spec: vec![Tag::new("d", ["other"])],
                temp_id: "other".into(),
            }],
        )
        .expect("seed");

    assert!(builder.save_draft(&mut store).expect("save"));
    builder.update_form_name("Renamed");
    assert!(builder.save_draft(&mut store).expect("save again"));

    let drafts = load_drafts(&store).expect("load");
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].temp_id, "other");
    assert_eq!(drafts[1].temp_id, builder.settings().form_id);
    assert_eq!(drafts[1].form_spec, builder.get_form_spec().expect("spec"));
}

#[test]
fn drafts_persist_across_file_store_instances() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let builder = builder();
    {
        let mut store = JsonFileStore::new(temp.path());
        builder.save_draft(&mut store).expect("save");
    }
    let mut store = JsonFileStore::new(temp.path());
    let drafts = load_drafts(&store).expect("load");
    assert_eq!(drafts.len(), 1);

    let form_id = builder.settings().form_id.clone();
    assert!(delete_draft(&mut store, &form_id).expect("delete"));
    assert!(!delete_draft(&mut store, &form_id).expect("second delete"));
    assert!(load_drafts(&store).expect("load").is_empty());
}

#[test]
fn stored_drafts_use_camel_case_keys() {
    let builder = builder();
    let mut store = MemoryStore::new();
    builder.save_draft(&mut store).expect("save");
    let raw = store
        .get_raw(DRAFT_FORMS_KEY)
        .expect("read")
        .expect("present");
    assert!(raw.contains("\"formSpec\""));
    assert!(raw.contains("\"tempId\""));
}
