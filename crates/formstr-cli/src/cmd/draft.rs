use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use formstr_builder::{BuilderConfig, JsonFileStore, delete_draft, load_drafts, store_draft};
use formstr_spec::{Draft, Tag, kind};
use serde::Serialize;

use super::{print_json, read_json};

#[derive(Subcommand, Debug, Clone)]
pub enum DraftCommand {
    /// Store a spec as a draft, keyed by its form id
    Save(DraftSaveArgs),
    /// List stored drafts
    List,
    /// Remove a stored draft
    Delete(DraftDeleteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DraftSaveArgs {
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,
    /// Overrides the id taken from the spec's `d` tag
    #[arg(long = "id", value_name = "ID")]
    pub id: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DraftDeleteArgs {
    #[arg(value_name = "TEMP_ID")]
    pub temp_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftSummary<'a> {
    temp_id: &'a str,
    name: Option<&'a str>,
    questions: usize,
}

impl<'a> DraftSummary<'a> {
    fn of(draft: &'a Draft) -> Self {
        Self {
            temp_id: &draft.temp_id,
            name: tag_payload(&draft.form_spec, kind::NAME),
            questions: draft
                .form_spec
                .iter()
                .filter(|tag| tag.is(kind::FIELD))
                .count(),
        }
    }
}

pub fn run(command: DraftCommand, config: &BuilderConfig) -> Result<()> {
    let mut store = JsonFileStore::new(config.draft_dir());
    match command {
        DraftCommand::Save(args) => {
            let spec: Vec<Tag> = read_json(&args.spec)?;
            let temp_id = match args.id {
                Some(id) if id.is_empty() => bail!("--id must not be empty"),
                Some(id) => id,
                None => tag_payload(&spec, kind::IDENTIFIER)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .with_context(|| {
                        format!("{} has no form id; pass --id", args.spec.display())
                    })?,
            };
            store_draft(
                &mut store,
                Draft {
                    form_spec: spec,
                    temp_id: temp_id.clone(),
                },
            )?;
            println!("{temp_id}");
            Ok(())
        }
        DraftCommand::List => {
            let drafts = load_drafts(&store)?;
            let summaries: Vec<_> = drafts.iter().map(DraftSummary::of).collect();
            print_json(&summaries)
        }
        DraftCommand::Delete(args) => {
            if !delete_draft(&mut store, &args.temp_id)? {
                bail!("no draft with id '{}'", args.temp_id);
            }
            println!("deleted {}", args.temp_id);
            Ok(())
        }
    }
}

fn tag_payload<'a>(spec: &'a [Tag], wanted: &str) -> Option<&'a str> {
    spec.iter()
        .find(|tag| tag.is(wanted))
        .and_then(|tag| tag.get_str(1))
}
