use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use formstr_builder::{BuilderConfig, BuilderOptions, FormBuilder};
use formstr_spec::{
    DecodedForm, Draft, Field, FormInitData, FormSettings, Tag, decode_form_spec,
    encode_form_spec,
};
use serde::Deserialize;

use super::{print_json, read_json};

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// JSON array of spec tags
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,
    /// Form id the spec was published under
    #[arg(long = "id", value_name = "ID")]
    pub id: String,
    #[arg(long = "secret", value_name = "HEX")]
    pub secret: Option<String>,
    #[arg(long = "view-key", value_name = "HEX")]
    pub view_key: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    /// JSON document with `name`, `settings` and `questions`
    #[arg(value_name = "STATE")]
    pub state: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    #[arg(value_enum, default_value_t = SchemaTarget::Settings)]
    pub target: SchemaTarget,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaTarget {
    Settings,
    Decoded,
    Draft,
}

/// Builder state accepted by `encode`.
#[derive(Debug, Deserialize)]
struct FormState {
    name: String,
    #[serde(default)]
    settings: FormSettings,
    #[serde(default)]
    questions: Vec<Field>,
}

pub fn decode(args: DecodeArgs) -> Result<()> {
    let spec: Vec<Tag> = read_json(&args.spec)?;
    let form = FormInitData {
        spec,
        id: args.id,
        secret: args.secret,
        view_key: args.view_key,
    };
    let decoded = decode_form_spec(&form)
        .with_context(|| format!("failed to decode {}", args.spec.display()))?;
    print_json(&decoded)
}

pub fn encode(args: EncodeArgs) -> Result<()> {
    let state: FormState = read_json(&args.state)?;
    let spec = encode_form_spec(&state.name, &state.settings, &state.questions)
        .with_context(|| format!("failed to encode {}", args.state.display()))?;
    print_json(&spec)
}

pub fn new(args: NewArgs, config: &BuilderConfig) -> Result<()> {
    let mut builder = FormBuilder::new(BuilderOptions::from_config(config, None));
    if let Some(name) = args.name {
        builder.update_form_name(name);
    }
    tracing::debug!(form_id = %builder.settings().form_id, "created form");
    print_json(&builder.get_form_spec()?)
}

pub fn schema(args: SchemaArgs) -> Result<()> {
    let schema = match args.target {
        SchemaTarget::Settings => schemars::schema_for!(FormSettings),
        SchemaTarget::Decoded => schemars::schema_for!(DecodedForm),
        SchemaTarget::Draft => schemars::schema_for!(Draft),
    };
    print_json(&schema)
}
