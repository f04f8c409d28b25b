use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formstr_builder::BuilderConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cmd::{
    self,
    codec::{DecodeArgs, EncodeArgs, NewArgs, SchemaArgs},
    draft::DraftCommand,
};

pub const LOG_ENV: &str = "FORMSTR_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "formstr",
    about = "Encode, decode and draft Formstr form specs",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a form spec into builder state
    Decode(DecodeArgs),
    /// Encode builder state into a form spec
    Encode(EncodeArgs),
    /// Print the spec of a fresh form
    New(NewArgs),
    /// Manage locally stored drafts
    #[command(subcommand)]
    Draft(DraftCommand),
    /// Print the JSON schema of a form model
    Schema(SchemaArgs),
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = BuilderConfig::load(cli.config.as_deref()).context("loading config")?;
    match cli.command {
        Commands::Decode(args) => cmd::codec::decode(args),
        Commands::Encode(args) => cmd::codec::encode(args),
        Commands::New(args) => cmd::codec::new(args, &config),
        Commands::Draft(command) => cmd::draft::run(command, &config),
        Commands::Schema(args) => cmd::codec::schema(args),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decode_with_keys() {
        let cli = Cli::try_parse_from([
            "formstr",
            "--verbose",
            "decode",
            "form.json",
            "--id",
            "abc",
            "--secret",
            "s3",
        ])
        .expect("expected CLI to parse");
        assert!(cli.verbose);
        match cli.command {
            Commands::Decode(args) => {
                assert_eq!(args.spec, PathBuf::from("form.json"));
                assert_eq!(args.id, "abc");
                assert_eq!(args.secret.as_deref(), Some("s3"));
                assert!(args.view_key.is_none());
            }
            _ => panic!("expected decode args"),
        }
    }

    #[test]
    fn parses_draft_delete_with_global_config() {
        let cli = Cli::try_parse_from(["formstr", "draft", "delete", "f1", "--config", "c.toml"])
            .expect("expected CLI to parse");
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        match cli.command {
            Commands::Draft(DraftCommand::Delete(args)) => assert_eq!(args.temp_id, "f1"),
            _ => panic!("expected draft delete"),
        }
    }

    #[test]
    fn decode_requires_id() {
        assert!(Cli::try_parse_from(["formstr", "decode", "form.json"]).is_err());
    }
}
