use crate::commands::{run_submit, run_validate};
use clap::{Args, Parser, Subcommand};
use listing_intake::error::AppError;
use listing_intake::form::{parse_flag, FieldName};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "listing-intake",
    about = "Validate and submit property listing records",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a listing record and print its field errors as JSON
    Validate(RecordArgs),
    /// Check a listing record and post it to the submission endpoint
    Submit(SubmitArgs),
}

#[derive(Args, Debug)]
pub(crate) struct RecordArgs {
    /// JSON listing record, or `-` to read it from stdin
    pub(crate) input: PathBuf,
    /// Replace a field of the record, e.g. `--set floor=4`
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_override)]
    pub(crate) overrides: Vec<(FieldName, String)>,
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    #[command(flatten)]
    pub(crate) record: RecordArgs,
    /// Override the configured submission endpoint
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
}

fn parse_override(value: &str) -> Result<(FieldName, String), String> {
    let (field, raw) = value
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{value}'"))?;
    let field = FieldName::parse(field).ok_or_else(|| format!("unknown field '{field}'"))?;
    if field == FieldName::IsProcessing && parse_flag(raw).is_none() {
        return Err(format!("{field} expects true or false, got '{raw}'"));
    }
    Ok((field, raw.to_string()))
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Submit(args) => run_submit(args).await,
    }
}
