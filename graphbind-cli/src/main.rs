mod config;
mod explain;
mod inspect;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{ConfigMerger, MergedConfig};
use fs_err as fs;
use graphbind_core::{Multiplicity, Record};
use graphbind_json::{load_payloads, record_from_str, record_from_value, to_value};
use graphbind_types::{Family, families, family};
use serde_json::Value as JsonValue;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "graphbind",
    version,
    about = "Decode, round-trip and check OData-style JSON payloads."
)]
struct Cli {
    /// Config file (default: ./graphbind.toml when present).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a payload and summarize what was recognized.
    Decode(DecodeArgs),
    /// Decode, optionally edit, and serialize a payload again.
    Roundtrip(RoundtripArgs),
    /// Decode every *.json payload in a directory.
    Check(CheckArgs),
    /// List the type families payloads can be decoded as.
    ListTypes(ListTypesArgs),
    /// Show the members and unknown-value policy of an enum.
    ExplainEnum(ExplainEnumArgs),
}

#[derive(Debug, Parser)]
struct DecodeArgs {
    /// Payload file.
    payload: Utf8PathBuf,

    /// Root type family (see `list-types`).
    #[arg(long)]
    family: Option<String>,

    /// Single-line JSON output.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(Debug, Parser)]
struct RoundtripArgs {
    /// Payload file.
    payload: Utf8PathBuf,

    /// Root type family (see `list-types`).
    #[arg(long)]
    family: Option<String>,

    /// Property edits applied after decoding, as name=value (value read as JSON when it parses).
    #[arg(long = "set")]
    edits: Vec<String>,

    /// Only write properties changed by --set.
    #[arg(long, default_value_t = false)]
    changed_only: bool,

    /// Single-line JSON output.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Directory of payload files.
    dir: Utf8PathBuf,

    /// Root type family (see `list-types`).
    #[arg(long)]
    family: Option<String>,
}

#[derive(Debug, Parser)]
struct ListTypesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainEnumArgs {
    /// Enum wire name (e.g., "audioCodec", "media-stream-direction").
    name: String,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Exit code when a payload does not survive decode/serialize/decode unchanged.
const EXIT_ROUNDTRIP_MISMATCH: u8 = 2;

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file_config = config::load_or_default(cli.config.as_deref(), Utf8Path::new("."))
        .context("load graphbind.toml config")?;
    let merger = ConfigMerger::new(file_config);

    match cli.cmd {
        Command::Decode(args) => {
            let merged = merger.merge(args.family.as_deref(), false, args.compact);
            cmd_decode(&args, &merged)
        }
        Command::Roundtrip(args) => {
            let merged = merger.merge(args.family.as_deref(), args.changed_only, args.compact);
            cmd_roundtrip(&args, &merged)
        }
        Command::Check(args) => {
            let merged = merger.merge(args.family.as_deref(), false, false);
            cmd_check(&args, &merged)
        }
        Command::ListTypes(args) => cmd_list_types(args),
        Command::ExplainEnum(args) => cmd_explain_enum(args),
    }
}

fn resolve_family(name: &str) -> anyhow::Result<&'static Family> {
    family(name).ok_or_else(|| {
        let available: Vec<_> = families().iter().map(|f| f.name).collect();
        anyhow::anyhow!(
            "Unknown family: '{}'\n\nAvailable families: {}",
            name,
            available.join(", ")
        )
    })
}

fn read_record(path: &Utf8Path, family: &Family) -> anyhow::Result<Record> {
    let payload = fs::read_to_string(path).with_context(|| format!("read payload {}", path))?;
    record_from_str(&payload, family.factory)
        .with_context(|| format!("decode {} as {}", path, family.name))
}

fn print_json(value: &JsonValue, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", serde_json::to_string(value)?);
    }
    Ok(())
}

fn cmd_decode(args: &DecodeArgs, merged: &MergedConfig) -> anyhow::Result<ExitCode> {
    let family = resolve_family(&merged.family)?;
    let record = read_record(&args.payload, family)?;
    debug!(schema = record.schema().name, "decoded payload");

    print_json(&inspect::summarize(&record)?, merged.pretty)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_roundtrip(args: &RoundtripArgs, merged: &MergedConfig) -> anyhow::Result<ExitCode> {
    let family = resolve_family(&merged.family)?;
    let mut record = read_record(&args.payload, family)?;

    for edit in &args.edits {
        inspect::apply_edit(&mut record, edit)?;
    }

    let full = to_value(&record).context("serialize record")?;
    let again = record_from_value(&full, family.factory).context("decode serialized record")?;
    let stable = again == record;

    let output = if merged.changed_only {
        record.set_return_only_changed_values(true);
        to_value(&record).context("serialize changed properties")?
    } else {
        full
    };
    print_json(&output, merged.pretty)?;

    if stable {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(payload = %args.payload, "record changed across decode/serialize/decode");
        Ok(ExitCode::from(EXIT_ROUNDTRIP_MISMATCH))
    }
}

fn cmd_check(args: &CheckArgs, merged: &MergedConfig) -> anyhow::Result<ExitCode> {
    let family = resolve_family(&merged.family)?;
    let loaded = load_payloads(&args.dir, family.factory)
        .with_context(|| format!("load payloads from {}", args.dir))?;

    let mut failed = 0usize;
    for payload in &loaded {
        match &payload.record {
            Ok(record) => println!(
                "{}: ok {}",
                payload.name,
                record.odata_type().unwrap_or(record.schema().name)
            ),
            Err(e) => {
                failed += 1;
                println!("{}: error {}", payload.name, e);
            }
        }
    }

    info!(
        "checked {} payload(s) in {}, {} failed",
        loaded.len(),
        args.dir,
        failed
    );
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn cmd_list_types(args: ListTypesArgs) -> anyhow::Result<ExitCode> {
    match args.format {
        OutputFormat::Text => {
            println!("Type families:\n");
            println!("  {:<14} {:<44} DISCRIMINATORS", "FAMILY", "SCHEMA");
            println!("  {:<14} {:<44} --------------", "------", "------");
            for family in families() {
                println!(
                    "  {:<14} {:<44} {}",
                    family.name,
                    family.schema.name,
                    family.discriminators().join(", ")
                );
            }
            println!();
            println!("Use 'graphbind decode --family <family> <payload>' to decode as a family.");
        }
        OutputFormat::Json => {
            let listed: Vec<_> = families()
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "family": f.name,
                        "schema": f.schema.name,
                        "polymorphic": f.registry().is_some(),
                        "discriminators": f.discriminators(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_explain_enum(args: ExplainEnumArgs) -> anyhow::Result<ExitCode> {
    use explain::{format_multiplicity, list_codec_names, lookup_codec, unknown_value_policy};

    let Some(codec) = lookup_codec(&args.name) else {
        anyhow::bail!(
            "Unknown enum: '{}'\n\nAvailable enums: {}",
            args.name,
            list_codec_names().join(", ")
        );
    };

    println!("================================================================================");
    println!("ENUM: {}", codec.name());
    println!("================================================================================");
    println!();
    println!("Multiplicity:  {}", format_multiplicity(codec.multiplicity()));
    println!("Sentinel:      {}", codec.sentinel().unwrap_or("(none)"));
    println!();

    println!("MEMBERS");
    println!("--------------------------------------------------------------------------------");
    for (ordinal, member) in codec.members().iter().enumerate() {
        let marker = if Some(*member) == codec.sentinel() {
            "  (sentinel)"
        } else {
            ""
        };
        println!("  {:>3}  {}{}", ordinal, member, marker);
    }
    println!();

    println!("UNKNOWN VALUES");
    println!("--------------------------------------------------------------------------------");
    println!("{}", unknown_value_policy(codec));
    if codec.multiplicity() == Multiplicity::Flags {
        println!("Members are written comma-separated in declaration order.");
    }
    println!();

    Ok(ExitCode::SUCCESS)
}
