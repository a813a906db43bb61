use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn, Level};

use tffs_core::{
    consts::DEFAULT_TFFS_SIZE,
    decode, parse_size, read_snapshot, Decoded, KeyRegistry, Match, TffsError,
};

#[derive(Parser)]
#[command(name = "tffs", about = "Read the TFFS name-value partition of AVM Fritz!Box devices")]
struct Cli {
    /// List all key value pairs found in the TFFS file/device
    #[arg(short = 'a', long)]
    all: bool,

    /// Inspect the given TFFS file/device
    #[arg(short = 'i', long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// List all supported keys
    #[arg(short = 'l', long)]
    list: bool,

    /// Display the value of the given key
    #[arg(short = 'n', long, value_name = "KEY")]
    name: Option<String>,

    /// The (max) size of the TFFS file/device (0x.. hex, 0.. octal)
    #[arg(short = 's', long, value_name = "SIZE", value_parser = parse_size, default_value_t = DEFAULT_TFFS_SIZE)]
    size: usize,

    /// JSON key table replacing the built-in one
    #[arg(long, value_name = "FILE")]
    keys: Option<PathBuf>,

    /// Print values as hex instead of C strings
    #[arg(long)]
    hex: bool,

    /// Print matches as JSON
    #[arg(long)]
    json: bool,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct JsonMatch<'a> {
    name: &'a str,
    id: u32,
    value: String,
    hex: String,
}

impl<'a, 'r: 'a> From<&'a Match<'r>> for JsonMatch<'a> {
    fn from(m: &'a Match<'r>) -> Self {
        Self { name: m.name(), id: m.id(), value: m.as_str_lossy(), hex: hex::encode(m.value()) }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // stdout carries the values
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn render(m: &Match<'_>, as_hex: bool) -> String {
    if as_hex { hex::encode(m.value()) } else { m.as_str_lossy() }
}

fn print_all(out: &mut impl Write, decoded: &Decoded<'_>, cli: &Cli) -> Result<()> {
    if cli.json {
        let items: Vec<JsonMatch<'_>> = decoded.matches().iter().map(JsonMatch::from).collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
        return Ok(());
    }
    for m in decoded.matches() {
        writeln!(out, "{}={}", m.name(), render(m, cli.hex))?;
    }
    Ok(())
}

fn print_one(
    out: &mut impl Write,
    decoded: &Decoded<'_>,
    registry: &KeyRegistry,
    name: &str,
    input: &Path,
    cli: &Cli,
) -> Result<()> {
    let found = if registry.by_name(name).is_none() {
        Err(TffsError::UnknownKey(name.to_string()))
    } else {
        decoded.get(name).ok_or_else(|| TffsError::KeyNotFound(name.to_string()))
    };
    let m = found.with_context(|| format!("Key '{name}' was not found in {}", input.display()))?;
    if cli.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&JsonMatch::from(m))?)?;
    } else {
        writeln!(out, "{}", render(m, cli.hex))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let loaded;
    let registry: &KeyRegistry = match &cli.keys {
        Some(p) => {
            loaded = KeyRegistry::load(p)
                .with_context(|| format!("Failed to load key table {}", p.display()))?;
            &loaded
        }
        None => KeyRegistry::builtin(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        for e in registry.entries() {
            writeln!(out, "{}", e.name)?;
        }
        return Ok(());
    }

    let input = cli
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("No input file (-i <file>) given!"))?;
    if !input.exists() {
        bail!("{} does not exist", input.display());
    }
    if !cli.all && cli.name.is_none() {
        bail!("either -a or -n <key name> is required!");
    }

    let buf = read_snapshot(input, cli.size)
        .with_context(|| format!("Failed read tffs file {}", input.display()))?;
    let decoded = decode(&buf, registry)
        .into_non_empty()
        .with_context(|| format!("No values found in tffs file {}", input.display()))?;
    debug!(
        file = %input.display(),
        matched = decoded.count_matched(),
        end = ?decoded.end(),
        "decoded"
    );

    if cli.all {
        if cli.name.is_some() {
            warn!("--name is ignored together with --all");
        }
        print_all(&mut out, &decoded, &cli)?;
    } else if let Some(name) = cli.name.as_deref() {
        print_one(&mut out, &decoded, registry, name, input, &cli)?;
    }
    Ok(())
}
