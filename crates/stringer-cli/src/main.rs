use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use stringer_contracts::REPORT_SCHEMA_VERSION;
use stringer_core::diagnostics::Diagnostic;
use stringer_core::forward::DEFAULT_RUN_THRESHOLD;
use stringer_core::generate::TypeReport;
use stringer_core::lookup::DEFAULT_LOOKUP_THRESHOLDS;
use stringer_core::manifest::{parse_manifest, ResolveOptions};
use stringer_core::util::sha256_hex;
use stringer_core::{generate_file, FileHeader, GenerateOptions};

#[derive(Parser, Debug)]
#[command(name = "stringer")]
#[command(
    about = "Generates Display impls and name lookups for integer constant types.",
    long_about = None
)]
struct Cli {
    /// Constant manifest produced by the source analyzer.
    #[arg(long)]
    manifest: PathBuf,
    /// Comma-separated type names, in output order (default: every manifest type).
    #[arg(long = "type", value_delimiter = ',')]
    types: Vec<String>,
    /// Output file (default: stdout).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Reverse-lookup function name template; `{}` is replaced with the type name.
    #[arg(long, default_value = "")]
    lookup: String,
    #[arg(long, value_name = "N")]
    run_threshold: Option<usize>,
    #[arg(long, value_name = "LO,HI", value_parser = parse_thresholds)]
    lookup_thresholds: Option<(usize, usize)>,
    /// Prefix trimmed from constant names in the printed text.
    #[arg(long, default_value = "")]
    trim_prefix: String,
    /// Use a constant's line comment as its printed text.
    #[arg(long, default_value_t = false)]
    line_comment: bool,
    /// If set, fail if the output file differs; do not write.
    #[arg(long, default_value_t = false)]
    check: bool,
    /// Print a JSON report on stdout (requires --output).
    #[arg(long, default_value_t = false)]
    report_json: bool,
    #[arg(short, long, default_value_t = false, conflicts_with = "quiet")]
    verbose: bool,
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

impl Cli {
    /// Options echoed in the generated header. Output location and mode
    /// flags are left out so `--check` compares like with like.
    fn header_args(&self) -> String {
        let mut args = Vec::new();
        if !self.types.is_empty() {
            args.push(format!("--type {}", self.types.join(",")));
        }
        if !self.lookup.is_empty() {
            args.push(format!("--lookup {}", self.lookup));
        }
        if let Some(n) = self.run_threshold {
            args.push(format!("--run-threshold {n}"));
        }
        if let Some((lo, hi)) = self.lookup_thresholds {
            args.push(format!("--lookup-thresholds {lo},{hi}"));
        }
        if !self.trim_prefix.is_empty() {
            args.push(format!("--trim-prefix {}", self.trim_prefix));
        }
        if self.line_comment {
            args.push("--line-comment".to_string());
        }
        args.join(" ")
    }
}

fn parse_thresholds(s: &str) -> Result<(usize, usize), String> {
    let (lo, hi) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LO,HI, got {s:?}"))?;
    let lo = lo.trim().parse::<usize>().map_err(|e| format!("LO: {e}"))?;
    let hi = hi.trim().parse::<usize>().map_err(|e| format!("HI: {e}"))?;
    Ok((lo, hi))
}

#[derive(Debug, Serialize)]
struct StringerToolReport {
    schema_version: &'static str,
    command: &'static str,
    ok: bool,
    manifest: String,
    output: String,
    verified: bool,
    types: Vec<TypeReport>,
    diagnostics_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<Diagnostic>,
    exit_code: u8,
}

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn try_main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    if cli.output.is_none() {
        if cli.check {
            anyhow::bail!("--check requires --output");
        }
        if cli.report_json {
            anyhow::bail!("--report-json requires --output");
        }
    }

    let bytes = std::fs::read(&cli.manifest)
        .with_context(|| format!("read manifest: {}", cli.manifest.display()))?;
    let manifest = parse_manifest(&bytes)
        .with_context(|| format!("load manifest: {}", cli.manifest.display()))?;

    let resolved = manifest.resolve(
        &cli.types,
        &ResolveOptions {
            trim_prefix: cli.trim_prefix.clone(),
            line_comment: cli.line_comment,
        },
    );
    let options = GenerateOptions {
        lookup_template: cli.lookup.clone(),
        run_threshold: cli.run_threshold.unwrap_or(DEFAULT_RUN_THRESHOLD),
        lookup_thresholds: cli.lookup_thresholds.unwrap_or(DEFAULT_LOOKUP_THRESHOLDS),
    };
    let header = FileHeader {
        args: cli.header_args(),
        source_sha256: Some(sha256_hex(&bytes)),
    };

    let mut file = generate_file(&resolved.types, &options, &header)
        .context("invalid generation options")?;
    for err in &resolved.errors {
        file.record_input_error(err);
    }
    let generated = file.types.iter().filter(|t| t.ok).count();

    match &cli.output {
        Some(path) if cli.check => check_output(path, &file.source)?,
        Some(path) if generated == 0 => {
            warn!("no type generated; leaving {} untouched", path.display());
        }
        Some(path) => write_output(path, &file.source)?,
        None => std::io::stdout()
            .write_all(file.source.as_bytes())
            .context("write stdout")?,
    }

    let exit_code: u8 = if file.ok() { 0 } else { 1 };
    info!(
        types = generated,
        failed = file.types.len() - generated,
        verified = file.verified,
        "stringer done"
    );

    if cli.report_json {
        let report = StringerToolReport {
            schema_version: REPORT_SCHEMA_VERSION,
            command: if cli.check { "check" } else { "generate" },
            ok: file.ok(),
            manifest: cli.manifest.display().to_string(),
            output: cli
                .output
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            verified: file.verified,
            diagnostics_count: file.diagnostics.len(),
            types: file.types,
            diagnostics: file.diagnostics,
            exit_code,
        };
        print_json(&report)?;
    }
    Ok(ExitCode::from(exit_code))
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("set tracing subscriber")
}

fn check_output(path: &Path, src: &str) -> Result<()> {
    let cur = std::fs::read_to_string(path)
        .with_context(|| format!("read existing output: {}", path.display()))?;
    if cur != src {
        anyhow::bail!("generated output differs: {}", path.display());
    }
    Ok(())
}

fn write_output(path: &Path, src: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }
    std::fs::write(path, src.as_bytes())
        .with_context(|| format!("write output: {}", path.display()))?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = serde_json::to_string(value)?;
    out.push('\n');
    std::io::stdout()
        .write_all(out.as_bytes())
        .context("write stdout")?;
    Ok(())
}
