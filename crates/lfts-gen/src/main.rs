// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `lfts-gen`: emit TypeScript reactor classes from program IR.
//! Settings come from the config store first, then command-line flags.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lfts_config::{ConfigService, FsConfigStore, GeneratorConfig};
use lfts_gen::{emit_program, parse_program, Diagnostic, EmitOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "Emit TypeScript reactor classes from reactor program IR")]
struct Args {
    /// Program IR (JSON). Reads stdin when absent or `-`.
    input: Option<PathBuf>,
    /// Write generated TypeScript here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Federate id to emit the federated top level for.
    #[arg(long)]
    federate: Option<u32>,
    /// Override the RTI host carried by the IR.
    #[arg(long)]
    rti_host: Option<String>,
    /// Override the RTI port carried by the IR (0 selects the default port).
    #[arg(long)]
    rti_port: Option<u16>,
    /// Spaces per indentation level.
    #[arg(long)]
    indent: Option<usize>,
    /// Emit reactor classes in parallel (output is identical).
    #[arg(long)]
    parallel: bool,
    /// Directory holding `generator.json` (defaults to the user config dir).
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Write output and exit successfully even when error diagnostics were raised.
    #[arg(long)]
    allow_errors: bool,
}

fn load_config(args: &Args) -> Result<GeneratorConfig> {
    let store = match &args.config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new().context("resolving config directory")?,
    };
    debug!(base = %store.base().display(), "config store");
    let mut config = GeneratorConfig::load(&ConfigService::new(store))
        .context("loading generator settings")?;

    if let Some(indent) = args.indent {
        config.indent_width = indent;
    }
    config.parallel |= args.parallel;
    if args.rti_host.is_some() {
        config.rti_host.clone_from(&args.rti_host);
    }
    if args.rti_port.is_some() {
        config.rti_port = args.rti_port;
    }
    config.validate().context("invalid settings")?;
    Ok(config)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => io::read_to_string(io::stdin()).context("reading program IR from stdin"),
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(p) => fs::write(p, text).with_context(|| format!("writing {}", p.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush().context("writing to stdout")
        }
    }
}

fn report(diagnostics: &[Diagnostic]) -> Result<()> {
    let mut stderr = io::stderr().lock();
    for diagnostic in diagnostics {
        debug!(
            code = diagnostic.kind.code(),
            node = %diagnostic.node,
            severity = %diagnostic.severity,
            "diagnostic"
        );
        writeln!(stderr, "{diagnostic}")?;
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = load_config(&args)?;
    let source = read_input(args.input.as_deref())?;
    let program = parse_program(&source).context("parsing program IR")?;

    let options = EmitOptions {
        federate: args.federate,
        ..EmitOptions::from_config(&config)
    };
    let emitted = emit_program(&program, &options).context("emitting program")?;
    report(&emitted.diagnostics)?;

    let errors = emitted.diagnostics.iter().filter(|d| d.is_error()).count();
    if errors > 0 && !args.allow_errors {
        writeln!(
            io::stderr().lock(),
            "lfts-gen: {errors} error diagnostic(s); no output written (pass --allow-errors to keep it)"
        )?;
        return Ok(ExitCode::FAILURE);
    }
    write_output(args.output.as_deref(), &emitted.value)?;
    info!(
        bytes = emitted.value.len(),
        diagnostics = emitted.diagnostics.len(),
        "generated"
    );
    Ok(ExitCode::SUCCESS)
}
