//! docmatch - filter JSON documents with MongoDB-style expressions
//!
//! Reads a JSON document, a JSON array of documents, or JSON Lines from a
//! file or stdin and writes the documents matching `--filter`.

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use docmatch::{CaseFolding, Extractor, MatchOptions, Matcher, PathResolver, Value};

/// docmatch - filter JSON documents with MongoDB-style expressions
#[derive(Parser, Debug)]
#[command(name = "docmatch")]
#[command(author, version, about = "Filter JSON documents with MongoDB-style expressions")]
struct Args {
    /// Filter expression as JSON, e.g. '{"age": {"_gt": 28}}'
    #[arg(short, long, conflicts_with = "filter_file")]
    filter: Option<String>,

    /// Read the filter expression from a file
    #[arg(long, value_name = "PATH")]
    filter_file: Option<PathBuf>,

    /// Input file (stdin when omitted)
    input: Option<PathBuf>,

    /// Treat input as JSON Lines, one document per line
    #[arg(short, long)]
    lines: bool,

    /// Print only whether any document matches
    #[arg(long, conflicts_with = "count")]
    any: bool,

    /// Print only the number of matching documents
    #[arg(short, long)]
    count: bool,

    /// Compare field values case-insensitively
    #[arg(short, long)]
    ignore_case: bool,

    /// Use the case-insensitive extractor inside combinators and sub-matches too
    #[arg(long)]
    inherit_extractor: bool,

    /// Pretty-print matching documents
    #[arg(short, long)]
    pretty: bool,

    /// Log level filter, overridden by DOCMATCH_LOG
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

/// Log output format
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    /// Human readable
    Pretty,
    /// One JSON object per event
    Json,
}

/// What to print for the matched documents
#[derive(Clone, Copy, Debug)]
enum Output {
    Documents { pretty: bool },
    Any,
    Count,
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("docmatch: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(args: &Args) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("DOCMATCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    match args.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty().with_writer(io::stderr))
                .init();
        }
    }
}

/// Returns whether anything matched
fn run(args: &Args) -> Result<bool> {
    let expression = load_filter(args)?;
    let documents = load_documents(args)?;
    info!(documents = documents.len(), "loaded input");

    let output = if args.any {
        Output::Any
    } else if args.count {
        Output::Count
    } else {
        Output::Documents {
            pretty: args.pretty,
        }
    };
    let mut options = MatchOptions::default();
    if args.inherit_extractor {
        options = options.inherit_extractor();
    }

    let matcher = Matcher::new(expression).with_options(options);
    if args.ignore_case {
        report(
            &matcher.with_extractor(CaseFolding::new(PathResolver)),
            &documents,
            output,
        )
    } else {
        report(&matcher, &documents, output)
    }
}

fn load_filter(args: &Args) -> Result<Value> {
    let text = match (&args.filter, &args.filter_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read filter file {}", path.display()))?,
        (None, None) => anyhow::bail!("a filter is required: pass --filter or --filter-file"),
    };
    let json: serde_json::Value =
        serde_json::from_str(&text).context("filter is not valid JSON")?;
    Ok(Value::from(json))
}

fn load_documents(args: &Args) -> Result<Vec<Value>> {
    let text = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };

    if args.lines {
        return text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(number, line)| {
                serde_json::from_str::<serde_json::Value>(line)
                    .map(Value::from)
                    .with_context(|| format!("line {} is not valid JSON", number + 1))
            })
            .collect();
    }

    let json: serde_json::Value = serde_json::from_str(&text).context("input is not valid JSON")?;
    Ok(match Value::from(json) {
        Value::Array(documents) => documents,
        document => vec![document],
    })
}

#[allow(clippy::print_stdout)]
fn report<E: Extractor>(matcher: &Matcher<E>, documents: &[Value], output: Output) -> Result<bool> {
    match output {
        Output::Any => {
            let any = matcher.any(documents)?;
            println!("{any}");
            Ok(any)
        }
        Output::Count => {
            let count = matcher.count(documents)?;
            println!("{count}");
            Ok(count > 0)
        }
        Output::Documents { pretty } => {
            let matched = matcher.filter(documents)?;
            debug!(matched = matched.len(), "writing matches");
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            for document in &matched {
                let json = serde_json::Value::from((*document).clone());
                if pretty {
                    serde_json::to_writer_pretty(&mut out, &json)?;
                } else {
                    serde_json::to_writer(&mut out, &json)?;
                }
                writeln!(out)?;
            }
            out.flush()?;
            Ok(!matched.is_empty())
        }
    }
}
