//! Command-line tool converting YAML/JSON documents into S-expressions.
//!
//! Usage: sexpify --input <FILE> [OPTIONS]
//!
//! Options:
//!   -i, --input <FILE>      Input file (.yaml or .yml; anything else needs --format)
//!   -o, --output <FILE>     Output file [default: stdout]
//!   -f, --format <FORMAT>   Input format (yaml, json) [default: yaml for .yaml/.yml]
//!       --pretty            Pretty-print output
//!       --env               Enable ${VAR} environment variable substitution
//!       --prefix <LABEL>    Prefix for generated forms [default: yaml]
//!       --indent <N>        Indent width for --pretty [default: 2]
//!   -d, --debug...          Increase log verbosity (repeatable)

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use libsexpify::{load_file, to_sexpr, Error, InputFormat, LoadOptions, DEFAULT_INDENT};
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Convert YAML/JSON to S-expressions.
#[derive(Parser, Debug)]
#[command(name = "sexpify")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input file (.yaml or .json; .json needs --format json)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output file (optional, defaults to stdout)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Input format
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Pretty-print output
    #[arg(long)]
    pretty: bool,

    /// Enable ${VAR} environment variable substitution
    #[arg(long)]
    env: bool,

    /// Prefix for generated forms
    #[arg(long, default_value = libsexpify::DEFAULT_PREFIX)]
    prefix: String,

    /// Indent width used by --pretty
    #[arg(long, default_value_t = DEFAULT_INDENT)]
    indent: usize,

    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    debug: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Yaml,
    Json,
}

impl From<FormatArg> for InputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => InputFormat::Yaml,
            FormatArg::Json => InputFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let options = LoadOptions {
        format: cli.format.map(InputFormat::from),
        substitute_env: cli.env,
    };
    let value = load_file(&cli.input, &options)?;

    let indent = cli.pretty.then_some(cli.indent);
    let sexpr = to_sexpr(&value, &cli.prefix, indent);
    debug!(bytes = sexpr.len(), pretty = cli.pretty, "encoded");

    // Nothing is written until the whole expression exists.
    match &cli.output {
        Some(path) => {
            fs::write(path, &sexpr).map_err(|e| Error::writing(path, e))?;
            info!(path = %path.display(), "wrote output");
        }
        None => println!("{}", sexpr),
    }
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
