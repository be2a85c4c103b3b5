// cfront: lexer and typedef-aware parser for a small C compiler

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as _;
use crossterm::style::Stylize;
use log::{Level, LevelFilter, Log, Metadata, Record};

use cfront::parser::config::ParserConfig;
use cfront::parser::constants::DEFAULT_MAX_DEPTH;
use cfront::parser::lexer;
use cfront::parser::parse::Parser;

#[derive(clap::Parser)]
#[command(name = "cfront")]
#[command(about = "Tokenize and parse a C source file", long_about = None)]
#[command(version)]
struct Cli {
    /// C source file to parse
    file: PathBuf,

    /// Print the token stream instead of the syntax tree
    #[arg(long)]
    tokens: bool,

    /// Accept names in expressions that were never declared
    #[arg(long)]
    lenient: bool,

    /// Maximum combined nesting of blocks and expressions
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Writes log records to stderr with a colored level prefix
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "error".red().bold(),
            Level::Warn => "warning".yellow().bold(),
            Level::Info => "info".green(),
            Level::Debug => "debug".blue(),
            Level::Trace => "trace".dark_grey(),
        };
        eprintln!("{}: {}", level, record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }

    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!(
                "{} could not read '{}': {}",
                "error:".red().bold(),
                cli.file.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    if cli.tokens {
        let lexed = lexer::tokenize(&source);
        for token in &lexed.tokens {
            println!(
                "{:>4}:{:<4} {}",
                token.location.line, token.location.column, token
            );
        }
        for err in &lexed.errors {
            if err.is_recoverable() {
                log::warn!("{}", err);
            } else {
                log::error!("{}", err);
            }
        }
        return if lexed.first_fatal().is_some() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    let mut config = ParserConfig::default().with_max_depth(cli.max_depth);
    if cli.lenient {
        config = config.lenient();
    }

    log::info!("parsing {}", cli.file.display());
    match Parser::parse_source_with(&source, config) {
        Ok(program) => {
            let count = program.statements().map_or(0, |s| s.len().saturating_sub(1));
            log::info!("parsed {} top-level statement(s)", count);
            print!("{}", program);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!(
                "{} {}: {}",
                "error:".red().bold(),
                cli.file.display(),
                err
            );
            ExitCode::FAILURE
        }
    }
}
