//! Entry point for the `myjs` binary.
//!
//! Parses arguments, turns them into a [`RunConfig`], and drives the
//! catalogue runner. Diagnostics go to standard error through `miette`,
//! reports to standard output.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use regex::Regex;
use termcolor::{ColorChoice, StandardStream};

use crate::catalog;
use crate::errors::CliError;
use crate::harness::{JsonReporter, Reporter, RunOptions, RunSummary, Runner, TextReporter};
use crate::logging;

mod args;

pub use args::{ColorMode, Command, Format, MyjsArgs};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Everything a run needs from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub filter: Option<Regex>,
    pub format: Format,
    pub color: ColorMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            filter: None,
            format: Format::Text,
            color: ColorMode::Auto,
        }
    }
}

impl RunConfig {
    pub fn new(filter: Option<&str>, format: Format, color: ColorMode) -> Result<Self, CliError> {
        Ok(Self {
            filter: compile_filter(filter)?,
            format,
            color,
        })
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            filter: self.filter.clone(),
        }
    }

    /// `auto` colors only when standard output is a terminal.
    pub fn color_choice(&self) -> ColorChoice {
        match self.color {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
        }
    }
}

fn compile_filter(filter: Option<&str>) -> Result<Option<Regex>, CliError> {
    Ok(filter.map(Regex::new).transpose()?)
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// Runs the binary and returns its exit status: 0 when every case passed,
/// 1 on failures or errors. Usage errors exit with 2 from `clap`.
pub fn run() -> ExitCode {
    let args = MyjsArgs::parse();
    logging::init(args.verbose);

    let runner = catalog::runner();
    let outcome = match args.command {
        None => run_catalogue(&runner, &RunConfig::default()),
        Some(Command::Run {
            filter,
            format,
            color,
        }) => RunConfig::new(filter.as_deref(), format, color)
            .and_then(|config| run_catalogue(&runner, &config)),
        Some(Command::List { filter }) => compile_filter(filter.as_deref())
            .and_then(|filter| list(&runner, filter.as_ref()))
            .map(|()| ExitCode::SUCCESS),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::FAILURE
        }
    }
}

fn run_catalogue(runner: &Runner, config: &RunConfig) -> Result<ExitCode, CliError> {
    let summary = runner.execute(&config.options());
    write_report(&summary, config)?;
    Ok(summary.exit_code())
}

fn write_report(summary: &RunSummary, config: &RunConfig) -> Result<(), CliError> {
    match config.format {
        Format::Text => {
            TextReporter::new(StandardStream::stdout(config.color_choice())).report(summary)?
        }
        Format::Json => JsonReporter::new(io::stdout().lock()).report(summary)?,
    }
    Ok(())
}

/// Prints suite names with their cases indented beneath.
fn list(runner: &Runner, filter: Option<&Regex>) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    for suite in runner.suites() {
        if filter.is_some_and(|f| !f.is_match(suite.name())) {
            continue;
        }
        writeln!(out, "{}", suite.name())?;
        for case in suite.cases() {
            writeln!(out, "  {}", case.name())?;
        }
    }
    out.flush()?;
    Ok(())
}
