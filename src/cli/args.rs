//! Command-line arguments and subcommands for `myjs`.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "myjs",
    version,
    about = "Runs a catalogue of executable examples about the scripting language's values."
)]
pub struct MyjsArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Raise the log level (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the catalogue and report every case (the default).
    Run {
        /// Only run suites whose name matches this regular expression.
        #[arg(short, long)]
        filter: Option<String>,

        /// Report format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// When to color the text report.
        #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
        color: ColorMode,
    },
    /// List suites and their cases without running them.
    List {
        /// Only list suites whose name matches this regular expression.
        #[arg(short, long)]
        filter: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let args = MyjsArgs::try_parse_from(["myjs"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_run_flags() {
        let args = MyjsArgs::try_parse_from([
            "myjs", "-vv", "run", "--filter", "^Array", "--format", "json", "--color", "never",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        match args.command {
            Some(Command::Run { filter, format, color }) => {
                assert_eq!(filter.as_deref(), Some("^Array"));
                assert_eq!(format, Format::Json);
                assert_eq!(color, ColorMode::Never);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(MyjsArgs::try_parse_from(["myjs", "run", "--format", "xml"]).is_err());
    }
}
