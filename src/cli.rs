use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a map and report property values outside their declared types
    Check {
        /// Input .json map file
        input: PathBuf,
        /// Fail on the first out-of-range or undeclared enum value
        #[arg(long)]
        strict: bool,
    },
    /// Load a map and write it back out
    Resave {
        /// Input .json map file
        input: PathBuf,
        /// Output .json map file
        output: PathBuf,
        /// Indent the written JSON
        #[arg(long)]
        pretty: bool,
        /// Refuse to resave maps with out-of-range or undeclared enum values
        #[arg(long)]
        strict: bool,
    },
    /// List cameras with their map object counts
    Cameras {
        /// Input .json map file
        input: PathBuf,
    },
    /// Print a JSON summary of the map
    Summary {
        /// Input .json map file
        input: PathBuf,
    },
}

impl Cli {
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_resave() {
        let cli = Cli::parse_from(["map-model", "-vv", "resave", "in.json", "out.json", "--pretty"]);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        match cli.command {
            Command::Resave {
                input,
                output,
                pretty,
                strict,
            } => {
                assert_eq!(input, PathBuf::from("in.json"));
                assert_eq!(output, PathBuf::from("out.json"));
                assert!(pretty);
                assert!(!strict);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
