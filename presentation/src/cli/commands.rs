//! CLI command definitions

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for forecast reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every response with its weight breakdown
    Full,
    /// Consensus and headline metrics
    Summary,
    /// The raw report as JSON
    Json,
}

impl From<OutputFormat> for foresight_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for foresight
#[derive(Parser, Debug)]
#[command(name = "foresight")]
#[command(author, version, about = "Multi-agent forecasting with weighted consensus")]
#[command(long_about = r#"
Foresight asks a corps of persona-bound agents the same forecasting question
and combines their probabilities into a weighted consensus.

Each round:
1. Classify the question into a domain (military, financial, energy, ...)
2. Ask every enabled agent in parallel through a cached, circuit-broken gateway
3. Score answer depth and re-ask agents whose reasoning is shallow
4. Weight each answer by base weight, domain relevance, track record,
   stated confidence and depth, then aggregate

Configuration files are loaded from (in priority order):
1. FORESIGHT_<SECTION>__<KEY>   Environment variables
2. --config <path>              Explicit config file
3. ./foresight.toml             Project-level config
4. ~/.config/foresight/config.toml   Global config

Example:
  foresight ask "Will Brent crude close above $90 within 30 days?"
  foresight ask --agent "Energy & Resource Forecaster" -o full "..."
  foresight outcome 3f9a0c1d2e4b5a6c_20260301T120000Z --occurred
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a forecasting round
    Ask {
        /// The forecasting question
        question: String,

        /// Restrict the round to these agents (can be specified multiple times)
        #[arg(short, long, value_name = "NAME")]
        agent: Vec<String>,

        /// Output format (defaults to the config file, then summary)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,

        /// Skip the depth review and requery step
        #[arg(long)]
        no_requery: bool,
    },

    /// Record whether a forecast event occurred
    #[command(group(ArgGroup::new("result").required(true)))]
    Outcome {
        /// Question id printed with the report
        question_id: String,

        /// The event occurred
        #[arg(long, group = "result")]
        occurred: bool,

        /// The event did not occur
        #[arg(long, group = "result")]
        did_not_occur: bool,
    },

    /// List the agent registry with domain affinities
    Agents,

    /// Show an agent's track record across domains
    Reputation {
        /// Agent name
        agent: String,
    },

    /// Show configuration file locations
    ShowConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "foresight",
            "ask",
            "Will it rain?",
            "--agent",
            "a",
            "-a",
            "b",
            "-o",
            "json",
            "--no-requery",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Ask {
                question,
                agent,
                output,
                no_requery,
            } => {
                assert_eq!(question, "Will it rain?");
                assert_eq!(agent, vec!["a", "b"]);
                assert_eq!(output, Some(OutputFormat::Json));
                assert!(no_requery);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_outcome_requires_exactly_one_result() {
        assert!(Cli::try_parse_from(["foresight", "outcome", "q1"]).is_err());
        assert!(
            Cli::try_parse_from(["foresight", "outcome", "q1", "--occurred", "--did-not-occur"])
                .is_err()
        );

        let cli = Cli::try_parse_from(["foresight", "outcome", "q1", "--did-not-occur"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Outcome {
                occurred: false,
                did_not_occur: true,
                ..
            }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["foresight", "agents", "--no-config", "-q"]).unwrap();
        assert!(cli.no_config);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Command::Agents));
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        let format: foresight_domain::OutputFormat = OutputFormat::Full.into();
        assert_eq!(format, foresight_domain::OutputFormat::Full);
    }
}
