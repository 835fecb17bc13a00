//! CLI entrypoint for Foresight
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use foresight_application::{
    AgentSource, ContextProvider, GenerationGateway, NoRoundLogger, RecordOutcomeUseCase,
    ReportRepository, ReputationStore, RoundLogger, RunForecastInput, RunForecastUseCase,
    StaticAgentSource,
};
use foresight_domain::OutputFormat as ReportFormat;
use foresight_infrastructure::{
    ConfigLoader, FileAgentSource, FileConfig, JsonReportRepository, JsonReputationStore,
    JsonlContextProvider, JsonlRoundLogger, OllamaBackend,
};
use foresight_presentation::{Cli, Command, ConsoleFormatter, ProgressReporter};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    info!("Starting Foresight");

    if let Command::ShowConfig = cli.command {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?
    };
    for warning in config.check()? {
        warn!("{}", warning);
    }
    if !config.output.color {
        colored::control::set_override(false);
    }

    let agents: Arc<dyn AgentSource> = if cli.no_config {
        Arc::new(StaticAgentSource::default())
    } else {
        Arc::new(FileAgentSource::new(ConfigLoader::sources(cli.config.as_ref())))
    };

    match cli.command {
        Command::Ask {
            question,
            agent,
            output,
            no_requery,
        } => {
            let format = output
                .map(ReportFormat::from)
                .or(config.output.format)
                .unwrap_or_default();
            let mut input = RunForecastInput::new(question).with_agents(agent);
            if no_requery {
                input = input.without_requery();
            }
            ask(&config, agents, input, format, cli.quiet).await
        }
        Command::Outcome {
            question_id,
            occurred,
            did_not_occur,
        } => {
            if occurred == did_not_occur {
                bail!("pass exactly one of --occurred or --did-not-occur");
            }
            outcome(&config, &question_id, occurred).await
        }
        Command::Agents => {
            let registry = agents.load().await?;
            print!("{}", ConsoleFormatter::format_agents(&registry));
            Ok(())
        }
        Command::Reputation { agent } => {
            let store = open_reputation(&config).await?;
            let book = store.snapshot().await?;
            let records = book.overview(&agent);
            print!("{}", ConsoleFormatter::format_reputation(&agent, &records));
            Ok(())
        }
        Command::ShowConfig => Ok(()),
    }
}

/// Console logging filtered by `-v`, plus an optional daily-rolling file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "foresight.log");
            let (file, guard) = tracing_appender::non_blocking(appender);
            builder
                .with_ansi(false)
                .with_writer(std::io::stderr.and(file))
                .init();
            Ok(Some(guard))
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

async fn open_reputation(config: &FileConfig) -> Result<Arc<JsonReputationStore>> {
    let store =
        JsonReputationStore::open(config.reputation.resolved_path(), config.reputation.to_policy())
            .await?;
    Ok(Arc::new(store))
}

fn round_logger(config: &FileConfig) -> Arc<dyn RoundLogger> {
    match config
        .storage
        .audit_log
        .as_ref()
        .and_then(JsonlRoundLogger::new)
    {
        Some(logger) => Arc::new(logger),
        None => Arc::new(NoRoundLogger),
    }
}

async fn ask(
    config: &FileConfig,
    agents: Arc<dyn AgentSource>,
    input: RunForecastInput,
    format: ReportFormat,
    quiet: bool,
) -> Result<()> {
    // === Dependency Injection ===
    let backend = OllamaBackend::new(
        config.backend.base_url.clone(),
        config.backend.connect_timeout(),
    )?
    .with_api_key(config.backend.api_key.clone());
    let gateway = Arc::new(GenerationGateway::new(
        Arc::new(backend),
        config.gateway.to_params(),
    ));
    let reputation: Arc<dyn ReputationStore> = open_reputation(config).await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling round");
            on_interrupt.cancel();
        }
    });

    let mut use_case = RunForecastUseCase::new(gateway, agents, reputation)
        .with_params(config.forecast_params())
        .with_logger(round_logger(config))
        .with_cancellation(cancel);
    if let Some(path) = &config.context.path {
        let provider: Arc<dyn ContextProvider> = Arc::new(JsonlContextProvider::new(path));
        use_case = use_case.with_context_provider(provider);
    }

    let report = if quiet {
        use_case.execute(input).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    };

    debug!(
        breakers = ?use_case.gateway().breaker_status(),
        cache = ?use_case.gateway().cache_stats(),
        "Gateway state after round"
    );

    let reports = JsonReportRepository::new(config.storage.resolved_reports_dir());
    if let Err(e) = reports.save(&report).await {
        warn!("Report {} was not saved: {}", report.question_id, e);
    }

    println!("{}", ConsoleFormatter::render(&report, format));
    Ok(())
}

async fn outcome(config: &FileConfig, question_id: &str, occurred: bool) -> Result<()> {
    let reports = Arc::new(JsonReportRepository::new(
        config.storage.resolved_reports_dir(),
    ));
    let reputation = open_reputation(config).await?;
    let use_case =
        RecordOutcomeUseCase::new(reports, reputation).with_logger(round_logger(config));

    let applied = use_case.execute(question_id, occurred).await?;
    if applied.duplicate {
        println!("Outcome for {} was already recorded.", applied.question_id);
        return Ok(());
    }

    println!(
        "Recorded outcome for {} ({}):",
        applied.question_id, applied.domain
    );
    for update in &applied.updates {
        println!(
            "  {:<32} {:.3} -> {:.3} ({} samples)",
            update.agent, update.accuracy_before, update.accuracy_after, update.sample_size
        );
    }
    Ok(())
}
