//! Console output formatter for forecast reports

use colored::Colorize;
use foresight_domain::{
    AgentRegistry, AttemptStatus, OutputFormat, Report, ReputationRecord, ResponseRecord,
};

/// Formats reports and registry views for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render a report in the requested format
    pub fn render(report: &Report, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(report),
            OutputFormat::Summary => Self::format_summary(report),
            OutputFormat::Json => Self::format_json(report),
        }
    }

    /// Format the complete report
    pub fn format(report: &Report) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Forecast Report"));
        output.push('\n');
        output.push_str(&Self::question_block(report));

        output.push_str(&Self::section_header("Consensus"));
        output.push_str(&Self::consensus_block(report));

        output.push_str(&Self::section_header("Responses"));
        for record in &report.responses {
            output.push_str(&Self::response_block(record));
        }

        output.push_str(&Self::section_header("Round"));
        let m = &report.metrics;
        output.push_str(&format!(
            "Agents: {} called, {} succeeded, {} failed\n",
            m.called, m.succeeded, m.failed
        ));
        output.push_str(&format!(
            "Requeries: {}   Cache hits: {}   Breaker trips: {}\n",
            m.requeries, m.cache_hits, m.breaker_trips
        ));
        output.push_str(&format!(
            "Elapsed: {} ms (dispatch {} ms, requery {} ms)\n",
            report.timing.total_elapsed_ms,
            report.timing.dispatch_elapsed_ms,
            report.timing.requery_elapsed_ms
        ));
        let q = &report.quality_summary;
        output.push_str(&format!(
            "Depth: avg {:.2}, min {:.2}, max {:.2}",
            q.average_depth, q.min_depth, q.max_depth
        ));
        if !q.weakest_agents.is_empty() {
            output.push_str(&format!("   Weakest: {}", q.weakest_agents.join(", ")));
        }
        output.push('\n');
        let d = &report.confidence_distribution;
        output.push_str(&format!(
            "Confidence: {} high / {} medium / {} low\n",
            d.high, d.medium, d.low
        ));

        output.push_str(&Self::insight_block(report));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &Report) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Consensus and headline metrics only
    pub fn format_summary(report: &Report) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Forecast ===".cyan().bold()));
        output.push_str(&Self::question_block(report));
        output.push_str(&Self::consensus_block(report));
        output.push_str(&format!(
            "{} {}/{} agents, {} requery(ies)\n",
            "Coverage:".dimmed(),
            report.metrics.succeeded,
            report.metrics.called,
            report.metrics.requeries
        ));
        output.push_str(&Self::insight_block(report));

        output
    }

    /// Registry listing with affinities
    pub fn format_agents(registry: &AgentRegistry) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Agents"));
        output.push('\n');

        for profile in registry.profiles() {
            let name = if profile.enabled {
                profile.name.bold().to_string()
            } else {
                format!("{} (disabled)", profile.name).as_str().dimmed().to_string()
            };
            output.push_str(&format!(
                "{}  {} weight {:.2}\n",
                name,
                profile.model.yellow(),
                profile.base_weight
            ));

            let join = |domains: Vec<foresight_domain::ForecastDomain>| {
                domains
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let primary = profile.primary_domains();
            let secondary = profile.secondary_domains();
            if primary.is_empty() && secondary.is_empty() {
                output.push_str("    no domain affinity\n");
            } else {
                if !primary.is_empty() {
                    output.push_str(&format!("    primary:   {}\n", join(primary)));
                }
                if !secondary.is_empty() {
                    output.push_str(&format!("    secondary: {}\n", join(secondary)));
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Per-domain track record of one agent
    pub fn format_reputation(agent: &str, records: &[&ReputationRecord]) -> String {
        if records.is_empty() {
            return format!("{} has no recorded outcomes yet.\n", agent.bold());
        }

        let mut output = String::new();
        output.push_str(&format!("{} {}\n", "Reputation:".cyan().bold(), agent.bold()));
        output.push_str(&format!(
            "  {:<16} {:>8} {:>8} {:>8} {:>8} {:>7}\n",
            "domain", "accuracy", "lifetime", "recent", "samples", "boost"
        ));
        for r in records {
            output.push_str(&format!(
                "  {:<16} {:>8.3} {:>8.3} {:>8.3} {:>8} {:>7.2}\n",
                r.domain.as_str(),
                r.accuracy,
                r.lifetime_accuracy(),
                r.recent_accuracy(),
                r.sample_size,
                r.performance_boost()
            ));
        }
        output
    }

    fn question_block(report: &Report) -> String {
        let c = &report.classification;
        let mut out = format!("{} {}\n", "Question:".cyan().bold(), report.question);
        out.push_str(&format!("{} {}\n", "ID:".cyan().bold(), report.question_id));
        out.push_str(&format!(
            "{} {} ({:.0}% confidence)",
            "Domain:".cyan().bold(),
            c.primary_domain,
            c.confidence * 100.0
        ));
        if !c.secondary_domains.is_empty() {
            let secondary: Vec<_> = c.secondary_domains.iter().map(|d| d.as_str()).collect();
            out.push_str(&format!(", also {}", secondary.join(", ")));
        }
        out.push_str("\n\n");
        out
    }

    fn consensus_block(report: &Report) -> String {
        let c = &report.consensus;
        let mut out = format!(
            "{} {}   {} {:.1}%\n",
            "Probability:".bold(),
            format!("{:.1}%", c.weighted_probability * 100.0).as_str().green().bold(),
            "Confidence:".bold(),
            c.weighted_confidence * 100.0
        );
        out.push_str(&format!(
            "{} {} (spread {:.3}, {} contributing)\n",
            "Agreement:".bold(),
            c.agreement_level,
            c.weighted_spread,
            c.contributing_agents
        ));
        if !c.outlier_agents.is_empty() {
            out.push_str(&format!(
                "{} {} ({:.0}% of weight)\n",
                "Outliers:".yellow().bold(),
                c.outlier_agents.join(", "),
                c.dissent_percentage * 100.0
            ));
        }
        if c.requires_review {
            out.push_str(&format!("{}\n", "Requires review: high dissent".red().bold()));
        }
        out
    }

    fn response_block(record: &ResponseRecord) -> String {
        let r = &record.response;
        let status = match r.status {
            AttemptStatus::Final => "final",
            AttemptStatus::Superseded => "superseded",
            AttemptStatus::Initial => "initial",
        };
        let title = format!(
            "── {} ({}) attempt {} [{}] ──",
            r.agent_name, r.model, r.attempt_index, status
        );

        if let Some(failure) = &r.failure {
            return format!("\n{}\nFailed: {}\n", title.as_str().red().bold(), failure);
        }

        let title = if r.is_final() {
            title.as_str().yellow().bold()
        } else {
            title.as_str().dimmed()
        };
        let mut out = format!("\n{}\n", title);
        let depth = record.quality.as_ref().map_or(0.0, |q| q.depth_score);
        out.push_str(&format!(
            "p={:.2} c={:.2} depth={:.2} weight={:.3}",
            r.stated_probability, r.stated_confidence, depth, record.weight.final_weight
        ));
        if let Some(reason) = record.weight.excluded {
            out.push_str(&format!(" (excluded: {:?})", reason).as_str().dimmed().to_string());
        }
        if r.cache_hit {
            out.push_str(" (cached)");
        }
        out.push('\n');
        out.push_str(&format!(
            "  base {:.2} x relevance {:.2} x performance {:.2}\n",
            record.weight.base_weight, record.weight.relevance_boost, record.weight.performance_boost
        ));
        if let Some(q) = &record.quality
            && !q.red_flags.is_empty()
        {
            let flags: Vec<_> = q.red_flags.iter().map(ToString::to_string).collect();
            out.push_str(&format!("  red flags: {}\n", flags.join(", ")).as_str().yellow().to_string());
        }
        out.push_str(&Self::indent(r.analysis.trim(), "  "));
        out.push('\n');
        if let Some(rec) = &r.recommendation {
            out.push_str(&format!("  {} {}\n", "Recommendation:".bold(), rec));
        }
        out
    }

    fn insight_block(report: &Report) -> String {
        let mut out = format!("\n{}\n", report.summary);
        if !report.uncertainty_factors.is_empty() {
            out.push_str(&format!("\n{}\n", "Uncertainty factors:".yellow().bold()));
            for factor in &report.uncertainty_factors {
                out.push_str(&format!("  * {}\n", factor));
            }
        }
        out.push_str(&format!(
            "\n{} {:.2}\n",
            "Data quality:".dimmed(),
            report.data_quality_score
        ));
        out
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.as_str().cyan(), title.bold(), line.as_str().cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).as_str().cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
