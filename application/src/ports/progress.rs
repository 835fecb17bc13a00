//! Progress notification port
//!
//! Defines the interface for reporting progress while a round runs.
//! Implementations live in the presentation layer.

/// Callback for progress updates during a forecast round
pub trait RoundProgressNotifier: Send + Sync {
    /// Called once agents are selected, before dispatch
    fn on_round_start(&self, question: &str, total_agents: usize);

    /// Called when an agent's call settles (either dispatch or requery)
    fn on_agent_complete(&self, agent: &str, success: bool);

    /// Called before a requery pass with the number of agents re-asked
    fn on_requery_start(&self, _pass: u32, _agents: usize) {}

    /// Called when aggregation starts
    fn on_aggregate(&self) {}

    /// Called when the round finishes, successfully or not
    fn on_round_complete(&self, success: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl RoundProgressNotifier for NoProgress {
    fn on_round_start(&self, _question: &str, _total_agents: usize) {}
    fn on_agent_complete(&self, _agent: &str, _success: bool) {}
    fn on_round_complete(&self, _success: bool) {}
}
