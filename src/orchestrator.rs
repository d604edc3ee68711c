//! Preflight-gated execution flow.
//!
//! inventory -> reachability probes -> reachability checkpoint -> risk
//! checkpoint -> dispatch -> audit. Every attempt ends with exactly one audit
//! record, whether it dispatched or not.

use crate::audit::{AuditLog, AuditRecord, Outcome};
use crate::config::AnsibleDefaults;
use crate::error::Result;
use crate::executor::{CommandSpec, DispatchOutcome, Dispatcher, Invocation};
use crate::gate::{GateDecision, SafetyGate};
use crate::inventory::{self, ConnectionProfile, Host, ParsedInventory};
use crate::probe::{ProbeResult, ReachabilityProber};
use crate::ui::{self, Confirmer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const REASON_INVENTORY_NOT_FOUND: &str = "inventory not found";
pub const REASON_INVENTORY_UNREADABLE: &str = "inventory unreadable";
pub const REASON_NO_HOSTS: &str = "no hosts";
pub const REASON_ANSIBLE_CFG_UNREADABLE: &str = "ansible.cfg unreadable";

/// One operator request.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Host-group name, also used for risk classification
    pub group: String,
    /// Inventory file to parse and pass to the engine
    pub inventory: PathBuf,
    pub command: CommandSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { code: Option<i32>, elapsed: Duration },
    SpawnFailed { error: String },
    Aborted { reason: String },
}

impl RunOutcome {
    pub fn to_outcome(&self) -> Outcome {
        match self {
            RunOutcome::Completed { code: Some(code), .. } => Outcome::Exit(*code),
            RunOutcome::Completed { code: None, .. } => Outcome::Signal,
            RunOutcome::SpawnFailed { error } => Outcome::SpawnFailed(error.clone()),
            RunOutcome::Aborted { reason } => Outcome::Aborted(reason.clone()),
        }
    }

    /// Process exit status the CLI should end with.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed { code: Some(code), .. } => *code,
            RunOutcome::Completed { code: None, .. } => 1,
            RunOutcome::SpawnFailed { .. } => 127,
            RunOutcome::Aborted { .. } => 1,
        }
    }

    pub fn dispatched(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

impl From<DispatchOutcome> for RunOutcome {
    fn from(outcome: DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Exited { code, elapsed } => RunOutcome::Completed { code, elapsed },
            DispatchOutcome::SpawnFailed { error } => RunOutcome::SpawnFailed { error },
        }
    }
}

/// Everything an attempt produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub probes: Vec<ProbeResult>,
    pub record: AuditRecord,
}

pub struct Orchestrator {
    prober: ReachabilityProber,
    gate: SafetyGate,
    dispatcher: Arc<dyn Dispatcher>,
    confirmer: Arc<dyn Confirmer>,
    audit: AuditLog,
    defaults: ConnectionProfile,
    ansible_cfg: Option<PathBuf>,
    playbook_executable: String,
    show_progress: bool,
}

impl Orchestrator {
    pub fn new(
        prober: ReachabilityProber,
        gate: SafetyGate,
        dispatcher: Arc<dyn Dispatcher>,
        confirmer: Arc<dyn Confirmer>,
        audit: AuditLog,
    ) -> Self {
        Self {
            prober,
            gate,
            dispatcher,
            confirmer,
            audit,
            defaults: ConnectionProfile::default(),
            ansible_cfg: None,
            playbook_executable: "ansible-playbook".to_string(),
            show_progress: false,
        }
    }

    pub fn with_defaults(mut self, defaults: ConnectionProfile) -> Self {
        self.defaults = defaults;
        self
    }

    /// ansible.cfg to read connection fallbacks from on every attempt.
    pub fn with_ansible_cfg(mut self, path: impl Into<PathBuf>) -> Self {
        self.ansible_cfg = Some(path.into());
        self
    }

    pub fn with_playbook_executable(mut self, executable: impl Into<String>) -> Self {
        self.playbook_executable = executable.into();
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub async fn run(&self, request: &RunRequest) -> Result<RunReport> {
        let invocation = Invocation::build(&request.command, &request.inventory, &self.playbook_executable);
        let command_text = invocation.to_string();
        let group = request.group.as_str();

        // re-parsed on every run so live edits are picked up
        let group_def = match inventory::load(group, &request.inventory) {
            Ok(ParsedInventory::Found(group_def)) => group_def,
            Ok(ParsedInventory::SourceNotFound(_)) => {
                return self.finish(group, &command_text, abort(REASON_INVENTORY_NOT_FOUND), Vec::new());
            }
            Err(e) => {
                tracing::error!(path = %request.inventory.display(), error = %e, "failed to read inventory");
                let reason = format!("{}: {}", REASON_INVENTORY_UNREADABLE, e);
                return self.finish(group, &command_text, abort(&reason), Vec::new());
            }
        };

        if group_def.is_empty() {
            return self.finish(group, &command_text, abort(REASON_NO_HOSTS), Vec::new());
        }

        let defaults = match self.connection_defaults() {
            Ok(defaults) => defaults,
            Err(e) => {
                tracing::error!(error = %e, "failed to read ansible.cfg");
                let reason = format!("{}: {}", REASON_ANSIBLE_CFG_UNREADABLE, e);
                return self.finish(group, &command_text, abort(&reason), Vec::new());
            }
        };

        let probes = self.probe(&group_def.hosts, &defaults).await;

        let decision = self.gate.check_reachability(&probes, self.confirmer.as_ref());
        if let Some(outcome) = rejected(&decision) {
            return self.finish(group, &command_text, outcome, probes);
        }

        let decision = self.gate.check_risk(group, self.confirmer.as_ref());
        if let Some(outcome) = rejected(&decision) {
            return self.finish(group, &command_text, outcome, probes);
        }

        tracing::info!(group = %group, command = %command_text, "dispatching");
        let outcome = RunOutcome::from(self.dispatcher.dispatch(&invocation).await);

        self.finish(group, &command_text, outcome, probes)
    }

    fn connection_defaults(&self) -> Result<ConnectionProfile> {
        let ansible = match &self.ansible_cfg {
            Some(path) => AnsibleDefaults::load(path)?,
            None => AnsibleDefaults::default(),
        };
        Ok(self.defaults.clone().with_fallbacks(&ansible))
    }

    async fn probe(&self, hosts: &[Host], defaults: &ConnectionProfile) -> Vec<ProbeResult> {
        if !self.show_progress {
            return self.prober.probe_all(hosts, defaults).await;
        }

        // duplicates are probed once, so the bar counts distinct hosts
        let bar = ui::create_probe_bar(self.prober.distinct_hosts(hosts));
        let results = self
            .prober
            .probe_all_with(hosts, defaults, |r| ui::tick_probe(&bar, &r.host, r.reachable))
            .await;
        bar.finish_and_clear();
        results
    }

    fn finish(
        &self,
        group: &str,
        command_text: &str,
        outcome: RunOutcome,
        probes: Vec<ProbeResult>,
    ) -> Result<RunReport> {
        let record = self
            .audit
            .record(group, command_text, &outcome.to_outcome())
            .inspect_err(|e| tracing::error!(error = %e, "failed to write audit record"))?;

        tracing::info!(group = %group, outcome = %record.outcome, "attempt finished");

        Ok(RunReport {
            outcome,
            probes,
            record,
        })
    }
}

fn abort(reason: &str) -> RunOutcome {
    RunOutcome::Aborted {
        reason: reason.to_string(),
    }
}

fn rejected(decision: &GateDecision) -> Option<RunOutcome> {
    if decision.proceed {
        tracing::debug!(reason = %decision.reason, "checkpoint passed");
        None
    } else {
        Some(abort(&decision.reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let done = |code| RunOutcome::Completed {
            code,
            elapsed: Duration::ZERO,
        };
        assert_eq!(done(Some(0)).exit_code(), 0);
        assert_eq!(done(Some(4)).exit_code(), 4);
        assert_eq!(done(None).exit_code(), 1);
        assert_eq!(RunOutcome::SpawnFailed { error: "x".into() }.exit_code(), 127);
        assert_eq!(abort(REASON_NO_HOSTS).exit_code(), 1);
    }

    #[test]
    fn test_outcome_mapping() {
        assert_eq!(abort("unreachable hosts").to_outcome().to_string(), "aborted: unreachable hosts");
        assert_eq!(
            RunOutcome::from(DispatchOutcome::Exited {
                code: Some(0),
                elapsed: Duration::ZERO
            })
            .to_outcome(),
            Outcome::Exit(0)
        );
        assert!(!abort("x").dispatched());
    }
}
