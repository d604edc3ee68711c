pub mod risk;

use crate::config::Config;
use crate::probe::{self, ProbeResult};
use crate::ui::Confirmer;

pub use risk::{RiskClassifier, RiskLevel};

pub const REASON_UNREACHABLE: &str = "unreachable hosts";
pub const REASON_RISK_FAILED: &str = "risk confirmation failed";

/// Outcome of one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    pub proceed: bool,
    pub reason: String,
}

impl GateDecision {
    pub fn proceed(reason: impl Into<String>) -> Self {
        Self {
            proceed: true,
            reason: reason.into(),
        }
    }

    pub fn abort(reason: impl Into<String>) -> Self {
        Self {
            proceed: false,
            reason: reason.into(),
        }
    }
}

/// Explicit checkpoint bypasses for tests and scripted automation.
/// The CLI never sets these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateOverrides {
    pub assume_reachable: bool,
    pub assume_risk_confirmed: bool,
}

/// Two independent checkpoints guarding dispatch.
///
/// Both fail closed: a prompt error, missing input or anything other than
/// the expected answer aborts.
pub struct SafetyGate {
    classifier: RiskClassifier,
    token: String,
    overrides: GateOverrides,
}

impl SafetyGate {
    pub fn new(classifier: RiskClassifier, token: impl Into<String>) -> Self {
        Self {
            classifier,
            token: token.into(),
            overrides: GateOverrides::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(RiskClassifier::new(&config.risk_keywords), config.risk_token.clone())
    }

    pub fn with_overrides(mut self, overrides: GateOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn classify(&self, group: &str) -> RiskLevel {
        self.classifier.classify(group)
    }

    /// Reachability checkpoint.
    pub fn check_reachability(&self, results: &[ProbeResult], confirmer: &dyn Confirmer) -> GateDecision {
        let failing = probe::unreachable(results);
        if failing.is_empty() {
            return GateDecision::proceed("all hosts reachable");
        }

        if self.overrides.assume_reachable {
            tracing::warn!(unreachable = failing.len(), "reachability checkpoint bypassed by override");
            return GateDecision::proceed("reachability override");
        }

        let lines: Vec<String> = failing
            .iter()
            .map(|r| match &r.error {
                Some(error) => format!("{} ({})", r.host, error),
                None => r.host.clone(),
            })
            .collect();

        match confirmer.confirm(&lines, "Continue anyway?") {
            Ok(true) => {
                tracing::warn!(unreachable = failing.len(), "operator continued with unreachable hosts");
                GateDecision::proceed(format!("operator accepted {} unreachable hosts", failing.len()))
            }
            Ok(false) => GateDecision::abort(REASON_UNREACHABLE),
            Err(e) => {
                tracing::warn!(error = %e, "reachability prompt failed, aborting");
                GateDecision::abort(REASON_UNREACHABLE)
            }
        }
    }

    /// Risk checkpoint. Elevated groups require the exact confirmation token.
    pub fn check_risk(&self, group: &str, confirmer: &dyn Confirmer) -> GateDecision {
        if self.classify(group) == RiskLevel::Normal {
            return GateDecision::proceed("normal risk");
        }

        if self.overrides.assume_risk_confirmed {
            tracing::warn!(group = %group, "risk checkpoint bypassed by override");
            return GateDecision::proceed("risk override");
        }

        let warning = format!(
            "You are about to run against '{}', which is classified as production.",
            group
        );

        match confirmer.challenge(&warning, &self.token) {
            // exact, case-sensitive, no trimming
            Ok(answer) if answer == self.token => GateDecision::proceed("risk confirmed"),
            Ok(_) => GateDecision::abort(REASON_RISK_FAILED),
            Err(e) => {
                tracing::warn!(error = %e, "risk prompt failed, aborting");
                GateDecision::abort(REASON_RISK_FAILED)
            }
        }
    }
}
