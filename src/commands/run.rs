use crate::commands::saved::SavedCommands;
use colored::*;
use dialoguer::Select;
use playgate::audit::AuditLog;
use playgate::config::Config;
use playgate::error::{PlaygateError, Result};
use playgate::executor::{CommandSpec, EngineDispatcher};
use playgate::gate::SafetyGate;
use playgate::inventory::{inventory_path, list_inventories};
use playgate::probe::{Probe, ReachabilityProber, SshProbe};
use playgate::ui::TerminalConfirmer;
use playgate::{Orchestrator, RunOutcome, RunReport, RunRequest};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

/// 플레이북 실행
pub async fn run_playbook(
    config: &Config,
    inventory: Option<String>,
    playbook: String,
    extra_args: Vec<String>,
) -> Result<i32> {
    orchestrate(config, inventory, CommandSpec::playbook(playbook, extra_args)).await
}

/// 사용자 정의 명령 실행 (저장된 명령 번호 또는 직접 입력한 인자)
pub async fn exec_command(
    config: &Config,
    inventory: Option<String>,
    saved: Option<usize>,
    argv: Vec<String>,
) -> Result<i32> {
    let spec = match saved {
        Some(index) => {
            let store = SavedCommands::new(config.custom_commands_file());
            CommandSpec::custom_from_line(&store.get(index)?)?
        }
        None => CommandSpec::custom(argv)?,
    };

    orchestrate(config, inventory, spec).await
}

async fn orchestrate(config: &Config, inventory: Option<String>, command: CommandSpec) -> Result<i32> {
    let repo = config.repo_dir();
    let group = match inventory {
        Some(name) => name,
        None => select_inventory(&repo)?,
    };

    let probe: Arc<dyn Probe> = Arc::new(SshProbe::new(config.ssh_executable.clone()));

    let orchestrator = Orchestrator::new(
        ReachabilityProber::from_config(probe, config),
        SafetyGate::from_config(config),
        Arc::new(EngineDispatcher::new()),
        Arc::new(TerminalConfirmer::new()),
        AuditLog::new(config.audit_log()),
    )
    .with_defaults(config.default_profile())
    .with_ansible_cfg(config.ansible_cfg())
    .with_playbook_executable(config.playbook_executable.clone())
    .with_progress(true);

    let request = RunRequest {
        inventory: inventory_path(&repo, &group),
        group,
        command,
    };

    eprintln!(
        "{} Checking SSH connectivity for '{}'...",
        "[INFO]".cyan(),
        request.group.bold()
    );

    let report = orchestrator.run(&request).await?;
    print_report(&report);

    Ok(report.outcome.exit_code())
}

fn select_inventory(repo: &Path) -> Result<String> {
    let names = list_inventories(repo)?;
    if names.is_empty() {
        return Err(PlaygateError::InvalidSelection("no inventories found".to_string()));
    }

    if !std::io::stdin().is_terminal() {
        return Err(PlaygateError::InvalidSelection(
            "--inventory is required when not running on a terminal".to_string(),
        ));
    }

    let index = Select::new()
        .with_prompt("Select inventory")
        .items(&names)
        .default(0)
        .interact()
        .map_err(|e| PlaygateError::Prompt(e.to_string()))?;

    Ok(names[index].clone())
}

fn print_report(report: &RunReport) {
    let reachable = report.probes.iter().filter(|r| r.reachable).count();
    if !report.probes.is_empty() {
        eprintln!(
            "{} {}/{} hosts reachable",
            "[INFO]".cyan(),
            reachable,
            report.probes.len()
        );
    }

    match &report.outcome {
        RunOutcome::Completed { code: Some(0), elapsed } => {
            eprintln!(
                "{} Completed in {:.1}s",
                "[OK]".green().bold(),
                elapsed.as_secs_f64()
            );
        }
        RunOutcome::Completed { code, elapsed } => {
            let code = code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string());
            eprintln!(
                "{} Engine exited with {} after {:.1}s",
                "[X]".red().bold(),
                code.red(),
                elapsed.as_secs_f64()
            );
        }
        RunOutcome::SpawnFailed { error } => {
            eprintln!("{} Failed to start automation engine: {}", "[X]".red().bold(), error);
        }
        RunOutcome::Aborted { reason } => {
            eprintln!("{} Aborted: {}", "[INFO]".yellow(), reason);
        }
    }
}
