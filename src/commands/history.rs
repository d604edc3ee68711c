use colored::*;
use playgate::audit::AuditLog;
use playgate::config::Config;
use playgate::error::Result;

/// 감사 로그 출력 (오래된 순)
pub fn show(config: &Config, limit: Option<usize>, json: bool) -> Result<()> {
    let log = AuditLog::new(config.audit_log());
    let mut records = log.read_all()?;

    if let Some(limit) = limit {
        let skip = records.len().saturating_sub(limit);
        records.drain(..skip);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        eprintln!("{} No audit records in {}", "[i]".cyan(), log.path().display());
        return Ok(());
    }

    for record in &records {
        let outcome = if record.outcome == "exit 0" {
            record.outcome.green()
        } else if record.outcome.starts_with("aborted") {
            record.outcome.yellow()
        } else {
            record.outcome.red()
        };

        println!(
            "{}  {}  {}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            record.group.bold(),
            record.command,
            outcome
        );
    }

    Ok(())
}
