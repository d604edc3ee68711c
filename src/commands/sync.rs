use colored::*;
use playgate::config::Config;
use playgate::error::{PlaygateError, Result};
use playgate::ui::create_spinner;
use tokio::process::Command;

/// 자동화 저장소가 있으면 pull, 없으면 clone
pub async fn sync_repo(config: &Config) -> Result<()> {
    let repo = config.repo_dir();
    let repo_str = repo.display().to_string();

    let (action, args, message): (&str, Vec<String>, String) = if repo.exists() {
        (
            "pull",
            vec!["-C".to_string(), repo_str.clone(), "pull".to_string()],
            format!("Pulling latest changes into {}...", repo_str),
        )
    } else {
        let url = config
            .repo_url
            .clone()
            .ok_or_else(|| PlaygateError::ConfigError("repo_url is not set".to_string()))?;
        let message = format!("Cloning {} into {}...", url, repo_str);
        ("clone", vec!["clone".to_string(), url, repo_str], message)
    };

    let spinner = create_spinner(&message);
    let output = Command::new("git")
        .args(&args)
        .output()
        .await
        .map_err(|e| PlaygateError::Git(e.to_string()));
    spinner.finish_and_clear();
    let output = output?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PlaygateError::Git(format!(
            "git {} exited with {}: {}",
            action,
            output.status,
            stderr.trim()
        )));
    }

    tracing::info!(repo = %repo.display(), "repository synced");
    eprintln!("{} Repository is up to date.", "[OK]".green());
    Ok(())
}
