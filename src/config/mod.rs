pub mod ansible_cfg;

use crate::error::{PlaygateError, Result};
use crate::inventory::ConnectionProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use ansible_cfg::AnsibleDefaults;

/// playgate 사용자 설정
///
/// 설정 파일은 ~/.playgate/config.toml에 저장됩니다.
/// 실행당 한 번 로드되어 각 컴포넌트에 값으로 전달됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 자동화 저장소 원격 URL (sync 용)
    #[serde(default)]
    pub repo_url: Option<String>,

    /// 자동화 저장소 로컬 경로
    #[serde(default = "default_repo_path")]
    pub repo_path: String,

    /// 플레이북 실행 파일
    #[serde(default = "default_playbook_executable")]
    pub playbook_executable: String,

    /// 도달성 검사에 사용할 ssh 실행 파일
    #[serde(default = "default_ssh_executable")]
    pub ssh_executable: String,

    /// 호스트당 probe 타임아웃 (초)
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// 동시 probe 개수
    #[serde(default = "default_probe_concurrency")]
    pub probe_concurrency: usize,

    /// 전체 probe 단계 타임아웃에 더해지는 여유 시간 (초)
    #[serde(default = "default_timeout_margin")]
    pub timeout_margin_secs: u64,

    /// 운영 환경으로 분류할 그룹 이름 키워드 (대소문자 무시)
    #[serde(default = "default_risk_keywords")]
    pub risk_keywords: Vec<String>,

    /// 운영 환경 실행 시 정확히 입력해야 하는 확인 토큰
    #[serde(default = "default_risk_token")]
    pub risk_token: String,

    /// 감사 로그 파일 경로
    #[serde(default = "default_audit_log_path")]
    pub audit_log_path: String,

    /// 기본 SSH 사용자 (ansible.cfg 보다 우선)
    #[serde(default)]
    pub default_user: Option<String>,

    /// 기본 SSH 개인 키 (ansible.cfg 보다 우선)
    #[serde(default)]
    pub default_private_key: Option<String>,
}

fn default_repo_path() -> String {
    "~/ansible-repo".to_string()
}

fn default_playbook_executable() -> String {
    "ansible-playbook".to_string()
}

fn default_ssh_executable() -> String {
    "ssh".to_string()
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_probe_concurrency() -> usize {
    10
}

fn default_timeout_margin() -> u64 {
    5
}

fn default_risk_keywords() -> Vec<String> {
    vec!["prod".to_string(), "production".to_string()]
}

fn default_risk_token() -> String {
    "PROD".to_string()
}

fn default_audit_log_path() -> String {
    "~/.playgate/audit.log".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_url: None,
            repo_path: default_repo_path(),
            playbook_executable: default_playbook_executable(),
            ssh_executable: default_ssh_executable(),
            probe_timeout_secs: default_probe_timeout(),
            probe_concurrency: default_probe_concurrency(),
            timeout_margin_secs: default_timeout_margin(),
            risk_keywords: default_risk_keywords(),
            risk_token: default_risk_token(),
            audit_log_path: default_audit_log_path(),
            default_user: None,
            default_private_key: None,
        }
    }
}

impl Config {
    /// 기본 설정 파일 경로 (~/.playgate/config.toml)
    pub fn default_path() -> PathBuf {
        home_dir().join(".playgate").join("config.toml")
    }

    /// 설정 파일에서 로드 (없으면 기본값 사용)
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| PlaygateError::ConfigError(format!("{}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// 설정을 파일에 저장
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| PlaygateError::ConfigError(e.to_string()))?;

        fs::write(path, toml_string)?;

        Ok(())
    }

    pub fn repo_dir(&self) -> PathBuf {
        expand_home(&self.repo_path)
    }

    pub fn audit_log(&self) -> PathBuf {
        expand_home(&self.audit_log_path)
    }

    pub fn ansible_cfg(&self) -> PathBuf {
        self.repo_dir().join("ansible.cfg")
    }

    pub fn custom_commands_file(&self) -> PathBuf {
        self.repo_dir().join("custom_commands.txt")
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn timeout_margin(&self) -> Duration {
        Duration::from_secs(self.timeout_margin_secs)
    }

    /// 설정 파일에 명시된 전역 접속 프로필
    ///
    /// 비어 있는 항목은 실행 시 ansible.cfg 의 `[defaults]` 값으로 채워지고,
    /// 그래도 없으면 ssh 가 자체 기본값을 사용합니다.
    pub fn default_profile(&self) -> ConnectionProfile {
        ConnectionProfile {
            user: self.default_user.clone(),
            private_key: self.default_private_key.as_deref().map(expand_home),
            port: None,
            address: None,
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// `~` 또는 `~/...` 로 시작하는 경로를 홈 디렉토리 기준으로 확장
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.playbook_executable, "ansible-playbook");
        assert_eq!(config.probe_timeout_secs, 5);
        assert_eq!(config.probe_concurrency, 10);
        assert_eq!(config.risk_keywords, vec!["prod", "production"]);
        assert_eq!(config.risk_token, "PROD");
    }

    #[test]
    fn test_config_deserialization_partial() {
        let toml_str = r#"
            probe_concurrency = 20
            risk_token = "YES"
            default_user = "deploy"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.probe_concurrency, 20);
        assert_eq!(config.risk_token, "YES");
        assert_eq!(config.default_user.as_deref(), Some("deploy"));
        assert_eq!(config.probe_timeout_secs, 5);
        assert_eq!(config.repo_path, "~/ansible-repo");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.risk_token, "PROD");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.probe_concurrency = 3;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.probe_concurrency, 3);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "probe_concurrency = \"many\"").unwrap();

        assert!(matches!(Config::load(&path), Err(PlaygateError::ConfigError(_))));
    }

    #[test]
    fn test_default_profile_prefers_config_values() {
        let ansible = AnsibleDefaults {
            remote_user: Some("ansible".to_string()),
            private_key_file: Some(PathBuf::from("/keys/ansible")),
        };

        let config = Config::default();
        let profile = config.default_profile().with_fallbacks(&ansible);
        assert_eq!(profile.user.as_deref(), Some("ansible"));
        assert_eq!(profile.private_key, Some(PathBuf::from("/keys/ansible")));

        let config = Config {
            default_user: Some("ops".to_string()),
            default_private_key: Some("/keys/ops".to_string()),
            ..Config::default()
        };
        let profile = config.default_profile().with_fallbacks(&ansible);
        assert_eq!(profile.user.as_deref(), Some("ops"));
        assert_eq!(profile.private_key, Some(PathBuf::from("/keys/ops")));
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/etc/hosts"), PathBuf::from("/etc/hosts"));
        assert!(expand_home("~/x").ends_with("x"));
    }
}
