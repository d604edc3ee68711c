use crate::config::expand_home;
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// 사전 컴파일된 정규표현식
static SECTION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\s*([^\]]+?)\s*\]$").unwrap());
static KEY_VALUE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_.\-]+)\s*=\s*(.*)$").unwrap());

/// ansible.cfg 의 `[defaults]` 섹션에서 읽은 접속 기본값
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnsibleDefaults {
    pub remote_user: Option<String>,
    pub private_key_file: Option<PathBuf>,
}

impl AnsibleDefaults {
    /// 파일이 있으면 읽고, 없으면 빈 기본값을 반환
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let mut defaults = Self::default();
        let mut in_defaults = false;

        for raw in content.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(caps) = SECTION_REGEX.captures(line) {
                in_defaults = &caps[1] == "defaults";
                continue;
            }

            if !in_defaults {
                continue;
            }

            let Some(caps) = KEY_VALUE_REGEX.captures(line) else {
                continue;
            };
            let value = caps[2].trim();
            if value.is_empty() {
                continue;
            }

            match &caps[1] {
                "remote_user" => defaults.remote_user = Some(value.to_string()),
                "private_key_file" => defaults.private_key_file = Some(expand_home(value)),
                _ => {}
            }
        }

        defaults
    }
}
