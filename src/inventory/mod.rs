pub mod catalog;
pub mod profile;

use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub use catalog::{inventory_path, list_inventories};
pub use profile::ConnectionProfile;

/// 인벤토리의 단일 호스트 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// 호스트 이름 또는 주소 (호스트 라인의 첫 번째 토큰)
    pub name: String,
    /// 인라인 `key=value` 접속 변수
    pub vars: BTreeMap<String, String>,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: BTreeMap::new(),
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

/// 파싱된 호스트 그룹
///
/// 그룹 헤더는 보존되지 않으며 정의 안의 모든 호스트가 하나의 순서 있는
/// 목록으로 평탄화됩니다. 중복 항목도 그대로 유지됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryGroup {
    pub name: String,
    pub hosts: Vec<Host>,
}

impl InventoryGroup {
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn host_names(&self) -> Vec<&str> {
        self.hosts.iter().map(|h| h.name.as_str()).collect()
    }
}

/// 디스크에서 인벤토리 파일을 읽은 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInventory {
    Found(InventoryGroup),
    /// 파일이 존재하지 않음. 빈 그룹을 담아 호출자가 계속 진행할지 결정할 수 있습니다.
    SourceNotFound(InventoryGroup),
}

impl ParsedInventory {
    pub fn group(&self) -> &InventoryGroup {
        match self {
            ParsedInventory::Found(group) | ParsedInventory::SourceNotFound(group) => group,
        }
    }

    pub fn into_group(self) -> InventoryGroup {
        match self {
            ParsedInventory::Found(group) | ParsedInventory::SourceNotFound(group) => group,
        }
    }

    pub fn is_source_not_found(&self) -> bool {
        matches!(self, ParsedInventory::SourceNotFound(_))
    }
}

/// 인벤토리 텍스트를 호스트 목록으로 파싱
pub fn parse(name: &str, text: &str) -> InventoryGroup {
    let hosts = text.lines().filter_map(parse_line).collect();

    InventoryGroup {
        name: name.to_string(),
        hosts,
    }
}

fn parse_line(raw: &str) -> Option<Host> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
        return None;
    }

    let mut tokens = line.split_whitespace();
    let mut host = Host::new(tokens.next()?);

    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                host.vars.insert(key.to_string(), value.to_string());
            }
            _ => tracing::debug!(host = %host.name, token = %token, "ignoring malformed host variable"),
        }
    }

    Some(host)
}

/// 인벤토리 파일을 읽어 파싱
///
/// 파일이 없으면 에러 대신 `SourceNotFound` 를 반환하여 호출자가
/// 빈 호스트 목록을 치명적으로 볼지 결정하게 합니다.
pub fn load(name: &str, path: &Path) -> Result<ParsedInventory> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(ParsedInventory::Found(parse(name, &text))),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "inventory file not found");
            Ok(ParsedInventory::SourceNotFound(InventoryGroup {
                name: name.to_string(),
                hosts: Vec::new(),
            }))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# staging web tier
[web]
web1 ansible_user=deploy ansible_port=2222
web2

  [db]
db1   ansible_host=10.0.0.5 stray-token
# trailing comment
web1
";

    #[test]
    fn test_parse_skips_comments_blanks_and_headers() {
        let group = parse("staging", SAMPLE);
        assert_eq!(group.host_names(), vec!["web1", "web2", "db1", "web1"]);
        assert!(group
            .hosts
            .iter()
            .all(|h| !h.name.starts_with('#') && !h.name.starts_with('[') && !h.name.is_empty()));
    }

    #[test]
    fn test_parse_inline_vars() {
        let group = parse("staging", SAMPLE);
        let web1 = &group.hosts[0];
        assert_eq!(web1.vars.get("ansible_user").map(String::as_str), Some("deploy"));
        assert_eq!(web1.vars.get("ansible_port").map(String::as_str), Some("2222"));

        let db1 = &group.hosts[2];
        assert_eq!(db1.vars.len(), 1);
        assert_eq!(db1.vars.get("ansible_host").map(String::as_str), Some("10.0.0.5"));
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let group = parse("staging", SAMPLE);
        assert_eq!(group.hosts.iter().filter(|h| h.name == "web1").count(), 2);
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse("staging", SAMPLE), parse("staging", SAMPLE));
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(parse("empty", "\n\n# nothing\n[all]\n").is_empty());
    }

    #[test]
    fn test_value_may_contain_equals() {
        let group = parse("g", "h1 opts=a=b =orphan\n");
        assert_eq!(group.hosts[0].vars.get("opts").map(String::as_str), Some("a=b"));
        assert_eq!(group.hosts[0].vars.len(), 1);
    }

    #[test]
    fn test_load_missing_file_signals_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let parsed = load("staging", &dir.path().join("hosts")).unwrap();
        assert!(parsed.is_source_not_found());
        assert!(parsed.group().is_empty());
        assert_eq!(parsed.group().name, "staging");
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, "[all]\nweb1\nweb2\n").unwrap();

        let parsed = load("staging", &path).unwrap();
        assert!(!parsed.is_source_not_found());
        assert_eq!(parsed.into_group().host_names(), vec!["web1", "web2"]);
    }
}
