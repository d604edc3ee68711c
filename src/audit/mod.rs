use crate::error::Result;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 프로세스 전체에서 감사 로그 쓰기를 직렬화하는 잠금
static WRITE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const FIELD_SEPARATOR: &str = " | ";

/// 오케스트레이션 시도 하나의 최종 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 엔진이 종료 코드와 함께 끝남
    Exit(i32),
    /// 엔진이 시그널로 종료됨
    Signal,
    /// 엔진 실행 파일을 시작하지 못함
    SpawnFailed(String),
    /// 디스패치 전에 중단됨
    Aborted(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Exit(code) => write!(f, "exit {}", code),
            Outcome::Signal => write!(f, "exit signal"),
            Outcome::SpawnFailed(error) => write!(f, "spawn failed: {}", error),
            Outcome::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

/// 감사 로그 한 줄
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub group: String,
    pub command: String,
    pub outcome: String,
}

impl AuditRecord {
    pub fn new(group: &str, command: &str, outcome: &Outcome) -> Self {
        Self {
            // the line format keeps whole seconds only
            timestamp: Utc::now().trunc_subsecs(0),
            group: sanitize(group),
            command: sanitize(command),
            outcome: sanitize(&outcome.to_string()),
        }
    }

    /// `<timestamp> | <group> | <command> | <outcome>`
    pub fn to_line(&self) -> String {
        [
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            sanitize(&self.group),
            sanitize(&self.command),
            sanitize(&self.outcome),
        ]
        .join(FIELD_SEPARATOR)
    }

    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.splitn(4, FIELD_SEPARATOR);
        let timestamp = DateTime::parse_from_rfc3339(fields.next()?.trim())
            .ok()?
            .with_timezone(&Utc);

        Some(Self {
            timestamp,
            group: fields.next()?.to_string(),
            command: fields.next()?.to_string(),
            outcome: fields.next()?.to_string(),
        })
    }
}

/// 레코드가 항상 네 개 필드의 한 줄이 되도록 구분자와 줄바꿈을 치환
fn sanitize(field: &str) -> String {
    field
        .chars()
        .map(|c| match c {
            '\n' | '\r' => ' ',
            '|' => '/',
            c => c,
        })
        .collect()
}

/// 추가 전용 감사 로그
///
/// 레코드 하나는 잠금을 잡은 상태에서 단일 `write_all` 로 append 모드 파일에
/// 기록됩니다. 기존 내용은 절대 수정하거나 삭제하지 않습니다.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, group: &str, command: &str, outcome: &Outcome) -> Result<AuditRecord> {
        let record = AuditRecord::new(group, command, outcome);
        self.append(&record)?;
        Ok(record)
    }

    pub fn append(&self, record: &AuditRecord) -> Result<()> {
        let mut line = record.to_line();
        line.push('\n');

        let _guard = WRITE_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        tracing::debug!(path = %self.path.display(), outcome = %record.outcome, "audit record appended");
        Ok(())
    }

    /// 전체 스캔. 파싱할 수 없는 줄은 건너뜁니다.
    pub fn read_all(&self) -> Result<Vec<AuditRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| {
                let record = AuditRecord::parse_line(l);
                if record.is_none() {
                    tracing::warn!(line = l, "skipping malformed audit line");
                }
                record
            })
            .collect())
    }
}
