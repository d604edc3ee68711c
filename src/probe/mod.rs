pub mod pool;
pub mod ssh;

use crate::inventory::{ConnectionProfile, Host};
use async_trait::async_trait;
use std::time::Duration;

pub use pool::ReachabilityProber;
pub use ssh::SshProbe;

/// 도달성 검사 전송 계층
///
/// 실패는 진단 문자열로 보고되며 prober 는 이를 치명적 에러로 취급하지 않습니다.
#[async_trait]
pub trait Probe: Send + Sync {
    /// 로그용 전송 계층 이름 (예: "ssh")
    fn name(&self) -> &str;

    /// `host` 에 대해 최소한의 접속 확인을 한 번 수행
    async fn probe(
        &self,
        host: &Host,
        profile: &ConnectionProfile,
        timeout: Duration,
    ) -> std::result::Result<(), String>;
}

/// 호스트 하나에 대한 도달성 검사 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// 호스트 이름
    pub host: String,
    /// 도달 가능 여부
    pub reachable: bool,
    /// 실패 원인 (실패 시)
    pub error: Option<String>,
    /// 소요 시간
    pub elapsed: Duration,
}

impl ProbeResult {
    pub fn success(host: &str, elapsed: Duration) -> Self {
        Self {
            host: host.to_string(),
            reachable: true,
            error: None,
            elapsed,
        }
    }

    pub fn failure(host: &str, error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            host: host.to_string(),
            reachable: false,
            error: Some(error.into()),
            elapsed,
        }
    }
}

/// 도달 불가능한 결과만 입력 순서대로 반환
pub fn unreachable(results: &[ProbeResult]) -> Vec<&ProbeResult> {
    results.iter().filter(|r| !r.reachable).collect()
}
