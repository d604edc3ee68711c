use crate::config::Config;
use crate::inventory::{ConnectionProfile, Host};
use crate::probe::{Probe, ProbeResult};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 제한된 병렬도로 호스트 도달성을 검사하는 prober
pub struct ReachabilityProber {
    /// 검사 전송 계층
    probe: Arc<dyn Probe>,
    /// 호스트당 타임아웃
    timeout: Duration,
    /// 최대 동시 검사 개수
    concurrency: usize,
    /// 전체 타임아웃 여유 시간
    margin: Duration,
    /// 계산된 전체 타임아웃 대신 사용할 값
    overall_override: Option<Duration>,
}

impl ReachabilityProber {
    pub fn new(probe: Arc<dyn Probe>) -> Self {
        Self {
            probe,
            timeout: Duration::from_secs(5),
            concurrency: 10,
            margin: Duration::from_secs(5),
            overall_override: None,
        }
    }

    pub fn from_config(probe: Arc<dyn Probe>, config: &Config) -> Self {
        Self::new(probe)
            .with_timeout(config.probe_timeout())
            .with_concurrency(config.probe_concurrency)
            .with_margin(config.timeout_margin())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_overall_timeout(mut self, overall: Duration) -> Self {
        self.overall_override = Some(overall);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 전체 검사 단계 타임아웃: timeout × ceil(hosts / concurrency) + margin
    ///
    /// 오버플로우 시 `Duration::MAX` 로 포화됩니다.
    pub fn overall_timeout(&self, host_count: usize) -> Duration {
        if let Some(overall) = self.overall_override {
            return overall;
        }
        let waves = u32::try_from(host_count.div_ceil(self.concurrency)).unwrap_or(u32::MAX);
        self.timeout
            .checked_mul(waves)
            .and_then(|t| t.checked_add(self.margin))
            .unwrap_or(Duration::MAX)
    }

    /// 실제로 검사될 호스트 수 (중복 제거 후)
    pub fn distinct_hosts(&self, hosts: &[Host]) -> usize {
        dedupe(hosts).len()
    }

    pub async fn probe_all(&self, hosts: &[Host], defaults: &ConnectionProfile) -> Vec<ProbeResult> {
        self.probe_all_with(hosts, defaults, |_| {}).await
    }

    /// 모든 호스트를 검사하고 입력 순서대로 결과를 반환
    ///
    /// 중복 호스트는 처음 나온 항목만 검사합니다. 결과는 항상 중복 제거된
    /// 입력 전체에 대해 하나씩 존재하며, 전체 타임아웃이 지나 완료되지 못한
    /// 호스트는 "timed out" 으로 기록됩니다. `on_result` 는 결과가 나올 때마다
    /// 호출됩니다.
    pub async fn probe_all_with<F>(
        &self,
        hosts: &[Host],
        defaults: &ConnectionProfile,
        mut on_result: F,
    ) -> Vec<ProbeResult>
    where
        F: FnMut(&ProbeResult),
    {
        let unique = dedupe(hosts);
        if unique.is_empty() {
            return Vec::new();
        }

        let overall = self.overall_timeout(unique.len());
        tracing::info!(
            hosts = unique.len(),
            concurrency = self.concurrency,
            transport = self.probe.name(),
            overall_ms = overall.as_millis() as u64,
            "probing hosts"
        );

        let started = Instant::now();
        let mut completed: HashMap<String, ProbeResult> = HashMap::with_capacity(unique.len());

        {
            let mut results = stream::iter(unique.iter().map(|host| self.probe_one(host, defaults)))
                .buffer_unordered(self.concurrency);

            let deadline = tokio::time::sleep(overall);
            tokio::pin!(deadline);

            loop {
                tokio::select! {
                    next = results.next() => match next {
                        Some(result) => {
                            on_result(&result);
                            completed.insert(result.host.clone(), result);
                        }
                        None => break,
                    },
                    _ = &mut deadline => {
                        tracing::warn!(
                            pending = unique.len() - completed.len(),
                            "probe phase timed out, cancelling in-flight probes"
                        );
                        break;
                    }
                }
            }
            // dropping the stream cancels every probe still in flight
        }

        let elapsed = started.elapsed();
        unique
            .iter()
            .map(|host| {
                completed.remove(&host.name).unwrap_or_else(|| {
                    let result = ProbeResult::failure(&host.name, "timed out", elapsed);
                    on_result(&result);
                    result
                })
            })
            .collect()
    }

    async fn probe_one(&self, host: &Host, defaults: &ConnectionProfile) -> ProbeResult {
        let profile = defaults.resolve_for(host);
        let started = Instant::now();

        let outcome = tokio::time::timeout(self.timeout, self.probe.probe(host, &profile, self.timeout)).await;
        let elapsed = started.elapsed();

        let result = match outcome {
            Ok(Ok(())) => ProbeResult::success(&host.name, elapsed),
            Ok(Err(error)) => ProbeResult::failure(&host.name, error, elapsed),
            Err(_) => ProbeResult::failure(
                &host.name,
                format!("timed out after {}ms", self.timeout.as_millis()),
                elapsed,
            ),
        };

        tracing::debug!(
            host = %result.host,
            reachable = result.reachable,
            elapsed_ms = elapsed.as_millis() as u64,
            error = result.error.as_deref().unwrap_or(""),
            "probe finished"
        );

        result
    }
}

fn dedupe(hosts: &[Host]) -> Vec<&Host> {
    let mut seen = HashSet::new();
    hosts.iter().filter(|h| seen.insert(h.name.as_str())).collect()
}
