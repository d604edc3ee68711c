use crate::inventory::{ConnectionProfile, Host};
use crate::probe::Probe;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Probes a host by opening a non-interactive ssh session that runs `exit`.
pub struct SshProbe {
    executable: String,
}

impl SshProbe {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn build_args(&self, host: &Host, profile: &ConnectionProfile, timeout: Duration) -> Vec<String> {
        let connect_timeout = timeout.as_secs().max(1);

        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", connect_timeout),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
        ];

        if let Some(key) = &profile.private_key {
            args.push("-i".to_string());
            args.push(key.display().to_string());
        }

        if let Some(port) = profile.port {
            args.push("-p".to_string());
            args.push(port.to_string());
        }

        args.push(profile.target(host));
        args.push("exit".to_string());

        args
    }
}

impl Default for SshProbe {
    fn default() -> Self {
        Self::new("ssh")
    }
}

#[async_trait]
impl Probe for SshProbe {
    fn name(&self) -> &str {
        "ssh"
    }

    async fn probe(
        &self,
        host: &Host,
        profile: &ConnectionProfile,
        timeout: Duration,
    ) -> std::result::Result<(), String> {
        let args = self.build_args(host, profile, timeout);

        // kill_on_drop: cancelled probes must not leave ssh processes behind
        let output = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {}", self.executable, e))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            Err(format!("ssh exited with {}", output.status))
        } else {
            Err(stderr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_args_minimal() {
        let probe = SshProbe::default();
        let args = probe.build_args(&Host::new("web1"), &ConnectionProfile::default(), Duration::from_secs(5));

        assert_eq!(
            args,
            vec![
                "-o",
                "BatchMode=yes",
                "-o",
                "ConnectTimeout=5",
                "-o",
                "StrictHostKeyChecking=accept-new",
                "web1",
                "exit"
            ]
        );
    }

    #[test]
    fn test_build_args_with_credentials() {
        let probe = SshProbe::default();
        let profile = ConnectionProfile {
            user: Some("deploy".to_string()),
            private_key: Some(PathBuf::from("/keys/id")),
            port: Some(2222),
            address: Some("10.0.0.5".to_string()),
        };
        let args = probe.build_args(&Host::new("db1"), &profile, Duration::from_millis(300));

        assert!(args.contains(&"ConnectTimeout=1".to_string()));
        let joined = args.join(" ");
        assert!(joined.contains("-i /keys/id"));
        assert!(joined.contains("-p 2222"));
        assert!(joined.ends_with("deploy@10.0.0.5 exit"));
    }

    #[tokio::test]
    async fn test_missing_executable_is_reported_not_thrown() {
        let probe = SshProbe::new("playgate-no-such-ssh-binary");
        let result = probe
            .probe(&Host::new("web1"), &ConnectionProfile::default(), Duration::from_secs(1))
            .await;

        let err = result.unwrap_err();
        assert!(err.contains("playgate-no-such-ssh-binary"));
    }
}
