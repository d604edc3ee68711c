use crate::error::{PlaygateError, Result};
use std::fmt;
use std::path::Path;

/// 실행할 자동화 명령
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    /// 플레이북 실행: `<engine> -i <inventory> <playbook> <extra_args...>`
    Playbook {
        playbook: String,
        extra_args: Vec<String>,
    },
    /// 사용자 정의 명령: `<argv...> -i <inventory>`
    Custom { argv: Vec<String> },
}

impl CommandSpec {
    pub fn playbook(playbook: impl Into<String>, extra_args: Vec<String>) -> Self {
        CommandSpec::Playbook {
            playbook: playbook.into(),
            extra_args,
        }
    }

    pub fn custom(argv: Vec<String>) -> Result<Self> {
        if argv.is_empty() {
            return Err(PlaygateError::EmptyCommand);
        }
        Ok(CommandSpec::Custom { argv })
    }

    /// 저장된 명령어 한 줄을 공백 기준으로 인자 목록으로 분리
    ///
    /// 셸을 거치지 않으므로 따옴표나 파이프는 해석되지 않습니다.
    pub fn custom_from_line(line: &str) -> Result<Self> {
        Self::custom(line.split_whitespace().map(str::to_string).collect())
    }
}

/// 실행할 자식 프로세스 (프로그램과 인자 목록)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn build(spec: &CommandSpec, inventory: &Path, playbook_executable: &str) -> Self {
        let inventory = inventory.display().to_string();

        match spec {
            CommandSpec::Playbook { playbook, extra_args } => {
                let mut args = vec!["-i".to_string(), inventory, playbook.clone()];
                args.extend(extra_args.iter().cloned());
                Self {
                    program: playbook_executable.to_string(),
                    args,
                }
            }
            CommandSpec::Custom { argv } => {
                let (program, rest) = argv
                    .split_first()
                    .map(|(p, r)| (p.clone(), r.to_vec()))
                    .unwrap_or_default();
                let mut args = rest;
                args.push("-i".to_string());
                args.push(inventory);
                Self { program, args }
            }
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playbook_invocation() {
        let spec = CommandSpec::playbook("site.yml", vec!["--check".to_string()]);
        let inv = Invocation::build(&spec, Path::new("/repo/inventories/staging/hosts"), "ansible-playbook");

        assert_eq!(inv.program, "ansible-playbook");
        assert_eq!(
            inv.args,
            vec!["-i", "/repo/inventories/staging/hosts", "site.yml", "--check"]
        );
        assert_eq!(
            inv.to_string(),
            "ansible-playbook -i /repo/inventories/staging/hosts site.yml --check"
        );
    }

    #[test]
    fn test_custom_invocation_appends_inventory() {
        let spec = CommandSpec::custom_from_line("ansible all -m ping").unwrap();
        let inv = Invocation::build(&spec, Path::new("hosts"), "ansible-playbook");

        assert_eq!(inv.program, "ansible");
        assert_eq!(inv.args, vec!["all", "-m", "ping", "-i", "hosts"]);
    }

    #[test]
    fn test_shell_metacharacters_stay_literal() {
        let spec = CommandSpec::custom_from_line("ansible all -a uptime;reboot").unwrap();
        let inv = Invocation::build(&spec, Path::new("hosts"), "ansible-playbook");
        assert!(inv.args.contains(&"uptime;reboot".to_string()));
    }

    #[test]
    fn test_empty_custom_command_is_rejected() {
        assert!(matches!(
            CommandSpec::custom_from_line("   "),
            Err(PlaygateError::EmptyCommand)
        ));
    }
}
