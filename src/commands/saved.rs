use colored::*;
use playgate::config::Config;
use playgate::error::{PlaygateError, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// 저장된 사용자 정의 명령 (한 줄에 하나)
pub struct SavedCommands {
    path: PathBuf,
}

impl SavedCommands {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn list(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// 1부터 시작하는 번호로 조회
    pub fn get(&self, index: usize) -> Result<String> {
        let commands = self.list()?;
        if commands.is_empty() {
            return Err(PlaygateError::InvalidSelection("no custom commands saved yet".to_string()));
        }

        index
            .checked_sub(1)
            .and_then(|i| commands.get(i).cloned())
            .ok_or_else(|| {
                PlaygateError::InvalidSelection(format!(
                    "command {} does not exist (1-{})",
                    index,
                    commands.len()
                ))
            })
    }

    pub fn add(&self, command: &str) -> Result<()> {
        let command = command.split_whitespace().collect::<Vec<_>>().join(" ");
        if command.is_empty() {
            return Err(PlaygateError::EmptyCommand);
        }

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(format!("{}\n", command).as_bytes())?;

        Ok(())
    }
}

pub fn list(config: &Config) -> Result<()> {
    let store = SavedCommands::new(config.custom_commands_file());
    let commands = store.list()?;

    if commands.is_empty() {
        eprintln!("{} No custom commands saved yet.", "[i]".cyan());
        return Ok(());
    }

    for (idx, command) in commands.iter().enumerate() {
        println!("{}. {}", idx + 1, command);
    }

    Ok(())
}

pub fn add(config: &Config, words: &[String]) -> Result<()> {
    let store = SavedCommands::new(config.custom_commands_file());
    store.add(&words.join(" "))?;
    eprintln!("{} Command saved.", "[OK]".green());
    Ok(())
}
