use colored::*;
use playgate::config::Config;
use playgate::error::Result;
use playgate::gate::{RiskClassifier, RiskLevel};
use playgate::inventory::list_inventories;

/// 인벤토리 목록 출력 (운영 환경으로 분류되는 그룹은 표시)
pub fn list(config: &Config) -> Result<()> {
    let names = list_inventories(&config.repo_dir())?;
    if names.is_empty() {
        eprintln!("{} No inventories found.", "[X]".red());
        return Ok(());
    }

    let classifier = RiskClassifier::new(&config.risk_keywords);
    for (idx, name) in names.iter().enumerate() {
        match classifier.classify(name) {
            RiskLevel::Elevated => println!("{}. {} {}", idx + 1, name, "[production]".red().bold()),
            RiskLevel::Normal => println!("{}. {}", idx + 1, name),
        }
    }

    Ok(())
}
