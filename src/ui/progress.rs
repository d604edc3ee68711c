use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// 스피너 스타일 (저장소 동기화 등)
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = if std::io::stderr().is_terminal() {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// 프로그레스 바 스타일 (호스트 도달성 검사용)
///
/// stderr 가 터미널이 아니면 숨겨진 바를 반환합니다.
pub fn create_probe_bar(total: usize) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} probing [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// 검사 완료된 호스트 하나를 진행률에 반영
pub fn tick_probe(pb: &ProgressBar, host: &str, reachable: bool) {
    let mark = if reachable { "✓".green() } else { "✗".red() };
    pb.set_message(format!("{} {}", mark, host));
    pb.inc(1);
}
