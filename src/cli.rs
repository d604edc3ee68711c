use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "playgate")]
#[command(version)]
#[command(about = "Safety-gated ansible runner: probes hosts and confirms production runs", long_about = None)]
pub struct Cli {
    /// 설정 파일 경로 (기본값: ~/.playgate/config.toml)
    #[arg(long, global = true, env = "PLAYGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// 디버그 로그 출력
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// 동시 도달성 검사 개수 (설정 파일 값 덮어쓰기)
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// 호스트당 도달성 검사 타임아웃 (초)
    #[arg(long, global = true)]
    pub probe_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 인벤토리 그룹에 플레이북 실행
    Run {
        /// 인벤토리 이름 (inventories/<name>/hosts). 생략 시 목록에서 선택
        #[arg(short, long)]
        inventory: Option<String>,

        /// 플레이북 파일 (저장소 기준 상대 경로)
        playbook: String,

        /// 플레이북 실행 파일에 그대로 전달할 추가 인자
        #[arg(last = true)]
        extra_args: Vec<String>,
    },

    /// 인벤토리 그룹에 사용자 정의 명령 실행
    Exec {
        /// 인벤토리 이름. 생략 시 목록에서 선택
        #[arg(short, long)]
        inventory: Option<String>,

        /// 저장된 명령 번호 (commands list 기준, 1부터 시작)
        #[arg(long, conflicts_with = "argv")]
        saved: Option<usize>,

        /// 실행할 명령 (예: -- ansible all -m ping)
        #[arg(last = true, required_unless_present = "saved")]
        argv: Vec<String>,
    },

    /// 사용 가능한 인벤토리 목록
    Inventories,

    /// 저장된 사용자 정의 명령 관리
    Commands {
        #[command(subcommand)]
        action: CommandsAction,
    },

    /// 감사 로그 출력
    History {
        /// 최근 N개만 출력
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// JSON 으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 자동화 저장소 clone 또는 pull
    Sync,

    /// 설정 파일 관리
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommandsAction {
    /// 저장된 명령 목록
    List,
    /// 새 명령 저장
    Add {
        /// 전체 명령 (예: ansible all -m ping)
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// 현재 적용되는 설정 출력
    Show,
    /// 기본 설정 파일 생성
    Init {
        /// 기존 파일 덮어쓰기
        #[arg(long)]
        force: bool,
    },
}
