//! 실행 설정
//! 명령줄 인자와 환경 변수를 clap 으로 한 번에 읽어 `Config` 로 고정한다.
//! 인자가 환경 변수보다 우선한다.
// region:    --- Imports
use clap::{Args, Parser, ValueEnum};
use std::fmt;
use std::num::ParseIntError;
use std::time::Duration;
// endregion: --- Imports

// region:    --- Service Kind
/// 이 프로세스가 띄울 서비스
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceKind {
    #[value(alias = "aggregator")]
    Gateway,
    #[value(alias = "auction")]
    Catalog,
    #[value(alias = "bidding")]
    Validator,
    History,
    Updates,
    Notifier,
    Frontend,
    All,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gateway => "gateway",
            Self::Catalog => "catalog",
            Self::Validator => "validator",
            Self::History => "history",
            Self::Updates => "updates",
            Self::Notifier => "notifier",
            Self::Frontend => "frontend",
            Self::All => "all",
        };
        f.write_str(name)
    }
}
// endregion: --- Service Kind

// region:    --- Arguments
/// 명령줄 인자 정의
#[derive(Debug, Clone, Parser)]
#[command(name = "auction-saga", version, about = "경매 사가 서비스")]
pub struct Cli {
    /// 띄울 서비스 (기본값: 전체를 한 프로세스에서)
    #[arg(
        value_enum,
        env = "SERVICE",
        ignore_case = true,
        default_value_t = ServiceKind::All
    )]
    pub service: ServiceKind,

    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub bind_host: String,

    #[command(flatten)]
    pub ports: Ports,

    #[command(flatten)]
    pub peers: PeerArgs,

    /// 원격 호출 하나에 적용하는 제한 시간(ms). 없으면 무제한
    #[arg(long = "rpc-timeout-ms", env = "RPC_TIMEOUT_MS", value_parser = parse_millis)]
    pub rpc_timeout: Option<Duration>,
}

fn parse_millis(value: &str) -> Result<Duration, ParseIntError> {
    value.trim().parse().map(Duration::from_millis)
}

/// 서비스별 포트
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct Ports {
    #[arg(long = "gateway-port", env = "GATEWAY_PORT", default_value_t = 7000)]
    pub gateway: u16,
    #[arg(long = "catalog-port", env = "CATALOG_PORT", default_value_t = 7001)]
    pub catalog: u16,
    #[arg(long = "validator-port", env = "VALIDATOR_PORT", default_value_t = 7002)]
    pub validator: u16,
    #[arg(long = "history-port", env = "HISTORY_PORT", default_value_t = 7003)]
    pub history: u16,
    #[arg(long = "updates-port", env = "UPDATES_PORT", default_value_t = 7004)]
    pub updates: u16,
    #[arg(long = "notifier-port", env = "NOTIFIER_PORT", default_value_t = 7005)]
    pub notifier: u16,
    #[arg(long = "frontend-port", env = "FRONTEND_PORT", default_value_t = 8080)]
    pub frontend: u16,
}

impl Default for Ports {
    fn default() -> Self {
        Self {
            gateway: 7000,
            catalog: 7001,
            validator: 7002,
            history: 7003,
            updates: 7004,
            notifier: 7005,
            frontend: 8080,
        }
    }
}

/// 원격 서비스 주소 지정 (`host:port`). 비어 있으면 서비스 종류에 따른 기본값
#[derive(Debug, Clone, Default, Args)]
pub struct PeerArgs {
    #[arg(id = "catalog_addr", long = "catalog-addr", env = "CATALOG_ADDR")]
    pub catalog: Option<String>,
    #[arg(id = "validator_addr", long = "validator-addr", env = "VALIDATOR_ADDR")]
    pub validator: Option<String>,
    #[arg(id = "history_addr", long = "history-addr", env = "HISTORY_ADDR")]
    pub history: Option<String>,
    #[arg(id = "updates_addr", long = "updates-addr", env = "UPDATES_ADDR")]
    pub updates: Option<String>,
    #[arg(id = "notifier_addr", long = "notifier-addr", env = "NOTIFIER_ADDR")]
    pub notifier: Option<String>,
    #[arg(id = "gateway_addr", long = "gateway-addr", env = "GATEWAY_ADDR")]
    pub gateway: Option<String>,
}
// endregion: --- Arguments

// region:    --- Config
/// 원격 서비스 주소 (`host:port`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAddrs {
    pub catalog: String,
    pub validator: String,
    pub history: String,
    pub updates: String,
    pub notifier: String,
    pub gateway: String,
}

impl PeerAddrs {
    /// 모든 서비스가 같은 호스트에 떠 있을 때의 주소
    pub fn local(ports: &Ports) -> Self {
        let addr = |port: u16| format!("127.0.0.1:{port}");
        Self {
            catalog: addr(ports.catalog),
            validator: addr(ports.validator),
            history: addr(ports.history),
            updates: addr(ports.updates),
            notifier: addr(ports.notifier),
            gateway: addr(ports.gateway),
        }
    }

    /// 서비스마다 컨테이너 하나씩 떠 있을 때의 주소
    pub fn containers(ports: &Ports) -> Self {
        Self {
            catalog: format!("catalog:{}", ports.catalog),
            validator: format!("validator:{}", ports.validator),
            history: format!("history:{}", ports.history),
            updates: format!("updates:{}", ports.updates),
            notifier: format!("notifier:{}", ports.notifier),
            gateway: format!("gateway:{}", ports.gateway),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceKind,
    pub bind_host: String,
    pub ports: Ports,
    pub peers: PeerAddrs,
    pub rpc_timeout: Option<Duration>,
}

impl Config {
    /// 프로세스 인자 + 환경 변수 (잘못된 값이면 사용법을 출력하고 종료)
    pub fn load() -> Self {
        Self::from(Cli::parse())
    }

    /// 주어진 인자 + 환경 변수
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Cli::try_parse_from(args).map(Self::from)
    }

    /// 서비스가 바인딩할 주소
    pub fn bind_addr(&self, kind: ServiceKind) -> String {
        let port = match kind {
            ServiceKind::Gateway | ServiceKind::All => self.ports.gateway,
            ServiceKind::Catalog => self.ports.catalog,
            ServiceKind::Validator => self.ports.validator,
            ServiceKind::History => self.ports.history,
            ServiceKind::Updates => self.ports.updates,
            ServiceKind::Notifier => self.ports.notifier,
            ServiceKind::Frontend => self.ports.frontend,
        };
        format!("{}:{}", self.bind_host, port)
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        // 서비스 종류가 정해진 뒤에 기본 주소를 고른다
        // 단일 프로세스 모드에서는 루프백, 그 외에는 컨테이너 호스트 이름
        let fallback = if cli.service == ServiceKind::All {
            PeerAddrs::local(&cli.ports)
        } else {
            PeerAddrs::containers(&cli.ports)
        };
        let given = cli.peers;
        let peers = PeerAddrs {
            catalog: given.catalog.unwrap_or(fallback.catalog),
            validator: given.validator.unwrap_or(fallback.validator),
            history: given.history.unwrap_or(fallback.history),
            updates: given.updates.unwrap_or(fallback.updates),
            notifier: given.notifier.unwrap_or(fallback.notifier),
            gateway: given.gateway.unwrap_or(fallback.gateway),
        };
        Self {
            service: cli.service,
            bind_host: cli.bind_host,
            ports: cli.ports,
            peers,
            rpc_timeout: cli.rpc_timeout,
        }
    }
}
// endregion: --- Config
