//! 프로세스 기동
//! 설정에 따라 서비스 하나 또는 전체를 띄운다.
// region:    --- Imports
use crate::auction::catalog::{self, CatalogService};
use crate::auction::store::AuctionStore;
use crate::bidding::validator::{self, ValidatorService};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, ServiceKind};
use crate::event_store::{self, EventLog};
use crate::gateway::{self, GatewayClient, Orchestrator, Peers};
use crate::handlers;
use crate::notifier::{self, NotifierService};
use crate::rpc::{self, RemoteInvoker, ServiceRegistry};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{error, info};
// endregion: --- Imports

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

const RPC_SERVICES: [ServiceKind; 6] = [
    ServiceKind::Catalog,
    ServiceKind::Validator,
    ServiceKind::History,
    ServiceKind::Updates,
    ServiceKind::Notifier,
    ServiceKind::Gateway,
];

/// 서비스 실행 (서버가 멈출 때까지 반환하지 않는다)
pub async fn run(config: Config) -> Result<(), BoxError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    info!("{:<12} --> 서비스 기동: {}", "Main", config.service);

    match config.service {
        ServiceKind::All => {
            let mut servers = JoinSet::new();
            for kind in RPC_SERVICES.into_iter().chain([ServiceKind::Frontend]) {
                let config = config.clone();
                let clock = Arc::clone(&clock);
                servers.spawn(async move { run_one(kind, &config, clock).await });
            }
            // 하나라도 멈추면 프로세스 전체를 내린다
            match servers.join_next().await {
                Some(Ok(result)) => result,
                Some(Err(e)) => Err(e.into()),
                None => Ok(()),
            }
        }
        kind => run_one(kind, &config, clock).await,
    }
}

async fn run_one(kind: ServiceKind, config: &Config, clock: Arc<dyn Clock>) -> Result<(), BoxError> {
    let addr = config.bind_addr(kind);
    let listener = TcpListener::bind(&addr).await.inspect_err(|e| {
        error!("{:<12} --> {} 바인딩 실패 ({}): {}", "Main", kind, addr, e);
    })?;

    if kind == ServiceKind::Frontend {
        let invoker = RemoteInvoker::dial(&config.peers.gateway).with_timeout(config.rpc_timeout);
        info!(
            "{:<12} --> Web Server: Listening on {} (gateway: {})",
            "Main",
            listener.local_addr()?,
            invoker.target()
        );
        let router = handlers::router(Arc::new(GatewayClient::new(invoker)));
        axum::serve(listener, router.into_make_service()).await?;
        return Ok(());
    }

    let registry = registry_for(kind, config, clock);
    rpc::serve(listener, registry).await?;
    Ok(())
}

/// 서비스 종류별 RPC 레지스트리 구성 (기동 시 한 번만 호출)
pub fn registry_for(kind: ServiceKind, config: &Config, clock: Arc<dyn Clock>) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    match kind {
        ServiceKind::Catalog => {
            let service = CatalogService::new(AuctionStore::new(clock));
            registry.register(catalog::descriptor(Arc::new(service)));
        }
        ServiceKind::Validator => {
            registry.register(validator::descriptor(Arc::new(ValidatorService)));
        }
        ServiceKind::History => {
            let log = EventLog::new("history", clock);
            registry.register(event_store::history_descriptor(Arc::new(log)));
        }
        ServiceKind::Updates => {
            let log = EventLog::new("updates", clock);
            registry.register(event_store::updates_descriptor(Arc::new(log)));
        }
        ServiceKind::Notifier => {
            registry.register(notifier::descriptor(Arc::new(NotifierService::new())));
        }
        ServiceKind::Gateway => {
            let peers = Peers::dial(&config.peers, config.rpc_timeout);
            let orchestrator = Orchestrator::new(peers, clock);
            registry.register(gateway::descriptor(Arc::new(orchestrator)));
        }
        ServiceKind::Frontend | ServiceKind::All => {}
    }
    registry
}
