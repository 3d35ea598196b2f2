// region:    --- Imports
use crate::auction::catalog::{AuctionCatalog, CatalogClient};
use crate::auction::model::{AuctionCommand, AuctionResponse, Empty};
use crate::bidding::validator::{BidValidator, ValidatorClient};
use crate::config::PeerAddrs;
use crate::error::RpcError;
use crate::event_store::{EventLogClient, EventLogService};
use crate::notifier::{NotifierClient, WinnerNotifier};
use crate::rpc::{MethodPath, RemoteInvoker, ServiceDescriptor};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
// endregion: --- Imports

pub mod saga;

pub use saga::Orchestrator;

pub const SERVICE_NAME: &str = "auction.AuctionGateway";

// region:    --- Gateway Trait
/// 게이트웨이 트레이트 (사용자 진입점)
/// 커맨드: create / place_bid / close / list, 별도로 이력 조회
#[async_trait]
pub trait AuctionGateway: Send + Sync {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError>;
    async fn get_history(&self) -> Result<AuctionResponse, RpcError>;
}
// endregion: --- Gateway Trait

// region:    --- Peers
/// 게이트웨이가 호출하는 도메인 서비스들
/// 로컬 구현체든 원격 클라이언트든 트레이트만 맞으면 된다.
pub struct Peers {
    pub catalog: Arc<dyn AuctionCatalog>,
    pub validator: Arc<dyn BidValidator>,
    pub history: Arc<dyn EventLogService>,
    pub updates: Arc<dyn EventLogService>,
    pub notifier: Arc<dyn WinnerNotifier>,
}

impl Peers {
    /// 원격 서비스 연결 (실제 접속은 첫 호출 시점)
    pub fn dial(addrs: &PeerAddrs, timeout: Option<Duration>) -> Self {
        let dial = |target: &str| RemoteInvoker::dial(target).with_timeout(timeout);
        Self {
            catalog: Arc::new(CatalogClient::new(dial(&addrs.catalog))),
            validator: Arc::new(ValidatorClient::new(dial(&addrs.validator))),
            history: Arc::new(EventLogClient::history(dial(&addrs.history))),
            updates: Arc::new(EventLogClient::updates(dial(&addrs.updates))),
            notifier: Arc::new(NotifierClient::new(dial(&addrs.notifier))),
        }
    }
}
// endregion: --- Peers

// region:    --- Remote Gateway
/// 원격 게이트웨이 클라이언트 (REST 프런트엔드가 사용)
pub struct GatewayClient {
    invoker: RemoteInvoker,
    execute: MethodPath,
    history: MethodPath,
}

impl GatewayClient {
    pub fn new(invoker: RemoteInvoker) -> Self {
        Self {
            invoker,
            execute: MethodPath::new(SERVICE_NAME, "Execute"),
            history: MethodPath::new(SERVICE_NAME, "GetHistory"),
        }
    }
}

#[async_trait]
impl AuctionGateway for GatewayClient {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError> {
        self.invoker.invoke(&self.execute, Some(&cmd)).await
    }

    async fn get_history(&self) -> Result<AuctionResponse, RpcError> {
        self.invoker.invoke(&self.history, Some(&Empty {})).await
    }
}
// endregion: --- Remote Gateway

/// RPC 서비스 등록 정보: Execute / GetHistory
pub fn descriptor(gateway: Arc<dyn AuctionGateway>) -> ServiceDescriptor {
    let executor = Arc::clone(&gateway);
    ServiceDescriptor::new(SERVICE_NAME)
        .method("Execute", move |cmd: AuctionCommand| {
            let gateway = Arc::clone(&executor);
            async move { gateway.execute(cmd).await }
        })
        .method("GetHistory", move |_: Empty| {
            let gateway = Arc::clone(&gateway);
            async move { gateway.get_history().await }
        })
}
