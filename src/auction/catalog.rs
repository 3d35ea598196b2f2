//! 경매 카탈로그 서비스
//! create / get / update_bid / close / list 커맨드를 저장소로 라우팅한다.
// region:    --- Imports
use crate::auction::model::{AuctionCommand, AuctionResponse};
use crate::auction::store::AuctionStore;
use crate::error::RpcError;
use crate::rpc::{MethodPath, RemoteInvoker, ServiceDescriptor};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

pub const SERVICE_NAME: &str = "auction.AuctionCatalog";

// region:    --- Catalog Trait
/// 카탈로그 트레이트
#[async_trait]
pub trait AuctionCatalog: Send + Sync {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError>;
}
// endregion: --- Catalog Trait

// region:    --- Catalog Service
/// 카탈로그 구현체 (프로세스 내부 저장소 사용)
pub struct CatalogService {
    store: AuctionStore,
}

impl CatalogService {
    pub fn new(store: AuctionStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &AuctionStore {
        &self.store
    }
}

#[async_trait]
impl AuctionCatalog for CatalogService {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError> {
        info!("{:<12} --> 커맨드 수신: {}", "Catalog", cmd.command);
        let response = match cmd.command.as_str() {
            "create" => match cmd.auction {
                Some(auction) => AuctionResponse::with_auction(self.store.create(auction).await),
                None => AuctionResponse::rejected("missing auction"),
            },
            "get" | "update_bid" | "close" => {
                let Some(id) = cmd.auction_id() else {
                    return Ok(AuctionResponse::rejected("missing id"));
                };
                let result = match cmd.command.as_str() {
                    "get" => self.store.get(id).await,
                    "update_bid" => self.store.update_bid(id, cmd.bid_amount, &cmd.bidder).await,
                    _ => self.store.close(id).await,
                };
                match result {
                    Ok(auction) => AuctionResponse::with_auction(auction),
                    Err(e) => AuctionResponse::rejected(e.to_string()),
                }
            }
            "list" => AuctionResponse::with_auctions(self.store.list().await),
            _ => AuctionResponse::rejected("unsupported command"),
        };
        Ok(response)
    }
}
// endregion: --- Catalog Service

// region:    --- Remote Catalog
/// 원격 카탈로그 클라이언트
pub struct CatalogClient {
    invoker: RemoteInvoker,
    execute: MethodPath,
}

impl CatalogClient {
    pub fn new(invoker: RemoteInvoker) -> Self {
        Self {
            invoker,
            execute: MethodPath::new(SERVICE_NAME, "Execute"),
        }
    }
}

#[async_trait]
impl AuctionCatalog for CatalogClient {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError> {
        self.invoker.invoke(&self.execute, Some(&cmd)).await
    }
}
// endregion: --- Remote Catalog

/// RPC 서비스 등록 정보
pub fn descriptor(catalog: Arc<dyn AuctionCatalog>) -> ServiceDescriptor {
    ServiceDescriptor::new(SERVICE_NAME).method("Execute", move |cmd: AuctionCommand| {
        let catalog = Arc::clone(&catalog);
        async move { catalog.execute(cmd).await }
    })
}
