//! 낙찰자 알림
//! 최고 입찰자가 있는 경매가 종료될 때 게이트웨이가 호출한다.
// region:    --- Imports
use crate::auction::events::format_amount;
use crate::auction::model::{AuctionCommand, AuctionResponse};
use crate::error::RpcError;
use crate::rpc::{MethodPath, RemoteInvoker, ServiceDescriptor};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
// endregion: --- Imports

pub const SERVICE_NAME: &str = "auction.WinnerNotifier";

#[async_trait]
pub trait WinnerNotifier: Send + Sync {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError>;
}

// region:    --- Notifier Service
/// 알림 서비스 구현체
/// 보낸 메시지를 내부 목록에 쌓아 둔다 (상한 없음).
#[derive(Default)]
pub struct NotifierService {
    notifications: Mutex<Vec<String>>,
}

impl NotifierService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 보낸 알림
    pub async fn notifications(&self) -> Vec<String> {
        self.notifications.lock().await.clone()
    }
}

#[async_trait]
impl WinnerNotifier for NotifierService {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError> {
        if cmd.command != "notify" {
            return Ok(AuctionResponse::rejected("unsupported command"));
        }
        let Some(auction) = cmd.auction else {
            return Ok(AuctionResponse::rejected("missing auction"));
        };
        if auction.highest_bidder.is_empty() {
            return Ok(AuctionResponse::rejected("auction has no highest bidder"));
        }

        let message = format!(
            "Winner: {} for ${}",
            auction.highest_bidder,
            format_amount(auction.current_bid)
        );
        self.notifications.lock().await.push(message.clone());
        info!("{:<12} --> 낙찰 알림: {}", "Notifier", message);
        Ok(AuctionResponse::accepted(message))
    }
}
// endregion: --- Notifier Service

// region:    --- Remote Notifier
pub struct NotifierClient {
    invoker: RemoteInvoker,
    execute: MethodPath,
}

impl NotifierClient {
    pub fn new(invoker: RemoteInvoker) -> Self {
        Self {
            invoker,
            execute: MethodPath::new(SERVICE_NAME, "Execute"),
        }
    }
}

#[async_trait]
impl WinnerNotifier for NotifierClient {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError> {
        self.invoker.invoke(&self.execute, Some(&cmd)).await
    }
}
// endregion: --- Remote Notifier

pub fn descriptor(notifier: Arc<dyn WinnerNotifier>) -> ServiceDescriptor {
    ServiceDescriptor::new(SERVICE_NAME).method("Execute", move |cmd: AuctionCommand| {
        let notifier = Arc::clone(&notifier);
        async move { notifier.execute(cmd).await }
    })
}
