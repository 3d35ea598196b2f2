//! 입찰 검증
//! 상태를 갖지 않는 규칙: 입찰 금액이 스냅샷의 현재 가격보다 커야 한다.
//! 최소 증가폭, 입찰자 제한(자기 입찰 갱신 허용), 상한 없음.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionCommand, AuctionResponse};
use crate::error::{AuctionError, RpcError};
use crate::rpc::{MethodPath, RemoteInvoker, ServiceDescriptor};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

pub const SERVICE_NAME: &str = "auction.BidValidator";

// region:    --- Rule
/// 입찰 규칙
pub fn validate_bid(amount: f64, _bidder: &str, snapshot: &Auction) -> Result<(), AuctionError> {
    if amount <= snapshot.current_bid {
        return Err(AuctionError::Validation("bid must exceed current".to_string()));
    }
    Ok(())
}
// endregion: --- Rule

// region:    --- Validator Trait
#[async_trait]
pub trait BidValidator: Send + Sync {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError>;
}

/// 검증 서비스 구현체
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorService;

#[async_trait]
impl BidValidator for ValidatorService {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError> {
        if cmd.command != "validate" {
            return Ok(AuctionResponse::rejected("unsupported command"));
        }
        let Some(snapshot) = cmd.auction.as_ref() else {
            return Ok(AuctionResponse::rejected("missing auction"));
        };
        match validate_bid(cmd.bid_amount, &cmd.bidder, snapshot) {
            Ok(()) => Ok(AuctionResponse::accepted("bid accepted")),
            Err(e) => {
                info!(
                    "{:<12} --> 입찰 거절: id={}, amount={:.2}, current={:.2}",
                    "Validator", snapshot.id, cmd.bid_amount, snapshot.current_bid
                );
                Ok(AuctionResponse::rejected(e.to_string()))
            }
        }
    }
}
// endregion: --- Validator Trait

// region:    --- Remote Validator
pub struct ValidatorClient {
    invoker: RemoteInvoker,
    execute: MethodPath,
}

impl ValidatorClient {
    pub fn new(invoker: RemoteInvoker) -> Self {
        Self {
            invoker,
            execute: MethodPath::new(SERVICE_NAME, "Execute"),
        }
    }
}

#[async_trait]
impl BidValidator for ValidatorClient {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError> {
        self.invoker.invoke(&self.execute, Some(&cmd)).await
    }
}
// endregion: --- Remote Validator

pub fn descriptor(validator: Arc<dyn BidValidator>) -> ServiceDescriptor {
    ServiceDescriptor::new(SERVICE_NAME).method("Execute", move |cmd: AuctionCommand| {
        let validator = Arc::clone(&validator);
        async move { validator.execute(cmd).await }
    })
}
