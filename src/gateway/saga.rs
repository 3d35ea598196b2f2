//! 경매 게이트웨이 (사가)
//! 사용자 커맨드 하나를 카탈로그 / 검증 / 이력 / 업데이트 / 알림 호출로 풀어낸다.
//! 원격 호출 사이에 원자성은 없다. 저장소 변경이 성공한 뒤의 부수 효과(이벤트 기록, 알림)는
//! 실패해도 로그만 남기고 이미 정해진 응답을 바꾸지 않는다.
// region:    --- Imports
use crate::auction::events::{
    self, bid_announcement, bid_placed_payload, created_announcement, HistoryEvent,
};
use crate::auction::model::{Auction, AuctionCommand, AuctionResponse, AuctionStatus};
use crate::clock::Clock;
use crate::error::RpcError;
use crate::gateway::{AuctionGateway, Peers};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};
// endregion: --- Imports

/// 기간이 없거나 0 이하일 때 적용하는 경매 기간(초)
pub const DEFAULT_DURATION_SECS: i64 = 60;

// region:    --- Orchestrator
pub struct Orchestrator {
    peers: Peers,
    clock: Arc<dyn Clock>,
}

impl Orchestrator {
    pub fn new(peers: Peers, clock: Arc<dyn Clock>) -> Self {
        Self { peers, clock }
    }

    /// 1. 경매 생성
    async fn handle_create(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError> {
        let Some(mut item) = cmd.auction else {
            return Ok(AuctionResponse::rejected("missing auction payload"));
        };
        if item.name.is_empty() {
            return Ok(AuctionResponse::rejected("name is required"));
        }
        // NaN 도 여기서 걸러진다
        if item.starting_bid.is_nan() || item.starting_bid <= 0.0 {
            return Ok(AuctionResponse::rejected("starting bid must be positive"));
        }
        if item.duration_seconds <= 0 {
            item.duration_seconds = DEFAULT_DURATION_SECS;
        }

        let now = self.clock.now();
        let Some(closing_time) = TimeDelta::try_seconds(item.duration_seconds)
            .and_then(|duration| now.checked_add_signed(duration))
        else {
            return Ok(AuctionResponse::rejected("duration is too long"));
        };

        item.id = generate_auction_id(now);
        item.current_bid = item.starting_bid;
        item.highest_bidder.clear();
        item.status = AuctionStatus::Open;
        item.closing_time = Some(closing_time);
        info!(
            "{:<12} --> 경매 생성 요청: id={}, name={}, starting_bid={:.2}, duration={}s",
            "Gateway", item.id, item.name, item.starting_bid, item.duration_seconds
        );

        let res = self
            .peers
            .catalog
            .execute(AuctionCommand::new("create").with_auction(item.clone()))
            .await?;
        if res.ok {
            self.record(&item.id, events::AUCTION_CREATED, &item.name)
                .await;
            self.announce(&item.id, created_announcement(&item.name))
                .await;
        }
        Ok(res)
    }

    /// 2. 입찰
    /// 조회 -> 검증 -> 반영 세 단계가 각각 별도의 원격 호출이다.
    /// 두 입찰이 서로의 조회와 반영 사이에 끼어들면 나중에 반영된 쪽이 그대로 덮어쓴다 (lost update).
    /// 이 순서는 의도된 동작이므로 원자적으로 바꾸지 않는다.
    async fn handle_bid(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError> {
        let Some(id) = cmd.auction_id() else {
            return Ok(AuctionResponse::rejected("auction id required"));
        };
        if cmd.bid_amount.is_nan() || cmd.bid_amount <= 0.0 {
            return Ok(AuctionResponse::rejected("bid must be positive"));
        }
        info!(
            "{:<12} --> 입찰 요청 처리 시작: id={}, bidder={}, amount={:.2}",
            "Gateway", id, cmd.bidder, cmd.bid_amount
        );

        // 현재 경매 조회
        let fetched = self
            .peers
            .catalog
            .execute(AuctionCommand::new("get").with_auction(Auction::with_id(id)))
            .await?;
        let current = match fetched {
            AuctionResponse {
                ok: true,
                auction: Some(auction),
                ..
            } => auction,
            other => return Ok(other),
        };
        if !current.is_open() {
            return Ok(AuctionResponse::rejected("auction is not open"));
        }

        // 조회한 스냅샷 기준으로 검증
        let validation = self
            .peers
            .validator
            .execute(
                AuctionCommand::new("validate")
                    .with_auction(current.clone())
                    .with_bid(cmd.bid_amount, &cmd.bidder),
            )
            .await?;
        if !validation.ok {
            return Ok(validation);
        }

        // 비교 없이 반영
        let updated = self
            .peers
            .catalog
            .execute(
                AuctionCommand::new("update_bid")
                    .with_auction(Auction::with_id(&current.id))
                    .with_bid(cmd.bid_amount, &cmd.bidder),
            )
            .await?;
        if updated.ok {
            self.record(
                &current.id,
                events::BID_PLACED,
                &bid_placed_payload(&cmd.bidder, cmd.bid_amount),
            )
            .await;
            self.announce(&current.id, bid_announcement(&cmd.bidder, cmd.bid_amount))
                .await;
        }
        Ok(updated)
    }

    /// 3. 경매 종료
    async fn handle_close(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError> {
        let Some(id) = cmd.auction_id() else {
            return Ok(AuctionResponse::rejected("auction id required"));
        };
        info!("{:<12} --> 경매 종료 요청: id={}", "Gateway", id);

        let res = self
            .peers
            .catalog
            .execute(AuctionCommand::new("close").with_auction(Auction::with_id(id)))
            .await?;
        if let (true, Some(auction)) = (res.ok, res.auction.as_ref()) {
            self.record(&auction.id, events::AUCTION_CLOSED, &auction.highest_bidder)
                .await;
            if !auction.highest_bidder.is_empty() {
                let notified = self
                    .peers
                    .notifier
                    .execute(AuctionCommand::new("notify").with_auction(auction.clone()))
                    .await;
                report_side_effect("notifier", &auction.id, notified);
            }
            self.announce(&auction.id, events::CLOSED_ANNOUNCEMENT.to_string())
                .await;
        }
        Ok(res)
    }

    /// 4. 경매 목록 (만료 판단은 카탈로그가 항목별로 수행)
    async fn handle_list(&self) -> Result<AuctionResponse, RpcError> {
        self.peers
            .catalog
            .execute(AuctionCommand::new("list"))
            .await
    }

    /// 이력 로그와 업데이트 피드 양쪽에 같은 이벤트를 기록한다.
    /// 한쪽 실패가 다른 쪽 시도를 막지 않는다.
    async fn record(&self, auction_id: &str, event_type: &str, payload: &str) {
        let event = HistoryEvent::new(auction_id, event_type, payload);
        let recorded = self.peers.history.append(event.clone()).await;
        report_side_effect("history", auction_id, recorded);
        let published = self.peers.updates.append(event).await;
        report_side_effect("updates", auction_id, published);
    }

    /// 업데이트 피드에만 알림 문구를 남긴다.
    async fn announce(&self, auction_id: &str, payload: String) {
        let event = HistoryEvent::new(auction_id, events::UPDATE, payload);
        let published = self.peers.updates.append(event).await;
        report_side_effect("updates", auction_id, published);
    }
}

#[async_trait]
impl AuctionGateway for Orchestrator {
    async fn execute(&self, cmd: AuctionCommand) -> Result<AuctionResponse, RpcError> {
        match cmd.command.as_str() {
            "create" => self.handle_create(cmd).await,
            "place_bid" => self.handle_bid(cmd).await,
            "close" => self.handle_close(cmd).await,
            "list" => self.handle_list().await,
            other => {
                warn!("{:<12} --> 알 수 없는 커맨드: {}", "Gateway", other);
                Ok(AuctionResponse::rejected("unknown command"))
            }
        }
    }

    /// 이력 로그 뒤에 업데이트 피드를 그대로 이어 붙인다 (시간순 병합 아님).
    /// 업데이트 피드 조회 실패는 로그만 남기고 이력 로그만 돌려준다.
    async fn get_history(&self) -> Result<AuctionResponse, RpcError> {
        let mut res = self.peers.history.list().await?;
        match self.peers.updates.list().await {
            Ok(updates) => res.history.extend(updates.history),
            Err(e) => warn!("{:<12} --> 업데이트 피드 조회 실패: {}", "Gateway", e),
        }
        Ok(res)
    }
}
// endregion: --- Orchestrator

// region:    --- Helpers
fn report_side_effect(target: &str, auction_id: &str, result: Result<AuctionResponse, RpcError>) {
    match result {
        Ok(res) if res.ok => {}
        Ok(res) => warn!(
            "{:<12} --> {} 거절 (id={}): {}",
            "Gateway", target, auction_id, res.message
        ),
        Err(e) => warn!(
            "{:<12} --> {} 호출 실패 (id={}): {}",
            "Gateway", target, auction_id, e
        ),
    }
}

/// 현재 시각(마이크로초) + 난수 접미사. 충돌 검사는 하지 않는다.
pub fn generate_auction_id(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::rng().random();
    format!("{:014x}{:08x}", now.timestamp_micros().max(0), suffix)
}
// endregion: --- Helpers
