//! 경매 저장소 (상태 머신)
//! OPEN -> CLOSED 단방향 전이만 존재한다.
//! 만료는 백그라운드 스케줄러 없이 접근 시점에만 판단한다 (lazy expiry).
//! 따라서 마감 시간이 지났더라도 다시 접근되지 않은 경매는 저장소 안에서 OPEN 으로 남는다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus};
use crate::clock::Clock;
use crate::error::AuctionError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
// endregion: --- Imports

// region:    --- Auction Store
/// 경매 저장소
/// 저장소 인스턴스당 하나의 락으로 모든 연산을 직렬화한다.
/// 읽기/쓰기 모두 복사본을 주고받으므로 외부에서 저장된 상태를 직접 바꿀 수 없다.
pub struct AuctionStore {
    items: Mutex<BTreeMap<String, Auction>>,
    clock: Arc<dyn Clock>,
}

impl AuctionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            clock,
        }
    }

    /// 경매 저장 (같은 id 가 있으면 덮어쓴다)
    pub async fn create(&self, auction: Auction) -> Auction {
        let mut items = self.items.lock().await;
        info!(
            "{:<12} --> 경매 등록: id={}, name={}",
            "Store", auction.id, auction.name
        );
        items.insert(auction.id.clone(), auction.clone());
        auction
    }

    /// 경매 조회
    pub async fn get(&self, id: &str) -> Result<Auction, AuctionError> {
        let now = self.clock.now();
        let mut items = self.items.lock().await;
        let found = items.get_mut(id).ok_or(AuctionError::NotFound)?;
        expire_if_needed(found, now);
        Ok(found.clone())
    }

    /// 입찰 반영
    /// 이전 값과 비교하지 않고 그대로 덮어쓴다. 금액 검증은 호출자(게이트웨이)의 몫이다.
    pub async fn update_bid(
        &self,
        id: &str,
        amount: f64,
        bidder: &str,
    ) -> Result<Auction, AuctionError> {
        let now = self.clock.now();
        let mut items = self.items.lock().await;
        let existing = items.get_mut(id).ok_or(AuctionError::NotFound)?;
        if expire_if_needed(existing, now) || !existing.is_open() {
            return Err(AuctionError::NotOpen);
        }
        existing.current_bid = amount;
        existing.highest_bidder = bidder.to_string();
        info!(
            "{:<12} --> 입찰 반영: id={}, bidder={}, amount={:.2}",
            "Store", id, bidder, amount
        );
        Ok(existing.clone())
    }

    /// 경매 종료
    /// 이미 만료/종료된 경매라도 종료 시간을 지금으로 다시 찍는다.
    pub async fn close(&self, id: &str) -> Result<Auction, AuctionError> {
        let now = self.clock.now();
        let mut items = self.items.lock().await;
        let existing = items.get_mut(id).ok_or(AuctionError::NotFound)?;
        expire_if_needed(existing, now);
        existing.status = AuctionStatus::Closed;
        existing.closing_time = Some(now);
        info!("{:<12} --> 경매 종료: id={}", "Store", id);
        Ok(existing.clone())
    }

    /// 모든 경매 조회 (각 항목에 만료 판단을 먼저 적용)
    pub async fn list(&self) -> Vec<Auction> {
        let now = self.clock.now();
        let mut items = self.items.lock().await;
        items
            .values_mut()
            .map(|item| {
                expire_if_needed(item, now);
                item.clone()
            })
            .collect()
    }
}

/// OPEN 이고 마감 시간이 지났으면 CLOSED 로 바꾼다. 바뀌었으면 true.
fn expire_if_needed(auction: &mut Auction, now: DateTime<Utc>) -> bool {
    match auction.closing_time {
        Some(closing_time) if auction.is_open() && now >= closing_time => {
            auction.status = AuctionStatus::Closed;
            info!(
                "{:<12} --> 마감 시간 경과로 경매 종료: id={}",
                "Store", auction.id
            );
            true
        }
        _ => false,
    }
}
// endregion: --- Auction Store
