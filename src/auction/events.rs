use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 이벤트 타입 태그
pub const AUCTION_CREATED: &str = "auction_created";
pub const BID_PLACED: &str = "bid_placed";
pub const AUCTION_CLOSED: &str = "auction_closed";
pub const UPDATE: &str = "update";

/// 이벤트 로그에 기록되는 이벤트
/// auction_id 는 경매 존재 여부를 검증하지 않는다.
/// timestamp 는 로그에 추가되는 시점에 로그가 직접 찍는다.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEvent {
    pub auction_id: String,
    pub event_type: String,
    pub payload: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEvent {
    pub fn new(
        auction_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            auction_id: auction_id.into(),
            event_type: event_type.into(),
            payload: payload.into(),
            timestamp: DateTime::default(),
        }
    }
}

// region:    --- Payload Text
/// 금액 표기 (소수점 둘째 자리)
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

pub fn bid_placed_payload(bidder: &str, amount: f64) -> String {
    format!("{} bid ${}", bidder, format_amount(amount))
}

pub fn created_announcement(name: &str) -> String {
    format!("Auction created: {name}")
}

pub fn bid_announcement(bidder: &str, amount: f64) -> String {
    format!("New highest bid ${} by {}", format_amount(amount), bidder)
}

pub const CLOSED_ANNOUNCEMENT: &str = "Auction closed";
// endregion: --- Payload Text

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_have_two_decimals() {
        assert_eq!(format_amount(15.0), "15.00");
        assert_eq!(format_amount(1.5), "1.50");
        assert_eq!(bid_placed_payload("alice", 15.0), "alice bid $15.00");
        assert_eq!(bid_announcement("bob", 101.5), "New highest bid $101.50 by bob");
    }
}
