// region:    --- Imports
use crate::auction::events::HistoryEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
// endregion: --- Imports

// 경매 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuctionStatus {
    #[default]
    Open,
    Closed,
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionStatus::Open => f.write_str("OPEN"),
            AuctionStatus::Closed => f.write_str("CLOSED"),
        }
    }
}

/// 경매 항목 (원본은 카탈로그만 소유, 나머지는 복사본)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Auction {
    pub id: String,
    pub name: String,
    pub description: String,
    pub starting_bid: f64,
    pub current_bid: f64,
    pub highest_bidder: String,
    pub duration_seconds: i64,
    pub status: AuctionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_time: Option<DateTime<Utc>>,
}

impl Auction {
    /// get / close / update_bid 에 실어 보내는 id 만 있는 참조
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == AuctionStatus::Open
    }
}

/// 모든 `Execute` 가 공유하는 커맨드
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionCommand {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auction: Option<Auction>,
    pub bid_amount: f64,
    pub bidder: String,
}

impl AuctionCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn with_auction(mut self, auction: Auction) -> Self {
        self.auction = Some(auction);
        self
    }

    pub fn with_bid(mut self, amount: f64, bidder: impl Into<String>) -> Self {
        self.bid_amount = amount;
        self.bidder = bidder.into();
        self
    }

    /// 비어 있지 않은 경매 id
    pub fn auction_id(&self) -> Option<&str> {
        self.auction
            .as_ref()
            .map(|a| a.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// 도메인 서비스와 게이트웨이 공용 응답
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auction: Option<Auction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub auctions: Vec<Auction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryEvent>,
}

impl AuctionResponse {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_auction(auction: Auction) -> Self {
        Self {
            ok: true,
            auction: Some(auction),
            ..Self::default()
        }
    }

    pub fn with_auctions(auctions: Vec<Auction>) -> Self {
        Self {
            ok: true,
            auctions,
            ..Self::default()
        }
    }

    pub fn with_history(history: Vec<HistoryEvent>) -> Self {
        Self {
            ok: true,
            history,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Empty {}
