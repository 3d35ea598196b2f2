//! REST 프런트엔드
//! 브라우저/벤치마크용 JSON API. 모든 요청은 게이트웨이 커맨드로 바꿔 전달한다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionCommand, AuctionResponse};
use crate::error::RpcError;
use crate::gateway::AuctionGateway;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

// endregion: --- Imports

type Gateway = Arc<dyn AuctionGateway>;

// region:    --- Router
pub fn router(gateway: Gateway) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/auctions",
            post(handle_create_auction).get(handle_list_auctions),
        )
        .route("/api/auctions/:id/bid", post(handle_bid))
        .route("/api/auctions/:id/bids/bulk", post(handle_bulk_bids))
        .route("/api/auctions/:id/close", post(handle_close_auction))
        .route("/api/history", get(handle_get_history))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(gateway)
}
// endregion: --- Router

// region:    --- Requests
/// 경매 생성 요청
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateAuctionRequest {
    pub name: String,
    pub description: String,
    pub starting_bid: f64,
    pub duration_seconds: i64,
}

/// 입찰 요청
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BidRequest {
    pub bidder: String,
    pub amount: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BulkBidRequest {
    pub bids: Vec<BidRequest>,
}

/// 일괄 입찰 결과 (입찰 하나당, 단건 입찰이었다면 받았을 상태 코드 포함)
#[derive(Debug, Serialize)]
pub struct BulkBidResult {
    pub bidder: String,
    pub amount: f64,
    pub status: u16,
    pub ok: bool,
    pub message: String,
}
// endregion: --- Requests

// region:    --- Command Handlers
/// 경매 생성
pub async fn handle_create_auction(
    State(gateway): State<Gateway>,
    Json(req): Json<CreateAuctionRequest>,
) -> Response {
    info!("{:<12} --> 경매 생성 요청: {:?}", "Frontend", req);
    let cmd = AuctionCommand::new("create").with_auction(Auction {
        name: req.name,
        description: req.description,
        starting_bid: req.starting_bid,
        duration_seconds: req.duration_seconds,
        ..Auction::default()
    });
    match gateway.execute(cmd).await {
        Ok(res) if res.ok => (StatusCode::CREATED, Json(res)).into_response(),
        Ok(res) => (StatusCode::BAD_REQUEST, Json(res)).into_response(),
        Err(e) => gateway_error(e),
    }
}

/// 입찰
pub async fn handle_bid(
    State(gateway): State<Gateway>,
    Path(auction_id): Path<String>,
    Json(req): Json<BidRequest>,
) -> Response {
    info!(
        "{:<12} --> 입찰 요청: id={}, {:?}",
        "Frontend", auction_id, req
    );
    match execute_bid(&gateway, &auction_id, &req).await {
        Ok((status, res)) => (status, Json(res)).into_response(),
        Err(e) => gateway_error(e),
    }
}

/// 일괄 입찰 (순서대로 하나씩 사가를 태운다)
pub async fn handle_bulk_bids(
    State(gateway): State<Gateway>,
    Path(auction_id): Path<String>,
    Json(req): Json<BulkBidRequest>,
) -> Response {
    if req.bids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "bids must be a non-empty list"})),
        )
            .into_response();
    }
    info!(
        "{:<12} --> 일괄 입찰 요청: id={}, count={}",
        "Frontend",
        auction_id,
        req.bids.len()
    );

    // 게이트웨이 호출이 실패한 입찰도 결과에 남기고 다음 입찰을 계속 처리한다
    let mut results = Vec::with_capacity(req.bids.len());
    for bid in &req.bids {
        let (status, ok, message) = match execute_bid(&gateway, &auction_id, bid).await {
            Ok((status, res)) => (status, res.ok, res.message),
            Err(e) => {
                error!("{:<12} --> 게이트웨이 호출 실패: {}", "Frontend", e);
                (StatusCode::BAD_GATEWAY, false, e.to_string())
            }
        };
        results.push(BulkBidResult {
            bidder: bid.bidder.clone(),
            amount: bid.amount,
            status: status.as_u16(),
            ok,
            message,
        });
    }

    let accepted = results.iter().filter(|r| r.ok).count();
    let unreachable = results
        .iter()
        .all(|r| r.status == StatusCode::BAD_GATEWAY.as_u16());
    let status = if accepted > 0 {
        StatusCode::OK
    } else if unreachable {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::CONFLICT
    };
    (
        status,
        Json(serde_json::json!({
            "submitted": results.len(),
            "accepted": accepted,
            "results": results,
        })),
    )
        .into_response()
}

/// 경매 종료
pub async fn handle_close_auction(
    State(gateway): State<Gateway>,
    Path(auction_id): Path<String>,
) -> Response {
    info!("{:<12} --> 경매 종료 요청: id={}", "Frontend", auction_id);
    let cmd = AuctionCommand::new("close").with_auction(Auction::with_id(auction_id));
    match gateway.execute(cmd).await {
        Ok(res) if res.ok => Json(res).into_response(),
        Ok(res) => (StatusCode::CONFLICT, Json(res)).into_response(),
        Err(e) => gateway_error(e),
    }
}

/// 입력 검증 후 place_bid 실행
async fn execute_bid(
    gateway: &Gateway,
    auction_id: &str,
    req: &BidRequest,
) -> Result<(StatusCode, AuctionResponse), RpcError> {
    if req.bidder.trim().is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            AuctionResponse::rejected("bidder is required"),
        ));
    }
    if req.amount.is_nan() || req.amount <= 0.0 {
        return Ok((
            StatusCode::BAD_REQUEST,
            AuctionResponse::rejected("amount must be positive"),
        ));
    }
    let cmd = AuctionCommand::new("place_bid")
        .with_auction(Auction::with_id(auction_id))
        .with_bid(req.amount, &req.bidder);
    let res = gateway.execute(cmd).await?;
    let status = if res.ok {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    };
    Ok((status, res))
}
// endregion: --- Command Handlers

// region:    --- Query Handlers
/// 모든 경매 조회
pub async fn handle_list_auctions(State(gateway): State<Gateway>) -> Response {
    info!("{:<12} --> 모든 경매 조회", "Frontend");
    match gateway.execute(AuctionCommand::new("list")).await {
        Ok(res) => Json(res).into_response(),
        Err(e) => gateway_error(e),
    }
}

/// 이력 조회
pub async fn handle_get_history(State(gateway): State<Gateway>) -> Response {
    info!("{:<12} --> 이력 조회", "Frontend");
    match gateway.get_history().await {
        Ok(res) => Json(res).into_response(),
        Err(e) => gateway_error(e),
    }
}
// endregion: --- Query Handlers

fn gateway_error(e: RpcError) -> Response {
    error!("{:<12} --> 게이트웨이 호출 실패: {}", "Frontend", e);
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
        .into_response()
}
