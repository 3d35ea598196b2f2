// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;
// endregion: --- Imports

// region:    --- Rpc Error
/// RPC 계층 오류 (서버/클라이언트 공통)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("invalid method path: {0}")]
    MalformedPath(String),

    #[error("service not found: {0}")]
    ServiceNotFound(String),

    #[error("method not found: {0}")]
    MethodNotFound(String),

    #[error("invalid body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    Handler(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote error: {0}")]
    Remote(String),
}

impl RpcError {
    /// 디스패처가 응답할 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::MalformedPath(_) | RpcError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RpcError::ServiceNotFound(_) | RpcError::MethodNotFound(_) => StatusCode::NOT_FOUND,
            RpcError::Handler(_) | RpcError::Transport(_) | RpcError::Remote(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("{:<12} --> {} {}", "Dispatch", status.as_u16(), self);
        (status, self.to_string()).into_response()
    }
}
// endregion: --- Rpc Error

// region:    --- Auction Error
/// 도메인 거절 사유
/// 전송 오류로 나가지 않고 `ok = false` 응답의 메시지로 바뀐다.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuctionError {
    #[error("auction not found")]
    NotFound,

    #[error("auction is not open")]
    NotOpen,

    #[error("{0}")]
    Validation(String),
}
// endregion: --- Auction Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classes() {
        assert_eq!(
            RpcError::MalformedPath("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RpcError::InvalidBody("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RpcError::MethodNotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RpcError::Handler("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn handler_error_is_bare_message() {
        assert_eq!(RpcError::Handler("boom".into()).to_string(), "boom");
    }
}
