//! 요청 디스패처
//! `POST /{service}/{method}` 를 등록된 핸들러로 보내고 결과를 상태 코드로 바꾼다.
// region:    --- Imports
use crate::error::RpcError;
use crate::rpc::path::MethodPath;
use crate::rpc::registry::ServiceRegistry;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
// endregion: --- Imports

// region:    --- Dispatcher
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Json(serde_json::Value),
    NoContent,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(value) => (StatusCode::OK, Json(value)).into_response(),
            Reply::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ServiceRegistry>,
}

impl Dispatcher {
    pub fn new(registry: ServiceRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// 주소 해석 -> 핸들러 조회 -> 호출
    pub async fn dispatch(&self, path: &str, body: Bytes) -> Result<Reply, RpcError> {
        let address = MethodPath::parse(path)?;
        let handler = self.registry.lookup(&address)?;
        debug!("{:<12} --> {} ({} bytes)", "Dispatch", address, body.len());
        match handler(body).await? {
            serde_json::Value::Null => Ok(Reply::NoContent),
            value => Ok(Reply::Json(value)),
        }
    }

    /// 모든 경로를 fallback 으로 받는다 (잘못된 주소 판단은 MethodPath 가 한다)
    pub fn into_router(self) -> Router {
        Router::new()
            .fallback(handle_call)
            .layer(TraceLayer::new_for_http())
            .with_state(self)
    }
}

async fn handle_call(
    State(dispatcher): State<Dispatcher>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return (StatusCode::METHOD_NOT_ALLOWED, "unsupported method").into_response();
    }
    match dispatcher.dispatch(uri.path(), body).await {
        Ok(reply) => reply.into_response(),
        Err(e) => e.into_response(),
    }
}
// endregion: --- Dispatcher

// region:    --- Serve
/// 바인딩된 리스너에서 레지스트리 서비스 (서버가 멈출 때까지 반환하지 않는다)
pub async fn serve(listener: TcpListener, registry: ServiceRegistry) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!("{:<12} --> RPC server listening on {}", "Dispatch", addr);
    let router = Dispatcher::new(registry).into_router();
    axum::serve(listener, router.into_make_service())
        .await
        .inspect_err(|e| error!("{:<12} --> Server error: {}", "Dispatch", e))
}
// endregion: --- Serve

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::registry::ServiceDescriptor;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct Amount {
        value: i64,
    }

    fn dispatcher() -> Dispatcher {
        let mut registry = ServiceRegistry::new();
        registry.register(
            ServiceDescriptor::new("test.Math")
                .method("Double", |a: Amount| async move {
                    Ok(Amount { value: a.value * 2 })
                })
                .method("Nothing", |_: Amount| async move { Ok(()) })
                .method("Fail", |_: Amount| async move {
                    Err::<Amount, _>(RpcError::Handler("division by zero".into()))
                }),
        );
        Dispatcher::new(registry)
    }

    #[tokio::test]
    async fn routes_and_encodes() {
        let reply = dispatcher()
            .dispatch("/test.Math/Double", Bytes::from_static(br#"{"value":21}"#))
            .await
            .unwrap();
        assert_eq!(reply, Reply::Json(serde_json::json!({"value": 42})));
    }

    #[tokio::test]
    async fn empty_body_is_zero_input() {
        let reply = dispatcher()
            .dispatch("/test.Math/Double", Bytes::new())
            .await
            .unwrap();
        assert_eq!(reply, Reply::Json(serde_json::json!({"value": 0})));
    }

    #[tokio::test]
    async fn unit_output_is_no_content() {
        let reply = dispatcher()
            .dispatch("/test.Math/Nothing", Bytes::new())
            .await
            .unwrap();
        assert_eq!(reply, Reply::NoContent);
    }

    #[tokio::test]
    async fn error_classes() {
        let d = dispatcher();
        let status = |r: Result<Reply, RpcError>| r.unwrap_err().status();

        assert_eq!(
            status(d.dispatch("test.Math/Double", Bytes::new()).await),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(d.dispatch("/test.Nope/Double", Bytes::new()).await),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(d.dispatch("/test.Math/Triple", Bytes::new()).await),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(d.dispatch("/test.Math/Double", Bytes::from_static(b"[")).await),
            StatusCode::BAD_REQUEST
        );
        let err = d.dispatch("/test.Math/Fail", Bytes::new()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "division by zero");
    }
}
