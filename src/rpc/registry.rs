//! 서비스 레지스트리
//! 기동 시 한 번 구성한 뒤 `Arc` 로 고정해 디스패처에 넘긴다.
// region:    --- Imports
use crate::error::RpcError;
use crate::rpc::path::MethodPath;
use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

// region:    --- Method Handler
/// 핸들러 출력 (`Value::Null` 이면 본문 없음)
pub type MethodFuture = Pin<Box<dyn Future<Output = Result<serde_json::Value, RpcError>> + Send>>;

pub type MethodHandler = Arc<dyn Fn(Bytes) -> MethodFuture + Send + Sync>;

/// 빈 본문(공백만 있는 경우 포함)은 입력 타입의 기본값
pub fn decode_body<I>(body: &[u8]) -> Result<I, RpcError>
where
    I: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(I::default());
    }
    serde_json::from_slice(body).map_err(|e| RpcError::InvalidBody(e.to_string()))
}
// endregion: --- Method Handler

// region:    --- Service Descriptor
/// 서비스 이름과 메서드 테이블
pub struct ServiceDescriptor {
    name: String,
    methods: HashMap<String, MethodHandler>,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: HashMap::new(),
        }
    }

    /// 메서드 추가. 핸들러가 돌려준 오류는 종류와 상관없이 핸들러 실패로 보고한다.
    pub fn method<I, O, F, Fut>(mut self, name: &str, handler: F) -> Self
    where
        I: DeserializeOwned + Default + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, RpcError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let erased: MethodHandler = Arc::new(move |body: Bytes| -> MethodFuture {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let input: I = decode_body(&body)?;
                let output = handler(input)
                    .await
                    .map_err(|e| RpcError::Handler(e.to_string()))?;
                serde_json::to_value(output).map_err(|e| RpcError::Handler(e.to_string()))
            })
        });
        self.methods.insert(name.to_string(), erased);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}
// endregion: --- Service Descriptor

// region:    --- Service Registry
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<String, ServiceDescriptor>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 서비스 등록 (프로세스 수명 동안 유지)
    ///
    /// # Panics
    /// 같은 이름의 서비스가 이미 등록되어 있으면 패닉
    pub fn register(&mut self, service: ServiceDescriptor) {
        if self.services.contains_key(service.name()) {
            panic!("service already registered: {}", service.name());
        }
        let mut methods: Vec<&str> = service.method_names().collect();
        methods.sort_unstable();
        info!(
            "{:<12} --> 서비스 등록: {} [{}]",
            "Registry",
            service.name(),
            methods.join(", ")
        );
        self.services.insert(service.name().to_string(), service);
    }

    pub fn contains(&self, service: &str) -> bool {
        self.services.contains_key(service)
    }

    pub fn lookup(&self, path: &MethodPath) -> Result<MethodHandler, RpcError> {
        let service = self
            .services
            .get(path.service())
            .ok_or_else(|| RpcError::ServiceNotFound(path.service().to_string()))?;
        service
            .methods
            .get(path.method())
            .cloned()
            .ok_or_else(|| RpcError::MethodNotFound(path.to_string()))
    }
}
// endregion: --- Service Registry

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Ping {
        count: u32,
    }

    fn echo_service(name: &str) -> ServiceDescriptor {
        ServiceDescriptor::new(name).method("Echo", |ping: Ping| async move {
            Ok::<_, RpcError>(ping.count)
        })
    }

    #[test]
    fn empty_body_decodes_to_zero_value() {
        assert_eq!(decode_body::<Ping>(b"").unwrap(), Ping::default());
        assert_eq!(decode_body::<Ping>(b" \n").unwrap(), Ping::default());
        assert_eq!(decode_body::<Ping>(br#"{"count":3}"#).unwrap(), Ping { count: 3 });
    }

    #[test]
    fn garbage_body_is_invalid() {
        assert!(matches!(
            decode_body::<Ping>(b"{not json"),
            Err(RpcError::InvalidBody(_))
        ));
    }

    #[test]
    #[should_panic(expected = "service already registered")]
    fn duplicate_registration_is_fatal() {
        let mut registry = ServiceRegistry::new();
        registry.register(echo_service("test.Echo"));
        registry.register(echo_service("test.Echo"));
    }

    #[tokio::test]
    async fn lookup_distinguishes_service_and_method() {
        let mut registry = ServiceRegistry::new();
        registry.register(echo_service("test.Echo"));

        let handler = registry
            .lookup(&MethodPath::new("test.Echo", "Echo"))
            .unwrap();
        let out = handler(Bytes::from_static(br#"{"count":7}"#)).await.unwrap();
        assert_eq!(out, serde_json::json!(7));

        assert!(matches!(
            registry.lookup(&MethodPath::new("test.Other", "Echo")),
            Err(RpcError::ServiceNotFound(_))
        ));
        assert!(matches!(
            registry.lookup(&MethodPath::new("test.Echo", "Missing")),
            Err(RpcError::MethodNotFound(_))
        ));
    }
}
