use auction_saga::error::RpcError;
use auction_saga::rpc::{self, MethodPath, RemoteInvoker, ServiceDescriptor, ServiceRegistry};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Amount {
    value: i64,
}

fn math_service() -> ServiceDescriptor {
    ServiceDescriptor::new("test.Math")
        .method("Double", |a: Amount| async move {
            Ok(Amount { value: a.value * 2 })
        })
        .method("Nothing", |_: Amount| async move { Ok(()) })
        .method("Fail", |_: Amount| async move {
            Err::<Amount, _>(RpcError::Handler("division by zero".into()))
        })
        .method("Slow", |a: Amount| async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(a)
        })
}

/// 임시 포트에 RPC 서버 실행
async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let mut registry = ServiceRegistry::new();
    registry.register(math_service());
    tokio::spawn(rpc::serve(listener, registry));
    addr
}

async fn post(addr: &str, path: &str, body: &'static str) -> (StatusCode, String) {
    let response = Client::new()
        .post(format!("http://{addr}{path}"))
        .body(body)
        .send()
        .await
        .expect("요청 실패");
    let status = response.status();
    (status, response.text().await.unwrap())
}

/// 상태 코드 분류
#[tokio::test]
async fn test_status_classes() {
    let addr = spawn_server().await;

    let (status, body) = post(&addr, "/test.Math/Double", r#"{"value":4}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"value":8}"#);

    let (status, body) = post(&addr, "/test.Math/Nothing", "").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = post(&addr, "/test.Math", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&addr, "/test.Nope/Double", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&addr, "/test.Math/Triple", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&addr, "/test.Math/Double", "{oops").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(&addr, "/test.Math/Fail", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "division by zero");

    let response = Client::new()
        .get(format!("http://{addr}/test.Math/Double"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

/// 원격 호출 클라이언트
#[tokio::test]
async fn test_invoker_round_trip() {
    let addr = spawn_server().await;
    let invoker = RemoteInvoker::dial(&addr);
    assert_eq!(invoker.target(), addr);

    let out: Amount = invoker
        .invoke(&MethodPath::new("test.Math", "Double"), Some(&Amount { value: 21 }))
        .await
        .unwrap();
    assert_eq!(out, Amount { value: 42 });

    // 입력 없이 호출하면 기본값
    let out: Amount = invoker
        .invoke::<Amount, _>(&MethodPath::new("test.Math", "Double"), None)
        .await
        .unwrap();
    assert_eq!(out, Amount::default());

    // 204 응답은 null 로 디코딩
    let _: () = invoker
        .invoke(&MethodPath::new("test.Math", "Nothing"), Some(&Amount::default()))
        .await
        .unwrap();

    invoker
        .invoke_discard(&MethodPath::new("test.Math", "Double"), Some(&Amount { value: 1 }))
        .await
        .unwrap();
}

/// 원격 오류는 본문 텍스트를 그대로 전달
#[tokio::test]
async fn test_invoker_errors() {
    let addr = spawn_server().await;
    let invoker = RemoteInvoker::dial(&addr);

    let err = invoker
        .invoke::<Amount, Amount>(&MethodPath::new("test.Math", "Fail"), None)
        .await
        .unwrap_err();
    assert_eq!(err, RpcError::Remote("division by zero".to_string()));

    let err = invoker
        .invoke::<Amount, Amount>(&MethodPath::new("test.Math", "Missing"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Remote(_)));

    let slow = RemoteInvoker::dial(&addr).with_timeout(Some(Duration::from_millis(50)));
    let err = slow
        .invoke::<Amount, Amount>(&MethodPath::new("test.Math", "Slow"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Transport(_)));
}

/// 접속할 수 없는 주소는 전송 오류
#[tokio::test]
async fn test_unreachable_target() {
    // 바인딩했다가 바로 닫은 포트
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let err = RemoteInvoker::dial(addr)
        .invoke::<Amount, Amount>(&MethodPath::new("test.Math", "Double"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Transport(_)));
}
