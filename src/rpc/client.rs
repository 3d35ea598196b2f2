//! 원격 호출 클라이언트
//! 호출 한 번에 요청/응답 한 번. 재시도는 없다.
// region:    --- Imports
use crate::error::RpcError;
use crate::rpc::path::MethodPath;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
// endregion: --- Imports

// region:    --- Remote Invoker
/// 원격 프로세스 하나에 대한 연결
/// 복제본끼리 HTTP 클라이언트(커넥션 풀)를 공유한다.
#[derive(Clone, Debug)]
pub struct RemoteInvoker {
    target: String,
    client: Client,
    timeout: Option<Duration>,
}

impl RemoteInvoker {
    /// `target` 은 `host:port`. 실제 접속은 첫 호출 시점
    pub fn dial(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            client: Client::new(),
            timeout: None,
        }
    }

    /// 호출마다 적용할 제한 시간
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// 호출 후 응답 본문을 `O` 로 디코딩 (빈 본문은 `null`)
    pub async fn invoke<I, O>(&self, method: &MethodPath, input: Option<&I>) -> Result<O, RpcError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let response = self.send(method, input).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let body: &[u8] = if body.is_empty() { b"null" } else { &body };
        serde_json::from_slice(body)
            .map_err(|e| RpcError::Transport(format!("cannot decode response from {method}: {e}")))
    }

    /// 호출 후 응답 본문은 버린다
    pub async fn invoke_discard<I>(&self, method: &MethodPath, input: Option<&I>) -> Result<(), RpcError>
    where
        I: Serialize + ?Sized,
    {
        self.send(method, input).await.map(drop)
    }

    async fn send<I>(&self, method: &MethodPath, input: Option<&I>) -> Result<Response, RpcError>
    where
        I: Serialize + ?Sized,
    {
        let url = format!("http://{}{}", self.target, method);
        let mut request = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(input) = input {
            let body = serde_json::to_vec(input).map_err(|e| RpcError::Transport(e.to_string()))?;
            request = request.body(body);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        debug!("{:<12} --> POST {}", "Invoker", url);
        let response = request
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let text = response.text().await.unwrap_or_default();
            return Err(RpcError::Remote(text.trim().to_string()));
        }
        Ok(response)
    }
}
// endregion: --- Remote Invoker
