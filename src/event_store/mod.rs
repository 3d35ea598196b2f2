// region:    --- Imports
use crate::auction::events::HistoryEvent;
use crate::auction::model::{AuctionResponse, Empty};
use crate::clock::Clock;
use crate::error::RpcError;
use crate::rpc::{MethodPath, RemoteInvoker, ServiceDescriptor};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

// endregion: --- Imports

/// 영구 이력 로그
pub const HISTORY_SERVICE: &str = "auction.HistoryRecorder";
/// 실시간 업데이트 피드
pub const UPDATES_SERVICE: &str = "auction.UpdateBroadcaster";

// region:    --- Event Log
/// 이벤트 로그
/// 도착 순서대로 끝에 추가만 한다. 보존 정책, 압축, 삭제 없음.
pub struct EventLog {
    name: &'static str,
    events: Mutex<Vec<HistoryEvent>>,
    clock: Arc<dyn Clock>,
}

impl EventLog {
    pub fn new(name: &'static str, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            events: Mutex::new(Vec::new()),
            clock,
        }
    }

    /// 이벤트 추가 (timestamp 는 추가 시점으로 덮어쓴다)
    pub async fn append(&self, mut event: HistoryEvent) -> HistoryEvent {
        event.timestamp = self.clock.now();
        let mut events = self.events.lock().await;
        debug!(
            "{:<12} --> [{}] #{} {} {}",
            "EventLog",
            self.name,
            events.len(),
            event.event_type,
            event.auction_id
        );
        events.push(event.clone());
        event
    }

    /// 전체 스냅샷 (추가된 순서 그대로)
    pub async fn list(&self) -> Vec<HistoryEvent> {
        self.events.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.lock().await.is_empty()
    }
}
// endregion: --- Event Log

// region:    --- Event Log Trait
/// 이벤트 로그 서비스 트레이트
/// 이력 로그와 업데이트 피드는 같은 계약을 공유하고 주소만 다르다.
#[async_trait]
pub trait EventLogService: Send + Sync {
    async fn append(&self, event: HistoryEvent) -> Result<AuctionResponse, RpcError>;
    async fn list(&self) -> Result<AuctionResponse, RpcError>;
}

#[async_trait]
impl EventLogService for EventLog {
    async fn append(&self, event: HistoryEvent) -> Result<AuctionResponse, RpcError> {
        EventLog::append(self, event).await;
        Ok(AuctionResponse::accepted(""))
    }

    async fn list(&self) -> Result<AuctionResponse, RpcError> {
        Ok(AuctionResponse::with_history(EventLog::list(self).await))
    }
}
// endregion: --- Event Log Trait

// region:    --- Remote Event Log
/// 원격 이벤트 로그 클라이언트
pub struct EventLogClient {
    invoker: RemoteInvoker,
    append: MethodPath,
    list: MethodPath,
}

impl EventLogClient {
    pub fn history(invoker: RemoteInvoker) -> Self {
        Self {
            invoker,
            append: MethodPath::new(HISTORY_SERVICE, "Record"),
            list: MethodPath::new(HISTORY_SERVICE, "List"),
        }
    }

    pub fn updates(invoker: RemoteInvoker) -> Self {
        Self {
            invoker,
            append: MethodPath::new(UPDATES_SERVICE, "Publish"),
            list: MethodPath::new(UPDATES_SERVICE, "List"),
        }
    }
}

#[async_trait]
impl EventLogService for EventLogClient {
    async fn append(&self, event: HistoryEvent) -> Result<AuctionResponse, RpcError> {
        self.invoker.invoke(&self.append, Some(&event)).await
    }

    async fn list(&self) -> Result<AuctionResponse, RpcError> {
        self.invoker.invoke(&self.list, Some(&Empty {})).await
    }
}
// endregion: --- Remote Event Log

// region:    --- Descriptors
/// 이력 로그 등록 정보: Record / List
pub fn history_descriptor(log: Arc<dyn EventLogService>) -> ServiceDescriptor {
    descriptor(HISTORY_SERVICE, "Record", log)
}

/// 업데이트 피드 등록 정보: Publish / List
pub fn updates_descriptor(log: Arc<dyn EventLogService>) -> ServiceDescriptor {
    descriptor(UPDATES_SERVICE, "Publish", log)
}

fn descriptor(
    service: &'static str,
    append_method: &str,
    log: Arc<dyn EventLogService>,
) -> ServiceDescriptor {
    let appender = Arc::clone(&log);
    ServiceDescriptor::new(service)
        .method(append_method, move |event: HistoryEvent| {
            let log = Arc::clone(&appender);
            async move { log.append(event).await }
        })
        .method("List", move |_: Empty| {
            let log = Arc::clone(&log);
            async move { log.list().await }
        })
}
// endregion: --- Descriptors

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeDelta;

    #[tokio::test]
    async fn keeps_arrival_order_and_stamps_append_time() {
        let clock = ManualClock::default();
        let log = EventLog::new("history", Arc::new(clock.clone()));
        assert!(log.is_empty().await);

        let mut late = HistoryEvent::new("b", "bid_placed", "x");
        late.timestamp = clock.now() + TimeDelta::days(10);
        let first = log.append(late).await;
        assert_eq!(first.timestamp, clock.now());

        clock.advance(TimeDelta::seconds(1));
        log.append(HistoryEvent::new("a", "auction_created", "y")).await;

        let events = log.list().await;
        assert_eq!(log.len().await, 2);
        assert_eq!(events[0].auction_id, "b");
        assert_eq!(events[1].auction_id, "a");
        assert!(events[0].timestamp < events[1].timestamp);
    }

    #[tokio::test]
    async fn snapshot_is_independent() {
        let log = EventLog::new("updates", Arc::new(ManualClock::default()));
        log.append(HistoryEvent::new("a", "update", "one")).await;
        let mut snapshot = log.list().await;
        snapshot.clear();
        assert_eq!(log.len().await, 1);
    }

    #[tokio::test]
    async fn service_contract_wraps_events_in_response() {
        let log: Arc<dyn EventLogService> =
            Arc::new(EventLog::new("history", Arc::new(ManualClock::default())));
        assert!(log
            .append(HistoryEvent::new("unknown-auction", "anything", ""))
            .await
            .unwrap()
            .ok);
        let listed = log.list().await.unwrap();
        assert!(listed.ok);
        assert_eq!(listed.history.len(), 1);
    }
}
