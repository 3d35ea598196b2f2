//! 서비스 간 요청/응답 RPC
//! HTTP POST + JSON 본문, 주소는 `/{service}/{method}`.

pub mod client;
pub mod dispatch;
pub mod path;
pub mod registry;

pub use client::RemoteInvoker;
pub use dispatch::{serve, Dispatcher, Reply};
pub use path::MethodPath;
pub use registry::{ServiceDescriptor, ServiceRegistry};
