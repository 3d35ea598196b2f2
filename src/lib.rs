pub mod auction;
pub mod bidding;
pub mod bootstrap;
pub mod clock;
pub mod config;
pub mod error;
pub mod event_store;
pub mod gateway;
pub mod handlers;
pub mod notifier;
pub mod rpc;
