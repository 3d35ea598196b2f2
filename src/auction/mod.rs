pub mod catalog;
pub mod events;
pub mod model;
pub mod store;
