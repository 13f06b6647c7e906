/// Shared modules for the WSB dashboard
pub mod bars;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod format;
pub mod ranking;
pub mod state;
pub mod summary;
pub mod types;
pub mod view;
pub mod widget;
