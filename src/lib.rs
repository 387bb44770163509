pub mod api;
pub mod config;
pub mod dispatch;
pub mod extract;
pub mod handlers;
pub mod humanize;
pub mod media;
pub mod observability;
pub mod publish;
pub mod scratch;
pub mod util;
