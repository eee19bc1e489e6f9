//! # SECOP Web
//!
//! axum HTTP接入层：提交漏斗、验证、提交、注册与状态转换端点。

pub mod handlers;
pub mod server;
pub mod state;

pub use server::{create_app, WebServer};
pub use state::AppState;
