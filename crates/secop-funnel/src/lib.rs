//! # SECOP Funnel
//!
//! 匿名提交漏斗的临时状态存储：会话关联、整体替换更新、
//! 过期回收。注册消费后即删除。

pub mod store;

pub use store::{TempPayload, TempSubmissionStore};
