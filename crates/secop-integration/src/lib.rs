//! # SECOP Integration
//!
//! 与兄弟子系统的集成：提交成功后的三路尽力而为扇出
//! （AI分析、受理确认、支付确认），带可选的载荷签名。

pub mod notifier;

pub use notifier::{FanoutConfig, FanoutNotifier, NotificationEvent, NotificationKind};
