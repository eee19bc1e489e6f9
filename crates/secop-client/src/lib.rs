//! # SECOP Client
//!
//! 提交端工具箱：带取消语义的提交客户端与漏斗步骤分析。

pub mod analytics;
pub mod client;

pub use analytics::{AnalyticsBeacon, AnalyticsReport, FunnelAnalytics, StepMetrics};
pub use client::{
    AttemptHandle, AttemptState, HttpTransport, SubmissionClient, SubmissionPhase,
    SubmissionReceipt, SubmitTransport,
};
