//! # SECOP Submission
//!
//! 病例提交的核心编排模块，提供：
//! - 提交验证：模式检查与业务规则检查，错误阻断、警告放行
//! - 重复检测：回溯窗口内的同类病例信号，尽力而为，从不阻断
//! - 病例状态机：提交到交付的完整生命周期转换
//! - 提交编排器：验证 → 原子事务 → 提交后尽力而为扇出

pub mod duplicate;
pub mod orchestrator;
pub mod state_machine;
pub mod validation;

// 重新导出主要类型
pub use duplicate::{DuplicateCheck, DuplicateDetector, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
pub use orchestrator::{
    CaseNotifier, SubmissionMetrics, SubmissionOrchestrator, SubmissionOutcome, SubmissionRequest,
    ValidationOutcome, ValidationQuery,
};
pub use state_machine::{CaseEvent, CaseStateMachine};
pub use validation::{SubmissionValidator, ValidationReport};
