//! 错误定义模块

use thiserror::Error;

/// 二次诊疗平台统一错误类型
#[derive(Error, Debug)]
pub enum SecopError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("资源冲突: {0}")]
    DuplicateResource(String),

    #[error("事务失败: {0}")]
    Transaction(String),

    #[error("下游通知失败: {0}")]
    Notification(String),

    #[error("临时提交已过期或不存在: {0}")]
    SessionExpired(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),

    #[error("无效状态转换: 从 {from} 到 {event}")]
    InvalidStateTransition { from: String, event: String },
}

/// 平台统一结果类型
pub type Result<T> = std::result::Result<T, SecopError>;
