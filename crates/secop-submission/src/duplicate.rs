//! 重复病例检测
//!
//! 在可配置的回溯窗口内查询同客户同疾病类型的既有病例，
//! 结果只作为警告呈现，从不阻断提交——重复意图可能是合理的
//! 随访病例。检测本身是尽力而为：查询失败被吞掉并按
//! "未发现重复"报告。

use chrono::{DateTime, Duration, Utc};
use secop_core::store::{DuplicateCandidate, SubmissionStore};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

/// 默认回溯窗口（天）
pub const DEFAULT_WINDOW_DAYS: u32 = 7;
/// 最大回溯窗口（天）
pub const MAX_WINDOW_DAYS: u32 = 30;

/// 重复检测结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheck {
    pub has_duplicates: bool,
    pub duplicate_count: usize,
    pub most_recent_date: Option<DateTime<Utc>>,
    pub window_days: u32,
}

impl DuplicateCheck {
    /// 空结果（未启用或查询失败时）
    pub fn none(window_days: u32) -> Self {
        Self {
            has_duplicates: false,
            duplicate_count: 0,
            most_recent_date: None,
            window_days,
        }
    }
}

/// 解析请求的窗口天数
///
/// 未指定取默认7天；0表示禁用检测；超过上限收敛到30天。
pub fn effective_window(requested: Option<u32>) -> Option<u32> {
    match requested {
        None => Some(DEFAULT_WINDOW_DAYS),
        Some(0) => None,
        Some(days) => Some(days.min(MAX_WINDOW_DAYS)),
    }
}

/// 纯窗口评估：给定既有病例与窗口，计算重复信号
pub fn evaluate_window(
    cases: &[DuplicateCandidate],
    now: DateTime<Utc>,
    window_days: u32,
) -> DuplicateCheck {
    let cutoff = now - Duration::days(window_days as i64);
    let in_window: Vec<&DuplicateCandidate> =
        cases.iter().filter(|c| c.created_at >= cutoff).collect();

    DuplicateCheck {
        has_duplicates: !in_window.is_empty(),
        duplicate_count: in_window.len(),
        most_recent_date: in_window.iter().map(|c| c.created_at).max(),
        window_days,
    }
}

/// 重复检测器
#[derive(Debug, Default)]
pub struct DuplicateDetector;

impl DuplicateDetector {
    pub fn new() -> Self {
        Self
    }

    /// 执行尽力而为的重复检测
    pub async fn check<S: SubmissionStore + ?Sized>(
        &self,
        store: &S,
        customer_id: Uuid,
        disease_type: &str,
        requested_days: Option<u32>,
    ) -> DuplicateCheck {
        let Some(window_days) = effective_window(requested_days) else {
            return DuplicateCheck::none(0);
        };

        let now = Utc::now();
        let since = now - Duration::days(window_days as i64);

        match store.recent_cases(customer_id, disease_type, since).await {
            Ok(cases) => evaluate_window(&cases, now, window_days),
            Err(e) => {
                // 重复检测从不阻断合法提交
                warn!(
                    "Duplicate check failed for customer {}, reporting none: {}",
                    customer_id, e
                );
                DuplicateCheck::none(window_days)
            }
        }
    }
}
