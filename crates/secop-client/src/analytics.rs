//! 漏斗步骤分析
//!
//! 记录向导每一步的起止时间与错误/警告计数，完成时计算总时长
//! 并发送尽力而为的分析信标。信标投递失败永不影响用户可见的
//! 提交结果。

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

/// 单步指标
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepMetrics {
    pub step: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error_count: u32,
    pub warning_count: u32,
}

impl StepMetrics {
    /// 步骤耗时（毫秒），未结束时为None
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }
}

/// 分析报告 - 信标载荷
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub steps: Vec<StepMetrics>,
    pub total_duration_ms: Option<i64>,
}

/// 漏斗分析记录器
#[derive(Debug, Default)]
pub struct FunnelAnalytics {
    steps: Vec<StepMetrics>,
}

impl FunnelAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录步骤开始
    pub fn step_started(&mut self, step: &str) {
        self.steps.push(StepMetrics {
            step: step.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            error_count: 0,
            warning_count: 0,
        });
    }

    /// 记录步骤结束及其错误/警告计数
    ///
    /// 匹配最近一个未结束的同名步骤；没有匹配则忽略。
    pub fn step_finished(&mut self, step: &str, error_count: u32, warning_count: u32) {
        if let Some(metrics) = self
            .steps
            .iter_mut()
            .rev()
            .find(|m| m.step == step && m.finished_at.is_none())
        {
            metrics.finished_at = Some(Utc::now());
            metrics.error_count = error_count;
            metrics.warning_count = warning_count;
        } else {
            debug!("step_finished for unknown step '{}', ignoring", step);
        }
    }

    /// 生成报告：总时长为首个开始到最后结束
    pub fn report(&self) -> AnalyticsReport {
        let first_start = self.steps.iter().map(|m| m.started_at).min();
        let last_finish = self.steps.iter().filter_map(|m| m.finished_at).max();

        AnalyticsReport {
            steps: self.steps.clone(),
            total_duration_ms: match (first_start, last_finish) {
                (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
                _ => None,
            },
        }
    }
}

/// 分析信标
pub struct AnalyticsBeacon {
    client: reqwest::Client,
    endpoint: String,
}

impl AnalyticsBeacon {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// 尽力而为地发送报告，失败只记日志
    pub async fn emit(&self, report: &AnalyticsReport) {
        match self.client.post(&self.endpoint).json(report).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Analytics beacon delivered");
            }
            Ok(response) => {
                warn!("Analytics beacon rejected with status {}", response.status());
            }
            Err(e) => {
                warn!("Analytics beacon failed: {}", e);
            }
        }
    }
}
