//! 下游扇出通知模块
//!
//! 病例提交成功后向兄弟子系统推送事件：
//! - AI分析启动
//! - 客户受理确认
//! - 支付回执确认
//!
//! 投递是尽力而为的：失败记日志，不同步重试，永不回传给提交方。

use anyhow::Result;
use async_trait::async_trait;
use secop_submission::CaseNotifier;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};
use uuid::Uuid;

/// 扇出事件类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    AiAnalysisRequested,
    CaseAcknowledgement,
    PaymentConfirmation,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiAnalysisRequested => "case.ai_analysis",
            Self::CaseAcknowledgement => "case.acknowledgement",
            Self::PaymentConfirmation => "case.payment_confirmation",
        }
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "case.ai_analysis" => Ok(Self::AiAnalysisRequested),
            "case.acknowledgement" => Ok(Self::CaseAcknowledgement),
            "case.payment_confirmation" => Ok(Self::PaymentConfirmation),
            _ => Err(anyhow::anyhow!("Unknown notification kind: {}", value)),
        }
    }
}

/// 扇出事件数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub id: String,
    pub kind: NotificationKind,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub data: serde_json::Value,
    pub source: String,
}

impl NotificationEvent {
    pub fn new(kind: NotificationKind, data: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            timestamp: chrono::Utc::now(),
            data,
            source: "secop".to_string(),
        }
    }
}

/// 扇出目标配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanoutConfig {
    pub ai_analysis_url: String,
    pub acknowledgement_url: String,
    pub payment_confirmation_url: String,
    /// 用于签名载荷的共享密钥
    pub secret: Option<String>,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            ai_analysis_url: "http://127.0.0.1:8081/api/ai-analysis".to_string(),
            acknowledgement_url: "http://127.0.0.1:8082/api/acknowledgement".to_string(),
            payment_confirmation_url: "http://127.0.0.1:8083/api/payment-confirmation".to_string(),
            secret: None,
        }
    }
}

/// 生成载荷签名
pub fn generate_signature(payload: &str, secret: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.update(secret);
    format!("sha256={:x}", hasher.finalize())
}

/// 扇出通知器
///
/// `CaseNotifier` 的HTTP实现，编排器通过trait调度，本类型负责实际投递。
pub struct FanoutNotifier {
    config: FanoutConfig,
    client: reqwest::Client,
}

impl FanoutNotifier {
    /// 创建新的扇出通知器
    pub fn new(config: FanoutConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 发送单个事件
    async fn send(&self, url: &str, event: NotificationEvent) -> Result<()> {
        let payload = serde_json::to_string(&event)?;
        debug!("Sending {} event to {}", event.kind.as_str(), url);

        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("User-Agent", "SECOP-Fanout/1.0")
            .header("X-Secop-Event", event.kind.as_str())
            .body(payload.clone());

        // 添加签名头
        if let Some(secret) = &self.config.secret {
            request = request.header("X-Secop-Signature", generate_signature(&payload, secret));
        }

        match request.send().await {
            Ok(response) => {
                if response.status().is_success() {
                    info!("Delivered {} event to {}", event.kind.as_str(), url);
                    Ok(())
                } else {
                    let status = response.status();
                    error!("Fanout to {} failed with status {}", url, status);
                    Err(anyhow::anyhow!("Fanout failed with status: {}", status))
                }
            }
            Err(e) => {
                error!("Failed to reach fanout target {}: {}", url, e);
                Err(anyhow::anyhow!("Failed to send notification: {}", e))
            }
        }
    }
}

#[async_trait]
impl CaseNotifier for FanoutNotifier {
    async fn notify_ai_analysis(&self, case_id: Uuid) -> Result<()> {
        let event = NotificationEvent::new(
            NotificationKind::AiAnalysisRequested,
            json!({ "caseId": case_id, "analysisType": "combined" }),
        );
        self.send(&self.config.ai_analysis_url, event).await
    }

    async fn notify_acknowledgement(
        &self,
        case_id: Uuid,
        case_number: &str,
        email: &str,
    ) -> Result<()> {
        let event = NotificationEvent::new(
            NotificationKind::CaseAcknowledgement,
            json!({ "caseId": case_id, "caseNumber": case_number, "email": email }),
        );
        self.send(&self.config.acknowledgement_url, event).await
    }

    async fn notify_payment_confirmation(&self, case_id: Uuid, payment_id: &str) -> Result<()> {
        let event = NotificationEvent::new(
            NotificationKind::PaymentConfirmation,
            json!({ "caseId": case_id, "paymentId": payment_id }),
        );
        self.send(&self.config.payment_confirmation_url, event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_format() {
        let signature = generate_signature(r#"{"test": "data"}"#, "test-secret");
        assert!(signature.starts_with("sha256="));
        assert_eq!(signature.len(), "sha256=".len() + 64);
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let payload = r#"{"caseId": "abc"}"#;
        assert_ne!(
            generate_signature(payload, "secret-a"),
            generate_signature(payload, "secret-b")
        );
    }

    #[test]
    fn test_notification_kind_roundtrip() {
        for kind in [
            NotificationKind::AiAnalysisRequested,
            NotificationKind::CaseAcknowledgement,
            NotificationKind::PaymentConfirmation,
        ] {
            assert_eq!(NotificationKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(NotificationKind::try_from("case.unknown").is_err());
    }

    #[test]
    fn test_event_carries_source_and_id() {
        let event = NotificationEvent::new(
            NotificationKind::AiAnalysisRequested,
            json!({ "caseId": "abc" }),
        );
        assert_eq!(event.source, "secop");
        assert!(!event.id.is_empty());
    }
}
