//! 临时提交存储
//!
//! 匿名漏斗阶段的可恢复草稿：以不透明id寻址，通过会话令牌关联
//! 浏览器会话。更新是整体替换而非深合并，调用方必须重发未变更字段。
//! 单实例内存实现；类型边界保持存储语义（过期、会话关联），
//! 多实例部署时可替换为外部键值存储。

use chrono::{Duration, Utc};
use secop_core::{
    ContextInfo, MedicalFileDescriptor, PersonalInfo, Result, SecopError, TempSubmission,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// 临时提交的可变载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempPayload {
    #[serde(default)]
    pub medical_files: Vec<MedicalFileDescriptor>,
    pub context_info: Option<ContextInfo>,
    pub personal_info: Option<PersonalInfo>,
}

/// 临时提交存储
pub struct TempSubmissionStore {
    entries: RwLock<HashMap<Uuid, TempSubmission>>,
    retention: Duration,
}

impl TempSubmissionStore {
    /// 创建存储，`retention` 为草稿保留时长
    pub fn new(retention: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention,
        }
    }

    /// 创建新的临时提交，返回不透明id
    pub async fn create(&self, session_token: &str, payload: TempPayload) -> Result<Uuid> {
        if session_token.trim().is_empty() {
            return Err(SecopError::Validation(
                "Session token is required".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let entry = TempSubmission {
            id,
            session_token: session_token.to_string(),
            medical_files: payload.medical_files,
            context_info: payload.context_info,
            personal_info: payload.personal_info,
            created_at: now,
            updated_at: now,
            expires_at: now + self.retention,
        };

        self.entries.write().await.insert(id, entry);
        debug!("Created temp submission {}", id);
        Ok(id)
    }

    /// 读取临时提交
    ///
    /// 不存在、已过期或会话令牌不匹配一律报告为过期，不泄露存在性。
    pub async fn get(&self, id: Uuid, session_token: &str) -> Result<TempSubmission> {
        let entries = self.entries.read().await;
        match entries.get(&id) {
            Some(entry) if entry.session_token == session_token && entry.expires_at > Utc::now() => {
                Ok(entry.clone())
            }
            _ => Err(SecopError::SessionExpired(id.to_string())),
        }
    }

    /// 整体替换可变字段
    ///
    /// 每次更新视为活动，顺延过期时间。
    pub async fn update(&self, id: Uuid, session_token: &str, payload: TempPayload) -> Result<()> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(&id) {
            Some(entry) if entry.session_token == session_token && entry.expires_at > Utc::now() => {
                let now = Utc::now();
                entry.medical_files = payload.medical_files;
                entry.context_info = payload.context_info;
                entry.personal_info = payload.personal_info;
                entry.updated_at = now;
                entry.expires_at = now + self.retention;
                Ok(())
            }
            _ => Err(SecopError::SessionExpired(id.to_string())),
        }
    }

    /// 消费临时提交（注册时调用，消费后即删除）
    pub async fn consume(&self, id: Uuid, session_token: &str) -> Result<TempSubmission> {
        let mut entries = self.entries.write().await;
        match entries.get(&id) {
            Some(entry) if entry.session_token == session_token && entry.expires_at > Utc::now() => {
                let entry = entries.remove(&id).unwrap();
                info!("Consumed temp submission {}", id);
                Ok(entry)
            }
            _ => Err(SecopError::SessionExpired(id.to_string())),
        }
    }

    /// 清理过期条目，返回删除数量
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let removed = before - entries.len();
        if removed > 0 {
            info!("Swept {} expired temp submissions", removed);
        }
        removed
    }

    /// 当前条目数
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// 启动后台清理任务
    pub fn spawn_gc(store: Arc<Self>, every: std::time::Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                store.sweep_expired().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_with_notes(notes: &str) -> TempPayload {
        TempPayload {
            medical_files: vec![],
            context_info: Some(ContextInfo::Short {
                disease_type: "migraine".to_string(),
                symptoms: None,
                additional_notes: Some(notes.to_string()),
            }),
            personal_info: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = TempSubmissionStore::new(Duration::hours(1));
        let id = store.create("session-a", payload_with_notes("first")).await.unwrap();

        let entry = store.get(id, "session-a").await.unwrap();
        assert_eq!(entry.id, id);
        assert!(entry.context_info.is_some());
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let store = TempSubmissionStore::new(Duration::hours(1));
        let id = store.create("session-a", payload_with_notes("v1")).await.unwrap();

        store.update(id, "session-a", payload_with_notes("v2")).await.unwrap();
        let first = store.get(id, "session-a").await.unwrap();

        store.update(id, "session-a", payload_with_notes("v2")).await.unwrap();
        let second = store.get(id, "session-a").await.unwrap();

        assert_eq!(
            serde_json::to_value(&first.context_info).unwrap(),
            serde_json::to_value(&second.context_info).unwrap()
        );
    }

    #[tokio::test]
    async fn test_update_replaces_instead_of_merging() {
        let store = TempSubmissionStore::new(Duration::hours(1));
        let mut initial = payload_with_notes("v1");
        initial.medical_files.push(MedicalFileDescriptor {
            name: "letter.pdf".to_string(),
            size: 1024,
            mime_type: "application/pdf".to_string(),
            category: "Doctor's Letter".to_string(),
            storage_key: "uploads/letter.pdf".to_string(),
        });
        let id = store.create("session-a", initial).await.unwrap();

        // 未重发文件字段的整体替换会丢掉文件
        store.update(id, "session-a", payload_with_notes("v2")).await.unwrap();
        let entry = store.get(id, "session-a").await.unwrap();
        assert!(entry.medical_files.is_empty());
    }

    #[tokio::test]
    async fn test_session_mismatch_behaves_as_expired() {
        let store = TempSubmissionStore::new(Duration::hours(1));
        let id = store.create("session-a", payload_with_notes("v1")).await.unwrap();

        let err = store.get(id, "session-b").await.unwrap_err();
        assert!(matches!(err, SecopError::SessionExpired(_)));
    }

    #[tokio::test]
    async fn test_expired_entry_is_not_found() {
        let store = TempSubmissionStore::new(Duration::seconds(-1));
        let id = store.create("session-a", payload_with_notes("v1")).await.unwrap();

        let err = store.get(id, "session-a").await.unwrap_err();
        assert!(matches!(err, SecopError::SessionExpired(_)));
    }

    #[tokio::test]
    async fn test_consume_removes_entry() {
        let store = TempSubmissionStore::new(Duration::hours(1));
        let id = store.create("session-a", payload_with_notes("v1")).await.unwrap();

        store.consume(id, "session-a").await.unwrap();
        assert!(store.get(id, "session-a").await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let store = TempSubmissionStore::new(Duration::seconds(-1));
        store.create("session-a", payload_with_notes("old")).await.unwrap();

        let fresh_store = TempSubmissionStore::new(Duration::hours(1));
        fresh_store.create("session-b", payload_with_notes("new")).await.unwrap();

        assert_eq!(store.sweep_expired().await, 1);
        assert_eq!(fresh_store.sweep_expired().await, 0);
        assert_eq!(fresh_store.len().await, 1);
    }
}
