//! 病例提交编排器
//!
//! 协调验证、重复检测、原子落库与提交后下游扇出的核心组件。
//! 事务边界内：客户、病例、附件一次写入；事务提交之后的三路
//! 通知（AI分析、确认邮件、支付确认）为尽力而为，互相无顺序
//! 保证，失败只记日志，永不影响已提交的病例。

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use secop_core::store::{CommittedSubmission, NewSubmission, SubmissionStore};
use secop_core::utils::mask_email;
use secop_core::{ContextInfo, MedicalFileDescriptor, PersonalInfo, Result, SecopError};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::duplicate::{DuplicateCheck, DuplicateDetector};
use crate::validation::{SubmissionValidator, ValidationReport};

/// 下游通知接口
///
/// 提交成功后触发的三路扇出，实现方负责实际投递；
/// 编排器只保证调度，不保证送达。
#[async_trait]
pub trait CaseNotifier: Send + Sync {
    /// 触发新病例的AI分析
    async fn notify_ai_analysis(&self, case_id: Uuid) -> anyhow::Result<()>;

    /// 向客户发送受理确认
    async fn notify_acknowledgement(
        &self,
        case_id: Uuid,
        case_number: &str,
        email: &str,
    ) -> anyhow::Result<()>;

    /// 确认支付回执
    async fn notify_payment_confirmation(
        &self,
        case_id: Uuid,
        payment_id: &str,
    ) -> anyhow::Result<()>;
}

/// 完整的提交请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub personal_info: PersonalInfo,
    pub context_info: ContextInfo,
    #[serde(default)]
    pub medical_files: Vec<MedicalFileDescriptor>,
    #[serde(default)]
    pub consent_accepted: bool,
    pub payment_id: Option<String>,
    /// 提交时创建的客户记录是否为注册前的临时记录
    #[serde(default, skip_serializing)]
    pub temporary_customer: bool,
}

/// 只读验证查询（用于表单实时反馈）
#[derive(Debug, Clone, Default)]
pub struct ValidationQuery {
    pub customer_id: Option<Uuid>,
    pub email: Option<String>,
    pub disease_type: Option<String>,
    pub check_duplicates: bool,
    pub duplicate_check_days: Option<u32>,
}

/// 只读验证结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    #[serde(flatten)]
    pub report: ValidationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_check: Option<DuplicateCheck>,
}

/// 提交耗时指标
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMetrics {
    pub validation_ms: u64,
    pub persistence_ms: u64,
    pub total_ms: u64,
    pub warning_count: usize,
}

/// 提交成功结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub case_id: Uuid,
    pub case_number: String,
    pub customer_id: Uuid,
    pub customer_created: bool,
    pub metrics: SubmissionMetrics,
    pub lifecycle_events: Vec<String>,
}

/// 病例提交编排器
pub struct SubmissionOrchestrator<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    validator: SubmissionValidator,
    detector: DuplicateDetector,
}

impl<S, N> SubmissionOrchestrator<S, N>
where
    S: SubmissionStore + 'static,
    N: CaseNotifier + 'static,
{
    /// 创建新的编排器
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            store,
            notifier,
            validator: SubmissionValidator::new(),
            detector: DuplicateDetector::new(),
        }
    }

    /// 提交一个完整的病例
    ///
    /// 验证 → 原子事务 → 提交后扇出。事务失败整体回滚并返回
    /// `Transaction` 错误；扇出失败只记日志。
    pub async fn submit(&self, request: SubmissionRequest) -> Result<SubmissionOutcome> {
        let total_start = Instant::now();
        let mut lifecycle_events = Vec::new();

        // 1. 纵深防御：不信任调用方已做过验证
        let validation_start = Instant::now();
        let report = self.validator.validate_submission(&request);
        if !report.is_valid() {
            return Err(SecopError::Validation(report.errors.join("; ")));
        }
        let validation_ms = validation_start.elapsed().as_millis() as u64;
        lifecycle_events.push("validated".to_string());

        // 验证已保证邮箱与姓名存在
        let email = request
            .personal_info
            .email
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let new_submission = NewSubmission {
            email: email.clone(),
            first_name: request.personal_info.first_name.clone().unwrap_or_default(),
            last_name: request.personal_info.last_name.clone().unwrap_or_default(),
            middle_name: request.personal_info.middle_name.clone(),
            phone: request.personal_info.phone.clone(),
            date_of_birth: request.personal_info.date_of_birth,
            gender: request.personal_info.gender.clone(),
            ethnicity: request.personal_info.ethnicity.clone(),
            context_info: request.context_info.clone(),
            consent_accepted: request.consent_accepted,
            payment_id: request.payment_id.clone(),
            medical_files: request.medical_files.clone(),
            temporary_customer: request.temporary_customer,
        };

        // 2. 原子事务：客户、病例、附件全部落库或全部回滚
        let persistence_start = Instant::now();
        let committed = match self.store.persist_submission(&new_submission).await {
            Ok(committed) => committed,
            Err(SecopError::Database(msg)) => return Err(SecopError::Transaction(msg)),
            Err(e) => return Err(e),
        };
        let persistence_ms = persistence_start.elapsed().as_millis() as u64;
        lifecycle_events.push("transaction_committed".to_string());

        info!(
            "Case {} committed for {}",
            committed.case_number,
            mask_email(&email)
        );

        // 3. 提交后扇出：三路独立通知，互相无顺序保证
        self.dispatch_fanout(&committed, email, request.payment_id.clone());
        lifecycle_events.push("fanout_dispatched".to_string());

        Ok(SubmissionOutcome {
            case_id: committed.case_id,
            case_number: committed.case_number,
            customer_id: committed.customer_id,
            customer_created: committed.customer_created,
            metrics: SubmissionMetrics {
                validation_ms,
                persistence_ms,
                total_ms: total_start.elapsed().as_millis() as u64,
                warning_count: report.warnings.len(),
            },
            lifecycle_events,
        })
    }

    /// 调度提交后的三路通知
    ///
    /// 每一路独立派发，失败只记日志，不重试，不回传给调用方。
    fn dispatch_fanout(
        &self,
        committed: &CommittedSubmission,
        email: String,
        payment_id: Option<String>,
    ) {
        let case_id = committed.case_id;
        let case_number = committed.case_number.clone();

        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify_ai_analysis(case_id).await {
                error!("AI analysis trigger failed for case {}: {}", case_id, e);
            }
        });

        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier
                .notify_acknowledgement(case_id, &case_number, &email)
                .await
            {
                error!("Acknowledgement failed for case {}: {}", case_id, e);
            }
        });

        if let Some(payment_id) = payment_id {
            let notifier = Arc::clone(&self.notifier);
            tokio::spawn(async move {
                if let Err(e) = notifier
                    .notify_payment_confirmation(case_id, &payment_id)
                    .await
                {
                    error!("Payment confirmation failed for case {}: {}", case_id, e);
                }
            });
        }
    }

    /// 只读验证：模式检查 + 尽力而为的重复检测
    ///
    /// 无副作用，可重复调用用于表单实时反馈。
    pub async fn validate(&self, query: &ValidationQuery) -> Result<ValidationOutcome> {
        let mut report = ValidationReport::new();

        match query.email.as_deref() {
            Some(email) if !email.trim().is_empty() => {
                if !self.validator.is_valid_email(email) {
                    report.add_error(format!("Invalid email format: {}", email));
                }
            }
            _ => report.add_error("Email is required".to_string()),
        }

        let mut resolved_customer = None;
        if let Some(customer_id) = query.customer_id {
            match self.store.find_customer_by_id(customer_id).await? {
                Some(customer) => resolved_customer = Some(customer),
                None => report.add_error(format!("Customer not found: {}", customer_id)),
            }
        }

        if let Some(disease_type) = query.disease_type.as_deref() {
            if crate::validation::is_oncological(disease_type) {
                report.add_recommendation(
                    "Consider completing the detailed questionnaire for oncological cases"
                        .to_string(),
                );
            }
        }

        let mut duplicate_check = None;
        if query.check_duplicates {
            if let (Some(customer), Some(disease_type)) =
                (resolved_customer.as_ref(), query.disease_type.as_deref())
            {
                let check = self
                    .detector
                    .check(
                        self.store.as_ref(),
                        customer.id,
                        disease_type,
                        query.duplicate_check_days,
                    )
                    .await;

                if check.has_duplicates {
                    report.add_warning(format!(
                        "Found {} similar case(s) submitted within the last {} days; \
                         submit again only if this is a follow-up",
                        check.duplicate_count, check.window_days
                    ));
                }
                duplicate_check = Some(check);
            }
        }

        Ok(ValidationOutcome {
            report,
            duplicate_check,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use secop_core::case_number::{format_case_number, is_valid_case_number};
    use secop_core::store::DuplicateCandidate;
    use secop_core::{CaseStatus, Customer};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    #[derive(Default)]
    struct MemoryStore {
        customers: RwLock<Vec<Customer>>,
        cases: RwLock<Vec<(Uuid, Uuid, String, DateTime<Utc>)>>,
        file_count: RwLock<usize>,
        statuses: RwLock<HashMap<Uuid, CaseStatus>>,
        sequence: AtomicI64,
        fail_persist: AtomicBool,
        fail_recent_cases: AtomicBool,
    }

    impl MemoryStore {
        async fn seed_customer(&self, email: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.customers.write().await.push(Customer {
                id,
                email: email.to_string(),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                middle_name: None,
                phone: None,
                date_of_birth: None,
                is_temporary: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
            id
        }

        async fn seed_case(&self, customer_id: Uuid, disease_type: &str, days_ago: i64) {
            self.cases.write().await.push((
                Uuid::new_v4(),
                customer_id,
                disease_type.to_string(),
                Utc::now() - Duration::days(days_ago),
            ));
        }
    }

    #[async_trait]
    impl SubmissionStore for MemoryStore {
        async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>> {
            Ok(self
                .customers
                .read()
                .await
                .iter()
                .find(|c| c.email == email)
                .cloned())
        }

        async fn find_customer_by_id(&self, id: Uuid) -> Result<Option<Customer>> {
            Ok(self
                .customers
                .read()
                .await
                .iter()
                .find(|c| c.id == id)
                .cloned())
        }

        async fn recent_cases(
            &self,
            customer_id: Uuid,
            disease_type: &str,
            since: DateTime<Utc>,
        ) -> Result<Vec<DuplicateCandidate>> {
            if self.fail_recent_cases.load(Ordering::SeqCst) {
                return Err(SecopError::Database("connection timed out".to_string()));
            }
            Ok(self
                .cases
                .read()
                .await
                .iter()
                .filter(|(_, cid, dt, created)| {
                    *cid == customer_id && dt == disease_type && *created >= since
                })
                .map(|(case_id, _, _, created)| DuplicateCandidate {
                    case_id: *case_id,
                    created_at: *created,
                })
                .collect())
        }

        async fn persist_submission(
            &self,
            submission: &NewSubmission,
        ) -> Result<CommittedSubmission> {
            // 模拟事务：写入先进暂存副本，提交时才变为可见，
            // 失败时连同已暂存的客户写入一起丢弃
            let mut staged_customers = self.customers.read().await.clone();
            let (customer_id, customer_created) = match staged_customers
                .iter()
                .find(|c| c.email == submission.email)
            {
                Some(customer) => (customer.id, false),
                None => {
                    let id = Uuid::new_v4();
                    staged_customers.push(Customer {
                        id,
                        email: submission.email.clone(),
                        first_name: submission.first_name.clone(),
                        last_name: submission.last_name.clone(),
                        middle_name: submission.middle_name.clone(),
                        phone: submission.phone.clone(),
                        date_of_birth: submission.date_of_birth,
                        is_temporary: submission.temporary_customer,
                        created_at: Utc::now(),
                        updated_at: Utc::now(),
                    });
                    (id, true)
                }
            };

            if self.fail_persist.load(Ordering::SeqCst) {
                return Err(SecopError::Transaction(
                    "injected failure after customer creation".to_string(),
                ));
            }

            let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            let case_number = format_case_number(2026, sequence);
            let case_id = Uuid::new_v4();

            *self.customers.write().await = staged_customers;
            self.cases.write().await.push((
                case_id,
                customer_id,
                submission.context_info.disease_type().to_string(),
                Utc::now(),
            ));
            *self.file_count.write().await += submission.medical_files.len();
            self.statuses
                .write()
                .await
                .insert(case_id, CaseStatus::Submitted);

            Ok(CommittedSubmission {
                customer_id,
                case_id,
                case_number,
                customer_created,
                file_count: submission.medical_files.len(),
            })
        }

        async fn case_status(&self, case_id: Uuid) -> Result<CaseStatus> {
            self.statuses
                .read()
                .await
                .get(&case_id)
                .cloned()
                .ok_or_else(|| SecopError::NotFound(case_id.to_string()))
        }

        async fn update_case_status(&self, case_id: Uuid, status: &CaseStatus) -> Result<()> {
            let mut statuses = self.statuses.write().await;
            match statuses.get_mut(&case_id) {
                Some(current) => {
                    *current = status.clone();
                    Ok(())
                }
                None => Err(SecopError::NotFound(case_id.to_string())),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        ai: AtomicUsize,
        ack: AtomicUsize,
        payment: AtomicUsize,
        fail_all: AtomicBool,
    }

    #[async_trait]
    impl CaseNotifier for RecordingNotifier {
        async fn notify_ai_analysis(&self, _case_id: Uuid) -> anyhow::Result<()> {
            self.ai.fetch_add(1, Ordering::SeqCst);
            if self.fail_all.load(Ordering::SeqCst) {
                anyhow::bail!("ai endpoint down");
            }
            Ok(())
        }

        async fn notify_acknowledgement(
            &self,
            _case_id: Uuid,
            _case_number: &str,
            _email: &str,
        ) -> anyhow::Result<()> {
            self.ack.fetch_add(1, Ordering::SeqCst);
            if self.fail_all.load(Ordering::SeqCst) {
                anyhow::bail!("mail endpoint down");
            }
            Ok(())
        }

        async fn notify_payment_confirmation(
            &self,
            _case_id: Uuid,
            _payment_id: &str,
        ) -> anyhow::Result<()> {
            self.payment.fetch_add(1, Ordering::SeqCst);
            if self.fail_all.load(Ordering::SeqCst) {
                anyhow::bail!("billing endpoint down");
            }
            Ok(())
        }
    }

    fn request(email: &str) -> SubmissionRequest {
        SubmissionRequest {
            personal_info: PersonalInfo {
                first_name: Some("John".to_string()),
                last_name: Some("Doe".to_string()),
                middle_name: Some("M".to_string()),
                email: Some(email.to_string()),
                phone: Some("+49 30 1234567".to_string()),
                date_of_birth: None,
                gender: None,
                ethnicity: None,
            },
            context_info: ContextInfo::Short {
                disease_type: "migraine".to_string(),
                symptoms: None,
                additional_notes: None,
            },
            medical_files: vec![],
            consent_accepted: true,
            payment_id: Some("txn_12345".to_string()),
            temporary_customer: true,
        }
    }

    fn orchestrator(
        store: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
    ) -> SubmissionOrchestrator<MemoryStore, RecordingNotifier> {
        SubmissionOrchestrator::new(store, notifier)
    }

    async fn wait_for_fanout() {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_submit_commits_and_dispatches_fanout() {
        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let orch = orchestrator(Arc::clone(&store), Arc::clone(&notifier));

        let outcome = orch.submit(request("john.doe@example.com")).await.unwrap();
        assert!(is_valid_case_number(&outcome.case_number));
        assert!(outcome.customer_created);
        assert_eq!(
            outcome.lifecycle_events,
            vec!["validated", "transaction_committed", "fanout_dispatched"]
        );

        assert_eq!(store.customers.read().await.len(), 1);
        assert_eq!(store.cases.read().await.len(), 1);

        wait_for_fanout().await;
        assert_eq!(notifier.ai.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.ack.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.payment.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_consent_performs_no_writes() {
        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let orch = orchestrator(Arc::clone(&store), Arc::clone(&notifier));

        let mut req = request("john.doe@example.com");
        req.consent_accepted = false;

        let err = orch.submit(req).await.unwrap_err();
        assert!(matches!(err, SecopError::Validation(_)));

        assert!(store.customers.read().await.is_empty());
        assert!(store.cases.read().await.is_empty());
        assert_eq!(*store.file_count.read().await, 0);

        wait_for_fanout().await;
        assert_eq!(notifier.ai.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transaction_failure_leaves_no_partial_state() {
        let store = Arc::new(MemoryStore::default());
        store.fail_persist.store(true, Ordering::SeqCst);
        let notifier = Arc::new(RecordingNotifier::default());
        let orch = orchestrator(Arc::clone(&store), Arc::clone(&notifier));

        let err = orch.submit(request("john.doe@example.com")).await.unwrap_err();
        assert!(matches!(err, SecopError::Transaction(_)));

        assert!(store.customers.read().await.is_empty());
        assert!(store.cases.read().await.is_empty());
        assert_eq!(*store.file_count.read().await, 0);

        // 事务失败后不得触发任何下游通知
        wait_for_fanout().await;
        assert_eq!(notifier.ai.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.ack.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.payment.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_payment_confirmation_skipped_without_payment_id() {
        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let orch = orchestrator(Arc::clone(&store), Arc::clone(&notifier));

        let mut req = request("john.doe@example.com");
        req.payment_id = None;
        orch.submit(req).await.unwrap();

        wait_for_fanout().await;
        assert_eq!(notifier.ai.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.ack.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.payment.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_fail_submission() {
        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        notifier.fail_all.store(true, Ordering::SeqCst);
        let orch = orchestrator(Arc::clone(&store), Arc::clone(&notifier));

        let outcome = orch.submit(request("john.doe@example.com")).await;
        assert!(outcome.is_ok());
        assert_eq!(store.cases.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_existing_customer_is_reused_by_email() {
        let store = Arc::new(MemoryStore::default());
        store.seed_customer("john.doe@example.com").await;
        let notifier = Arc::new(RecordingNotifier::default());
        let orch = orchestrator(Arc::clone(&store), Arc::clone(&notifier));

        let outcome = orch.submit(request("john.doe@example.com")).await.unwrap();
        assert!(!outcome.customer_created);
        assert_eq!(store.customers.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_validate_flags_duplicates_within_window() {
        let store = Arc::new(MemoryStore::default());
        let customer_id = store.seed_customer("john.doe@example.com").await;
        store.seed_case(customer_id, "migraine", 1).await;
        let notifier = Arc::new(RecordingNotifier::default());
        let orch = orchestrator(Arc::clone(&store), Arc::clone(&notifier));

        let outcome = orch
            .validate(&ValidationQuery {
                customer_id: Some(customer_id),
                email: Some("john.doe@example.com".to_string()),
                disease_type: Some("migraine".to_string()),
                check_duplicates: true,
                duplicate_check_days: Some(7),
            })
            .await
            .unwrap();

        let check = outcome.duplicate_check.unwrap();
        assert!(check.has_duplicates);
        assert_eq!(check.duplicate_count, 1);
        assert!(outcome.report.warnings.iter().any(|w| w.contains("similar case")));
    }

    #[tokio::test]
    async fn test_validate_with_zero_window_disables_check() {
        let store = Arc::new(MemoryStore::default());
        let customer_id = store.seed_customer("john.doe@example.com").await;
        store.seed_case(customer_id, "migraine", 1).await;
        let notifier = Arc::new(RecordingNotifier::default());
        let orch = orchestrator(Arc::clone(&store), Arc::clone(&notifier));

        let outcome = orch
            .validate(&ValidationQuery {
                customer_id: Some(customer_id),
                email: Some("john.doe@example.com".to_string()),
                disease_type: Some("migraine".to_string()),
                check_duplicates: true,
                duplicate_check_days: Some(0),
            })
            .await
            .unwrap();

        let check = outcome.duplicate_check.unwrap();
        assert!(!check.has_duplicates);
        assert_eq!(check.duplicate_count, 0);
    }

    #[tokio::test]
    async fn test_validate_swallows_duplicate_query_failure() {
        let store = Arc::new(MemoryStore::default());
        let customer_id = store.seed_customer("john.doe@example.com").await;
        store.fail_recent_cases.store(true, Ordering::SeqCst);
        let notifier = Arc::new(RecordingNotifier::default());
        let orch = orchestrator(Arc::clone(&store), Arc::clone(&notifier));

        let outcome = orch
            .validate(&ValidationQuery {
                customer_id: Some(customer_id),
                email: Some("john.doe@example.com".to_string()),
                disease_type: Some("migraine".to_string()),
                check_duplicates: true,
                duplicate_check_days: Some(7),
            })
            .await
            .unwrap();

        // 重复检测失败按"未发现重复"报告，不阻断提交
        let check = outcome.duplicate_check.unwrap();
        assert!(!check.has_duplicates);
        assert!(outcome.report.is_valid());
    }

    #[tokio::test]
    async fn test_validate_reports_unknown_customer() {
        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let orch = orchestrator(Arc::clone(&store), Arc::clone(&notifier));

        let outcome = orch
            .validate(&ValidationQuery {
                customer_id: Some(Uuid::new_v4()),
                email: Some("john.doe@example.com".to_string()),
                disease_type: None,
                check_duplicates: false,
                duplicate_check_days: None,
            })
            .await
            .unwrap();

        assert!(!outcome.report.is_valid());
        assert!(outcome.report.errors.iter().any(|e| e.contains("Customer not found")));
    }
}
