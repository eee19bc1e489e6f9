//! 提交持久化接口
//!
//! 编排器只依赖这个trait，不感知具体数据库；
//! 事务边界由实现方保证（全部落库或全部回滚）。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CaseStatus, ContextInfo, Customer, Gender, MedicalFileDescriptor};

/// 待提交的完整病例数据
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub gender: Option<Gender>,
    pub ethnicity: Option<String>,
    pub context_info: ContextInfo,
    pub consent_accepted: bool,
    pub payment_id: Option<String>,
    pub medical_files: Vec<MedicalFileDescriptor>,
    /// 提交时创建的客户记录是否为临时记录（注册前）
    pub temporary_customer: bool,
}

/// 事务提交成功后的结果
#[derive(Debug, Clone)]
pub struct CommittedSubmission {
    pub customer_id: Uuid,
    pub case_id: Uuid,
    pub case_number: String,
    /// 本次事务是否新建了客户记录（false表示按邮箱复用）
    pub customer_created: bool,
    pub file_count: usize,
}

/// 重复检测候选 - 同客户同疾病类型的既有病例
#[derive(Debug, Clone)]
pub struct DuplicateCandidate {
    pub case_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// 提交持久化接口
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// 按邮箱查找客户
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>>;

    /// 按ID查找客户
    async fn find_customer_by_id(&self, id: Uuid) -> Result<Option<Customer>>;

    /// 查找某客户在给定时间之后创建的同疾病类型病例
    async fn recent_cases(
        &self,
        customer_id: Uuid,
        disease_type: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<DuplicateCandidate>>;

    /// 原子提交：客户（按邮箱找或建）、病例、附件一次事务写入
    ///
    /// 任一步失败必须整体回滚，调用方不会看到部分写入。
    async fn persist_submission(&self, submission: &NewSubmission) -> Result<CommittedSubmission>;

    /// 读取病例当前状态
    async fn case_status(&self, case_id: Uuid) -> Result<CaseStatus>;

    /// 更新病例状态（由下游服务通过状态转换端点驱动）
    async fn update_case_status(&self, case_id: Uuid, status: &CaseStatus) -> Result<()>;
}
