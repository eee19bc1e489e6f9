//! 核心数据模型定义

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 客户记录
///
/// 邮箱是自然外键：一个邮箱最多对应一个客户。
/// 提交时创建的记录标记为 `is_temporary`，注册时升级为正式记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub is_temporary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 性别枚举
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// 病例记录 - 一次二次诊疗请求
///
/// 人口学与病情字段是提交时刻的快照，不回引客户表的可变字段，
/// 保证临床评审看到的是知情同意时的数据。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: Uuid,
    pub case_number: String, // 对外展示的病例号
    pub customer_id: Uuid,
    pub disease_type: String,
    pub ethnicity: Option<String>,
    pub gender: Option<Gender>,
    pub is_first_occurrence: Option<bool>,
    pub family_history: Vec<String>,
    pub payment_id: Option<String>,
    pub consent_accepted: bool,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 病例生命周期状态
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Submitted,   // 已提交
    Processing,  // 处理中
    AiAnalysis,  // AI分析中
    Assigned,    // 已分配专家
    UnderReview, // 评审中
    PeerReview,  // 同行复核
    Completed,   // 已完成
    Delivered,   // 已交付
}

/// 病例附件记录
///
/// 只在病例创建事务内写入；病例存在之后的补充上传走独立的
/// 文档管理路径，不在此模型范围内。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: Uuid,
    pub case_id: Uuid,
    pub file_name: String,
    pub storage_key: String,
    pub file_size: i64,
    pub mime_type: String,
    pub category: String, // 自由文本分类，如 "Doctor's Letter"、"Lab Report"
    pub position: i32,    // 保持提交时的文件顺序
    pub created_at: DateTime<Utc>,
}

/// 上传文件描述符 - 提交载荷中的文件元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalFileDescriptor {
    pub name: String,
    pub size: i64,
    pub mime_type: String,
    pub category: String,
    pub storage_key: String,
}

/// 个人身份信息（提交漏斗中的部分字段）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "dob")]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub ethnicity: Option<String>,
}

/// 问卷上下文信息
///
/// 按 `questionnaire_type` 区分的和类型，每种问卷一个变体，
/// 避免无类型的可选字段袋。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "questionnaireType", rename_all = "snake_case")]
pub enum ContextInfo {
    /// 简短问卷
    Short {
        #[serde(rename = "diseaseType")]
        disease_type: String,
        symptoms: Option<String>,
        #[serde(rename = "additionalNotes")]
        additional_notes: Option<String>,
    },
    /// 详细问卷
    Detailed {
        #[serde(rename = "diseaseType")]
        disease_type: String,
        symptoms: Option<String>,
        #[serde(rename = "diagnosisDate")]
        diagnosis_date: Option<NaiveDate>,
        #[serde(rename = "currentMedications", default)]
        current_medications: Vec<String>,
        #[serde(rename = "priorTreatments", default)]
        prior_treatments: Vec<String>,
        #[serde(rename = "familyHistory", default)]
        family_history: Vec<String>,
        #[serde(rename = "isFirstOccurrence")]
        is_first_occurrence: Option<bool>,
        #[serde(rename = "additionalNotes")]
        additional_notes: Option<String>,
    },
}

impl ContextInfo {
    /// 疾病类型
    pub fn disease_type(&self) -> &str {
        match self {
            Self::Short { disease_type, .. } => disease_type,
            Self::Detailed { disease_type, .. } => disease_type,
        }
    }

    /// 家族病史（简短问卷不采集）
    pub fn family_history(&self) -> &[String] {
        match self {
            Self::Short { .. } => &[],
            Self::Detailed { family_history, .. } => family_history,
        }
    }

    /// 是否首次发病
    pub fn is_first_occurrence(&self) -> Option<bool> {
        match self {
            Self::Short { .. } => None,
            Self::Detailed {
                is_first_occurrence,
                ..
            } => *is_first_occurrence,
        }
    }
}

/// 临时提交 - 匿名可恢复的病例草稿
///
/// 以不透明id寻址，通过会话令牌与匿名浏览器会话关联；
/// 注册消费后删除，过期后 `get` 返回未找到。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempSubmission {
    pub id: Uuid,
    pub session_token: String,
    pub medical_files: Vec<MedicalFileDescriptor>,
    pub context_info: Option<ContextInfo>,
    pub personal_info: Option<PersonalInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
