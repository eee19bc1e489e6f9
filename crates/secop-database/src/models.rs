//! 数据库模型

use chrono::{DateTime, NaiveDate, Utc};
use secop_core::models::*;
use sqlx::FromRow;
use uuid::Uuid;

// 数据库表模型 - 使用FromRow trait用于SQL查询

/// 数据库客户表
#[derive(Debug, FromRow)]
pub struct DbCustomer {
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

impl From<DbCustomer> for Customer {
    fn from(db: DbCustomer) -> Self {
        Customer {
            id: db.id,
            email: db.email,
            first_name: db.first_name,
            last_name: db.last_name,
            middle_name: db.middle_name,
            phone: db.phone,
            date_of_birth: db.date_of_birth,
            is_temporary: db.is_temporary,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// 数据库病例表
#[derive(Debug, FromRow)]
pub struct DbCase {
    pub id: Uuid,
    pub case_number: String,
    pub customer_id: Uuid,
    pub disease_type: String,
    pub ethnicity: Option<String>,
    pub gender: Option<String>, // 存储为字符串，转换为Gender枚举
    pub is_first_occurrence: Option<bool>,
    pub family_history: Vec<String>,
    pub payment_id: Option<String>,
    pub consent_accepted: bool,
    pub status: String, // 存储为字符串，转换为CaseStatus枚举
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbCase> for Case {
    fn from(db: DbCase) -> Self {
        Case {
            id: db.id,
            case_number: db.case_number,
            customer_id: db.customer_id,
            disease_type: db.disease_type,
            ethnicity: db.ethnicity,
            gender: db.gender.as_deref().and_then(gender_from_str),
            is_first_occurrence: db.is_first_occurrence,
            family_history: db.family_history,
            payment_id: db.payment_id,
            consent_accepted: db.consent_accepted,
            status: case_status_from_str(&db.status).unwrap_or_else(|| {
                tracing::warn!(
                    "Unrecognized case status '{}' for case {}, treating as SUBMITTED",
                    db.status,
                    db.id
                );
                CaseStatus::Submitted
            }),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// 数据库附件表
#[derive(Debug, FromRow)]
pub struct DbUploadedFile {
    pub id: Uuid,
    pub case_id: Uuid,
    pub file_name: String,
    pub storage_key: String,
    pub file_size: i64,
    pub mime_type: String,
    pub category: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DbUploadedFile> for UploadedFile {
    fn from(db: DbUploadedFile) -> Self {
        UploadedFile {
            id: db.id,
            case_id: db.case_id,
            file_name: db.file_name,
            storage_key: db.storage_key,
            file_size: db.file_size,
            mime_type: db.mime_type,
            category: db.category,
            position: db.position,
            created_at: db.created_at,
        }
    }
}

// 枚举与存储字符串的映射

pub fn gender_to_str(gender: &Gender) -> &'static str {
    match gender {
        Gender::Male => "M",
        Gender::Female => "F",
        Gender::Other => "O",
    }
}

pub fn gender_from_str(value: &str) -> Option<Gender> {
    match value {
        "M" => Some(Gender::Male),
        "F" => Some(Gender::Female),
        "O" => Some(Gender::Other),
        _ => None,
    }
}

pub fn case_status_to_str(status: &CaseStatus) -> &'static str {
    match status {
        CaseStatus::Submitted => "SUBMITTED",
        CaseStatus::Processing => "PROCESSING",
        CaseStatus::AiAnalysis => "AI_ANALYSIS",
        CaseStatus::Assigned => "ASSIGNED",
        CaseStatus::UnderReview => "UNDER_REVIEW",
        CaseStatus::PeerReview => "PEER_REVIEW",
        CaseStatus::Completed => "COMPLETED",
        CaseStatus::Delivered => "DELIVERED",
    }
}

/// 存储字符串到状态的映射，无法识别的值返回None由调用方决断
pub fn case_status_from_str(value: &str) -> Option<CaseStatus> {
    match value {
        "SUBMITTED" => Some(CaseStatus::Submitted),
        "PROCESSING" => Some(CaseStatus::Processing),
        "AI_ANALYSIS" => Some(CaseStatus::AiAnalysis),
        "ASSIGNED" => Some(CaseStatus::Assigned),
        "UNDER_REVIEW" => Some(CaseStatus::UnderReview),
        "PEER_REVIEW" => Some(CaseStatus::PeerReview),
        "COMPLETED" => Some(CaseStatus::Completed),
        "DELIVERED" => Some(CaseStatus::Delivered),
        _ => None,
    }
}
