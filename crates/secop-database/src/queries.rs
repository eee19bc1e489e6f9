//! 数据库查询操作

use crate::connection::DatabasePool;
use crate::models::*;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use secop_core::case_number::format_case_number;
use secop_core::store::{CommittedSubmission, DuplicateCandidate, NewSubmission, SubmissionStore};
use secop_core::{CaseStatus, Customer, Result, SecopError};
use uuid::Uuid;

/// PostgreSQL唯一约束冲突的错误码
fn is_unique_violation(code: Option<&str>) -> bool {
    code == Some("23505")
}

/// 客户插入失败的错误分类
///
/// 并发注册同一邮箱时，事务内的唯一约束冲突必须作为资源冲突
/// 上报（409），其余失败仍按事务失败处理。
fn customer_insert_error(e: sqlx::Error, email: &str) -> SecopError {
    match &e {
        sqlx::Error::Database(db) if is_unique_violation(db.code().as_deref()) => {
            SecopError::DuplicateResource(format!("Email already registered: {}", email))
        }
        _ => SecopError::Transaction(e.to_string()),
    }
}

/// 提交持久化仓库
///
/// `SubmissionStore` 的PostgreSQL实现，病例创建的唯一落库点。
pub struct SubmissionRepository {
    pool: DatabasePool,
}

impl SubmissionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// 创建数据库表
    pub async fn create_tables(&self) -> Result<()> {
        let pool = self.pool.pool();

        // 病例号序列 - 所有入口共用的唯一生成点
        sqlx::query("CREATE SEQUENCE IF NOT EXISTS case_number_seq")
            .execute(pool)
            .await
            .map_err(|e| SecopError::Database(e.to_string()))?;

        // 创建客户表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS customers (
                id UUID PRIMARY KEY,
                email VARCHAR(255) UNIQUE NOT NULL,
                first_name VARCHAR(128) NOT NULL,
                last_name VARCHAR(128) NOT NULL,
                middle_name VARCHAR(128),
                phone VARCHAR(32),
                date_of_birth DATE,
                is_temporary BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )
        "#).execute(pool).await.map_err(|e| SecopError::Database(e.to_string()))?;

        // 创建病例表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS cases (
                id UUID PRIMARY KEY,
                case_number VARCHAR(32) UNIQUE NOT NULL,
                customer_id UUID NOT NULL REFERENCES customers(id),
                disease_type VARCHAR(255) NOT NULL,
                ethnicity VARCHAR(64),
                gender CHAR(1),
                is_first_occurrence BOOLEAN,
                family_history TEXT[] NOT NULL DEFAULT '{}',
                payment_id VARCHAR(64),
                consent_accepted BOOLEAN NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'SUBMITTED',
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )
        "#).execute(pool).await.map_err(|e| SecopError::Database(e.to_string()))?;

        // 创建附件表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS uploaded_files (
                id UUID PRIMARY KEY,
                case_id UUID NOT NULL REFERENCES cases(id),
                file_name VARCHAR(255) NOT NULL,
                storage_key VARCHAR(512) NOT NULL,
                file_size BIGINT NOT NULL,
                mime_type VARCHAR(128) NOT NULL,
                category VARCHAR(128) NOT NULL,
                position INTEGER NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )
        "#).execute(pool).await.map_err(|e| SecopError::Database(e.to_string()))?;

        // 创建索引以优化查询性能
        self.create_indexes().await?;

        tracing::info!("Database tables created successfully");
        Ok(())
    }

    /// 创建数据库索引
    async fn create_indexes(&self) -> Result<()> {
        let pool = self.pool.pool();

        let indexes = vec![
            "CREATE INDEX IF NOT EXISTS idx_customers_email ON customers(email)",
            "CREATE INDEX IF NOT EXISTS idx_cases_customer_id ON cases(customer_id)",
            "CREATE INDEX IF NOT EXISTS idx_cases_case_number ON cases(case_number)",
            "CREATE INDEX IF NOT EXISTS idx_cases_disease_type ON cases(disease_type)",
            "CREATE INDEX IF NOT EXISTS idx_cases_created_at ON cases(created_at)",
            "CREATE INDEX IF NOT EXISTS idx_uploaded_files_case_id ON uploaded_files(case_id)",
        ];

        for index_sql in indexes {
            sqlx::query(index_sql)
                .execute(pool)
                .await
                .map_err(|e| SecopError::Database(e.to_string()))?;
        }

        tracing::info!("Database indexes created successfully");
        Ok(())
    }

    /// 根据病例号查找病例
    pub async fn get_case_by_number(&self, case_number: &str) -> Result<Option<secop_core::Case>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbCase>("SELECT * FROM cases WHERE case_number = $1")
            .bind(case_number)
            .fetch_optional(pool)
            .await
            .map_err(|e| SecopError::Database(e.to_string()))?;

        Ok(result.map(secop_core::Case::from))
    }

    /// 根据病例ID获取全部附件，按提交顺序返回
    pub async fn get_files_by_case_id(&self, case_id: Uuid) -> Result<Vec<secop_core::UploadedFile>> {
        let pool = self.pool.pool();

        let results = sqlx::query_as::<_, DbUploadedFile>(
            "SELECT * FROM uploaded_files WHERE case_id = $1 ORDER BY position",
        )
        .bind(case_id)
        .fetch_all(pool)
        .await
        .map_err(|e| SecopError::Database(e.to_string()))?;

        Ok(results.into_iter().map(secop_core::UploadedFile::from).collect())
    }
}

#[async_trait]
impl SubmissionStore for SubmissionRepository {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbCustomer>("SELECT * FROM customers WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(|e| SecopError::Database(e.to_string()))?;

        Ok(result.map(Customer::from))
    }

    async fn find_customer_by_id(&self, id: Uuid) -> Result<Option<Customer>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbCustomer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| SecopError::Database(e.to_string()))?;

        Ok(result.map(Customer::from))
    }

    async fn recent_cases(
        &self,
        customer_id: Uuid,
        disease_type: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<DuplicateCandidate>> {
        let pool = self.pool.pool();

        let rows: Vec<(Uuid, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT id, created_at FROM cases
            WHERE customer_id = $1 AND disease_type = $2 AND created_at >= $3
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .bind(disease_type)
        .bind(since)
        .fetch_all(pool)
        .await
        .map_err(|e| SecopError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(case_id, created_at)| DuplicateCandidate { case_id, created_at })
            .collect())
    }

    async fn persist_submission(&self, submission: &NewSubmission) -> Result<CommittedSubmission> {
        let mut tx = self
            .pool
            .pool()
            .begin()
            .await
            .map_err(|e| SecopError::Transaction(e.to_string()))?;

        // 1. 客户：按邮箱找或建
        let existing = sqlx::query_as::<_, DbCustomer>("SELECT * FROM customers WHERE email = $1")
            .bind(&submission.email)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| SecopError::Transaction(e.to_string()))?;

        let (customer_id, customer_created) = match existing {
            Some(customer) => {
                if !submission.temporary_customer && customer.is_temporary {
                    // 注册路径消费临时客户记录时升级为正式记录
                    sqlx::query(
                        "UPDATE customers SET is_temporary = FALSE, updated_at = NOW() WHERE id = $1",
                    )
                    .bind(customer.id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| SecopError::Transaction(e.to_string()))?;
                }
                (customer.id, false)
            }
            None => {
                let id = Uuid::new_v4();
                sqlx::query(r#"
                    INSERT INTO customers (id, email, first_name, last_name, middle_name, phone, date_of_birth, is_temporary)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#)
                .bind(id)
                .bind(&submission.email)
                .bind(&submission.first_name)
                .bind(&submission.last_name)
                .bind(&submission.middle_name)
                .bind(&submission.phone)
                .bind(submission.date_of_birth)
                .bind(submission.temporary_customer)
                .execute(&mut *tx)
                .await
                .map_err(|e| customer_insert_error(e, &submission.email))?;
                (id, true)
            }
        };

        // 2. 病例号：序列分配
        let sequence: i64 = sqlx::query_scalar("SELECT nextval('case_number_seq')")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| SecopError::Transaction(e.to_string()))?;
        let case_number = format_case_number(Utc::now().year(), sequence);

        // 3. 病例：人口学与病情字段取提交时刻快照
        let case_id = Uuid::new_v4();
        let family_history: Vec<String> = submission.context_info.family_history().to_vec();
        sqlx::query(r#"
            INSERT INTO cases (id, case_number, customer_id, disease_type, ethnicity, gender,
                               is_first_occurrence, family_history, payment_id, consent_accepted, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'SUBMITTED')
        "#)
        .bind(case_id)
        .bind(&case_number)
        .bind(customer_id)
        .bind(submission.context_info.disease_type())
        .bind(&submission.ethnicity)
        .bind(submission.gender.as_ref().map(gender_to_str))
        .bind(submission.context_info.is_first_occurrence())
        .bind(&family_history)
        .bind(&submission.payment_id)
        .bind(submission.consent_accepted)
        .execute(&mut *tx)
        .await
        .map_err(|e| SecopError::Transaction(e.to_string()))?;

        // 4. 附件：批量写入，position保持提交顺序
        for (position, file) in submission.medical_files.iter().enumerate() {
            sqlx::query(r#"
                INSERT INTO uploaded_files (id, case_id, file_name, storage_key, file_size, mime_type, category, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#)
            .bind(Uuid::new_v4())
            .bind(case_id)
            .bind(&file.name)
            .bind(&file.storage_key)
            .bind(file.size)
            .bind(&file.mime_type)
            .bind(&file.category)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| SecopError::Transaction(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| SecopError::Transaction(e.to_string()))?;

        tracing::info!(
            "Committed submission: case {} for customer {} ({} files, customer_created={})",
            case_number,
            customer_id,
            submission.medical_files.len(),
            customer_created
        );

        Ok(CommittedSubmission {
            customer_id,
            case_id,
            case_number,
            customer_created,
            file_count: submission.medical_files.len(),
        })
    }

    async fn case_status(&self, case_id: Uuid) -> Result<CaseStatus> {
        let pool = self.pool.pool();

        let status: Option<String> = sqlx::query_scalar("SELECT status FROM cases WHERE id = $1")
            .bind(case_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| SecopError::Database(e.to_string()))?;

        match status {
            Some(value) => case_status_from_str(&value).ok_or_else(|| {
                // 已损坏的状态值不得被当作新提交重新进入生命周期
                SecopError::Database(format!(
                    "Unrecognized case status '{}' for case {}",
                    value, case_id
                ))
            }),
            None => Err(SecopError::NotFound(format!("Case {} not found", case_id))),
        }
    }

    async fn update_case_status(&self, case_id: Uuid, status: &CaseStatus) -> Result<()> {
        let pool = self.pool.pool();

        let result = sqlx::query("UPDATE cases SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(case_status_to_str(status))
            .bind(case_id)
            .execute(pool)
            .await
            .map_err(|e| SecopError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(SecopError::NotFound(format!("Case {} not found", case_id)));
        }

        Ok(())
    }
}
