//! HTTP处理器
//!
//! 提交漏斗、验证、提交、注册与状态转换端点。
//! 错误分类到HTTP状态码的映射（§错误口径）也在本文件。

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use secop_core::store::SubmissionStore;
use secop_core::{PersonalInfo, SecopError};
use secop_funnel::TempPayload;
use secop_submission::{CaseEvent, SubmissionRequest, ValidationQuery};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

/// 漏斗会话令牌头
pub const FUNNEL_SESSION_HEADER: &str = "X-Funnel-Session";

/// API错误包装 - 负责错误分类到HTTP状态码的映射
#[derive(Debug)]
pub struct ApiError(pub SecopError);

impl From<SecopError> for ApiError {
    fn from(e: SecopError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self.0 {
            SecopError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            SecopError::DuplicateResource(msg) => (StatusCode::CONFLICT, msg.clone()),
            SecopError::InvalidStateTransition { from, event } => (
                StatusCode::CONFLICT,
                format!("Invalid state transition from {} on {}", from, event),
            ),
            SecopError::SessionExpired(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            SecopError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = Json(json!({
            "error": true,
            "message": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// 从请求头提取漏斗会话令牌
fn session_token(headers: &HeaderMap) -> ApiResult<&str> {
    headers
        .get(FUNNEL_SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            ApiError(SecopError::Validation(format!(
                "Missing {} header",
                FUNNEL_SESSION_HEADER
            )))
        })
}

/// API根路径处理器
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "service": "SECOP Submission API",
        "version": "1.0.0",
        "status": "running",
        "endpoints": {
            "health": "/health",
            "funnel": "/api/v1/funnel/temp",
            "validate": "/api/v1/customer/case-submission/validate",
            "submit": "/api/v1/customer/case-submission/submit"
        }
    }))
}

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": "1.0.0"
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempQuery {
    pub temp_id: Uuid,
}

/// 创建临时提交
pub async fn create_temp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<TempPayload>,
) -> ApiResult<impl IntoResponse> {
    let token = session_token(&headers)?;
    let temp_id = state.temp_store.create(token, payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "tempId": temp_id }))))
}

/// 读取临时提交
pub async fn get_temp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TempQuery>,
) -> ApiResult<impl IntoResponse> {
    let token = session_token(&headers)?;
    let temp = state.temp_store.get(query.temp_id, token).await?;

    Ok(Json(json!({
        "tempId": temp.id,
        "medicalFiles": temp.medical_files,
        "contextInfo": temp.context_info,
        "personalInfo": temp.personal_info,
        "updatedAt": temp.updated_at,
        "expiresAt": temp.expires_at
    })))
}

/// 整体替换临时提交
pub async fn update_temp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TempQuery>,
    Json(payload): Json<TempPayload>,
) -> ApiResult<impl IntoResponse> {
    let token = session_token(&headers)?;
    state.temp_store.update(query.temp_id, token, payload).await?;

    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateParams {
    pub customer_id: Option<Uuid>,
    pub email: Option<String>,
    pub disease_type: Option<String>,
    pub check_duplicates: Option<bool>,
    pub duplicate_check_days: Option<u32>,
}

/// 只读提交验证
pub async fn validate_submission(
    State(state): State<AppState>,
    Query(params): Query<ValidateParams>,
) -> ApiResult<impl IntoResponse> {
    let query = ValidationQuery {
        customer_id: params.customer_id,
        email: params.email,
        disease_type: params.disease_type,
        check_duplicates: params.check_duplicates.unwrap_or(false),
        duplicate_check_days: params.duplicate_check_days,
    };

    let outcome = state.orchestrator.validate(&query).await?;
    let is_valid = outcome.report.is_valid();

    let mut body = serde_json::to_value(&outcome).map_err(SecopError::from)?;
    body["success"] = json!(true);
    body["isValid"] = json!(is_valid);

    Ok(Json(body))
}

/// 提交病例（认证入口）
pub async fn submit_case(
    State(state): State<AppState>,
    Json(mut request): Json<SubmissionRequest>,
) -> ApiResult<impl IntoResponse> {
    request.temporary_customer = false;
    let outcome = state.orchestrator.submit(request).await?;

    let mut body = serde_json::to_value(&outcome).map_err(SecopError::from)?;
    body["success"] = json!(true);

    Ok((StatusCode::CREATED, Json(body)))
}

/// 旧版提交入口
///
/// 与认证入口走同一个编排器，病例号策略保持一致；
/// 提交时创建的客户记录标记为临时记录。
pub async fn legacy_upload_request(
    State(state): State<AppState>,
    Json(mut request): Json<SubmissionRequest>,
) -> ApiResult<impl IntoResponse> {
    request.temporary_customer = true;
    let outcome = state.orchestrator.submit(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "caseId": outcome.case_id,
            "caseNumber": outcome.case_number,
            "message": "Case submitted successfully"
        })),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub temp_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub consent_accepted: bool,
    pub payment_id: Option<String>,
}

/// 注册并消费临时提交
///
/// 已注册（非临时）客户重复注册同一邮箱返回409；
/// 提交成功后临时提交才被删除，验证失败时草稿保持可重试。
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let token = session_token(&headers)?;

    let outcome = perform_registration(
        &state.orchestrator,
        state.store.as_ref(),
        &state.temp_store,
        token,
        request,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "userId": outcome.customer_id,
            "customerId": outcome.customer_id,
            "caseId": outcome.case_id,
            "caseNumber": outcome.case_number
        })),
    ))
}

/// 注册流程：查重 → 读取草稿 → 原子提交 → 消费草稿
///
/// 草稿只读不消费地参与验证与提交；任何验证或事务失败都
/// 保留草稿，调用方可修正后用同一tempId重试。只有提交成功
/// （病例已落库）之后才删除草稿。
async fn perform_registration<S, N>(
    orchestrator: &secop_submission::SubmissionOrchestrator<S, N>,
    store: &S,
    temp_store: &secop_funnel::TempSubmissionStore,
    token: &str,
    request: RegisterRequest,
) -> secop_core::Result<secop_submission::SubmissionOutcome>
where
    S: SubmissionStore + 'static,
    N: secop_submission::CaseNotifier + 'static,
{
    let email = request.email.trim().to_lowercase();
    if let Some(existing) = store.find_customer_by_email(&email).await? {
        if !existing.is_temporary {
            warn!("Registration rejected, email already registered");
            return Err(SecopError::DuplicateResource(format!(
                "Email already registered: {}",
                email
            )));
        }
    }

    let temp = temp_store.get(request.temp_id, token).await?;

    let context_info = temp.context_info.ok_or_else(|| {
        SecopError::Validation("Questionnaire is not complete, finish the funnel first".to_string())
    })?;

    // 注册表单的身份字段覆盖漏斗草稿中的同名字段
    let draft = temp.personal_info.unwrap_or_default();
    let personal_info = PersonalInfo {
        first_name: Some(request.first_name),
        last_name: Some(request.last_name),
        email: Some(email),
        phone: request.phone.or(draft.phone),
        ..draft
    };

    let outcome = orchestrator
        .submit(SubmissionRequest {
            personal_info,
            context_info,
            medical_files: temp.medical_files,
            consent_accepted: request.consent_accepted,
            payment_id: request.payment_id,
            temporary_customer: false,
        })
        .await?;

    // 病例已落库，草稿此后不再需要；并发窗口内被清理也不影响结果
    if let Err(e) = temp_store.consume(request.temp_id, token).await {
        warn!("Temp submission {} gone after commit: {}", request.temp_id, e);
    }

    info!(
        "Registration completed for customer {} with case {}",
        outcome.customer_id, outcome.case_number
    );

    Ok(outcome)
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub event: CaseEvent,
}

/// 病例状态转换（下游服务驱动）
pub async fn update_case_status(
    State(state): State<AppState>,
    Path(case_id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> ApiResult<impl IntoResponse> {
    let current = state.store.case_status(case_id).await?;
    let next = state.state_machine.transition(&current, &request.event)?;
    state.store.update_case_status(case_id, &next).await?;

    info!("Case {} transitioned {:?} -> {:?}", case_id, current, next);

    Ok(Json(json!({ "caseId": case_id, "status": next })))
}
