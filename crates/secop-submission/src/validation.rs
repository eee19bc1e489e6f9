//! 提交验证规则
//!
//! 在任何持久化发生前执行的模式检查与业务规则检查。
//! 纯读取与报告，无副作用，可用于表单实时反馈的重复调用。

use regex::Regex;
use serde::Serialize;

use crate::orchestrator::SubmissionRequest;

/// 验证结果
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: String) {
        self.errors.push(message);
    }

    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    pub fn add_recommendation(&mut self, message: String) {
        self.recommendations.push(message);
    }

    /// 硬错误为空即有效；警告不阻断提交
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// 判断疾病类型是否属于肿瘤类
pub fn is_oncological(disease_type: &str) -> bool {
    const ONCOLOGICAL_KEYWORDS: [&str; 8] = [
        "cancer",
        "tumor",
        "tumour",
        "carcinoma",
        "sarcoma",
        "lymphoma",
        "leukemia",
        "melanoma",
    ];

    let lowered = disease_type.to_lowercase();
    ONCOLOGICAL_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// 提交验证器
pub struct SubmissionValidator {
    email_re: Regex,
}

impl Default for SubmissionValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionValidator {
    /// 创建新的验证器
    pub fn new() -> Self {
        Self {
            // 正则不可能编译失败，模式为常量
            email_re: Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap(),
        }
    }

    /// 邮箱格式检查
    pub fn is_valid_email(&self, email: &str) -> bool {
        self.email_re.is_match(email)
    }

    /// 验证完整提交载荷
    pub fn validate_submission(&self, request: &SubmissionRequest) -> ValidationReport {
        let mut report = ValidationReport::new();

        // 1. 身份字段
        self.validate_identity(request, &mut report);

        // 2. 知情同意
        self.validate_consent(request, &mut report);

        // 3. 问卷上下文
        self.validate_context(request, &mut report);

        // 4. 附件描述符
        self.validate_files(request, &mut report);

        tracing::debug!(
            "Submission validated: {} errors, {} warnings",
            report.errors.len(),
            report.warnings.len()
        );

        report
    }

    /// 验证身份字段
    fn validate_identity(&self, request: &SubmissionRequest, report: &mut ValidationReport) {
        let info = &request.personal_info;

        match info.email.as_deref() {
            Some(email) if !email.trim().is_empty() => {
                if !self.is_valid_email(email) {
                    report.add_error(format!("Invalid email format: {}", email));
                }
            }
            _ => report.add_error("Email is required".to_string()),
        }

        if info.first_name.as_deref().map_or(true, |v| v.trim().is_empty()) {
            report.add_error("First name is required".to_string());
        }
        if info.last_name.as_deref().map_or(true, |v| v.trim().is_empty()) {
            report.add_error("Last name is required".to_string());
        }

        if info.phone.as_deref().map_or(true, |v| v.trim().is_empty()) {
            report.add_warning(
                "Phone number is missing; we may be unable to reach you quickly".to_string(),
            );
        }
        if info.middle_name.is_none() {
            report.add_warning("Middle name is missing".to_string());
        }
    }

    /// 验证知情同意
    fn validate_consent(&self, request: &SubmissionRequest, report: &mut ValidationReport) {
        if !request.consent_accepted {
            report.add_error("Consent must be accepted before submission".to_string());
        }
    }

    /// 验证问卷上下文
    fn validate_context(&self, request: &SubmissionRequest, report: &mut ValidationReport) {
        let disease_type = request.context_info.disease_type();
        if disease_type.trim().is_empty() {
            report.add_error("Disease type is required".to_string());
            return;
        }

        if is_oncological(disease_type) {
            if request.context_info.family_history().is_empty() {
                report.add_warning(
                    "Family history is recommended for oncological disease types".to_string(),
                );
            }
            if matches!(request.context_info, secop_core::ContextInfo::Short { .. }) {
                report.add_recommendation(
                    "Consider completing the detailed questionnaire for oncological cases"
                        .to_string(),
                );
            }
        }
    }

    /// 验证附件描述符
    fn validate_files(&self, request: &SubmissionRequest, report: &mut ValidationReport) {
        for (index, file) in request.medical_files.iter().enumerate() {
            if file.name.trim().is_empty() {
                report.add_error(format!("Medical file #{}: name is missing", index + 1));
            }
            if file.storage_key.trim().is_empty() {
                report.add_error(format!("Medical file #{}: storage key is missing", index + 1));
            }
            if file.mime_type.trim().is_empty() {
                report.add_error(format!("Medical file #{}: mime type is missing", index + 1));
            }
            if file.category.trim().is_empty() {
                report.add_error(format!("Medical file #{}: category is missing", index + 1));
            }
            if file.size <= 0 {
                report.add_error(format!("Medical file #{}: size must be positive", index + 1));
            }
        }

        if request.medical_files.is_empty() {
            report.add_recommendation(
                "Attaching a doctor's letter or recent lab report speeds up the review".to_string(),
            );
        }
    }
}
