//! 病例号生成规则
//!
//! 全平台唯一的生成策略：年份前缀 + 持久化序列，
//! 在病例创建的唯一落库点分配，所有入口共用。

/// 格式化病例号，如 `SO-2026-000123`
pub fn format_case_number(year: i32, sequence: i64) -> String {
    format!("SO-{}-{:06}", year, sequence)
}

/// 校验病例号格式
pub fn is_valid_case_number(value: &str) -> bool {
    let mut parts = value.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("SO"), Some(year), Some(seq)) => {
            year.len() == 4
                && year.chars().all(|c| c.is_ascii_digit())
                && seq.len() >= 6
                && seq.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}
