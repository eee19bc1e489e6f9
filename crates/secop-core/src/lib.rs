//! # SECOP Core
//!
//! 二次诊疗平台的核心模块，提供基础数据结构、错误定义、持久化接口和通用工具。

pub mod case_number;
pub mod error;
pub mod models;
pub mod store;
pub mod utils;

pub use error::{Result, SecopError};
pub use models::*;
pub use store::{CommittedSubmission, DuplicateCandidate, NewSubmission, SubmissionStore};
