//! # SECOP Database
//!
//! PostgreSQL持久化层：连接池、表结构引导、提交事务仓库。

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::DatabasePool;
pub use queries::SubmissionRepository;
