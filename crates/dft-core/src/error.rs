//! 错误定义模块

use thiserror::Error;

/// 单条记录的校验错误
///
/// 只中止当前记录的消息构建，由批处理器收集后继续处理下一条记录。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("{0} empty")]
    MissingField(String),

    #[error("Invalid Insurance Plan ID: {0}")]
    InvalidInsurancePlan(String),

    #[error("Invalid Primary Insurance Name: {0}")]
    InvalidInsurerName(String),
}

impl ValidationError {
    /// 错误类别名称，用于日志
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::InvalidDate(_) => "InvalidDate",
            ValidationError::InvalidPhone(_) => "InvalidPhone",
            ValidationError::MissingField(_) => "MissingField",
            ValidationError::InvalidInsurancePlan(_) => "InvalidInsurancePlan",
            ValidationError::InvalidInsurerName(_) => "InvalidInsurerName",
        }
    }
}

/// 系统统一错误类型
#[derive(Error, Debug)]
pub enum DftError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("输入格式错误: {0}")]
    Input(String),

    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
}

impl From<config::ConfigError> for DftError {
    fn from(err: config::ConfigError) -> Self {
        DftError::Config(err.to_string())
    }
}

/// 系统统一结果类型
pub type Result<T> = std::result::Result<T, DftError>;
