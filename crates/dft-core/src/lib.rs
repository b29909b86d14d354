//! # DFT Core
//!
//! DFT^P03 编码系统的核心模块，提供数据模型、错误定义和静态配置。

pub mod config;
pub mod error;
pub mod models;

pub use config::{DftConfig, Ft1Config, MshConfig};
pub use error::{DftError, Result, ValidationError};
pub use models::*;
