//! 静态配置
//!
//! 路由标识、诊断码、执行医生等在每条消息中原样写入的常量。
//! 配置在启动时加载一次，之后作为不可变值显式传给消息组装器。

use crate::error::{DftError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, info};

/// 完整配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DftConfig {
    /// MSH段路由配置
    pub msh: MshConfig,
    /// FT1段缺省值
    pub ft1: Ft1Config,
}

/// MSH段路由配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MshConfig {
    /// 发送应用
    pub sending_application: String,
    /// 发送机构（客户代码）
    pub sending_facility: String,
    /// 接收应用
    pub receiving_application: String,
    /// 接收机构
    pub receiving_facility: String,
}

/// FT1段缺省值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ft1Config {
    /// 诊断码
    pub diagnosis_code: String,
    /// 执行医生
    pub performed_by_code: String,
    /// 开单医生
    pub ordered_by_code: String,
    /// 患者位置
    pub patient_location: String,
    /// 交易描述中的产品名称
    pub product_description: String,
}

impl Default for MshConfig {
    fn default() -> Self {
        Self {
            sending_application: "MEDENT".to_string(),
            sending_facility: "Z92".to_string(),
            receiving_application: "MBAP".to_string(),
            receiving_facility: "MBAP".to_string(),
        }
    }
}

impl Default for Ft1Config {
    fn default() -> Self {
        Self {
            diagnosis_code: "Z23^Encounter for immunization".to_string(),
            performed_by_code: "1568808814^Nguyen^Quoc^V".to_string(),
            ordered_by_code: "1568808814^Nguyen^Quoc^V".to_string(),
            patient_location: "99^^^Onondaga County Health Department^clinic^1^^".to_string(),
            product_description: "Covid-19 Pfizer Vaccine".to_string(),
        }
    }
}

/// 校验规则
struct ValidationRule {
    /// 字段路径
    field_path: &'static str,
    /// 取值函数
    value: fn(&DftConfig) -> &str,
}

const VALIDATION_RULES: &[ValidationRule] = &[
    ValidationRule { field_path: "msh.sending_application", value: |c| c.msh.sending_application.as_str() },
    ValidationRule { field_path: "msh.sending_facility", value: |c| c.msh.sending_facility.as_str() },
    ValidationRule { field_path: "msh.receiving_application", value: |c| c.msh.receiving_application.as_str() },
    ValidationRule { field_path: "msh.receiving_facility", value: |c| c.msh.receiving_facility.as_str() },
    ValidationRule { field_path: "ft1.diagnosis_code", value: |c| c.ft1.diagnosis_code.as_str() },
    ValidationRule { field_path: "ft1.performed_by_code", value: |c| c.ft1.performed_by_code.as_str() },
    ValidationRule { field_path: "ft1.ordered_by_code", value: |c| c.ft1.ordered_by_code.as_str() },
    ValidationRule { field_path: "ft1.product_description", value: |c| c.ft1.product_description.as_str() },
];

impl DftConfig {
    /// 加载配置：内置缺省值，其次配置文件，最后 `DFT_` 前缀的环境变量
    ///
    /// 环境变量的层级分隔符为 `__`，例如 `DFT_MSH__SENDING_FACILITY`。
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("DFT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: DftConfig = settings.try_deserialize()?;
        config.validate()?;

        match config_path {
            Some(path) => info!("Configuration loaded from: {}", path.display()),
            None => info!("Configuration loaded from defaults and environment"),
        }

        Ok(config)
    }

    /// 校验配置，标识字段不得为空
    pub fn validate(&self) -> Result<()> {
        for rule in VALIDATION_RULES {
            if (rule.value)(self).trim().is_empty() {
                error!("Configuration validation failed for {}", rule.field_path);
                return Err(DftError::Config(format!("{} cannot be empty", rule.field_path)));
            }
        }
        Ok(())
    }
}
