//! 核心数据模型定义

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 输入表格列名，同时用作校验错误中的字段名
pub mod columns {
    pub const LAST_NAME: &str = "Last Name";
    pub const FIRST_NAME: &str = "First Name";
    pub const DATE_OF_BIRTH: &str = "Date of Birth (mm/dd/yyyy)";
    pub const GENDER: &str = "Gender";
    pub const ADDRESS_LINE_1: &str = "Address Line 1";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const ZIP_CODE: &str = "Zip Code";
    pub const PHONE: &str = "Phone";
    pub const PROCEDURE_CODE: &str = "Procedure Code";
    pub const START_TIME: &str = "Start Time";
    pub const INSURANCE_PLAN_ID: &str = "Insurance Plan ID";
    pub const PRIMARY_INSURANCE_NAME: &str = "Primary Insurance Name";
    pub const PRIMARY_INSURANCE_ID: &str = "Primary Insurance ID #";
    pub const SUBSCRIBER_RELATION: &str = "Subscriber Relation to Patient";
    pub const SUBSCRIBER_DOB: &str = "Subscriber DOB";

    /// 保险参照表
    pub const PLAN_NUM: &str = "Num";
    pub const PLAN_NAME: &str = "Name";
}

/// 患者就诊记录（输入表格中的一行）
///
/// 日期字段为 `None` 表示输入中的日期无法解析，由字段格式化阶段拒绝。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub last_name: String,
    pub first_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub address_line_1: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub procedure_code: String,
    pub start_time: Option<NaiveDate>,
    pub insurance_plan_id: String,
    pub primary_insurance_name: String,
    pub primary_insurance_id: String,
    pub subscriber_relation: Option<String>,
    pub subscriber_dob: Option<NaiveDate>,
}

/// 性别编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// 只有 `male`（不区分大小写）映射为男性，其余一律为女性
    pub fn from_gender(gender: &str) -> Self {
        if gender.trim().eq_ignore_ascii_case("male") {
            Sex::Male
        } else {
            Sex::Female
        }
    }

    /// HL7 性别代码
    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

/// 有效保险计划参照表
///
/// 计划编号与保险公司名称分别校验；名称统一以大写存储。
#[derive(Debug, Clone, Default)]
pub struct InsuranceTable {
    plan_ids: HashSet<String>,
    names: HashSet<String>,
}

impl InsuranceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 (计划编号, 保险公司名称) 列表构建
    pub fn from_entries<I, S1, S2>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S1, S2)>,
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let mut table = Self::new();
        for (plan_id, name) in entries {
            table.insert(plan_id.as_ref(), name.as_ref());
        }
        table
    }

    pub fn insert(&mut self, plan_id: &str, name: &str) {
        let plan_id = plan_id.trim();
        let name = name.trim();
        if !plan_id.is_empty() {
            self.plan_ids.insert(plan_id.to_string());
        }
        if !name.is_empty() {
            self.names.insert(name.to_uppercase());
        }
    }

    pub fn contains_plan(&self, plan_id: &str) -> bool {
        self.plan_ids.contains(plan_id.trim())
    }

    /// 名称比较不区分大小写
    pub fn contains_insurer(&self, name: &str) -> bool {
        self.names.contains(&name.trim().to_uppercase())
    }

    pub fn plan_count(&self) -> usize {
        self.plan_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plan_ids.is_empty() && self.names.is_empty()
    }
}
