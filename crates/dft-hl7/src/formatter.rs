//! 字段格式化
//!
//! 把单个领域值（日期、姓名、地址、电话）渲染为HL7字段或复合字段字符串。
//! 所有函数无副作用，相同输入总是得到相同输出。

use chrono::{Datelike, NaiveDate};
use dft_core::ValidationError;
use phonenumber::country;
use tracing::{debug, warn};

/// 复合字段分隔符
pub const COMPONENT_SEPARATOR: &str = "^";

/// HL7编码字符，出现在字段值中会破坏消息结构
const DELIMITERS: [char; 5] = ['|', '^', '~', '\\', '&'];

/// 国内有效号码位数（区号3位 + 局号3位 + 线路号4位）
const NATIONAL_NUMBER_DIGITS: usize = 10;

/// 日期的命名分量，月、日补零到两位，年为四位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    pub month: String,
    pub day: String,
    pub year: String,
}

impl DateParts {
    /// 分解日期；`None` 表示输入日期无法解析
    ///
    /// `field` 为出错时报告的字段名。
    pub fn from_date(date: Option<NaiveDate>, field: &str) -> Result<Self, ValidationError> {
        let date = date.ok_or_else(|| ValidationError::InvalidDate(field.to_string()))?;

        Ok(Self {
            month: format!("{:02}", date.month()),
            day: format!("{:02}", date.day()),
            year: format!("{:04}", date.year()),
        })
    }

    /// (月, 日, 年)
    pub fn components(&self) -> (&str, &str, &str) {
        (&self.month, &self.day, &self.year)
    }

    /// HL7日期 `YYYYMMDD`
    pub fn to_hl7(&self) -> String {
        format!("{}{}{}", self.year, self.month, self.day)
    }
}

/// 直接把日期渲染为 `YYYYMMDD`
pub fn hl7_date(date: Option<NaiveDate>, field: &str) -> Result<String, ValidationError> {
    DateParts::from_date(date, field).map(|parts| parts.to_hl7())
}

/// 以美国为缺省地区解析号码，取国内有效号码
///
/// 标点、重复分隔符与分机号由解析器处理；结果不是10位时视为无效。
pub fn national_number(raw: &str) -> Result<String, ValidationError> {
    let number = phonenumber::parse(Some(country::Id::US), raw.trim()).map_err(|e| {
        debug!("Phone number {:?} failed to parse: {}", raw, e);
        ValidationError::InvalidPhone(raw.to_string())
    })?;

    let national = number.national().value().to_string();
    if national.len() != NATIONAL_NUMBER_DIGITS {
        debug!("Phone number {:?} has national number {} of wrong length", raw, national);
        return Err(ValidationError::InvalidPhone(raw.to_string()));
    }

    Ok(national)
}

/// 电话号码编码为 `(NNN)NNN-NNNN`
pub fn format_phone(raw: &str) -> Result<String, ValidationError> {
    let national = national_number(raw)?;
    let (area, rest) = national.split_at(3);
    let (exchange, line) = rest.split_at(3);

    Ok(format!("({area}){exchange}-{line}"))
}

/// 用 `^` 连接子字段
///
/// 不对子字段中的分隔符做转义，只记录警告。
pub fn composite(components: &[&str]) -> String {
    for component in components {
        if component.contains(DELIMITERS) {
            warn!("Field value contains HL7 delimiter characters: {}", component);
        }
    }

    components.join(COMPONENT_SEPARATOR)
}

/// 姓名复合字段 `姓^名`
pub fn name_composite(last_name: &str, first_name: &str) -> String {
    composite(&[last_name, first_name])
}

/// 地址复合字段 `街道^^城市^州^邮编`
pub fn address_composite(street: &str, city: &str, state: &str, zip: &str) -> String {
    composite(&[street, "", city, state, zip])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_date_parts_are_zero_padded() {
        let parts = DateParts::from_date(date(2021, 3, 7), "Start Time").unwrap();
        assert_eq!(parts.components(), ("03", "07", "2021"));
        assert_eq!(parts.to_hl7(), "20210307");
    }

    #[test]
    fn test_date_formatting_is_idempotent() {
        let first = DateParts::from_date(date(1999, 12, 31), "DOB").unwrap();
        let second = DateParts::from_date(date(1999, 12, 31), "DOB").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_hl7(), "19991231");
    }

    #[test]
    fn test_missing_date_is_rejected() {
        assert_eq!(
            hl7_date(None, "Subscriber DOB"),
            Err(ValidationError::InvalidDate("Subscriber DOB".to_string()))
        );
    }

    #[test]
    fn test_phone_formats() {
        for raw in [
            "3155551234",
            "315-555-1234",
            "(315) 555-1234",
            "315.555.1234",
            "+1 315 555 1234",
            "1-315-555-1234",
            " (315)555-1234 ",
        ] {
            assert_eq!(format_phone(raw).unwrap(), "(315)555-1234", "input: {raw}");
        }
    }

    #[test]
    fn test_phone_with_repeated_separators() {
        for raw in ["(315)  555-1234", "315 - 555 - 1234", "315/555/1234"] {
            assert_eq!(format_phone(raw).unwrap(), "(315)555-1234", "input: {raw}");
        }
    }

    #[test]
    fn test_phone_extension_is_dropped() {
        for raw in ["315-555-1234 ext. 12", "+1-315-555-1234x5"] {
            assert_eq!(national_number(raw).unwrap(), "3155551234", "input: {raw}");
            assert_eq!(format_phone(raw).unwrap(), "(315)555-1234", "input: {raw}");
        }
    }

    #[test]
    fn test_invalid_phone() {
        for raw in ["", "abc", "555-1234", "315-555-12345"] {
            assert_eq!(
                format_phone(raw),
                Err(ValidationError::InvalidPhone(raw.to_string())),
                "input: {raw}"
            );
        }
    }

    #[test]
    fn test_composites() {
        assert_eq!(name_composite("Doe", "Jane"), "Doe^Jane");
        assert_eq!(
            address_composite("1 Main St", "Syracuse", "NY", "13202"),
            "1 Main St^^Syracuse^NY^13202"
        );
    }

    #[test]
    fn test_embedded_delimiters_are_not_escaped() {
        assert_eq!(name_composite("O^Brien", "Pat"), "O^Brien^Pat");
    }
}
