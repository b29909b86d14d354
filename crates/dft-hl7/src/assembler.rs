//! 消息组装
//!
//! 按固定顺序调用七个段构建器并以换行连接。构建器返回的校验错误原样向上传递，
//! 由批处理器归属到对应的记录。

use crate::builders;
use crate::segment::{Segment, SEGMENT_SEPARATOR};
use dft_core::{DftConfig, InsuranceTable, PatientRecord, ValidationError};
use std::fmt;
use tracing::debug;

/// 一条完整的 DFT^P03 消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hl7Message {
    pub control_id: String,
    pub message_time: String,
    pub segments: Vec<Segment>,
}

impl Hl7Message {
    /// 段以换行连接，末尾不追加分隔符
    pub fn encode(&self) -> String {
        self.segments
            .iter()
            .map(Segment::encode)
            .collect::<Vec<_>>()
            .join(SEGMENT_SEPARATOR)
    }
}

impl fmt::Display for Hl7Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// 消息组装器
///
/// 持有整个批次共享的只读配置与保险参照表。
pub struct MessageAssembler<'a> {
    config: &'a DftConfig,
    insurance: &'a InsuranceTable,
}

impl<'a> MessageAssembler<'a> {
    pub fn new(config: &'a DftConfig, insurance: &'a InsuranceTable) -> Self {
        Self { config, insurance }
    }

    /// 为一条记录生成消息
    pub fn assemble(
        &self,
        record: &PatientRecord,
        message_time: &str,
        control_id: &str,
    ) -> Result<Hl7Message, ValidationError> {
        debug!("Assembling DFT^P03 message {}", control_id);

        let segments = vec![
            builders::msh(self.config, message_time, control_id),
            builders::evn(message_time),
            builders::pid(record)?,
            builders::pv1(),
            builders::ft1(self.config, record)?,
            builders::gt1(record),
            builders::in1(record, self.insurance)?,
        ];

        Ok(Hl7Message {
            control_id: control_id.to_string(),
            message_time: message_time.to_string(),
            segments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentType;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record() -> PatientRecord {
        PatientRecord {
            last_name: "Smith".to_string(),
            first_name: "John".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1965, 1, 20),
            gender: "male".to_string(),
            address_line_1: "22 Elm Ave".to_string(),
            city: "Liverpool".to_string(),
            state: "NY".to_string(),
            zip_code: "13088".to_string(),
            phone: "(315) 555-0199".to_string(),
            procedure_code: "91301".to_string(),
            start_time: NaiveDate::from_ymd_opt(2021, 4, 1),
            insurance_plan_id: "2002".to_string(),
            primary_insurance_name: "blue cross".to_string(),
            primary_insurance_id: "XJ55".to_string(),
            subscriber_relation: Some("self".to_string()),
            subscriber_dob: None,
        }
    }

    #[test]
    fn test_full_message() {
        let config = DftConfig::default();
        let insurance = InsuranceTable::from_entries([("2002", "BLUE CROSS")]);
        let assembler = MessageAssembler::new(&config, &insurance);

        let message = assembler.assemble(&record(), "202104011200", "42").unwrap();
        let expected = [
            "MSH|^~\\&|MEDENT|Z92|MBAP|MBAP|202104011200||DFT^P03|42|P|2.3|||AL|AL|",
            "EVN|DFT^P03|202104011200",
            "PID|1||||Smith^John||19650120|M|||22 Elm Ave^^Liverpool^NY^13088||(315)555-0199|",
            "PV1|1|||||||",
            "FT1|1|||20210401||CG|91301^Covid-19 Pfizer Vaccine 2nd Dose|||||||||99^^^Onondaga County Health Department^clinic^1^^|||Z23^Encounter for immunization|1568808814^Nguyen^Quoc^V|1568808814^Nguyen^Quoc^V|||||",
            "GT1|||Smith^John|||||",
            "IN1|1|2002|2002|blue cross||||||||||||Smith^John|self|19650120||||||||||||||||||XJ55",
        ]
        .join("\n");

        assert_eq!(message.encode(), expected);
        assert_eq!(message.control_id, "42");
    }

    #[test]
    fn test_segment_order() {
        let config = DftConfig::default();
        let insurance = InsuranceTable::from_entries([("2002", "BLUE CROSS")]);
        let assembler = MessageAssembler::new(&config, &insurance);

        let message = assembler.assemble(&record(), "202104011200", "1").unwrap();
        let order: Vec<SegmentType> = message.segments.iter().map(Segment::segment_type).collect();
        assert_eq!(order, SegmentType::ORDER.to_vec());
        assert_eq!(message.encode().lines().count(), 7);
    }

    #[test]
    fn test_first_failure_aborts_message() {
        let config = DftConfig::default();
        let insurance = InsuranceTable::new();
        let assembler = MessageAssembler::new(&config, &insurance);

        let bad = PatientRecord {
            phone: "12".to_string(),
            ..record()
        };
        // PID 先于 IN1 构建，因此报告电话错误而不是保险错误
        assert_eq!(
            assembler.assemble(&bad, "202104011200", "1"),
            Err(ValidationError::InvalidPhone("12".to_string()))
        );
    }
}
