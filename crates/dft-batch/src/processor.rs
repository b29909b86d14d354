//! 批处理
//!
//! 逐条记录生成消息，收集校验错误而不中断批次。全部记录处理完后做出终态决定：
//! 只要存在一条错误，整个批次的消息全部丢弃，只输出错误报告。

use crate::control_id::ControlIdGenerator;
use chrono::Local;
use dft_core::{DftConfig, InsuranceTable, PatientRecord, ValidationError};
use dft_hl7::{Hl7Message, MessageAssembler};
use std::fmt;
use tracing::{debug, info, warn};

/// 消息时间戳精度到分钟
pub const MESSAGE_TIME_FORMAT: &str = "%Y%m%d%H%M";

/// 源表格中表头占用的行数加上从1开始计数的偏移
pub const LINE_NUMBER_OFFSET: usize = 2;

/// 失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// 记录在输入中的0起始下标
    pub index: usize,
    pub error: ValidationError,
}

impl RecordError {
    /// 错误报告中的行号
    pub fn line_number(&self) -> usize {
        self.index + LINE_NUMBER_OFFSET
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.line_number(), self.error)
    }
}

/// 批次终态结果，二者互斥
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchResult {
    /// 全部记录有效，每条记录一条消息
    Accepted(Vec<Hl7Message>),
    /// 至少一条记录失败，所有消息已丢弃
    Rejected(Vec<RecordError>),
}

impl BatchResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BatchResult::Accepted(_))
    }

    pub fn messages(&self) -> &[Hl7Message] {
        match self {
            BatchResult::Accepted(messages) => messages,
            BatchResult::Rejected(_) => &[],
        }
    }

    pub fn errors(&self) -> &[RecordError] {
        match self {
            BatchResult::Accepted(_) => &[],
            BatchResult::Rejected(errors) => errors,
        }
    }
}

/// 批处理器
pub struct BatchProcessor<'a> {
    assembler: MessageAssembler<'a>,
    control_ids: ControlIdGenerator,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(config: &'a DftConfig, insurance: &'a InsuranceTable) -> Self {
        Self {
            assembler: MessageAssembler::new(config, insurance),
            control_ids: ControlIdGenerator::new(),
        }
    }

    /// 处理单条记录，每条记录独立生成时间戳与控制ID
    pub fn process_record(&mut self, index: usize, record: &PatientRecord) -> Result<Hl7Message, ValidationError> {
        let message_time = Local::now().format(MESSAGE_TIME_FORMAT).to_string();
        let control_id = self.control_ids.next_id();

        let result = self.assembler.assemble(record, &message_time, &control_id);
        match &result {
            Ok(_) => debug!("Record {} encoded as message {}", index, control_id),
            Err(error) => warn!("Record {} rejected ({}): {}", index, error.kind(), error),
        }
        result
    }

    /// 处理整个批次
    pub fn process(&mut self, records: &[PatientRecord]) -> BatchResult {
        info!("Processing batch of {} records", records.len());

        let mut messages = Vec::with_capacity(records.len());
        let mut errors = Vec::new();

        for (index, record) in records.iter().enumerate() {
            match self.process_record(index, record) {
                Ok(message) => messages.push(message),
                Err(error) => errors.push(RecordError { index, error }),
            }
        }

        if errors.is_empty() {
            info!("Batch accepted: {} messages", messages.len());
            BatchResult::Accepted(messages)
        } else {
            warn!(
                "Batch rejected: {} of {} records failed validation, discarding {} messages",
                errors.len(),
                records.len(),
                messages.len()
            );
            BatchResult::Rejected(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn record(last_name: &str) -> PatientRecord {
        PatientRecord {
            last_name: last_name.to_string(),
            first_name: "Alex".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 7, 4),
            gender: "Male".to_string(),
            address_line_1: "5 Oak Rd".to_string(),
            city: "Syracuse".to_string(),
            state: "NY".to_string(),
            zip_code: "13210".to_string(),
            phone: "3155550100".to_string(),
            procedure_code: "91300".to_string(),
            start_time: NaiveDate::from_ymd_opt(2021, 2, 15),
            insurance_plan_id: "1001".to_string(),
            primary_insurance_name: "AETNA".to_string(),
            primary_insurance_id: "A1".to_string(),
            ..Default::default()
        }
    }

    fn insurance() -> InsuranceTable {
        InsuranceTable::from_entries([("1001", "AETNA")])
    }

    #[test]
    fn test_all_valid_records_accepted() {
        let config = DftConfig::default();
        let insurance = insurance();
        let mut processor = BatchProcessor::new(&config, &insurance);

        let records: Vec<PatientRecord> = (0..25).map(|i| record(&format!("Patient{i}"))).collect();
        let result = processor.process(&records);

        assert!(result.is_accepted());
        assert!(result.errors().is_empty());
        assert_eq!(result.messages().len(), 25);

        let ids: HashSet<&str> = result.messages().iter().map(|m| m.control_id.as_str()).collect();
        assert_eq!(ids.len(), 25);

        for message in result.messages() {
            assert_eq!(message.encode().lines().count(), 7);
            assert_eq!(message.message_time.len(), 12);
        }
    }

    #[test]
    fn test_single_failure_rejects_batch() {
        let config = DftConfig::default();
        let insurance = insurance();
        let mut processor = BatchProcessor::new(&config, &insurance);

        let mut records = vec![record("A"), record("B"), record("C"), record("D")];
        records[2].insurance_plan_id = "7777".to_string();

        let result = processor.process(&records);

        assert!(!result.is_accepted());
        assert!(result.messages().is_empty());
        assert_eq!(
            result.errors(),
            &[RecordError {
                index: 2,
                error: ValidationError::InvalidInsurancePlan("7777".to_string()),
            }]
        );
        assert_eq!(result.errors()[0].line_number(), 4);
        assert_eq!(result.errors()[0].to_string(), "4\tInvalid Insurance Plan ID: 7777");
    }

    #[test]
    fn test_every_failure_is_collected() {
        let config = DftConfig::default();
        let insurance = insurance();
        let mut processor = BatchProcessor::new(&config, &insurance);

        let mut records = vec![record("A"), record("B"), record("C")];
        records[0].city = String::new();
        records[2].primary_insurance_name = "aetna".to_string();
        records[2].phone = "none".to_string();

        let result = processor.process(&records);
        let errors = result.errors();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].index, 0);
        assert_eq!(errors[0].error, ValidationError::MissingField("City".to_string()));
        assert_eq!(errors[1].index, 2);
        assert_eq!(errors[1].error, ValidationError::InvalidPhone("none".to_string()));
    }

    #[test]
    fn test_empty_batch_is_accepted() {
        let config = DftConfig::default();
        let insurance = insurance();
        let mut processor = BatchProcessor::new(&config, &insurance);

        assert_eq!(processor.process(&[]), BatchResult::Accepted(Vec::new()));
    }
}
