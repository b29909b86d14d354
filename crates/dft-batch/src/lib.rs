//! # DFT 批处理
//!
//! 读取患者表格与保险参照表，逐条生成 DFT^P03 消息并按全有或全无策略输出：
//! - 控制ID生成（纳秒时间戳，批次内唯一）
//! - 批处理与错误汇总
//! - CSV 输入读取与日期转换
//! - 消息文件与错误报告写出

pub mod control_id;
pub mod dates;
pub mod output;
pub mod processor;
pub mod reader;

pub use control_id::ControlIdGenerator;
pub use output::{BatchOutput, OutputWriter};
pub use processor::{BatchProcessor, BatchResult, RecordError};

use dft_core::{DftConfig, Result};
use std::path::Path;

/// 批次输入
#[derive(Debug, Clone)]
pub struct BatchInput<'a> {
    pub records_path: &'a Path,
    pub insurance_path: &'a Path,
    /// 患者表格表头之前的标题行数
    pub skip_rows: usize,
}

/// 读取输入、处理批次并写出结果
pub fn run(config: &DftConfig, input: &BatchInput<'_>, writer: &OutputWriter) -> Result<BatchOutput> {
    let insurance = reader::read_insurance_table_from_path(input.insurance_path)?;
    let records = reader::read_patient_records_from_path(input.records_path, input.skip_rows)?;

    let result = BatchProcessor::new(config, &insurance).process(&records);
    writer.write(&result)
}
