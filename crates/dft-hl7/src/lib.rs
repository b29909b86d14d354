//! # DFT^P03 编码引擎
//!
//! 把患者就诊记录编码为 HL7 v2.3 DFT^P03 财务交易消息：
//! - 字段格式化（日期、姓名、地址、电话）
//! - 七个定长段的构建与校验（MSH、EVN、PID、PV1、FT1、GT1、IN1）
//! - 按固定顺序组装整条消息

pub mod assembler;
pub mod builders;
pub mod formatter;
pub mod segment;

pub use assembler::{Hl7Message, MessageAssembler};
pub use formatter::DateParts;
pub use segment::{Segment, SegmentType};
