//! HL7段模型
//!
//! 段是定长的位置字段数组，位置0固定为段类型标签，未填充的位置为空字符串。

use std::fmt;
use tracing::warn;

/// 字段分隔符
pub const FIELD_SEPARATOR: &str = "|";

/// 段分隔符
pub const SEGMENT_SEPARATOR: &str = "\n";

/// DFT^P03 消息使用的段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentType {
    MSH,
    EVN,
    PID,
    PV1,
    FT1,
    GT1,
    IN1,
}

impl SegmentType {
    /// 消息中的段顺序
    pub const ORDER: [SegmentType; 7] = [
        SegmentType::MSH,
        SegmentType::EVN,
        SegmentType::PID,
        SegmentType::PV1,
        SegmentType::FT1,
        SegmentType::GT1,
        SegmentType::IN1,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            SegmentType::MSH => "MSH",
            SegmentType::EVN => "EVN",
            SegmentType::PID => "PID",
            SegmentType::PV1 => "PV1",
            SegmentType::FT1 => "FT1",
            SegmentType::GT1 => "GT1",
            SegmentType::IN1 => "IN1",
        }
    }

    /// 段的固定字段数（含位置0的标签）
    pub fn width(&self) -> usize {
        match self {
            SegmentType::MSH => 17,
            SegmentType::EVN => 3,
            SegmentType::PID => 15,
            SegmentType::PV1 => 9,
            SegmentType::FT1 => 27,
            SegmentType::GT1 => 9,
            SegmentType::IN1 => 37,
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 把稀疏的 位置→值 映射展开为定长数组，未设置的位置填 `fill`
///
/// 超出 `width` 的位置被丢弃并记录警告。
pub fn field_list<I, S>(populated: I, width: usize, fill: &str) -> Vec<String>
where
    I: IntoIterator<Item = (usize, S)>,
    S: Into<String>,
{
    let mut fields = vec![fill.to_string(); width];
    for (position, value) in populated {
        match fields.get_mut(position) {
            Some(slot) => *slot = value.into(),
            None => warn!("Field position {} outside segment width {}", position, width),
        }
    }
    fields
}

/// 已渲染的HL7段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    segment_type: SegmentType,
    fields: Vec<String>,
}

impl Segment {
    /// 由稀疏映射构建段，位置0自动写入段标签
    pub fn from_positions<I, S>(segment_type: SegmentType, populated: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        let mut fields = field_list(populated, segment_type.width(), "");
        fields[0] = segment_type.tag().to_string();

        Self {
            segment_type,
            fields,
        }
    }

    pub fn segment_type(&self) -> SegmentType {
        self.segment_type
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// 取指定位置的字段
    pub fn field(&self, position: usize) -> Option<&str> {
        self.fields.get(position).map(String::as_str)
    }

    /// 以 `|` 连接所有字段
    pub fn encode(&self) -> String {
        self.fields.join(FIELD_SEPARATOR)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
