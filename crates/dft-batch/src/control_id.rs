//! 消息控制ID生成
//!
//! 控制ID取纳秒级时间戳。同一时钟刻度内连续生成时在上一个ID基础上加一，
//! 保证批次内严格递增且互不重复。

use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub struct ControlIdGenerator {
    last: Option<i128>,
}

impl ControlIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 基于当前时间生成下一个ID
    pub fn next_id(&mut self) -> String {
        self.next_at(Utc::now())
    }

    /// 基于给定时间生成下一个ID
    pub fn next_at(&mut self, now: DateTime<Utc>) -> String {
        let nanos = i128::from(now.timestamp()) * 1_000_000_000
            + i128::from(now.timestamp_subsec_nanos());

        let id = match self.last {
            Some(last) if nanos <= last => last + 1,
            _ => nanos,
        };
        self.last = Some(id);

        id.to_string()
    }
}
