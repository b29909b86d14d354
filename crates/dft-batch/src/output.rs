//! 输出写入
//!
//! 成功时每条消息写入一个 `<控制ID>.hl7` 文件；失败时只写错误报告。

use crate::processor::{BatchResult, RecordError};
use dft_core::Result;
use dft_hl7::Hl7Message;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 错误报告缺省文件名
pub const ERROR_REPORT_FILE: &str = "errors.txt";

/// 错误报告表头
pub const ERROR_REPORT_HEADER: &str = "Line #\tError Message\n";

/// 消息文件扩展名
pub const MESSAGE_EXTENSION: &str = "hl7";

/// 写入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutput {
    /// 已写入的消息文件
    Messages(Vec<PathBuf>),
    /// 错误报告路径及错误条数
    ErrorReport { path: PathBuf, error_count: usize },
}

/// 渲染错误报告
pub fn render_error_report(errors: &[RecordError]) -> String {
    let mut report = String::from(ERROR_REPORT_HEADER);
    for error in errors {
        report.push_str(&format!("{error}\n"));
    }
    report
}

/// 输出写入器
pub struct OutputWriter {
    output_dir: PathBuf,
    error_report_path: PathBuf,
}

impl OutputWriter {
    /// 错误报告缺省写入输出目录
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let error_report_path = output_dir.join(ERROR_REPORT_FILE);
        Self {
            output_dir,
            error_report_path,
        }
    }

    pub fn with_error_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_report_path = path.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn error_report_path(&self) -> &Path {
        &self.error_report_path
    }

    /// 按批次结果写出消息文件或错误报告
    pub fn write(&self, result: &BatchResult) -> Result<BatchOutput> {
        match result {
            BatchResult::Accepted(messages) => self.write_messages(messages).map(BatchOutput::Messages),
            BatchResult::Rejected(errors) => {
                self.write_error_report(errors)?;
                Ok(BatchOutput::ErrorReport {
                    path: self.error_report_path.clone(),
                    error_count: errors.len(),
                })
            }
        }
    }

    /// 每条消息一个文件，逐个打开、写入、关闭
    pub fn write_messages(&self, messages: &[Hl7Message]) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;

        let mut written = Vec::with_capacity(messages.len());
        for message in messages {
            let path = self
                .output_dir
                .join(format!("{}.{}", message.control_id, MESSAGE_EXTENSION));
            fs::write(&path, message.encode())?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        info!("Wrote {} messages to {}", written.len(), self.output_dir.display());
        Ok(written)
    }

    pub fn write_error_report(&self, errors: &[RecordError]) -> Result<()> {
        if let Some(parent) = self.error_report_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.error_report_path, render_error_report(errors))?;
        info!(
            "Wrote {} errors to {}",
            errors.len(),
            self.error_report_path.display()
        );
        Ok(())
    }
}
