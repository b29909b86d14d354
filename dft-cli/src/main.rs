//! DFT^P03 批量编码程序

use anyhow::{Context, Result};
use clap::Parser;
use dft_batch::output::ERROR_REPORT_FILE;
use dft_batch::{BatchInput, BatchOutput, OutputWriter};
use dft_core::DftConfig;
use std::path::PathBuf;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "dft-encoder")]
#[command(about = "Convert patient visit records into HL7 v2.3 DFT^P03 messages")]
struct Args {
    /// 患者记录表格 (CSV)
    input_records: PathBuf,

    /// 保险计划参照表 (CSV, 列 Num/Name)
    insurance_ids: PathBuf,

    /// 消息输出目录
    output_dir: PathBuf,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 错误报告路径，相对路径以当前工作目录为基准
    #[arg(short, long, default_value = ERROR_REPORT_FILE)]
    error_report: PathBuf,

    /// 患者表格表头之前的标题行数，导出表格第一行为标题
    #[arg(long, default_value_t = 1)]
    skip_rows: usize,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(&args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = DftConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    let writer = OutputWriter::new(&args.output_dir).with_error_report_path(&args.error_report);

    let input = BatchInput {
        records_path: &args.input_records,
        insurance_path: &args.insurance_ids,
        skip_rows: args.skip_rows,
    };

    info!("Encoding {}", args.input_records.display());
    let output = dft_batch::run(&config, &input, &writer)
        .with_context(|| format!("Failed to process {}", args.input_records.display()))?;

    match output {
        BatchOutput::Messages(paths) => {
            println!("{} messages written to {}", paths.len(), args.output_dir.display());
        }
        BatchOutput::ErrorReport { path, error_count } => {
            println!("{} errors found. Check {} for details.", error_count, path.display());
        }
    }

    Ok(())
}
