//! 表格输入读取
//!
//! 从CSV读取患者记录和保险参照表。所有单元格去除首尾空白，日期列转换为日期值。

use crate::dates::coerce_date;
use csv::{ReaderBuilder, Trim};
use dft_core::{DftError, InsuranceTable, PatientRecord, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// 患者表格中的一行原始数据
#[derive(Debug, Deserialize)]
struct PatientRow {
    #[serde(rename = "Last Name")]
    last_name: String,
    #[serde(rename = "First Name")]
    first_name: String,
    #[serde(rename = "Date of Birth (mm/dd/yyyy)")]
    date_of_birth: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Address Line 1")]
    address_line_1: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Zip Code")]
    zip_code: String,
    #[serde(rename = "Phone")]
    phone: String,
    #[serde(rename = "Procedure Code")]
    procedure_code: String,
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "Insurance Plan ID")]
    insurance_plan_id: String,
    #[serde(rename = "Primary Insurance Name")]
    primary_insurance_name: String,
    #[serde(rename = "Primary Insurance ID #")]
    primary_insurance_id: String,
    #[serde(rename = "Subscriber Relation to Patient", default)]
    subscriber_relation: String,
    #[serde(rename = "Subscriber DOB", default)]
    subscriber_dob: String,
}

impl From<PatientRow> for PatientRecord {
    fn from(row: PatientRow) -> Self {
        PatientRecord {
            last_name: row.last_name,
            first_name: row.first_name,
            date_of_birth: coerce_date(&row.date_of_birth),
            gender: row.gender,
            address_line_1: row.address_line_1,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            phone: row.phone,
            procedure_code: row.procedure_code,
            start_time: coerce_date(&row.start_time),
            insurance_plan_id: row.insurance_plan_id,
            primary_insurance_name: row.primary_insurance_name,
            primary_insurance_id: row.primary_insurance_id,
            subscriber_relation: Some(row.subscriber_relation).filter(|value| !value.is_empty()),
            subscriber_dob: coerce_date(&row.subscriber_dob),
        }
    }
}

/// 保险参照表中的一行，其余列忽略
#[derive(Debug, Deserialize)]
struct InsuranceRow {
    #[serde(rename = "Num")]
    num: String,
    #[serde(rename = "Name")]
    name: String,
}

fn input_error(source: &str, err: csv::Error) -> DftError {
    DftError::Input(format!("{source}: {err}"))
}

/// 跳过表头之前的标题行
fn skip_lines<R: BufRead>(reader: &mut R, count: usize) -> Result<()> {
    let mut line = String::new();
    for _ in 0..count {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
    }
    Ok(())
}

/// 读取患者记录
///
/// `skip_rows` 为表头之前需要丢弃的行数。
pub fn read_patient_records<R: Read>(reader: R, skip_rows: usize, source: &str) -> Result<Vec<PatientRecord>> {
    let mut reader = BufReader::new(reader);
    skip_lines(&mut reader, skip_rows)?;

    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<PatientRow>() {
        let row = row.map_err(|err| input_error(source, err))?;
        records.push(PatientRecord::from(row));
    }

    debug!("Read {} patient records from {}", records.len(), source);
    Ok(records)
}

pub fn read_patient_records_from_path(path: &Path, skip_rows: usize) -> Result<Vec<PatientRecord>> {
    let file = File::open(path)?;
    let records = read_patient_records(file, skip_rows, &path.display().to_string())?;
    info!("Loaded {} patient records from {}", records.len(), path.display());
    Ok(records)
}

/// 读取保险参照表
pub fn read_insurance_table<R: Read>(reader: R, source: &str) -> Result<InsuranceTable> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut table = InsuranceTable::new();
    for row in csv_reader.deserialize::<InsuranceRow>() {
        let row = row.map_err(|err| input_error(source, err))?;
        table.insert(&row.num, &row.name);
    }

    Ok(table)
}

pub fn read_insurance_table_from_path(path: &Path) -> Result<InsuranceTable> {
    let file = File::open(path)?;
    let table = read_insurance_table(file, &path.display().to_string())?;
    info!("Loaded {} insurance plans from {}", table.plan_count(), path.display());
    Ok(table)
}
