//! DFT^P03 段构建器
//!
//! 每个构建器把一条患者记录映射为一个定长段，构建过程中校验必需输入。
//! 第一个校验失败即返回错误，由调用方放弃整条消息。

use crate::formatter::{address_composite, format_phone, hl7_date, name_composite};
use crate::segment::{Segment, SegmentType};
use dft_core::{columns, DftConfig, InsuranceTable, PatientRecord, Sex, ValidationError};

/// 消息类型与触发事件
pub const MESSAGE_TYPE: &str = "DFT^P03";

/// HL7版本
pub const VERSION_ID: &str = "2.3";

/// 编码字符
pub const ENCODING_CHARACTERS: &str = "^~\\&";

/// 第一剂对应的操作码，其余一律视为第二剂
pub const FIRST_DOSE_PROCEDURE_CODE: &str = "91300";

/// 未提供时的被保险人关系
pub const DEFAULT_SUBSCRIBER_RELATION: &str = "self";

/// 消息头
pub fn msh(config: &DftConfig, message_time: &str, control_id: &str) -> Segment {
    Segment::from_positions(
        SegmentType::MSH,
        [
            (1, ENCODING_CHARACTERS),
            (2, config.msh.sending_application.as_str()),
            (3, config.msh.sending_facility.as_str()),
            (4, config.msh.receiving_application.as_str()),
            (5, config.msh.receiving_facility.as_str()),
            (6, message_time),
            (8, MESSAGE_TYPE),
            (9, control_id),
            (10, "P"),         // Processing ID
            (11, VERSION_ID),
            (14, "AL"),        // Accept Ack
            (15, "AL"),        // Application Ack
        ],
    )
}

/// 事件类型
pub fn evn(message_time: &str) -> Segment {
    Segment::from_positions(SegmentType::EVN, [(1, MESSAGE_TYPE), (2, message_time)])
}

/// 患者身份
pub fn pid(record: &PatientRecord) -> Result<Segment, ValidationError> {
    let date_of_birth = hl7_date(record.date_of_birth, columns::DATE_OF_BIRTH)?;

    for (column, value) in [
        (columns::ADDRESS_LINE_1, &record.address_line_1),
        (columns::CITY, &record.city),
        (columns::STATE, &record.state),
        (columns::ZIP_CODE, &record.zip_code),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(column.to_string()));
        }
    }

    let address = address_composite(
        &record.address_line_1,
        &record.city,
        &record.state,
        &record.zip_code,
    );
    let phone = format_phone(&record.phone)?;

    Ok(Segment::from_positions(
        SegmentType::PID,
        [
            (1, "1".to_string()),
            (5, name_composite(&record.last_name, &record.first_name)),
            (7, date_of_birth),
            (8, Sex::from_gender(&record.gender).code().to_string()),
            (11, address),
            (13, phone),
        ],
    ))
}

/// 就诊信息，DFT^P03 中不携带患者内容
pub fn pv1() -> Segment {
    Segment::from_positions(SegmentType::PV1, [(1, "1")])
}

/// 剂次描述
pub fn dose_label(procedure_code: &str) -> &'static str {
    if procedure_code.trim() == FIRST_DOSE_PROCEDURE_CODE {
        "1st"
    } else {
        "2nd"
    }
}

/// 财务交易
pub fn ft1(config: &DftConfig, record: &PatientRecord) -> Result<Segment, ValidationError> {
    let transaction_date = hl7_date(record.start_time, columns::START_TIME)?;
    let description = format!(
        "{} {} Dose",
        config.ft1.product_description,
        dose_label(&record.procedure_code)
    );

    Ok(Segment::from_positions(
        SegmentType::FT1,
        [
            (1, "1".to_string()),
            (4, transaction_date),
            (6, "CG".to_string()), // Charge
            (7, format!("{}^{}", record.procedure_code, description)),
            (16, config.ft1.patient_location.clone()),
            (19, config.ft1.diagnosis_code.clone()),
            (20, config.ft1.performed_by_code.clone()),
            (21, config.ft1.ordered_by_code.clone()),
        ],
    ))
}

/// 担保人，与患者身份一致
pub fn gt1(record: &PatientRecord) -> Segment {
    Segment::from_positions(
        SegmentType::GT1,
        [(3, name_composite(&record.last_name, &record.first_name))],
    )
}

/// 保险信息
pub fn in1(record: &PatientRecord, insurance: &InsuranceTable) -> Result<Segment, ValidationError> {
    if !insurance.contains_plan(&record.insurance_plan_id) {
        return Err(ValidationError::InvalidInsurancePlan(
            record.insurance_plan_id.clone(),
        ));
    }

    if !insurance.contains_insurer(&record.primary_insurance_name) {
        return Err(ValidationError::InvalidInsurerName(
            record.primary_insurance_name.clone(),
        ));
    }

    if record.primary_insurance_id.trim().is_empty() {
        return Err(ValidationError::MissingField(
            columns::PRIMARY_INSURANCE_ID.to_string(),
        ));
    }

    let insured_dob = match record.subscriber_dob {
        Some(dob) => hl7_date(Some(dob), columns::SUBSCRIBER_DOB)?,
        None => hl7_date(record.date_of_birth, columns::DATE_OF_BIRTH)?,
    };

    let relation = record
        .subscriber_relation
        .as_deref()
        .map(str::trim)
        .filter(|relation| !relation.is_empty())
        .unwrap_or(DEFAULT_SUBSCRIBER_RELATION);

    Ok(Segment::from_positions(
        SegmentType::IN1,
        [
            (1, "1".to_string()),
            (2, record.insurance_plan_id.clone()),
            (3, record.insurance_plan_id.clone()), // Insurance Company ID
            (4, record.primary_insurance_name.clone()),
            (16, name_composite(&record.last_name, &record.first_name)),
            (17, relation.to_string()),
            (18, insured_dob),
            (36, record.primary_insurance_id.clone()),
        ],
    ))
}
