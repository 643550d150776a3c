// ==========================================
// CleanCity 巡检后勤系统 - 字段映射器实现
// ==========================================
// 阶段 1: 列名别名识别 + 类型转换
// 标准列: timestamp, date_heure, latitude, longitude,
//         type, confiance, urgence, statut
// 红线: date_heure 为采集端本地时间
// ==========================================

use crate::domain::detection::DetectionRecord;
use crate::domain::types::{ProcessingStatus, UrgencyTier};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;
use crate::importer::importer_trait::FieldMapper as FieldMapperTrait;
use chrono::{DateTime, Local, NaiveDateTime};

/// 持久化时间格式
pub const DATE_HEURE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ===== 列名别名（小写比较,按优先级排列） =====
const TIMESTAMP_ALIASES: &[&str] = &["timestamp", "ts"];
const DATE_HEURE_ALIASES: &[&str] = &["date_heure", "datetime", "date_time"];
const LATITUDE_ALIASES: &[&str] = &["latitude", "lat"];
const LONGITUDE_ALIASES: &[&str] = &["longitude", "lon", "lng"];
const TYPE_ALIASES: &[&str] = &["type", "anomaly_type", "class"];
const CONFIANCE_ALIASES: &[&str] = &["confiance", "confidence", "conf"];
const URGENCE_ALIASES: &[&str] = &["urgence", "urgency"];
const STATUT_ALIASES: &[&str] = &["statut", "status"];

/// 必需列（别名组, 标准名）
const REQUIRED_COLUMNS: &[(&[&str], &str)] = &[
    (TYPE_ALIASES, "type"),
    (CONFIANCE_ALIASES, "confiance"),
    (LATITUDE_ALIASES, "latitude"),
    (LONGITUDE_ALIASES, "longitude"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMapper;

impl FieldMapper {
    /// 按别名优先级查找字段值（空字符串视为缺失）
    fn lookup<'a>(raw: &'a RawRecord, aliases: &[&str]) -> Option<&'a str> {
        aliases.iter().find_map(|alias| {
            raw.fields
                .iter()
                .filter(|(key, value)| {
                    key.trim().to_lowercase() == *alias && !value.trim().is_empty()
                })
                .min_by(|a, b| a.0.cmp(b.0))
                .map(|(_, value)| value.trim())
        })
    }

    fn required<'a>(raw: &'a RawRecord, aliases: &[&str], field: &str) -> ImportResult<&'a str> {
        Self::lookup(raw, aliases).ok_or_else(|| ImportError::RequiredFieldMissing {
            row: raw.row_number,
            field: field.to_string(),
        })
    }

    fn parse_f64(raw: &RawRecord, value: &str, field: &str) -> ImportResult<f64> {
        // 兼容逗号小数点（法语区导出）
        value
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|e| ImportError::TypeConversionError {
                row: raw.row_number,
                field: field.to_string(),
                message: format!("'{}': {}", value, e),
            })
    }

    /// 解析时间: timestamp 与 date_heure 至少一个存在,缺失的一方由另一方推导
    fn parse_time(raw: &RawRecord) -> ImportResult<(f64, String)> {
        let timestamp = match Self::lookup(raw, TIMESTAMP_ALIASES) {
            Some(v) => Some(Self::parse_f64(raw, v, "timestamp")?),
            None => None,
        };
        let date_heure = Self::lookup(raw, DATE_HEURE_ALIASES).map(|s| s.to_string());

        match (timestamp, date_heure) {
            (Some(ts), Some(dh)) => Ok((ts, dh)),
            (Some(ts), None) => {
                let formatted = DateTime::from_timestamp(ts.floor() as i64, 0)
                    .map(|dt| dt.with_timezone(&Local).format(DATE_HEURE_FORMAT).to_string())
                    .unwrap_or_default();
                Ok((ts, formatted))
            }
            (None, Some(dh)) => {
                let parsed = NaiveDateTime::parse_from_str(&dh, DATE_HEURE_FORMAT).map_err(|e| {
                    ImportError::TypeConversionError {
                        row: raw.row_number,
                        field: "date_heure".to_string(),
                        message: format!("'{}': {}", dh, e),
                    }
                })?;
                // 夏令时重叠取较早时刻,跳过的时刻无法定位
                let local = parsed.and_local_timezone(Local).earliest().ok_or_else(|| {
                    ImportError::TypeConversionError {
                        row: raw.row_number,
                        field: "date_heure".to_string(),
                        message: format!("'{}': 本地时间不存在", dh),
                    }
                })?;
                Ok((local.timestamp() as f64, dh))
            }
            (None, None) => Err(ImportError::RequiredFieldMissing {
                row: raw.row_number,
                field: "timestamp".to_string(),
            }),
        }
    }
}

impl FieldMapperTrait for FieldMapper {
    fn check_headers(&self, headers: &[String]) -> ImportResult<()> {
        if headers.is_empty() {
            return Ok(());
        }
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        for (aliases, name) in REQUIRED_COLUMNS {
            if !lowered.iter().any(|h| aliases.contains(&h.as_str())) {
                return Err(ImportError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }

    fn map_record(&self, raw: &RawRecord) -> ImportResult<DetectionRecord> {
        let anomaly_type = Self::required(raw, TYPE_ALIASES, "type")?.to_string();

        let confiance = Self::parse_f64(
            raw,
            Self::required(raw, CONFIANCE_ALIASES, "confiance")?,
            "confiance",
        )?;
        let latitude = Self::parse_f64(
            raw,
            Self::required(raw, LATITUDE_ALIASES, "latitude")?,
            "latitude",
        )?;
        let longitude = Self::parse_f64(
            raw,
            Self::required(raw, LONGITUDE_ALIASES, "longitude")?,
            "longitude",
        )?;

        let (timestamp, date_heure) = Self::parse_time(raw)?;

        // 等级标签无法识别时置空,由 DQ 校验提示
        let urgence = Self::lookup(raw, URGENCE_ALIASES).and_then(UrgencyTier::from_label);

        let statut = Self::lookup(raw, STATUT_ALIASES)
            .and_then(ProcessingStatus::from_str)
            .unwrap_or_default();

        Ok(DetectionRecord {
            timestamp,
            date_heure,
            latitude,
            longitude,
            anomaly_type,
            confiance,
            urgence,
            statut,
        })
    }
}
