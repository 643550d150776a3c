// ==========================================
// CleanCity 巡检后勤系统 - 检测事件实体
// ==========================================
// DetectionEvent: 规划引擎的只读输入
// DetectionRecord: 持久化/云端同步的行结构
// ==========================================

use crate::domain::types::{ProcessingStatus, UrgencyTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// DetectionEvent - 检测事件
// ==========================================
// 一次检测到的异常实例，规划引擎只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub anomaly_type: String,
    pub confidence: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// 采集时间（Unix 秒）
    pub timestamp: f64,
}

impl DetectionEvent {
    pub fn new(anomaly_type: &str, confidence: f64, latitude: f64, longitude: f64, timestamp: f64) -> Self {
        Self {
            anomaly_type: anomaly_type.to_string(),
            confidence,
            latitude,
            longitude,
            timestamp,
        }
    }

    /// 采集时间（UTC），时间戳越界时返回 None
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        if !self.timestamp.is_finite() {
            return None;
        }
        let secs = self.timestamp.floor();
        let nanos = ((self.timestamp - secs) * 1e9).round() as u32;
        DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
    }
}

// ==========================================
// FieldRange - 字段取值范围（采集与导入共用）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    /// 持久化列名
    pub field: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    /// NaN 视为越界
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const CONFIDENCE_RANGE: FieldRange = FieldRange {
    field: "confiance",
    label: "置信度",
    min: 0.0,
    max: 1.0,
};

pub const LATITUDE_RANGE: FieldRange = FieldRange {
    field: "latitude",
    label: "纬度",
    min: -90.0,
    max: 90.0,
};

pub const LONGITUDE_RANGE: FieldRange = FieldRange {
    field: "longitude",
    label: "经度",
    min: -180.0,
    max: 180.0,
};

// ==========================================
// DetectionRecord - 检测记录（持久化行）
// ==========================================
// 列顺序与现场采集 CSV 保持一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub timestamp: f64,

    /// 本地时间 (YYYY-MM-DD HH:MM:SS)
    pub date_heure: String,

    pub latitude: f64,
    pub longitude: f64,

    #[serde(rename = "type")]
    pub anomaly_type: String,

    pub confiance: f64,

    /// 持久化的紧急等级，仅供参考，规划时重新计算
    pub urgence: Option<UrgencyTier>,

    pub statut: ProcessingStatus,
}

impl DetectionRecord {
    /// 越界字段及其取值（置信度 / 纬度 / 经度）
    pub fn range_violations(&self) -> Vec<(FieldRange, f64)> {
        [
            (CONFIDENCE_RANGE, self.confiance),
            (LATITUDE_RANGE, self.latitude),
            (LONGITUDE_RANGE, self.longitude),
        ]
        .into_iter()
        .filter(|(range, value)| !range.contains(*value))
        .collect()
    }

    /// 转换为规划引擎输入
    pub fn to_event(&self) -> DetectionEvent {
        DetectionEvent {
            anomaly_type: self.anomaly_type.clone(),
            confidence: self.confiance,
            latitude: self.latitude,
            longitude: self.longitude,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_to_event() {
        let record = DetectionRecord {
            timestamp: 1_700_000_000.5,
            date_heure: "2023-11-14 22:13:20".to_string(),
            latitude: 34.020932,
            longitude: -6.84163,
            anomaly_type: "Pothole".to_string(),
            confiance: 0.81,
            urgence: Some(UrgencyTier::Critical),
            statut: ProcessingStatus::NotProcessed,
        };

        let event = record.to_event();
        assert_eq!(event.anomaly_type, "Pothole");
        assert_eq!(event.confidence, 0.81);
        assert_eq!(event.latitude, 34.020932);
    }

    #[test]
    fn test_range_violations() {
        let mut record = DetectionRecord {
            timestamp: 0.0,
            date_heure: "1970-01-01 00:00:00".to_string(),
            latitude: 34.02,
            longitude: -6.84,
            anomaly_type: "Garbage".to_string(),
            confiance: 1.0,
            urgence: None,
            statut: ProcessingStatus::NotProcessed,
        };
        assert!(record.range_violations().is_empty());

        record.confiance = f64::NAN;
        record.longitude = 180.5;
        let fields: Vec<&str> = record
            .range_violations()
            .iter()
            .map(|(range, _)| range.field)
            .collect();
        assert_eq!(fields, vec!["confiance", "longitude"]);
    }

    #[test]
    fn test_recorded_at() {
        let event = DetectionEvent::new("Garbage", 0.4, 0.0, 0.0, 1_700_000_000.0);
        let at = event.recorded_at().unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);

        let bad = DetectionEvent::new("Garbage", 0.4, 0.0, 0.0, f64::NAN);
        assert!(bad.recorded_at().is_none());
    }
}
