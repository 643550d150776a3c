// ==========================================
// CleanCity 巡检后勤系统 - 现场采集会话
// ==========================================
// 流程: 原始检测 → 精度截断 → 范围校验 → 等级判定 → 云端推送 → 本地追加
// 红线: 先按持久化精度截断置信度,再判定等级
// 红线: 越界检测在推送与落盘前拒绝,与离线加载的范围规则一致
// 红线: 推送失败仅告警并标记 NON_SYNCHRONISE,不中断采集
// ==========================================

use crate::capture::error::{CaptureError, CaptureResult};
use crate::capture::sync::DetectionSync;
use crate::domain::detection::DetectionRecord;
use crate::domain::types::{ProcessingStatus, UrgencyTier};
use crate::engine::urgency::UrgencyClassifier;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::DATE_HEURE_FORMAT;
use crate::importer::BatchWriter;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// 坐标持久化精度（小数位）
const COORDINATE_DECIMALS: i32 = 6;

/// 置信度持久化精度（小数位）
const CONFIDENCE_DECIMALS: i32 = 2;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ==========================================
// RawDetection - 模型输出的单个检测
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    #[serde(rename = "type", alias = "anomaly_type")]
    pub anomaly_type: String,
    pub confidence: f64,
    pub latitude: f64,
    pub longitude: f64,
}

// ==========================================
// CaptureSummary - 会话统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaptureSummary {
    pub recorded: usize,
    pub unsynced: usize,
    pub by_tier: BTreeMap<UrgencyTier, usize>,
}

// ==========================================
// CaptureSession - 采集会话
// ==========================================
pub struct CaptureSession {
    classifier: UrgencyClassifier,
    writer: BatchWriter,
    sync: Arc<dyn DetectionSync>,
    summary: CaptureSummary,
}

impl CaptureSession {
    pub fn new(writer: BatchWriter, sync: Arc<dyn DetectionSync>) -> Self {
        Self {
            classifier: UrgencyClassifier::new(),
            writer,
            sync,
            summary: CaptureSummary::default(),
        }
    }

    /// 以追加模式打开批次文件并创建会话
    pub fn open<P: AsRef<Path>>(path: P, sync: Arc<dyn DetectionSync>) -> ImportResult<Self> {
        Ok(Self::new(BatchWriter::open_append(path)?, sync))
    }

    /// 记录一次检测（当前本地时间）
    pub fn record(&mut self, raw: RawDetection) -> CaptureResult<DetectionRecord> {
        self.record_at(raw, Local::now())
    }

    /// 记录一次检测（指定采集时间）
    pub fn record_at(
        &mut self,
        raw: RawDetection,
        at: DateTime<Local>,
    ) -> CaptureResult<DetectionRecord> {
        let anomaly_type = raw.anomaly_type.trim();
        if anomaly_type.is_empty() {
            return Err(CaptureError::EmptyType);
        }

        let confiance = round_to(raw.confidence, CONFIDENCE_DECIMALS);
        let urgence = self.classifier.classify(confiance);

        let mut record = DetectionRecord {
            timestamp: at.timestamp_micros() as f64 / 1_000_000.0,
            date_heure: at.format(DATE_HEURE_FORMAT).to_string(),
            latitude: round_to(raw.latitude, COORDINATE_DECIMALS),
            longitude: round_to(raw.longitude, COORDINATE_DECIMALS),
            anomaly_type: anomaly_type.to_string(),
            confiance,
            urgence: Some(urgence),
            statut: ProcessingStatus::NotProcessed,
        };

        // 按持久化后的取值校验
        if let Some((range, value)) = record.range_violations().into_iter().next() {
            return Err(CaptureError::OutOfRange {
                field: range.field,
                value,
                min: range.min,
                max: range.max,
            });
        }

        match self.sync.push(&record) {
            Ok(()) => debug!(anomaly_type = %record.anomaly_type, tier = %urgence, "已同步"),
            Err(e) => {
                warn!(anomaly_type = %record.anomaly_type, error = %e, "云端同步失败,仅本地保存");
                record.statut = ProcessingStatus::NotSynced;
                self.summary.unsynced += 1;
            }
        }

        self.writer.append(&record)?;

        self.summary.recorded += 1;
        *self.summary.by_tier.entry(urgence).or_insert(0) += 1;

        Ok(record)
    }

    pub fn summary(&self) -> &CaptureSummary {
        &self.summary
    }

    pub fn batch_path(&self) -> &Path {
        self.writer.path()
    }
}
