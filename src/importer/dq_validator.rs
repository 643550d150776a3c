// ==========================================
// CleanCity 巡检后勤系统 - 数据质量校验器实现
// ==========================================
// 职责: DQ Error/Warning/Info 校验 + DQ 报告生成
// 红线: 持久化的 urgence 不可信,一律以判定器重新计算为准
// ==========================================

use crate::domain::detection::DetectionRecord;
use crate::engine::urgency::UrgencyClassifier;
use crate::importer::importer_trait::DqValidator as DqValidatorTrait;
use serde::{Deserialize, Serialize};

// ==========================================
// DQ 级别 / 违规 / 报告
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    /// 阻断加载
    Error,
    /// 可继续,需提示
    Warning,
    /// 仅记录
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqReport {
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    pub fn from_violations(total_rows: usize, violations: Vec<DqViolation>) -> Self {
        let count = |level: DqLevel| violations.iter().filter(|v| v.level == level).count();
        let summary = DqSummary {
            total_rows,
            errors: count(DqLevel::Error),
            warnings: count(DqLevel::Warning),
            infos: count(DqLevel::Info),
        };
        Self {
            summary,
            violations,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// 首条 Error 级违规
    pub fn first_error(&self) -> Option<&DqViolation> {
        self.violations.iter().find(|v| v.level == DqLevel::Error)
    }

    /// 合并多个批次的报告
    pub fn merge(mut self, other: DqReport) -> Self {
        self.summary.total_rows += other.summary.total_rows;
        self.summary.errors += other.summary.errors;
        self.summary.warnings += other.summary.warnings;
        self.summary.infos += other.summary.infos;
        self.violations.extend(other.violations);
        self
    }
}

// ==========================================
// DqValidator 实现
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DqValidator {
    classifier: UrgencyClassifier,
}

impl DqValidator {
    pub fn new(classifier: UrgencyClassifier) -> Self {
        Self { classifier }
    }

    fn violation(row: usize, level: DqLevel, field: &str, message: String) -> DqViolation {
        DqViolation {
            row_number: row,
            level,
            field: field.to_string(),
            message,
        }
    }

    /// 校验数值范围
    fn validate_ranges(&self, row: usize, record: &DetectionRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        for (range, value) in record.range_violations() {
            violations.push(Self::violation(
                row,
                DqLevel::Error,
                range.field,
                format!("{}超出 [{}, {}]: {}", range.label, range.min, range.max, value),
            ));
        }
        if !record.timestamp.is_finite() || record.timestamp < 0.0 {
            violations.push(Self::violation(
                row,
                DqLevel::Error,
                "timestamp",
                format!("时间戳无效: {}", record.timestamp),
            ));
        }

        violations
    }

    /// 校验持久化等级与重算等级一致
    fn validate_urgency(&self, row: usize, record: &DetectionRecord) -> Option<DqViolation> {
        let recomputed = self.classifier.classify(record.confiance);
        match record.urgence {
            None => Some(Self::violation(
                row,
                DqLevel::Info,
                "urgence",
                format!("等级缺失,按置信度判定为 {}", recomputed),
            )),
            Some(stored) if stored != recomputed => Some(Self::violation(
                row,
                DqLevel::Warning,
                "urgence",
                format!("持久化等级 {} 与重算等级 {} 不一致,以重算为准", stored, recomputed),
            )),
            Some(_) => None,
        }
    }
}

impl DqValidatorTrait for DqValidator {
    fn validate(&self, records: &[(usize, DetectionRecord)]) -> DqReport {
        let mut violations = Vec::new();

        for (row, record) in records {
            if record.anomaly_type.trim().is_empty() {
                violations.push(Self::violation(
                    *row,
                    DqLevel::Error,
                    "type",
                    "异常类型为空".to_string(),
                ));
            }
            violations.extend(self.validate_ranges(*row, record));
            violations.extend(self.validate_urgency(*row, record));
        }

        DqReport::from_violations(records.len(), violations)
    }
}
