// ==========================================
// CleanCity 巡检后勤系统 - 领域类型定义
// ==========================================
// 红线: 紧急等级是"等级制",由置信度唯一决定
// 序列化格式: 法语标签 (与现场采集/出库单一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 紧急等级 (Urgency Tier)
// ==========================================
// 顺序: Low < Medium < Critical
// 出库单中的固定展示顺序: Critical → Medium → Low
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UrgencyTier {
    #[serde(rename = "FAIBLE", alias = "LOW")]
    Low, // 低
    #[serde(rename = "MOYENNE", alias = "MEDIUM")]
    Medium, // 中
    #[serde(rename = "CRITIQUE", alias = "CRITICAL")]
    Critical, // 危急
}

impl UrgencyTier {
    /// 出库单固定顺序（危急优先）
    pub const REPORT_ORDER: [UrgencyTier; 3] =
        [UrgencyTier::Critical, UrgencyTier::Medium, UrgencyTier::Low];

    /// 从字符串解析等级（兼容法语/英语标签，大小写不敏感）
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CRITIQUE" | "CRITICAL" => Some(UrgencyTier::Critical),
            "MOYENNE" | "MEDIUM" => Some(UrgencyTier::Medium),
            "FAIBLE" | "LOW" => Some(UrgencyTier::Low),
            _ => None,
        }
    }

    /// 转换为持久化/出库单使用的标签
    pub fn as_label(&self) -> &'static str {
        match self {
            UrgencyTier::Critical => "CRITIQUE",
            UrgencyTier::Medium => "MOYENNE",
            UrgencyTier::Low => "FAIBLE",
        }
    }

    /// i18n 键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            UrgencyTier::Critical => "tier.critical",
            UrgencyTier::Medium => "tier.medium",
            UrgencyTier::Low => "tier.low",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

// ==========================================
// 处理状态 (Processing Status)
// ==========================================
// 现场记录写入时的状态标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStatus {
    #[serde(rename = "NON_TRAITE", alias = "NOT_PROCESSED")]
    NotProcessed, // 已记录,未处理
    #[serde(rename = "NON_SYNCHRONISE", alias = "NOT_SYNCED")]
    NotSynced, // 已本地记录,云端同步失败
    #[serde(rename = "TRAITE", alias = "PROCESSED")]
    Processed, // 已处理
}

impl ProcessingStatus {
    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "NON_TRAITE" | "NOT_PROCESSED" => Some(ProcessingStatus::NotProcessed),
            "NON_SYNCHRONISE" | "NOT_SYNCED" => Some(ProcessingStatus::NotSynced),
            "TRAITE" | "PROCESSED" => Some(ProcessingStatus::Processed),
            _ => None,
        }
    }

    /// 转换为持久化字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ProcessingStatus::NotProcessed => "NON_TRAITE",
            ProcessingStatus::NotSynced => "NON_SYNCHRONISE",
            ProcessingStatus::Processed => "TRAITE",
        }
    }
}

impl Default for ProcessingStatus {
    fn default() -> Self {
        ProcessingStatus::NotProcessed
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
