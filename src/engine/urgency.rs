// ==========================================
// CleanCity 巡检后勤系统 - 紧急等级判定引擎
// ==========================================
// 红线: 紧急等级是"等级制",不是评分制
// 红线: 现场采集与离线报告共用同一判定器,阈值只有一份
// ==========================================
// 职责: 置信度 → 紧急等级
// 输入: 检测置信度 (0~1)
// 输出: UrgencyTier
// ==========================================

use crate::domain::detection::DetectionEvent;
use crate::domain::types::UrgencyTier;
use tracing::instrument;

/// 危急阈值（含下界）
pub const CRITICAL_THRESHOLD: f64 = 0.75;

/// 中等阈值（含下界）
pub const MEDIUM_THRESHOLD: f64 = 0.50;

// ==========================================
// UrgencyClassifier - 紧急等级判定器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct UrgencyClassifier {
    // 无状态引擎,阈值为编译期常量
}

impl UrgencyClassifier {
    /// 创建新的紧急等级判定器
    pub fn new() -> Self {
        Self {}
    }

    /// 判定紧急等级
    ///
    /// 规则（半开区间,边界值归入较高等级）:
    /// 1) confidence >= 0.75 → CRITIQUE
    /// 2) 0.50 <= confidence < 0.75 → MOYENNE
    /// 3) 其他（含 NaN）→ FAIBLE
    pub fn classify(&self, confidence: f64) -> UrgencyTier {
        if confidence >= CRITICAL_THRESHOLD {
            UrgencyTier::Critical
        } else if confidence >= MEDIUM_THRESHOLD {
            UrgencyTier::Medium
        } else {
            UrgencyTier::Low
        }
    }

    /// 判定单个检测事件
    pub fn classify_event(&self, event: &DetectionEvent) -> UrgencyTier {
        self.classify(event.confidence)
    }

    /// 按等级统计检测数量
    ///
    /// 返回: [CRITIQUE, MOYENNE, FAIBLE] 顺序的计数
    #[instrument(skip(self, events), fields(count = events.len()))]
    pub fn tier_counts(&self, events: &[DetectionEvent]) -> [(UrgencyTier, u32); 3] {
        let mut counts = UrgencyTier::REPORT_ORDER.map(|tier| (tier, 0u32));
        for event in events {
            let tier = self.classify_event(event);
            if let Some(slot) = counts.iter_mut().find(|(t, _)| *t == tier) {
                slot.1 += 1;
            }
        }
        counts
    }
}
