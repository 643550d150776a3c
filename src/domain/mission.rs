// ==========================================
// CleanCity 巡检后勤系统 - 任务报告实体
// ==========================================
// MissionReport 在组装后不可变，按值交给渲染层
// ==========================================

use crate::domain::material::ConsolidatedMaterialList;
use crate::domain::types::UrgencyTier;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// TierBreakdown - 分级工时明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBreakdown {
    pub tier: UrgencyTier,

    /// 本等级检测数量
    pub detection_count: u32,

    /// 总工时 = 数量 × 单班工时 × 班组人数
    pub total_hours: f64,

    /// 每个点位所需人数
    pub crew_size: u32,

    /// 本等级预算小计（人工 + 物料）
    pub subtotal: f64,
}

// ==========================================
// MissionPlan - 规划结果（工时/预算）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionPlan {
    /// 固定顺序: CRITIQUE → MOYENNE → FAIBLE，数量为 0 的等级省略
    pub tier_breakdowns: Vec<TierBreakdown>,
    pub total_budget: f64,
    pub total_hours: f64,
}

impl MissionPlan {
    pub fn breakdown_for(&self, tier: UrgencyTier) -> Option<&TierBreakdown> {
        self.tier_breakdowns.iter().find(|b| b.tier == tier)
    }

    pub fn detection_count(&self) -> u32 {
        self.tier_breakdowns.iter().map(|b| b.detection_count).sum()
    }
}

// ==========================================
// MissionMeta - 任务元数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionMeta {
    pub mission_id: String,
    pub generated_at: NaiveDateTime,
}

impl MissionMeta {
    /// 生成任务编号: {prefix}-{YYYYMMDD}-{sequence:03}
    pub fn from_identity(prefix: &str, sequence: u32, generated_at: NaiveDateTime) -> Self {
        Self {
            mission_id: format!(
                "{}-{}-{:03}",
                prefix,
                generated_at.format("%Y%m%d"),
                sequence
            ),
            generated_at,
        }
    }
}

// ==========================================
// MissionReport - 任务报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionReport {
    mission_id: String,
    date: NaiveDate,
    time: NaiveTime,
    materials: ConsolidatedMaterialList,
    tier_breakdowns: Vec<TierBreakdown>,
    total_budget: f64,
    total_hours: f64,
    zone_count: u32,
}

impl MissionReport {
    /// 仅由 ReportAssembler 在校验通过后构造
    pub(crate) fn new(
        meta: MissionMeta,
        materials: ConsolidatedMaterialList,
        plan: MissionPlan,
        zone_count: u32,
    ) -> Self {
        Self {
            mission_id: meta.mission_id,
            date: meta.generated_at.date(),
            time: meta.generated_at.time(),
            materials,
            tier_breakdowns: plan.tier_breakdowns,
            total_budget: plan.total_budget,
            total_hours: plan.total_hours,
            zone_count,
        }
    }

    pub fn mission_id(&self) -> &str {
        &self.mission_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn materials(&self) -> &ConsolidatedMaterialList {
        &self.materials
    }

    pub fn tier_breakdowns(&self) -> &[TierBreakdown] {
        &self.tier_breakdowns
    }

    pub fn total_budget(&self) -> f64 {
        self.total_budget
    }

    pub fn total_hours(&self) -> f64 {
        self.total_hours
    }

    pub fn zone_count(&self) -> u32 {
        self.zone_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_id_format() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let meta = MissionMeta::from_identity("MSN", 42, at);
        assert_eq!(meta.mission_id, "MSN-20261019-042");
    }

    #[test]
    fn test_plan_detection_count() {
        let plan = MissionPlan {
            tier_breakdowns: vec![
                TierBreakdown {
                    tier: UrgencyTier::Critical,
                    detection_count: 2,
                    total_hours: 24.0,
                    crew_size: 3,
                    subtotal: 3960.0,
                },
                TierBreakdown {
                    tier: UrgencyTier::Low,
                    detection_count: 1,
                    total_hours: 0.5,
                    crew_size: 1,
                    subtotal: 82.5,
                },
            ],
            total_budget: 4042.5,
            total_hours: 24.5,
        };
        assert_eq!(plan.detection_count(), 3);
        assert!(plan.breakdown_for(UrgencyTier::Medium).is_none());
    }
}
