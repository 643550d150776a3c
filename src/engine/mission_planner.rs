// ==========================================
// CleanCity 巡检后勤系统 - 任务规划引擎
// ==========================================
// 职责: 分级计数 × 成本模型 → 工时 / 预算
// 输入: 检测事件 + 判定器
// 输出: MissionPlan (分级明细 + 总预算 + 总工时)
// ==========================================
// 公式（每个数量 > 0 的等级）:
//   hours    = count × hours_per_crew × crew_size
//   subtotal = count × (hours_per_crew × crew_size × hourly_labor_rate + material_budget)
// ==========================================

use crate::config::cost_model::CostModel;
use crate::domain::detection::DetectionEvent;
use crate::domain::mission::{MissionPlan, TierBreakdown};
use crate::engine::urgency::UrgencyClassifier;
use tracing::instrument;

// ==========================================
// MissionPlanner - 任务规划引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct MissionPlanner {
    cost_model: CostModel,
}

impl MissionPlanner {
    /// 构造函数
    ///
    /// # 参数
    /// - `cost_model`: 已校验的成本模型（含人工小时费率）
    pub fn new(cost_model: CostModel) -> Self {
        Self { cost_model }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成规划结果
    ///
    /// 等级顺序固定为 CRITIQUE → MOYENNE → FAIBLE,数量为 0 的等级省略
    #[instrument(skip_all, fields(count = events.len()))]
    pub fn plan(&self, events: &[DetectionEvent], classifier: &UrgencyClassifier) -> MissionPlan {
        let counts = classifier.tier_counts(events);
        let rate = self.cost_model.hourly_labor_rate;

        let tier_breakdowns: Vec<TierBreakdown> = counts
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(tier, count)| {
                let entry = self.cost_model.cost_of(*tier);
                let n = f64::from(*count);
                TierBreakdown {
                    tier: *tier,
                    detection_count: *count,
                    total_hours: n * entry.staff_hours(),
                    crew_size: entry.crew_size,
                    subtotal: n * (entry.staff_hours() * rate + entry.material_budget),
                }
            })
            .collect();

        let total_budget = tier_breakdowns.iter().fold(0.0, |acc, b| acc + b.subtotal);
        let total_hours = tier_breakdowns.iter().fold(0.0, |acc, b| acc + b.total_hours);

        tracing::debug!(
            tiers = tier_breakdowns.len(),
            total_budget,
            total_hours,
            "工时/预算规划完成"
        );

        MissionPlan {
            tier_breakdowns,
            total_budget,
            total_hours,
        }
    }
}

impl Default for MissionPlanner {
    fn default() -> Self {
        Self::new(CostModel::default())
    }
}
