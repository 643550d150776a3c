// ==========================================
// CleanCity 巡检后勤系统 - 任务报告组装器
// ==========================================
// 红线: 报告一经组装不可变
// 红线: 校验失败时返回错误,不产出部分报告
// ==========================================
// 职责: 物料汇总 + 工时预算 + 任务元数据 → MissionReport
// 说明: 金额/坐标的显示精度属于展示层,报告保留完整精度
// ==========================================

use crate::config::planning_config::EmptyBatchPolicy;
use crate::domain::detection::DetectionEvent;
use crate::domain::material::ConsolidatedMaterialList;
use crate::domain::mission::{MissionMeta, MissionPlan, MissionReport};
use crate::engine::error::{PlanningError, PlanningResult};

// ==========================================
// ReportAssembler - 任务报告组装器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler {
    empty_batch_policy: EmptyBatchPolicy,
}

impl ReportAssembler {
    pub fn new(empty_batch_policy: EmptyBatchPolicy) -> Self {
        Self { empty_batch_policy }
    }

    /// 组装任务报告
    ///
    /// 校验项（任一失败即中止）:
    /// 1) 空批次且策略为 Reject
    /// 2) 物料数量为负数
    /// 3) 总预算/总工时为负数或非有限值
    /// 4) 分级明细计数之和 ≠ 检测数量
    pub fn assemble(
        &self,
        meta: MissionMeta,
        events: &[DetectionEvent],
        materials: ConsolidatedMaterialList,
        plan: MissionPlan,
    ) -> PlanningResult<MissionReport> {
        if events.is_empty() && self.empty_batch_policy == EmptyBatchPolicy::Reject {
            return Err(PlanningError::EmptyBatch);
        }

        if let Some((material, value)) = materials.first_invalid_quantity() {
            return Err(PlanningError::InvalidMaterialQuantity {
                material: material.to_string(),
                value,
            });
        }

        check_total("total_budget", plan.total_budget)?;
        check_total("total_hours", plan.total_hours)?;

        let breakdown_total: u64 = plan
            .tier_breakdowns
            .iter()
            .map(|b| u64::from(b.detection_count))
            .sum();
        if breakdown_total != events.len() as u64 {
            return Err(PlanningError::CountMismatch {
                breakdown_total,
                event_count: events.len() as u64,
            });
        }

        let zone_count = u32::try_from(events.len())
            .map_err(|_| PlanningError::TooManyDetections(events.len()))?;

        Ok(MissionReport::new(meta, materials, plan, zone_count))
    }
}

fn check_total(field: &str, value: f64) -> PlanningResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PlanningError::InvalidTotal {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}
