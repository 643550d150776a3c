// ==========================================
// CleanCity 巡检后勤系统 - 引擎层错误类型
// ==========================================
// 红线: 校验失败时整批中止,不输出无法担保的报告
// ==========================================

use thiserror::Error;

/// 规划引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    #[error("空批次: 当前策略要求至少一条检测记录")]
    EmptyBatch,

    #[error("物料数量非法 (物料 {material}): {value}")]
    InvalidMaterialQuantity { material: String, value: f64 },

    #[error("汇总值非法 ({field}): {value}")]
    InvalidTotal { field: String, value: f64 },

    #[error("分级计数不一致: 明细合计 {breakdown_total}, 检测数量 {event_count}")]
    CountMismatch {
        breakdown_total: u64,
        event_count: u64,
    },

    #[error("检测数量超出上限: {0}")]
    TooManyDetections(usize),
}

/// Result 类型别名
pub type PlanningResult<T> = Result<T, PlanningError>;
