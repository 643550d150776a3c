// ==========================================
// CleanCity 巡检后勤系统 - 引擎层
// ==========================================
// 职责: 实现分级与后勤规划规则,不做文件 I/O
// 红线: 纯函数式计算,同一批次同一配置结果可复现
// ==========================================

pub mod error;
pub mod material_aggregator;
pub mod mission_planner;
pub mod orchestrator;
pub mod report_assembler;
pub mod urgency;

// 重导出核心引擎
pub use error::{PlanningError, PlanningResult};
pub use material_aggregator::{MaterialAggregator, RecipeTriggers};
pub use mission_planner::MissionPlanner;
pub use orchestrator::MissionOrchestrator;
pub use report_assembler::ReportAssembler;
pub use urgency::{UrgencyClassifier, CRITICAL_THRESHOLD, MEDIUM_THRESHOLD};
