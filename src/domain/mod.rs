// ==========================================
// CleanCity 巡检后勤系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含文件访问逻辑,不含引擎逻辑
// ==========================================

pub mod detection;
pub mod material;
pub mod mission;
pub mod types;

// 重导出核心类型
pub use detection::{DetectionEvent, DetectionRecord};
pub use material::{ConsolidatedMaterialList, MaterialRecipe, Quantity};
pub use mission::{MissionMeta, MissionPlan, MissionReport, TierBreakdown};
pub use types::{ProcessingStatus, UrgencyTier};
