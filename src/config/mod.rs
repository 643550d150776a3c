// ==========================================
// CleanCity 巡检后勤系统 - 配置层
// ==========================================
// 职责: 物料目录 / 成本模型 / 任务编号的加载与校验
// 存储: JSON 配置文件（可外部编辑）
// ==========================================

pub mod cost_model;
pub mod error;
pub mod material_catalog;
pub mod planning_config;

// 重导出核心配置类型
pub use cost_model::{CostModel, CostModelEntry, TierCostTable};
pub use error::{ConfigError, ConfigResult};
pub use material_catalog::{MaterialCatalog, MaterialCatalogConfig, RecipeLookup};
pub use planning_config::{EmptyBatchPolicy, MissionIdentityConfig, PlanningConfig};
