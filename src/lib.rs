// ==========================================
// CleanCity 巡检后勤系统 - 核心库
// ==========================================
// 系统定位: 路面异常分级 + 后勤任务规划
// 流程: 检测批次 → 紧急等级 → 备料清单 → 工时/预算 → 出库单
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "fr");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 分级与规划规则
pub mod engine;

// 导入层 - 检测批次读写
pub mod importer;

// 采集层 - 现场记录与同步
pub mod capture;

// 配置层 - 物料目录/成本模型
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ProcessingStatus, UrgencyTier};

// 领域实体
pub use domain::{
    ConsolidatedMaterialList, DetectionEvent, DetectionRecord, MaterialRecipe, MissionMeta,
    MissionPlan, MissionReport, Quantity, TierBreakdown,
};

// 引擎
pub use engine::{
    MaterialAggregator, MissionOrchestrator, MissionPlanner, PlanningError, ReportAssembler,
    UrgencyClassifier,
};

// 配置
pub use config::{CostModel, MaterialCatalog, PlanningConfig};

// 导入/采集
pub use capture::{CaptureError, CaptureSession, DetectionSync, NoOpDetectionSync};
pub use importer::{BatchLoader, BatchWriter, DetectionBatch};

// API
pub use api::{ApiError, MissionApi, MissionReportDto};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "CleanCity AI - Logistique & Voirie";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
