// ==========================================
// CleanCity 巡检后勤系统 - API层
// ==========================================
// 职责: 面向 CLI / 渲染层的业务接口
// ==========================================

pub mod dto;
pub mod error;
pub mod mission_api;

pub use dto::{format_currency, DetectionPointDto, MissionOutput, MissionReportDto, StatDto};
pub use error::{ApiError, ApiResult};
pub use mission_api::{MissionApi, DEFAULT_BATCH_FILE, DEFAULT_POINTS_FILE, DEFAULT_REPORT_FILE};
