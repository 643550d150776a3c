// ==========================================
// CleanCity 巡检后勤系统 - 现场采集层
// ==========================================
// 职责: 实时检测记录的等级判定、同步与本地落盘
// 不包含: 视频采集与模型推理
// ==========================================

pub mod error;
pub mod session;
pub mod sync;

pub use error::{CaptureError, CaptureResult};
pub use session::{CaptureSession, CaptureSummary, RawDetection};
pub use sync::{DetectionSync, NoOpDetectionSync, SyncError, SyncResult};
