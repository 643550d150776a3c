// ==========================================
// CleanCity 巡检后勤系统 - 云端同步接口
// ==========================================
// 职责: 现场采集记录的远端推送接缝
// 红线: 推送失败不阻断采集,记录仍需本地落盘
// ==========================================

use crate::domain::detection::DetectionRecord;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("传输失败: {0}")]
    Transport(String),

    #[error("远端拒绝 (状态 {status}): {message}")]
    Rejected { status: u16, message: String },
}

pub type SyncResult<T> = Result<T, SyncError>;

/// 检测记录同步通道
///
/// 调用方式为同步阻塞,由采集循环逐条调用
pub trait DetectionSync: Send + Sync {
    fn push(&self, record: &DetectionRecord) -> SyncResult<()>;
}

/// 离线采集: 不做任何推送
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDetectionSync;

impl DetectionSync for NoOpDetectionSync {
    fn push(&self, _record: &DetectionRecord) -> SyncResult<()> {
        Ok(())
    }
}
