// ==========================================
// CleanCity 巡检后勤系统 - 采集层错误类型
// ==========================================
// 红线: 非法检测在推送与落盘前拒绝,批次文件始终可被离线加载
// ==========================================

use crate::importer::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("异常类型为空")]
    EmptyType,

    #[error("检测数值越界 (字段 {field}): 值 {value} 超出 [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// 本地批次文件写入失败
    #[error(transparent)]
    Storage(#[from] ImportError),
}

impl CaptureError {
    /// 单条检测被拒绝（会话仍可继续）
    pub fn is_rejected_detection(&self) -> bool {
        !matches!(self, CaptureError::Storage(_))
    }
}

pub type CaptureResult<T> = Result<T, CaptureError>;
