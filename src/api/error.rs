// ==========================================
// CleanCity 巡检后勤系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误,并映射为进程退出码
// 错误分类: 输入缺失(致命) / 校验失败(放弃本批次) / 配置错误
// ==========================================

use crate::config::ConfigError;
use crate::engine::PlanningError;
use crate::importer::ImportError;
use thiserror::Error;

/// 退出码: 输入缺失
pub const EXIT_INPUT_MISSING: i32 = 2;

/// 退出码: 校验失败
pub const EXIT_VALIDATION: i32 = 3;

/// 退出码: 配置错误
pub const EXIT_CONFIG: i32 = 4;

/// 退出码: 其他错误
pub const EXIT_OTHER: i32 = 1;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 批次文件无法定位或加载
    #[error("检测批次不可用: {0}")]
    InputMissing(#[from] ImportError),

    /// 报告校验失败
    #[error("报告校验失败: {0}")]
    Validation(#[from] PlanningError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("报告写入失败 ({path}): {message}")]
    Output { path: String, message: String },
}

impl ApiError {
    /// 对应的进程退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiError::InputMissing(_) => EXIT_INPUT_MISSING,
            ApiError::Validation(_) => EXIT_VALIDATION,
            ApiError::Config(_) => EXIT_CONFIG,
            ApiError::Output { .. } => EXIT_OTHER,
        }
    }

    /// 诊断信息的 i18n 键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ApiError::InputMissing(_) => "cli.input_missing",
            ApiError::Validation(_) => "cli.validation_failed",
            ApiError::Config(_) => "cli.config_failed",
            ApiError::Output { .. } => "cli.output_failed",
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
