// ==========================================
// CleanCity 巡检后勤系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 配置在启动时一次性校验,非法条目直接拒绝
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 文件相关错误 =====
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置解析失败: {0}")]
    ParseError(String),

    // ===== 物料目录错误 =====
    #[error("物料目录缺少兜底类型: {0}")]
    MissingFallbackType(String),

    #[error("物料目录存在空名称: {context}")]
    EmptyName { context: String },

    #[error("物料数量非法 (类型 {anomaly_type}, 等级 {tier}, 物料 {material}): {value}")]
    InvalidQuantity {
        anomaly_type: String,
        tier: String,
        material: String,
        value: f64,
    },

    // ===== 成本模型错误 =====
    #[error("成本模型非法 (等级 {tier}, 字段 {field}): {value}")]
    InvalidCostEntry {
        tier: String,
        field: String,
        value: f64,
    },

    #[error("人工小时费率非法: {0}")]
    InvalidLaborRate(f64),

    // ===== 任务编号错误 =====
    #[error("任务编号前缀非法: '{0}'")]
    InvalidMissionPrefix(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
