// ==========================================
// CleanCity 巡检后勤系统 - 规划配置
// ==========================================
// 职责: 加载/校验规划所需的全部静态配置
// 内容: 物料目录 + 成本模型 + 任务编号 + 空批次策略
// 查找顺序:
//   1) 环境变量 CLEANCITY_CONFIG
//   2) 当前目录 ./cleancity.json
//   3) 用户配置目录 cleancity-logistics/config.json
//   4) 内置默认值
// ==========================================

use crate::config::cost_model::CostModel;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::material_catalog::{MaterialCatalog, MaterialCatalogConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "CLEANCITY_CONFIG";

/// 当前目录下的默认配置文件名
pub const LOCAL_CONFIG_FILE: &str = "cleancity.json";

// ==========================================
// EmptyBatchPolicy - 空批次策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyBatchPolicy {
    /// 零检测生成空报告（总额为 0）
    Allow,
    /// 零检测视为校验失败
    Reject,
}

impl Default for EmptyBatchPolicy {
    fn default() -> Self {
        EmptyBatchPolicy::Allow
    }
}

// ==========================================
// MissionIdentityConfig - 任务编号配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MissionIdentityConfig {
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    #[serde(default = "default_sequence")]
    pub sequence: u32,
}

fn default_id_prefix() -> String {
    "MSN".to_string()
}

fn default_sequence() -> u32 {
    42
}

impl Default for MissionIdentityConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            sequence: default_sequence(),
        }
    }
}

// ==========================================
// PlanningConfig - 规划配置
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanningConfig {
    #[serde(default)]
    pub mission: MissionIdentityConfig,

    #[serde(default)]
    pub empty_batch_policy: EmptyBatchPolicy,

    #[serde(default)]
    pub catalog: MaterialCatalogConfig,

    #[serde(default)]
    pub cost_model: CostModel,
}

impl PlanningConfig {
    /// 从 JSON 字符串解析并校验
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: PlanningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载并校验
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// 按查找顺序加载配置
    ///
    /// # 返回
    /// - (配置, 实际使用的文件路径；None 表示内置默认值)
    pub fn load() -> ConfigResult<(Self, Option<PathBuf>)> {
        match resolve_config_path() {
            Some(path) => {
                tracing::info!(path = %path.display(), "加载规划配置文件");
                let config = Self::load_from_file(&path)?;
                Ok((config, Some(path)))
            }
            None => {
                tracing::info!("未找到配置文件,使用内置默认配置");
                Ok((Self::default(), None))
            }
        }
    }

    /// 校验全部配置项
    pub fn validate(&self) -> ConfigResult<()> {
        let prefix = self.mission.id_prefix.trim();
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidMissionPrefix(
                self.mission.id_prefix.clone(),
            ));
        }
        self.cost_model.validate()?;
        MaterialCatalog::from_config(&self.catalog)?;
        Ok(())
    }

    /// 构建已校验的物料目录
    pub fn build_catalog(&self) -> ConfigResult<MaterialCatalog> {
        MaterialCatalog::from_config(&self.catalog)
    }
}

/// 解析配置文件路径
///
/// 环境变量显式指定时不做存在性检查（读取失败时报错,而不是静默回退）
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("cleancity-logistics").join("config.json");
        if path.is_file() {
            return Some(path);
        }
    }

    None
}
