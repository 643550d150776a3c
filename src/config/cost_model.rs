// ==========================================
// CleanCity 巡检后勤系统 - 成本模型
// ==========================================
// 职责: 紧急等级 → 单班工时 / 班组人数 / 物料预算
// 红线: 三个等级必须全部配置（枚举封闭,查找为全函数）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::UrgencyTier;
use serde::{Deserialize, Serialize};

/// 默认人工小时费率（MAD/小时）
pub const DEFAULT_HOURLY_LABOR_RATE: f64 = 65.0;

// ==========================================
// CostModelEntry - 单等级成本参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostModelEntry {
    /// 每个点位单人工时（小时）
    pub hours_per_crew: f64,

    /// 每个点位班组人数
    pub crew_size: u32,

    /// 每个点位物料预算
    pub material_budget: f64,
}

impl CostModelEntry {
    pub const fn new(hours_per_crew: f64, crew_size: u32, material_budget: f64) -> Self {
        Self {
            hours_per_crew,
            crew_size,
            material_budget,
        }
    }

    /// 单个点位的人时 = 工时 × 人数
    pub fn staff_hours(&self) -> f64 {
        self.hours_per_crew * f64::from(self.crew_size)
    }

    fn validate(&self, tier: UrgencyTier) -> ConfigResult<()> {
        if !self.hours_per_crew.is_finite() || self.hours_per_crew < 0.0 {
            return Err(ConfigError::InvalidCostEntry {
                tier: tier.to_string(),
                field: "hours_per_crew".to_string(),
                value: self.hours_per_crew,
            });
        }
        if self.crew_size == 0 {
            return Err(ConfigError::InvalidCostEntry {
                tier: tier.to_string(),
                field: "crew_size".to_string(),
                value: 0.0,
            });
        }
        if !self.material_budget.is_finite() || self.material_budget < 0.0 {
            return Err(ConfigError::InvalidCostEntry {
                tier: tier.to_string(),
                field: "material_budget".to_string(),
                value: self.material_budget,
            });
        }
        Ok(())
    }
}

// ==========================================
// TierCostTable - 分级成本表
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierCostTable {
    #[serde(rename = "CRITIQUE", alias = "CRITICAL")]
    pub critical: CostModelEntry,

    #[serde(rename = "MOYENNE", alias = "MEDIUM")]
    pub medium: CostModelEntry,

    #[serde(rename = "FAIBLE", alias = "LOW")]
    pub low: CostModelEntry,
}

impl Default for TierCostTable {
    fn default() -> Self {
        Self {
            critical: CostModelEntry::new(4.0, 3, 1200.0),
            medium: CostModelEntry::new(2.0, 2, 400.0),
            low: CostModelEntry::new(0.5, 1, 50.0),
        }
    }
}

// ==========================================
// CostModel - 成本模型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostModel {
    /// 全局人工小时费率
    #[serde(default = "default_hourly_labor_rate")]
    pub hourly_labor_rate: f64,

    pub tiers: TierCostTable,
}

fn default_hourly_labor_rate() -> f64 {
    DEFAULT_HOURLY_LABOR_RATE
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            hourly_labor_rate: DEFAULT_HOURLY_LABOR_RATE,
            tiers: TierCostTable::default(),
        }
    }
}

impl CostModel {
    /// 查找等级成本参数
    pub fn cost_of(&self, tier: UrgencyTier) -> &CostModelEntry {
        match tier {
            UrgencyTier::Critical => &self.tiers.critical,
            UrgencyTier::Medium => &self.tiers.medium,
            UrgencyTier::Low => &self.tiers.low,
        }
    }

    /// 校验费率与各等级参数
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.hourly_labor_rate.is_finite() || self.hourly_labor_rate < 0.0 {
            return Err(ConfigError::InvalidLaborRate(self.hourly_labor_rate));
        }
        for tier in UrgencyTier::REPORT_ORDER {
            self.cost_of(tier).validate(tier)?;
        }
        Ok(())
    }
}
