// ==========================================
// CleanCity 巡检后勤系统 - 物料目录
// ==========================================
// 职责: (异常类型, 紧急等级) → 物料配方
// 查找规则:
//   1) 按异常类型查找,未命中则使用兜底类型
//   2) 在类型内按等级查找,未命中则配方为空（不是错误）
// 存储: JSON 配置,可外部编辑
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::material::MaterialRecipe;
use crate::domain::types::UrgencyTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 默认兜底类型名称
pub const DEFAULT_FALLBACK_TYPE: &str = "Defaut";

// ==========================================
// MaterialCatalogConfig - 物料目录配置（原始 JSON 结构）
// ==========================================
// 格式:
// {
//   "fallback_type": "Defaut",
//   "anomalies": {
//     "Pothole": { "CRITIQUE": {"Asphalte à chaud (kg)": 150}, "MOYENNE": {...}, "FAIBLE": {...} }
//   }
// }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialCatalogConfig {
    #[serde(default = "default_fallback_type")]
    pub fallback_type: String,

    pub anomalies: BTreeMap<String, BTreeMap<UrgencyTier, MaterialRecipe>>,
}

fn default_fallback_type() -> String {
    DEFAULT_FALLBACK_TYPE.to_string()
}

impl Default for MaterialCatalogConfig {
    /// 内置目录（路面坑洞 / 垃圾 / 通用缺陷）
    fn default() -> Self {
        let mut anomalies = BTreeMap::new();

        anomalies.insert(
            "Pothole".to_string(),
            BTreeMap::from([
                (
                    UrgencyTier::Critical,
                    MaterialRecipe::from_entries([
                        ("Asphalte à chaud (kg)", 150.0),
                        ("Émulsion (L)", 10.0),
                        ("Gravier (kg)", 50.0),
                    ]),
                ),
                (
                    UrgencyTier::Medium,
                    MaterialRecipe::from_entries([
                        ("Asphalte à froid (kg)", 40.0),
                        ("Émulsion (L)", 2.0),
                    ]),
                ),
                (
                    UrgencyTier::Low,
                    MaterialRecipe::from_entries([("Scellant bitumineux (L)", 5.0)]),
                ),
            ]),
        );

        anomalies.insert(
            "Garbage".to_string(),
            BTreeMap::from([
                (
                    UrgencyTier::Critical,
                    MaterialRecipe::from_entries([
                        ("Sacs 100L (u)", 10.0),
                        ("Pelle", 1.0),
                        ("Désinfectant (L)", 2.0),
                    ]),
                ),
                (
                    UrgencyTier::Medium,
                    MaterialRecipe::from_entries([("Sacs 50L (u)", 5.0), ("Pince", 1.0)]),
                ),
                (
                    UrgencyTier::Low,
                    MaterialRecipe::from_entries([("Sacs 30L (u)", 2.0)]),
                ),
            ]),
        );

        anomalies.insert(
            DEFAULT_FALLBACK_TYPE.to_string(),
            BTreeMap::from([
                (
                    UrgencyTier::Critical,
                    MaterialRecipe::from_entries([
                        ("Ciment prompt (kg)", 20.0),
                        ("Barrières Sécu", 2.0),
                    ]),
                ),
                (
                    UrgencyTier::Medium,
                    MaterialRecipe::from_entries([("Kit Nettoyage", 1.0)]),
                ),
                (
                    UrgencyTier::Low,
                    MaterialRecipe::from_entries([("Spray Marquage", 1.0)]),
                ),
            ]),
        );

        Self {
            fallback_type: default_fallback_type(),
            anomalies,
        }
    }
}

// ==========================================
// RecipeLookup - 配方查找结果
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct RecipeLookup<'a> {
    /// 实际命中的目录类型（未知类型时为兜底类型）
    pub resolved_type: &'a str,
    pub recipe: &'a MaterialRecipe,
    pub fallback_used: bool,
}

// ==========================================
// MaterialCatalog - 已校验的物料目录
// ==========================================
#[derive(Debug, Clone)]
pub struct MaterialCatalog {
    fallback_type: String,
    entries: BTreeMap<String, BTreeMap<UrgencyTier, MaterialRecipe>>,
    empty: MaterialRecipe,
}

impl MaterialCatalog {
    /// 从配置构建并校验目录
    ///
    /// 校验项:
    /// - 兜底类型必须存在
    /// - 类型名称/物料名称非空
    /// - 数量非负（非有限值在解析时已拒绝）
    pub fn from_config(config: &MaterialCatalogConfig) -> ConfigResult<Self> {
        let fallback_type = config.fallback_type.trim().to_string();
        if fallback_type.is_empty() {
            return Err(ConfigError::EmptyName {
                context: "fallback_type".to_string(),
            });
        }
        if !config.anomalies.contains_key(&fallback_type) {
            return Err(ConfigError::MissingFallbackType(fallback_type));
        }

        for (anomaly_type, tiers) in &config.anomalies {
            if anomaly_type.trim().is_empty() {
                return Err(ConfigError::EmptyName {
                    context: "anomalies".to_string(),
                });
            }
            for (tier, recipe) in tiers {
                for (material, qty) in recipe.iter() {
                    if material.trim().is_empty() {
                        return Err(ConfigError::EmptyName {
                            context: format!("{}/{}", anomaly_type, tier),
                        });
                    }
                    if qty.is_negative() {
                        return Err(ConfigError::InvalidQuantity {
                            anomaly_type: anomaly_type.clone(),
                            tier: tier.to_string(),
                            material: material.clone(),
                            value: qty.to_f64(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            fallback_type,
            entries: config.anomalies.clone(),
            empty: MaterialRecipe::new(),
        })
    }

    /// 从 JSON 字符串构建
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: MaterialCatalogConfig = serde_json::from_str(json)?;
        Self::from_config(&config)
    }

    /// 查找配方（含兜底信息）
    pub fn lookup<'a>(&'a self, anomaly_type: &str, tier: UrgencyTier) -> RecipeLookup<'a> {
        let (resolved_type, tiers, fallback_used) =
            match self.entries.get_key_value(anomaly_type) {
                Some((key, tiers)) => (key.as_str(), tiers, false),
                None => {
                    tracing::debug!(
                        anomaly_type,
                        fallback = %self.fallback_type,
                        "物料目录未收录该类型,使用兜底类型"
                    );
                    // 兜底类型在构建时已校验存在
                    match self.entries.get_key_value(&self.fallback_type) {
                        Some((key, tiers)) => (key.as_str(), tiers, true),
                        None => {
                            return RecipeLookup {
                                resolved_type: self.fallback_type.as_str(),
                                recipe: &self.empty,
                                fallback_used: true,
                            }
                        }
                    }
                }
            };

        let recipe = match tiers.get(&tier) {
            Some(recipe) => recipe,
            None => {
                tracing::debug!(
                    anomaly_type = resolved_type,
                    tier = %tier,
                    "物料目录未配置该等级,配方为空"
                );
                &self.empty
            }
        };

        RecipeLookup {
            resolved_type,
            recipe,
            fallback_used,
        }
    }

    /// 查找配方
    pub fn recipe_for(&self, anomaly_type: &str, tier: UrgencyTier) -> &MaterialRecipe {
        self.lookup(anomaly_type, tier).recipe
    }

    pub fn fallback_type(&self) -> &str {
        &self.fallback_type
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        let config = MaterialCatalogConfig::default();
        Self {
            fallback_type: config.fallback_type,
            entries: config.anomalies,
            empty: MaterialRecipe::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = MaterialCatalog::from_config(&MaterialCatalogConfig::default());
        assert!(catalog.is_ok());
    }

    #[test]
    fn test_known_type_lookup() {
        let catalog = MaterialCatalog::default();
        let recipe = catalog.recipe_for("Pothole", UrgencyTier::Critical);
        assert_eq!(recipe.get("Asphalte à chaud (kg)"), Some(150.0));
        assert_eq!(recipe.len(), 3);
    }

    #[test]
    fn test_unknown_type_uses_fallback_for_every_tier() {
        let catalog = MaterialCatalog::default();
        for tier in UrgencyTier::REPORT_ORDER {
            let lookup = catalog.lookup("Graffiti", tier);
            assert!(lookup.fallback_used);
            assert_eq!(lookup.resolved_type, "Defaut");
            assert_eq!(lookup.recipe, catalog.recipe_for("Defaut", tier));
        }
    }

    #[test]
    fn test_missing_tier_yields_empty_recipe() {
        let json = r#"{
            "fallback_type": "Defaut",
            "anomalies": {
                "Defaut": { "FAIBLE": { "Spray Marquage": 1 } },
                "Crack": { "CRITIQUE": { "Mortier (kg)": 12.5 } }
            }
        }"#;
        let catalog = MaterialCatalog::from_json_str(json).unwrap();

        assert!(catalog.recipe_for("Crack", UrgencyTier::Low).is_empty());
        assert_eq!(
            catalog.recipe_for("Crack", UrgencyTier::Critical).get("Mortier (kg)"),
            Some(12.5)
        );
    }

    #[test]
    fn test_english_tier_keys_accepted() {
        let json = r#"{
            "anomalies": { "Defaut": { "CRITICAL": { "Cone": 4 } } }
        }"#;
        let catalog = MaterialCatalog::from_json_str(json).unwrap();
        assert_eq!(
            catalog.recipe_for("Defaut", UrgencyTier::Critical).get("Cone"),
            Some(4.0)
        );
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let json = r#"{
            "fallback_type": "Defaut",
            "anomalies": { "Defaut": { "MOYENNE": { "Kit Nettoyage": -1 } } }
        }"#;
        let err = MaterialCatalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidQuantity { .. }));
    }

    #[test]
    fn test_missing_fallback_rejected() {
        let json = r#"{
            "fallback_type": "Autre",
            "anomalies": { "Pothole": {} }
        }"#;
        let err = MaterialCatalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFallbackType(_)));
    }

    #[test]
    fn test_unknown_tier_key_rejected() {
        let json = r#"{
            "anomalies": { "Defaut": { "URGENT": { "Cone": 1 } } }
        }"#;
        assert!(MaterialCatalog::from_json_str(json).is_err());
    }
}
