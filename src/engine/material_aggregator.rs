// ==========================================
// CleanCity 巡检后勤系统 - 物料汇总引擎
// ==========================================
// 红线: 汇总结果与检测顺序无关（交换律/结合律）
// 红线: 无全局累加状态,累加器按值折叠并返回
// ==========================================
// 职责: 整批检测 → 备料汇总清单
// 输入: 检测事件 + 判定器 + 物料目录
// 输出: ConsolidatedMaterialList
// ==========================================
// 做法: 先按 (目录类型, 等级) 计数,再按键顺序展开为物料数量;
//       数量为整数千分位,分批汇总后合并与整批汇总结果相等
// ==========================================

use crate::config::material_catalog::MaterialCatalog;
use crate::domain::detection::DetectionEvent;
use crate::domain::material::{ConsolidatedMaterialList, MaterialRecipe};
use crate::domain::types::UrgencyTier;
use crate::engine::urgency::UrgencyClassifier;
use std::collections::BTreeMap;
use tracing::instrument;

// ==========================================
// RecipeTriggers - 配方触发计数（折叠累加器）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeTriggers {
    counts: BTreeMap<(String, UrgencyTier), u32>,
    fallback_hits: u32,
}

impl RecipeTriggers {
    /// 记录一次配方触发
    fn record(mut self, resolved_type: &str, tier: UrgencyTier, fallback_used: bool) -> Self {
        *self
            .counts
            .entry((resolved_type.to_string(), tier))
            .or_insert(0) += 1;
        if fallback_used {
            self.fallback_hits += 1;
        }
        self
    }

    /// 合并两份计数
    pub fn merge(mut self, other: &RecipeTriggers) -> Self {
        for (key, n) in &other.counts {
            *self.counts.entry(key.clone()).or_insert(0) += n;
        }
        self.fallback_hits += other.fallback_hits;
        self
    }

    /// 展开为物料汇总清单（按键顺序累加）
    pub fn expand(&self, catalog: &MaterialCatalog) -> ConsolidatedMaterialList {
        let mut list = ConsolidatedMaterialList::new();
        for ((anomaly_type, tier), times) in &self.counts {
            list.add_recipe(catalog.recipe_for(anomaly_type, *tier), *times);
        }
        list
    }

    /// 某 (目录类型, 等级) 的触发次数
    pub fn count(&self, anomaly_type: &str, tier: UrgencyTier) -> u32 {
        self.counts
            .get(&(anomaly_type.to_string(), tier))
            .copied()
            .unwrap_or(0)
    }

    /// 使用兜底类型的检测数量
    pub fn fallback_hits(&self) -> u32 {
        self.fallback_hits
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

// ==========================================
// MaterialAggregator - 物料汇总引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialAggregator {
    // 无状态引擎
}

impl MaterialAggregator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 统计整批检测的配方触发次数
    pub fn recipe_triggers(
        &self,
        events: &[DetectionEvent],
        classifier: &UrgencyClassifier,
        catalog: &MaterialCatalog,
    ) -> RecipeTriggers {
        events
            .iter()
            .fold(RecipeTriggers::default(), |acc, event| {
                let tier = classifier.classify_event(event);
                let lookup = catalog.lookup(&event.anomaly_type, tier);
                acc.record(lookup.resolved_type, tier, lookup.fallback_used)
            })
    }

    /// 汇总整批检测的备料清单
    #[instrument(skip_all, fields(count = events.len()))]
    pub fn aggregate(
        &self,
        events: &[DetectionEvent],
        classifier: &UrgencyClassifier,
        catalog: &MaterialCatalog,
    ) -> ConsolidatedMaterialList {
        let triggers = self.recipe_triggers(events, classifier, catalog);
        if triggers.fallback_hits() > 0 {
            tracing::debug!(
                fallback_hits = triggers.fallback_hits(),
                fallback_type = catalog.fallback_type(),
                "部分检测类型未收录,已按兜底类型备料"
            );
        }

        let materials = triggers.expand(catalog);
        tracing::debug!(material_count = materials.len(), "备料汇总完成");
        materials
    }

    /// 单个检测所需配方（供渲染层点位弹窗使用）
    pub fn recipe_for_event<'a>(
        &self,
        event: &DetectionEvent,
        classifier: &UrgencyClassifier,
        catalog: &'a MaterialCatalog,
    ) -> &'a MaterialRecipe {
        catalog.recipe_for(&event.anomaly_type, classifier.classify_event(event))
    }
}
