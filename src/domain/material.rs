// ==========================================
// CleanCity 巡检后勤系统 - 物料实体
// ==========================================
// Quantity: 物料数量（千分位定点数）
// MaterialRecipe: 单个 (异常类型, 紧急等级) 的物料配方
// ConsolidatedMaterialList: 整批检测汇总后的备料清单
// ==========================================
// 红线: 数量非负；汇总结果与检测顺序无关
// 红线: 数量按整数千分位累加,分批汇总再合并与整批汇总逐位相等
// ==========================================

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Mul};

/// 每单位的千分位数
const MILLIS_PER_UNIT: i64 = 1_000;

// ==========================================
// Quantity - 物料数量
// ==========================================
// 内部以千分之一单位的整数存储,JSON 中仍为普通数字
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// 从浮点数构建（四舍五入到千分位）
    ///
    /// 非有限值返回 None
    pub fn try_from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let millis = (value * MILLIS_PER_UNIT as f64).round();
        if millis.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self(millis as i64))
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / MILLIS_PER_UNIT as f64
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        *self = *self + rhs;
    }
}

impl Mul<u32> for Quantity {
    type Output = Quantity;

    fn mul(self, times: u32) -> Quantity {
        Quantity(self.0.saturating_mul(i64::from(times)))
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Quantity::try_from_f64(value)
            .ok_or_else(|| DeError::custom(format!("数量超出范围: {}", value)))
    }
}

// ==========================================
// MaterialRecipe - 物料配方
// ==========================================
// 物料名称 → 需求数量
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialRecipe(BTreeMap<String, Quantity>);

impl MaterialRecipe {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// 构建配方（同名物料数量累加,非有限值按 0 处理）
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (name, qty) in entries {
            let qty = Quantity::try_from_f64(qty).unwrap_or_default();
            *map.entry(name.into()).or_insert(Quantity::ZERO) += qty;
        }
        Self(map)
    }

    pub fn get(&self, material: &str) -> Option<f64> {
        self.0.get(material).map(|q| q.to_f64())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Quantity)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ==========================================
// ConsolidatedMaterialList - 备料汇总清单
// ==========================================
// 按物料名称排序，保证输出可复现
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsolidatedMaterialList(BTreeMap<String, Quantity>);

impl ConsolidatedMaterialList {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// 累加一个配方，乘以触发次数
    pub fn add_recipe(&mut self, recipe: &MaterialRecipe, times: u32) {
        if times == 0 {
            return;
        }
        for (name, qty) in recipe.iter() {
            *self.0.entry(name.clone()).or_insert(Quantity::ZERO) += *qty * times;
        }
    }

    /// 合并另一份清单（批次 A + 批次 B）
    pub fn merge(mut self, other: &ConsolidatedMaterialList) -> Self {
        for (name, qty) in other.iter() {
            *self.0.entry(name.clone()).or_insert(Quantity::ZERO) += *qty;
        }
        self
    }

    pub fn get(&self, material: &str) -> Option<f64> {
        self.0.get(material).map(|q| q.to_f64())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Quantity)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 返回第一个负数量
    pub fn first_invalid_quantity(&self) -> Option<(&str, f64)> {
        self.0
            .iter()
            .find(|(_, qty)| qty.is_negative())
            .map(|(name, qty)| (name.as_str(), qty.to_f64()))
    }

    /// 渲染用的数值视图
    pub fn to_f64_map(&self) -> BTreeMap<String, f64> {
        self.0
            .iter()
            .map(|(name, qty)| (name.clone(), qty.to_f64()))
            .collect()
    }
}

impl From<BTreeMap<String, f64>> for ConsolidatedMaterialList {
    fn from(map: BTreeMap<String, f64>) -> Self {
        Self(
            map.into_iter()
                .map(|(name, qty)| (name, Quantity::try_from_f64(qty).unwrap_or_default()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_recipe_multiplies_by_times() {
        let recipe = MaterialRecipe::from_entries([("Émulsion (L)", 2.0), ("Pince", 1.0)]);
        let mut list = ConsolidatedMaterialList::new();
        list.add_recipe(&recipe, 3);

        assert_eq!(list.get("Émulsion (L)"), Some(6.0));
        assert_eq!(list.get("Pince"), Some(3.0));
    }

    #[test]
    fn test_add_recipe_zero_times_is_noop() {
        let recipe = MaterialRecipe::from_entries([("Pince", 1.0)]);
        let mut list = ConsolidatedMaterialList::new();
        list.add_recipe(&recipe, 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_merge_sums_shared_materials() {
        let a = ConsolidatedMaterialList::from(BTreeMap::from([
            ("Gravier (kg)".to_string(), 50.0),
            ("Pelle".to_string(), 1.0),
        ]));
        let b = ConsolidatedMaterialList::from(BTreeMap::from([("Pelle".to_string(), 2.0)]));

        let merged = a.merge(&b);
        assert_eq!(merged.get("Pelle"), Some(3.0));
        assert_eq!(merged.get("Gravier (kg)"), Some(50.0));
    }

    #[test]
    fn test_fractional_quantities_merge_exactly() {
        let recipe = MaterialRecipe::from_entries([("Émulsion (L)", 0.1)]);

        let mut one = ConsolidatedMaterialList::new();
        one.add_recipe(&recipe, 1);
        let mut five = ConsolidatedMaterialList::new();
        five.add_recipe(&recipe, 5);
        let mut six = ConsolidatedMaterialList::new();
        six.add_recipe(&recipe, 6);

        let merged = one.merge(&five);
        assert_eq!(merged, six);
        assert_eq!(merged.get("Émulsion (L)"), Some(0.6));
        assert_eq!(serde_json::to_string(&merged).unwrap(), r#"{"Émulsion (L)":0.6}"#);
    }

    #[test]
    fn test_quantity_rounds_to_thousandths() {
        assert_eq!(Quantity::try_from_f64(12.5), Some(Quantity::from_millis(12_500)));
        assert_eq!(Quantity::try_from_f64(0.0004), Some(Quantity::ZERO));
        assert_eq!(Quantity::try_from_f64(f64::NAN), None);
        assert_eq!(Quantity::try_from_f64(f64::INFINITY), None);
    }

    #[test]
    fn test_quantity_json_is_plain_number() {
        let recipe: MaterialRecipe = serde_json::from_str(r#"{"Cone": 4, "Mortier (kg)": 12.5}"#).unwrap();
        assert_eq!(recipe.get("Cone"), Some(4.0));
        assert_eq!(recipe.get("Mortier (kg)"), Some(12.5));
    }

    #[test]
    fn test_first_invalid_quantity() {
        let list = ConsolidatedMaterialList::from(BTreeMap::from([
            ("A".to_string(), 1.0),
            ("B".to_string(), -2.0),
        ]));
        assert_eq!(list.first_invalid_quantity(), Some(("B", -2.0)));
    }
}
