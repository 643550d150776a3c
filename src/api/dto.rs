// ==========================================
// CleanCity 巡检后勤系统 - 报告渲染 DTO
// ==========================================
// 职责: MissionReport → 渲染层（出库单/看板）所需的 JSON 对象
// 格式化只在这一层发生,领域对象保留完整精度
// ==========================================

use crate::domain::detection::DetectionEvent;
use crate::domain::material::MaterialRecipe;
use crate::domain::mission::{MissionReport, TierBreakdown};
use crate::domain::types::UrgencyTier;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 出库单日期格式
pub const REPORT_DATE_FORMAT: &str = "%d/%m/%Y";

/// 出库单时间格式
pub const REPORT_TIME_FORMAT: &str = "%H:%M";

/// 分级统计行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDto {
    pub urgence: UrgencyTier,
    pub count: u32,
    pub heures: f64,
    /// 每个点位所需人数
    pub staff_unit: u32,
}

impl From<&TierBreakdown> for StatDto {
    fn from(breakdown: &TierBreakdown) -> Self {
        Self {
            urgence: breakdown.tier,
            count: breakdown.detection_count,
            heures: breakdown.total_hours,
            staff_unit: breakdown.crew_size,
        }
    }
}

/// 任务报告 DTO（出库单数据）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionReportDto {
    pub id: String,
    /// dd/mm/YYYY
    pub date: String,
    /// HH:MM
    pub heure: String,
    pub materials: BTreeMap<String, f64>,
    pub stats: Vec<StatDto>,
    /// 千分位 + 两位小数,例如 "2,722.50"
    pub total_budget: String,
    pub total_heures: f64,
    pub zones: u32,
}

impl From<&MissionReport> for MissionReportDto {
    fn from(report: &MissionReport) -> Self {
        Self {
            id: report.mission_id().to_string(),
            date: report.date().format(REPORT_DATE_FORMAT).to_string(),
            heure: report.time().format(REPORT_TIME_FORMAT).to_string(),
            materials: report.materials().to_f64_map(),
            stats: report.tier_breakdowns().iter().map(StatDto::from).collect(),
            total_budget: format_currency(report.total_budget()),
            total_heures: report.total_hours(),
            zones: report.zone_count(),
        }
    }
}

/// 点位弹窗坐标显示精度（小数位）
pub const POINT_COORDINATE_DECIMALS: i32 = 4;

/// 点位弹窗置信度显示精度（小数位）
pub const POINT_CONFIDENCE_DECIMALS: i32 = 2;

/// 点位采集时间格式
pub const POINT_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

fn round_display(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 地图点位 DTO（单个检测的标记与弹窗数据）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionPointDto {
    #[serde(rename = "type")]
    pub anomaly_type: String,
    pub urgence: UrgencyTier,
    pub latitude: f64,
    pub longitude: f64,
    pub confiance: f64,
    /// dd/mm/YYYY HH:MM（本地时间）,时间戳无效时为空
    pub date_heure: Option<String>,
    pub materiaux_requis: BTreeMap<String, f64>,
}

impl DetectionPointDto {
    pub fn new(event: &DetectionEvent, tier: UrgencyTier, recipe: &MaterialRecipe) -> Self {
        Self {
            anomaly_type: event.anomaly_type.clone(),
            urgence: tier,
            latitude: round_display(event.latitude, POINT_COORDINATE_DECIMALS),
            longitude: round_display(event.longitude, POINT_COORDINATE_DECIMALS),
            confiance: round_display(event.confidence, POINT_CONFIDENCE_DECIMALS),
            date_heure: event
                .recorded_at()
                .map(|at| at.with_timezone(&Local).format(POINT_TIME_FORMAT).to_string()),
            materiaux_requis: recipe
                .iter()
                .map(|(name, qty)| (name.clone(), qty.to_f64()))
                .collect(),
        }
    }
}

/// 一次规划运行的渲染输出: 出库单 + 地图点位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionOutput {
    pub report: MissionReportDto,
    pub points: Vec<DetectionPointDto>,
}

/// 金额格式化: 千分位逗号 + 两位小数
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, digit) in digits.iter().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    format!("{}{}.{}", sign, grouped, frac_part)
}
