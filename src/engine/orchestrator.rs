// ==========================================
// CleanCity 巡检后勤系统 - 引擎编排器
// ==========================================
// 用途: 协调四个核心引擎的执行顺序
//   1) UrgencyClassifier   紧急等级判定
//   2) MaterialAggregator  备料汇总
//   3) MissionPlanner      工时/预算规划
//   4) ReportAssembler     报告组装
// 红线: 纯顺序计算,无共享可变状态,无 I/O
// ==========================================

use crate::config::material_catalog::MaterialCatalog;
use crate::config::planning_config::PlanningConfig;
use crate::config::ConfigResult;
use crate::domain::detection::DetectionEvent;
use crate::domain::mission::{MissionMeta, MissionReport};
use crate::engine::error::PlanningResult;
use crate::engine::{MaterialAggregator, MissionPlanner, ReportAssembler, UrgencyClassifier};
use tracing::{debug, info, info_span};

// ==========================================
// MissionOrchestrator - 引擎编排器
// ==========================================
#[derive(Debug, Clone)]
pub struct MissionOrchestrator {
    classifier: UrgencyClassifier,
    catalog: MaterialCatalog,
    aggregator: MaterialAggregator,
    planner: MissionPlanner,
    assembler: ReportAssembler,
}

impl MissionOrchestrator {
    /// 从已校验的组件创建编排器
    pub fn new(catalog: MaterialCatalog, planner: MissionPlanner, assembler: ReportAssembler) -> Self {
        Self {
            classifier: UrgencyClassifier::new(),
            catalog,
            aggregator: MaterialAggregator::new(),
            planner,
            assembler,
        }
    }

    /// 从规划配置创建编排器
    pub fn from_config(config: &PlanningConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::new(
            config.build_catalog()?,
            MissionPlanner::new(config.cost_model),
            ReportAssembler::new(config.empty_batch_policy),
        ))
    }

    pub fn classifier(&self) -> &UrgencyClassifier {
        &self.classifier
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    /// 执行完整规划流程（单批次）
    ///
    /// # 参数
    /// - meta: 任务编号与生成时间
    /// - events: 检测事件（只读）
    ///
    /// # 返回
    /// 不可变的任务报告；校验失败时返回错误
    pub fn run(&self, meta: MissionMeta, events: &[DetectionEvent]) -> PlanningResult<MissionReport> {
        let span = info_span!("mission", mission_id = %meta.mission_id);
        let _enter = span.enter();

        info!(detections = events.len(), "开始生成任务报告");

        // ==========================================
        // 步骤1+2: 等级判定 + 备料汇总
        // ==========================================
        debug!("步骤1: 备料汇总");
        let materials = self
            .aggregator
            .aggregate(events, &self.classifier, &self.catalog);

        // ==========================================
        // 步骤3: 工时/预算规划
        // ==========================================
        debug!("步骤2: 工时/预算规划");
        let plan = self.planner.plan(events, &self.classifier);

        // ==========================================
        // 步骤4: 报告组装与校验
        // ==========================================
        debug!("步骤3: 报告组装");
        let report = self.assembler.assemble(meta, events, materials, plan)?;

        info!(
            zones = report.zone_count(),
            materials = report.materials().len(),
            total_hours = report.total_hours(),
            total_budget = report.total_budget(),
            "任务报告生成完成"
        );

        Ok(report)
    }
}

impl Default for MissionOrchestrator {
    fn default() -> Self {
        Self::new(
            MaterialCatalog::default(),
            MissionPlanner::default(),
            ReportAssembler::default(),
        )
    }
}
