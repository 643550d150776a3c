// ==========================================
// 任务规划端到端测试
// ==========================================
// 测试目标: 检测批次 → 备料清单 → 工时/预算 → 出库单 DTO
// 覆盖范围: 顺序无关性、可加性、兜底类型、空批次策略、重复运行一致性
// ==========================================


use cleancity_logistics::api::{format_currency, MissionReportDto};
use cleancity_logistics::config::{
    CostModel, EmptyBatchPolicy, MaterialCatalog, PlanningConfig,
};
use cleancity_logistics::domain::{DetectionEvent, MissionMeta, UrgencyTier};
use cleancity_logistics::engine::{
    MaterialAggregator, MissionOrchestrator, MissionPlanner, PlanningError, ReportAssembler,
    UrgencyClassifier,
};
use test_helpers::{assert_close, event, fixed_meta, fixed_now};

fn sample_batch() -> Vec<DetectionEvent> {
    vec![
        event("Pothole", 0.8),
        event("Pothole", 0.6),
        event("Garbage", 0.3),
    ]
}

// ==========================================
// 端到端示例
// ==========================================

#[test]
fn test_end_to_end_mixed_batch() {
    let orchestrator = MissionOrchestrator::default();
    let report = orchestrator.run(fixed_meta(), &sample_batch()).unwrap();

    assert_eq!(report.mission_id(), "MSN-20261019-042");
    assert_eq!(report.zone_count(), 3);
    assert_close(report.total_hours(), 16.5);
    assert_close(report.total_budget(), 2722.5);

    let materials = report.materials();
    assert_eq!(materials.get("Asphalte à chaud (kg)"), Some(150.0));
    assert_eq!(materials.get("Émulsion (L)"), Some(12.0));
    assert_eq!(materials.get("Gravier (kg)"), Some(50.0));
    assert_eq!(materials.get("Asphalte à froid (kg)"), Some(40.0));
    assert_eq!(materials.get("Sacs 30L (u)"), Some(2.0));
    assert_eq!(materials.len(), 5);

    let tiers: Vec<UrgencyTier> = report.tier_breakdowns().iter().map(|b| b.tier).collect();
    assert_eq!(
        tiers,
        vec![UrgencyTier::Critical, UrgencyTier::Medium, UrgencyTier::Low]
    );

    let dto = MissionReportDto::from(&report);
    assert_eq!(dto.total_budget, "2,722.50");
    assert_eq!(dto.date, "19/10/2026");
    assert_eq!(dto.heure, "14:30");
    assert_eq!(dto.stats[0].staff_unit, 3);
    assert_eq!(dto.stats[0].heures, 12.0);
    assert_eq!(dto.stats[2].heures, 0.5);
}

#[test]
fn test_dto_json_round_trip() {
    let report = MissionOrchestrator::default()
        .run(fixed_meta(), &sample_batch())
        .unwrap();
    let dto = MissionReportDto::from(&report);

    let json = serde_json::to_string_pretty(&dto).unwrap();
    let parsed: MissionReportDto = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, dto);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["stats"][0]["urgence"], "CRITIQUE");
    assert_eq!(value["total_heures"], 16.5);
    assert_eq!(value["zones"], 3);
}

// ==========================================
// 聚合性质
// ==========================================

#[test]
fn test_order_independence() {
    let orchestrator = MissionOrchestrator::default();
    let mut events = vec![
        event("Pothole", 0.91),
        event("Garbage", 0.52),
        event("Unknown", 0.77),
        event("Pothole", 0.12),
        event("Garbage", 0.99),
        event("Pothole", 0.61),
    ];

    let forward = orchestrator.run(fixed_meta(), &events).unwrap();
    events.reverse();
    let reversed = orchestrator.run(fixed_meta(), &events).unwrap();
    events.rotate_left(2);
    let rotated = orchestrator.run(fixed_meta(), &events).unwrap();

    assert_eq!(forward, reversed);
    assert_eq!(forward, rotated);
}

#[test]
fn test_aggregation_is_additive() {
    let classifier = UrgencyClassifier::new();
    let catalog = MaterialCatalog::default();
    let aggregator = MaterialAggregator::new();

    let a = vec![event("Pothole", 0.8), event("Garbage", 0.55)];
    let b = vec![event("Pothole", 0.8), event("Sidewalk", 0.3)];
    let combined: Vec<DetectionEvent> = a.iter().chain(b.iter()).cloned().collect();

    let separate = aggregator
        .aggregate(&a, &classifier, &catalog)
        .merge(&aggregator.aggregate(&b, &classifier, &catalog));
    let together = aggregator.aggregate(&combined, &classifier, &catalog);

    assert_eq!(separate, together);
    assert_eq!(together.get("Asphalte à chaud (kg)"), Some(300.0));
}

#[test]
fn test_aggregation_is_additive_with_fractional_quantities() {
    let classifier = UrgencyClassifier::new();
    let catalog = MaterialCatalog::from_json_str(
        r#"{ "anomalies": { "Defaut": { "FAIBLE": { "Emulsion (L)": 0.1 } } } }"#,
    )
    .unwrap();
    let aggregator = MaterialAggregator::new();

    let a = vec![event("Defaut", 0.2)];
    let b: Vec<DetectionEvent> = (0..5).map(|_| event("Defaut", 0.2)).collect();
    let combined: Vec<DetectionEvent> = a.iter().chain(b.iter()).cloned().collect();

    let separate = aggregator
        .aggregate(&a, &classifier, &catalog)
        .merge(&aggregator.aggregate(&b, &classifier, &catalog));
    let together = aggregator.aggregate(&combined, &classifier, &catalog);

    assert_eq!(separate, together);
    assert_eq!(together.get("Emulsion (L)"), Some(0.6));

    let report = MissionOrchestrator::new(
        catalog,
        MissionPlanner::new(CostModel::default()),
        ReportAssembler::default(),
    )
    .run(fixed_meta(), &combined)
    .unwrap();
    let json = serde_json::to_string(&MissionReportDto::from(&report)).unwrap();
    assert!(json.contains(r#""Emulsion (L)":0.6"#));
}

#[test]
fn test_unknown_type_uses_fallback_recipe() {
    let classifier = UrgencyClassifier::new();
    let catalog = MaterialCatalog::default();
    let aggregator = MaterialAggregator::new();

    let unknown = aggregator.aggregate(&[event("Graffiti", 0.9)], &classifier, &catalog);
    let fallback = aggregator.aggregate(&[event("Defaut", 0.9)], &classifier, &catalog);

    assert_eq!(unknown, fallback);
    assert_eq!(unknown.get("Barrières Sécu"), Some(2.0));
}

#[test]
fn test_missing_tier_yields_empty_recipe() {
    let catalog = MaterialCatalog::from_json_str(
        r#"{
            "fallback_type": "Defaut",
            "anomalies": {
                "Defaut": { "CRITIQUE": { "Barrières Sécu": 2 } }
            }
        }"#,
    )
    .unwrap();

    let materials = MaterialAggregator::new().aggregate(
        &[event("Pothole", 0.2)],
        &UrgencyClassifier::new(),
        &catalog,
    );
    assert!(materials.is_empty());
}

// ==========================================
// 空批次策略
// ==========================================

#[test]
fn test_empty_batch_allowed() {
    let report = MissionOrchestrator::default()
        .run(fixed_meta(), &[])
        .unwrap();

    assert_eq!(report.zone_count(), 0);
    assert!(report.tier_breakdowns().is_empty());
    assert!(report.materials().is_empty());
    assert_eq!(report.total_budget(), 0.0);
    assert_eq!(format_currency(report.total_budget()), "0.00");
}

#[test]
fn test_empty_batch_rejected() {
    let orchestrator = MissionOrchestrator::new(
        MaterialCatalog::default(),
        MissionPlanner::default(),
        ReportAssembler::new(EmptyBatchPolicy::Reject),
    );
    let err = orchestrator.run(fixed_meta(), &[]).unwrap_err();
    assert_eq!(err, PlanningError::EmptyBatch);
}

// ==========================================
// 配置驱动
// ==========================================

#[test]
fn test_custom_labor_rate() {
    let config = PlanningConfig::from_json_str(
        r#"{
            "cost_model": {
                "hourly_labor_rate": 100,
                "tiers": {
                    "CRITIQUE": { "hours_per_crew": 4, "crew_size": 3, "material_budget": 1200 },
                    "MOYENNE": { "hours_per_crew": 2, "crew_size": 2, "material_budget": 400 },
                    "FAIBLE": { "hours_per_crew": 0.5, "crew_size": 1, "material_budget": 50 }
                }
            }
        }"#,
    )
    .unwrap();
    let orchestrator = MissionOrchestrator::from_config(&config).unwrap();

    let report = orchestrator.run(fixed_meta(), &sample_batch()).unwrap();
    // 16.5 h × 100 + 1200 + 400 + 50
    assert_close(report.total_budget(), 3300.0);
    assert_close(report.total_hours(), 16.5);
}

#[test]
fn test_planner_matches_default_cost_model() {
    let planner = MissionPlanner::new(CostModel::default());
    let plan = planner.plan(&sample_batch(), &UrgencyClassifier::new());
    assert_eq!(plan.detection_count(), 3);
    assert_close(
        plan.breakdown_for(UrgencyTier::Critical).unwrap().subtotal,
        1980.0,
    );
    assert_close(plan.breakdown_for(UrgencyTier::Medium).unwrap().subtotal, 660.0);
    assert_close(plan.breakdown_for(UrgencyTier::Low).unwrap().subtotal, 82.5);
}

// ==========================================
// 重复运行一致性
// ==========================================

#[test]
fn test_repeated_runs_identical_except_identity() {
    let orchestrator = MissionOrchestrator::default();
    let first = MissionReportDto::from(&orchestrator.run(fixed_meta(), &sample_batch()).unwrap());

    let later = fixed_now() + chrono::Duration::minutes(90);
    let second_meta = MissionMeta::from_identity("MSN", 43, later);
    let mut second =
        MissionReportDto::from(&orchestrator.run(second_meta, &sample_batch()).unwrap());

    assert_ne!(first.id, second.id);
    second.id = first.id.clone();
    second.heure = first.heure.clone();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
