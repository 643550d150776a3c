// ==========================================
// CleanCity 巡检后勤系统 - 任务报告API
// ==========================================
// 职责: 加载检测批次 → 引擎编排 → DTO（出库单 + 地图点位）→ JSON 输出
// 流程: 批次加载失败时在规划前中止
// ==========================================

use crate::api::dto::{DetectionPointDto, MissionOutput, MissionReportDto};
use crate::api::error::{ApiError, ApiResult};
use crate::config::PlanningConfig;
use crate::domain::mission::{MissionMeta, MissionReport};
use crate::engine::{MaterialAggregator, MissionOrchestrator};
use crate::importer::{BatchLoader, DetectionBatch};
use crate::perf::PerfGuard;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// 默认检测批次文件
pub const DEFAULT_BATCH_FILE: &str = "rapport_anomalies.csv";

/// 默认报告输出文件
pub const DEFAULT_REPORT_FILE: &str = "bon_de_sortie.json";

/// 默认地图点位输出文件
pub const DEFAULT_POINTS_FILE: &str = "points_anomalies.json";

// ==========================================
// MissionApi - 任务报告API
// ==========================================
#[derive(Clone)]
pub struct MissionApi {
    config: PlanningConfig,
    orchestrator: MissionOrchestrator,
    loader: BatchLoader,
}

impl MissionApi {
    /// 从已加载的配置创建API
    pub fn new(config: PlanningConfig) -> ApiResult<Self> {
        let orchestrator = MissionOrchestrator::from_config(&config)?;
        Ok(Self {
            config,
            orchestrator,
            loader: BatchLoader::default(),
        })
    }

    /// 按配置查找顺序加载配置并创建API
    ///
    /// # 返回
    /// - (API, 实际使用的配置文件；None 表示内置默认值)
    pub fn from_environment() -> ApiResult<(Self, Option<PathBuf>)> {
        let (config, source) = PlanningConfig::load()?;
        Ok((Self::new(config)?, source))
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// 生成任务元数据
    pub fn mission_meta(&self, now: NaiveDateTime) -> MissionMeta {
        MissionMeta::from_identity(
            &self.config.mission.id_prefix,
            self.config.mission.sequence,
            now,
        )
    }

    /// 加载一个或多个检测批次
    pub async fn load_batches(&self, paths: &[PathBuf]) -> ApiResult<DetectionBatch> {
        let batch = self.loader.load_many(paths).await?;
        info!(
            files = batch.sources.len(),
            detections = batch.len(),
            dq_warnings = batch.dq_report.summary.warnings,
            "检测批次加载完成"
        );
        Ok(batch)
    }

    /// 对已加载的批次生成任务报告
    pub fn generate_from_batch(
        &self,
        batch: &DetectionBatch,
        now: NaiveDateTime,
    ) -> ApiResult<MissionReport> {
        let events = batch.events();
        let report = self.orchestrator.run(self.mission_meta(now), &events)?;
        Ok(report)
    }

    /// 批次中每个检测的地图点位（等级 + 配方）
    pub fn detection_points(&self, batch: &DetectionBatch) -> Vec<DetectionPointDto> {
        let classifier = self.orchestrator.classifier();
        let catalog = self.orchestrator.catalog();
        let aggregator = MaterialAggregator::new();

        batch
            .events()
            .iter()
            .map(|event| {
                DetectionPointDto::new(
                    event,
                    classifier.classify_event(event),
                    aggregator.recipe_for_event(event, classifier, catalog),
                )
            })
            .collect()
    }

    /// 从批次文件生成出库单与地图点位
    #[instrument(skip(self, paths, now), fields(files = paths.len()))]
    pub async fn generate_from_files(
        &self,
        paths: &[PathBuf],
        now: NaiveDateTime,
    ) -> ApiResult<MissionOutput> {
        let _perf = PerfGuard::new("mission_api.generate_from_files");

        let batch = self.load_batches(paths).await?;
        let report = self.generate_from_batch(&batch, now)?;
        Ok(MissionOutput {
            report: MissionReportDto::from(&report),
            points: self.detection_points(&batch),
        })
    }

    /// 写出报告 JSON（pretty）
    pub fn write_report<P: AsRef<Path>>(&self, dto: &MissionReportDto, path: P) -> ApiResult<()> {
        let path = path.as_ref();
        write_json(dto, path)?;
        info!(path = %path.display(), mission_id = %dto.id, "出库单已写出");
        Ok(())
    }

    /// 写出地图点位 JSON（pretty）
    pub fn write_points<P: AsRef<Path>>(
        &self,
        points: &[DetectionPointDto],
        path: P,
    ) -> ApiResult<()> {
        let path = path.as_ref();
        write_json(&points, path)?;
        info!(path = %path.display(), points = points.len(), "地图点位已写出");
        Ok(())
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> ApiResult<()> {
    let output_error = |message: String| ApiError::Output {
        path: path.display().to_string(),
        message,
    };

    let json = serde_json::to_string_pretty(value).map_err(|e| output_error(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| output_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmptyBatchPolicy;
    use crate::domain::types::UrgencyTier;
    use crate::engine::PlanningError;
    use crate::importer::ImportError;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap()
    }

    fn batch_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(
            file,
            "timestamp,date_heure,latitude,longitude,type,confiance,urgence,statut\n{}",
            body
        )
        .unwrap();
        file
    }

    #[tokio::test]
    async fn test_generate_from_files() {
        let file = batch_file(
            "1.0,2026-10-19 08:00:00,34.02,-6.84,Pothole,0.8,CRITIQUE,NON_TRAITE\n\
             2.0,2026-10-19 08:00:01,34.02,-6.84,Pothole,0.6,MOYENNE,NON_TRAITE\n\
             3.0,2026-10-19 08:00:02,34.02,-6.84,Garbage,0.3,FAIBLE,NON_TRAITE\n",
        );
        let api = MissionApi::new(PlanningConfig::default()).unwrap();

        let output = api
            .generate_from_files(&[file.path().to_path_buf()], now())
            .await
            .unwrap();
        let dto = &output.report;

        assert_eq!(dto.id, "MSN-20261019-042");
        assert_eq!(dto.date, "19/10/2026");
        assert_eq!(dto.heure, "09:05");
        assert_eq!(dto.total_budget, "2,722.50");
        assert_eq!(dto.total_heures, 16.5);
        assert_eq!(dto.zones, 3);

        assert_eq!(output.points.len(), 3);
        assert_eq!(output.points[0].urgence, UrgencyTier::Critical);
        assert_eq!(output.points[0].materiaux_requis.get("Asphalte à chaud (kg)"), Some(&150.0));
        assert_eq!(output.points[2].urgence, UrgencyTier::Low);
        assert_eq!(output.points[2].materiaux_requis.get("Sacs 30L (u)"), Some(&2.0));
    }

    #[tokio::test]
    async fn test_missing_batch_is_input_error() {
        let api = MissionApi::new(PlanningConfig::default()).unwrap();
        let err = api
            .generate_from_files(&[PathBuf::from("absent/rapport_anomalies.csv")], now())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InputMissing(ImportError::FileNotFound(_))));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch_rejected_by_policy() {
        let file = batch_file("");
        let config = PlanningConfig {
            empty_batch_policy: EmptyBatchPolicy::Reject,
            ..PlanningConfig::default()
        };
        let api = MissionApi::new(config).unwrap();

        let err = api
            .generate_from_files(&[file.path().to_path_buf()], now())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(PlanningError::EmptyBatch)));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_write_report_pretty_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bon_de_sortie.json");
        let api = MissionApi::new(PlanningConfig::default()).unwrap();

        let report = api
            .generate_from_batch(&DetectionBatch::default(), now())
            .unwrap();
        let dto = MissionReportDto::from(&report);
        api.write_report(&dto, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  \"id\": \"MSN-20261019-042\""));
        let parsed: MissionReportDto = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, dto);
        assert_eq!(parsed.total_budget, "0.00");
    }

    #[test]
    fn test_write_points_for_unknown_type() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("points_anomalies.json");
        let api = MissionApi::new(PlanningConfig::default()).unwrap();

        let file = batch_file("1.0,2026-10-19 08:00:00,34.020882,-6.84163,Graffiti,0.9,,NON_TRAITE\n");
        let batch = api.loader.load(file.path()).unwrap();
        let points = api.detection_points(&batch);
        api.write_points(&points, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["type"], "Graffiti");
        assert_eq!(value[0]["urgence"], "CRITIQUE");
        assert_eq!(value[0]["latitude"], 34.0209);
        assert_eq!(value[0]["materiaux_requis"]["Barrières Sécu"], 2.0);
    }
}
