// ==========================================
// CleanCity 巡检后勤系统 - 检测批次加载器
// ==========================================
// 流程: 解析 → 表头校验 → 字段映射 → DQ 校验 → DetectionBatch
// 红线: 任一行映射失败或存在 DQ Error 时整批失败,不做部分规划
// ==========================================

use crate::domain::detection::{DetectionEvent, DetectionRecord};
use crate::importer::dq_validator::{DqLevel, DqReport, DqValidator as DqValidatorImpl};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{DqValidator, FieldMapper};
use crate::perf::PerfGuard;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// DetectionBatch - 已加载的检测批次
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionBatch {
    /// 来源文件（按加载顺序）
    pub sources: Vec<PathBuf>,
    pub records: Vec<DetectionRecord>,
    pub dq_report: DqReport,
}

impl DetectionBatch {
    /// 规划引擎输入
    pub fn events(&self) -> Vec<DetectionEvent> {
        self.records.iter().map(DetectionRecord::to_event).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 按顺序拼接多个批次
    pub fn concat(batches: Vec<DetectionBatch>) -> Self {
        batches
            .into_iter()
            .fold(DetectionBatch::default(), |mut acc, batch| {
                acc.sources.extend(batch.sources);
                acc.records.extend(batch.records);
                acc.dq_report = acc.dq_report.merge(batch.dq_report);
                acc
            })
    }
}

// ==========================================
// BatchLoader - 批次加载器
// ==========================================
#[derive(Clone)]
pub struct BatchLoader {
    parser: UniversalFileParser,
    field_mapper: Arc<dyn FieldMapper>,
    dq_validator: Arc<dyn DqValidator>,
}

impl BatchLoader {
    pub fn new(field_mapper: Arc<dyn FieldMapper>, dq_validator: Arc<dyn DqValidator>) -> Self {
        Self {
            parser: UniversalFileParser,
            field_mapper,
            dq_validator,
        }
    }

    /// 加载单个批次文件
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(&self, path: P) -> ImportResult<DetectionBatch> {
        let path = path.as_ref();
        let _perf = PerfGuard::new("batch_loader.load");

        // === 步骤 1: 解析文件 ===
        let table = self.parser.parse(path)?;
        debug!(rows = table.records.len(), "文件解析完成");

        // === 步骤 2: 表头校验 ===
        if !table.records.is_empty() {
            self.field_mapper.check_headers(&table.headers)?;
        }

        // === 步骤 3: 字段映射（首个错误即中止） ===
        let mapped = table
            .records
            .iter()
            .map(|raw| -> ImportResult<(usize, DetectionRecord)> {
                Ok((raw.row_number, self.field_mapper.map_record(raw)?))
            })
            .collect::<ImportResult<Vec<_>>>()?;

        // === 步骤 4: DQ 校验 ===
        let dq_report = self.dq_validator.validate(&mapped);
        if let Some(first) = dq_report.first_error() {
            return Err(ImportError::DataQualityError {
                errors: dq_report.summary.errors,
                row: first.row_number,
                field: first.field.clone(),
                message: first.message.clone(),
            });
        }
        for violation in dq_report
            .violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning)
        {
            warn!(
                row = violation.row_number,
                field = %violation.field,
                "{}",
                violation.message
            );
        }

        let records: Vec<DetectionRecord> = mapped.into_iter().map(|(_, r)| r).collect();
        info!(
            records = records.len(),
            warnings = dq_report.summary.warnings,
            "批次加载完成"
        );

        Ok(DetectionBatch {
            sources: vec![path.to_path_buf()],
            records,
            dq_report,
        })
    }

    /// 并行加载多个批次文件,按参数顺序拼接
    ///
    /// 任一文件失败时整体失败
    pub async fn load_many(&self, paths: &[PathBuf]) -> ImportResult<DetectionBatch> {
        let tasks = paths.iter().cloned().map(|path| {
            let loader = self.clone();
            tokio::task::spawn_blocking(move || loader.load(path))
        });

        let batches = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| {
                joined
                    .map_err(|e| ImportError::InternalError(e.to_string()))
                    .and_then(|loaded| loaded)
            })
            .collect::<ImportResult<Vec<_>>>()?;

        Ok(DetectionBatch::concat(batches))
    }
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self::new(
            Arc::new(FieldMapperImpl),
            Arc::new(DqValidatorImpl::default()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::UrgencyTier;
    use std::io::Write;
    use tempfile::Builder;

    const HEADER: &str = "timestamp,date_heure,latitude,longitude,type,confiance,urgence,statut\n";

    fn csv_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}{}", HEADER, body).unwrap();
        file
    }

    #[test]
    fn test_load_valid_batch() {
        let file = csv_file(
            "1700000000.0,2023-11-14 22:13:20,34.02,-6.84,Pothole,0.8,CRITIQUE,NON_TRAITE\n\
             1700000005.0,2023-11-14 22:13:25,34.03,-6.85,Garbage,0.3,FAIBLE,NON_TRAITE\n",
        );

        let batch = BatchLoader::default().load(file.path()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[0].urgence, Some(UrgencyTier::Critical));
        assert_eq!(batch.events()[1].anomaly_type, "Garbage");
        assert_eq!(batch.sources, vec![file.path().to_path_buf()]);
    }

    #[test]
    fn test_header_only_batch_is_empty() {
        let file = csv_file("");
        let batch = BatchLoader::default().load(file.path()).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_out_of_range_confidence_aborts() {
        let file = csv_file(
            "1700000000.0,2023-11-14 22:13:20,34.02,-6.84,Pothole,0.8,CRITIQUE,NON_TRAITE\n\
             1700000005.0,2023-11-14 22:13:25,34.03,-6.85,Garbage,1.7,,NON_TRAITE\n",
        );

        let err = BatchLoader::default().load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::DataQualityError { errors: 1, row: 3, ref field, .. } if field == "confiance"
        ));
    }

    #[test]
    fn test_missing_column_aborts() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "timestamp,type,latitude,longitude\n1,Pothole,34.0,-6.8\n").unwrap();
        let err = BatchLoader::default().load(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn(ref c) if c == "confiance"));
    }

    #[tokio::test]
    async fn test_load_many_keeps_argument_order() {
        let first = csv_file(
            "1700000000.0,2023-11-14 22:13:20,34.02,-6.84,Pothole,0.8,CRITIQUE,NON_TRAITE\n",
        );
        let second = csv_file(
            "1700000005.0,2023-11-14 22:13:25,34.03,-6.85,Garbage,0.3,FAIBLE,NON_TRAITE\n",
        );

        let batch = BatchLoader::default()
            .load_many(&[first.path().to_path_buf(), second.path().to_path_buf()])
            .await
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[0].anomaly_type, "Pothole");
        assert_eq!(batch.records[1].anomaly_type, "Garbage");
        assert_eq!(batch.dq_report.summary.total_rows, 2);
    }

    #[tokio::test]
    async fn test_load_many_fails_on_missing_file() {
        let first = csv_file("");
        let err = BatchLoader::default()
            .load_many(&[first.path().to_path_buf(), PathBuf::from("absent.csv")])
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }
}
