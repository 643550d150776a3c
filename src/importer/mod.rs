// ==========================================
// CleanCity 巡检后勤系统 - 导入层
// ==========================================
// 职责: 检测批次的读取与追加写入
// 支持: CSV, Excel, JSON
// ==========================================

// 模块声明
pub mod batch_loader;
pub mod batch_writer;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;

// 重导出核心类型
pub use batch_loader::{BatchLoader, DetectionBatch};
pub use batch_writer::BatchWriter;
pub use dq_validator::{DqLevel, DqReport, DqSummary, DqValidator as DqValidatorImpl, DqViolation};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper as FieldMapperImpl, DATE_HEURE_FORMAT};
pub use file_parser::{CsvParser, ExcelParser, JsonParser, RawRecord, RawTable, UniversalFileParser};

// 重导出 Trait 接口
pub use importer_trait::{DqValidator, FieldMapper, FileParser};
