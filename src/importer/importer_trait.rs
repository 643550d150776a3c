// ==========================================
// CleanCity 巡检后勤系统 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 阶段:
//   0) 文件读取与解析 → RawTable
//   1) 字段映射与类型转换 → DetectionRecord
//   2) 数据质量校验 → DqReport
// ==========================================

use crate::domain::detection::DetectionRecord;
use crate::importer::dq_validator::DqReport;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{RawRecord, RawTable};
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser, JsonParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表（表头 + 字符串行）
    ///
    /// # 返回
    /// - Ok(RawTable): 跳过完全空白的行
    /// - Err: 文件不存在 / 文件为空 / 格式错误
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 列名别名识别 + 类型转换（阶段 1）
pub trait FieldMapper: Send + Sync {
    /// 校验表头包含必需列
    fn check_headers(&self, headers: &[String]) -> ImportResult<()>;

    /// 单行映射为检测记录
    fn map_record(&self, raw: &RawRecord) -> ImportResult<DetectionRecord>;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 数据质量校验（阶段 2）
pub trait DqValidator: Send + Sync {
    /// 校验整批记录
    ///
    /// # 参数
    /// - records: (行号, 记录)
    fn validate(&self, records: &[(usize, DetectionRecord)]) -> DqReport;
}
