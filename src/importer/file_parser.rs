// ==========================================
// CleanCity 巡检后勤系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: CSV (.csv) / Excel (.xlsx/.xls) / JSON (.json)
// JSON: 记录数组,或云端导出的 {key: 记录} 对象
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// RawRecord / RawTable - 原始解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 源文件行号（CSV/Excel 表头为第 1 行；JSON 为记录序号,从 1 开始）
    pub row_number: usize,
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// 检查文件存在
fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.is_file() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// 检查扩展名
fn ensure_extension(path: &Path, allowed: &[&str]) -> ImportResult<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !allowed.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        ensure_exists(path)?;
        ensure_extension(path, &["csv"])?;

        // 打开 CSV 文件
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyFile(path.display().to_string()));
        }

        // 读取所有行
        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(row_idx + 2);

            let mut fields = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if fields.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(RawRecord { row_number, fields });
        }

        Ok(RawTable { headers, records })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        ensure_exists(path)?;
        ensure_extension(path, &["xlsx", "xls"])?;

        // 打开 Excel 文件（按扩展名自动识别）
        let mut workbook = open_workbook_auto(path)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet_names.first() {
            Some(name) => name.clone(),
            None => {
                return Err(ImportError::ExcelParseError(
                    "Excel 文件无工作表".to_string(),
                ))
            }
        };
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::EmptyFile(path.display().to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        // 读取数据行
        let mut records = Vec::new();
        for (row_idx, data_row) in rows.enumerate() {
            let mut fields = HashMap::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            // 跳过完全空白的行
            if fields.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(RawRecord {
                row_number: row_idx + 2,
                fields,
            });
        }

        Ok(RawTable { headers, records })
    }
}

// ==========================================
// JSON Parser 实现
// ==========================================
pub struct JsonParser;

impl JsonParser {
    /// JSON 值转字符串（嵌套结构不支持）
    fn value_to_string(key: &str, value: &Value, row: usize) -> ImportResult<String> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s.trim().to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Array(_) | Value::Object(_) => Err(ImportError::TypeConversionError {
                row,
                field: key.to_string(),
                message: "不支持嵌套结构".to_string(),
            }),
        }
    }

    fn object_to_record(
        object: &serde_json::Map<String, Value>,
        row_number: usize,
    ) -> ImportResult<RawRecord> {
        let mut fields = HashMap::new();
        for (key, value) in object {
            fields.insert(
                key.trim().to_string(),
                Self::value_to_string(key, value, row_number)?,
            );
        }
        Ok(RawRecord { row_number, fields })
    }
}

impl FileParser for JsonParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        ensure_exists(path)?;
        ensure_extension(path, &["json"])?;

        let raw = std::fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Err(ImportError::EmptyFile(path.display().to_string()));
        }

        let root: Value = serde_json::from_str(&raw)?;
        let objects: Vec<&serde_json::Map<String, Value>> = match &root {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    item.as_object().ok_or_else(|| {
                        ImportError::JsonParseError(format!("第 {} 条记录不是对象", idx + 1))
                    })
                })
                .collect::<ImportResult<_>>()?,
            // 云端导出: {push_key: 记录}，push_key 按时间递增
            Value::Object(map) => map
                .iter()
                .map(|(key, item)| {
                    item.as_object().ok_or_else(|| {
                        ImportError::JsonParseError(format!("键 {} 对应的值不是对象", key))
                    })
                })
                .collect::<ImportResult<_>>()?,
            Value::Null => Vec::new(),
            _ => {
                return Err(ImportError::JsonParseError(
                    "根节点必须是数组或对象".to_string(),
                ))
            }
        };

        let mut headers: Vec<String> = Vec::new();
        let mut records = Vec::with_capacity(objects.len());
        for (idx, object) in objects.into_iter().enumerate() {
            let record = Self::object_to_record(object, idx + 1)?;
            for key in record.fields.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
            records.push(record);
        }

        Ok(RawTable { headers, records })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_table(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_table(path),
            "json" => JsonParser.parse_to_raw_table(path),
            _ => {
                // 未知扩展名时,文件不存在优先报告
                ensure_exists(path)?;
                Err(ImportError::UnsupportedFormat(ext))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_with_suffix(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let temp_file = temp_with_suffix(
            ".csv",
            "timestamp,type,confiance\n1700000000.0,Pothole,0.81\n1700000001.0,Garbage,0.42\n",
        );

        let table = CsvParser.parse_to_raw_table(temp_file.path()).unwrap();

        assert_eq!(table.headers, vec!["timestamp", "type", "confiance"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].fields.get("type"), Some(&"Pothole".to_string()));
        assert_eq!(table.records[0].row_number, 2);
        assert_eq!(table.records[1].row_number, 3);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_table(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_empty_file() {
        let temp_file = temp_with_suffix(".csv", "");
        let result = CsvParser.parse_to_raw_table(temp_file.path());
        assert!(matches!(result, Err(ImportError::EmptyFile(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let temp_file = temp_with_suffix(".csv", "type,confiance\nPothole,0.8\n,\nGarbage,0.3\n");

        let table = CsvParser.parse_to_raw_table(temp_file.path()).unwrap();

        // 应跳过空行
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[1].row_number, 4);
    }

    #[test]
    fn test_json_parser_array() {
        let temp_file = temp_with_suffix(
            ".json",
            r#"[{"type": "Pothole", "confiance": 0.8, "latitude": 34.02}]"#,
        );

        let table = JsonParser.parse_to_raw_table(temp_file.path()).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].fields.get("confiance"), Some(&"0.8".to_string()));
        assert_eq!(table.records[0].row_number, 1);
    }

    #[test]
    fn test_json_parser_keyed_export() {
        let temp_file = temp_with_suffix(
            ".json",
            r#"{
                "-Nb1": {"type": "Pothole", "confiance": 0.8},
                "-Nb2": {"type": "Garbage", "confiance": 0.3, "urgence": null}
            }"#,
        );

        let table = JsonParser.parse_to_raw_table(temp_file.path()).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[1].fields.get("urgence"), Some(&String::new()));
    }

    #[test]
    fn test_json_parser_rejects_nested_values() {
        let temp_file = temp_with_suffix(".json", r#"[{"type": {"name": "Pothole"}}]"#);
        let result = JsonParser.parse_to_raw_table(temp_file.path());
        assert!(matches!(result, Err(ImportError::TypeConversionError { .. })));
    }

    #[test]
    fn test_universal_parser_unsupported_format() {
        let temp_file = temp_with_suffix(".txt", "type\nPothole\n");
        let result = UniversalFileParser.parse(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }
}
