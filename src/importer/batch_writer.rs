// ==========================================
// CleanCity 巡检后勤系统 - 检测批次写入器
// ==========================================
// 格式: CSV 追加写入,列顺序与 DetectionRecord 一致
// 表头仅在文件新建或为空时写入
// ==========================================

use crate::domain::detection::DetectionRecord;
use crate::importer::error::{ImportError, ImportResult};
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct BatchWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
    written: usize,
}

impl BatchWriter {
    /// 以追加模式打开批次文件
    pub fn open_append<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref().to_path_buf();

        let needs_header = match std::fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| ImportError::FileWriteError(format!("{}: {}", path.display(), e)))?;

        let writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        debug!(path = %path.display(), needs_header, "批次文件已打开");

        Ok(Self {
            path,
            writer,
            written: 0,
        })
    }

    /// 追加一条记录（逐条落盘）
    pub fn append(&mut self, record: &DetectionRecord) -> ImportResult<()> {
        self.writer
            .serialize(record)
            .map_err(|e| ImportError::FileWriteError(e.to_string()))?;
        self.writer
            .flush()
            .map_err(|e| ImportError::FileWriteError(e.to_string()))?;
        self.written += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 本次会话写入的记录数
    pub fn written(&self) -> usize {
        self.written
    }
}
