// ==========================================
// CleanCity 巡检后勤系统 - 性能统计
// ==========================================
// PerfGuard 在 drop 时以 target "perf" 输出耗时
// 嵌套的 Guard 记录深度,便于区分外层流程与内层步骤
// ==========================================

use std::cell::Cell;
use std::time::Instant;

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// 性能统计 Guard：记录 elapsed_ms + 嵌套深度
///
/// 使用方式：
/// ```ignore
/// let _perf = cleancity_logistics::perf::PerfGuard::new("batch_loader.load");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    depth: u32,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let depth = PERF_DEPTH.with(|d| {
            let current = d.get();
            d.set(current.saturating_add(1));
            current
        });
        Self {
            op,
            start: Instant::now(),
            depth,
        }
    }

    pub fn op(&self) -> &'static str {
        self.op
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            depth = self.depth,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_depth() {
        let outer = PerfGuard::new("outer");
        {
            let inner = PerfGuard::new("inner");
            assert_eq!(inner.depth, outer.depth + 1);
            assert_eq!(inner.op(), "inner");
        }
        let sibling = PerfGuard::new("sibling");
        assert_eq!(sibling.depth, outer.depth + 1);
    }
}
