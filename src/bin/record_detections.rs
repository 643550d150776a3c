// Capture-mode recorder: reads raw detections as JSON lines on stdin,
// classifies them and appends them to a local batch file.
//
// Usage:
//   detector | record_detections [rapport_anomalies.csv]
//
// Each line: {"type": "Pothole", "confidence": 0.81, "latitude": 34.02, "longitude": -6.84}
// Remote sync is not wired here; records are pushed through the no-op channel.

use anyhow::Context;
use cleancity_logistics::api::DEFAULT_BATCH_FILE;
use cleancity_logistics::capture::{CaptureSession, NoOpDetectionSync, RawDetection};
use cleancity_logistics::i18n::{t, t_with_args};
use cleancity_logistics::{i18n, logging};
use std::io::BufRead;
use std::sync::Arc;

fn skip_line(line: usize, detail: &str) {
    tracing::warn!(line, error = %detail, "invalid detection line");
    eprintln!(
        "{}",
        t_with_args(
            "capture.invalid_line",
            &[("line", &line.to_string()), ("detail", detail)]
        )
    );
}

fn main() -> anyhow::Result<()> {
    logging::init();
    i18n::init_from_env();

    let batch_path = match std::env::args().nth(1) {
        Some(arg) if arg == "-h" || arg == "--help" => {
            eprintln!("{}", t("capture.usage"));
            return Ok(());
        }
        Some(path) => path,
        None => DEFAULT_BATCH_FILE.to_string(),
    };

    let mut session = CaptureSession::open(&batch_path, Arc::new(NoOpDetectionSync))
        .with_context(|| format!("cannot open batch file {}", batch_path))?;

    let stdin = std::io::stdin();
    for (idx, line) in stdin.lock().lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let raw: RawDetection = match serde_json::from_str(&line) {
            Ok(raw) => raw,
            Err(e) => {
                skip_line(idx + 1, &e.to_string());
                continue;
            }
        };

        match session.record(raw) {
            Ok(_) => {}
            Err(e) if e.is_rejected_detection() => skip_line(idx + 1, &e.to_string()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to append line {} to {}", idx + 1, batch_path))
            }
        }
    }

    let summary = session.summary();
    println!(
        "{}",
        t_with_args(
            "capture.summary",
            &[
                ("recorded", &summary.recorded.to_string()),
                ("path", &session.batch_path().display().to_string()),
                ("unsynced", &summary.unsynced.to_string()),
            ]
        )
    );
    Ok(())
}
