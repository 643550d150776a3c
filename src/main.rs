// ==========================================
// CleanCity 巡检后勤系统 - 命令行主入口
// ==========================================
// 用法: cleancity-logistics [批次文件 ...] [-o 出库单文件] [-p 点位文件]
// 退出码: 0 成功 / 2 批次缺失 / 3 校验失败 / 4 配置错误 / 1 其他
// ==========================================

use cleancity_logistics::api::{
    ApiError, MissionApi, MissionReportDto, DEFAULT_BATCH_FILE, DEFAULT_POINTS_FILE,
    DEFAULT_REPORT_FILE,
};
use cleancity_logistics::i18n::{t, t_with_args};
use cleancity_logistics::{i18n, logging, UrgencyTier};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// 命令行参数
#[derive(Debug, PartialEq)]
struct CliArgs {
    batches: Vec<PathBuf>,
    output: PathBuf,
    points: PathBuf,
}

/// 解析命令行参数（不含程序名）
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, String> {
    let mut batches = Vec::new();
    let mut output = None;
    let mut points = None;
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => match iter.next() {
                Some(path) => output = Some(PathBuf::from(path)),
                None => return Err(format!("{} requires a path", arg)),
            },
            "-p" | "--points" => match iter.next() {
                Some(path) => points = Some(PathBuf::from(path)),
                None => return Err(format!("{} requires a path", arg)),
            },
            "-h" | "--help" => return Err(String::new()),
            _ => batches.push(PathBuf::from(arg)),
        }
    }

    if batches.is_empty() {
        batches.push(PathBuf::from(DEFAULT_BATCH_FILE));
    }

    Ok(CliArgs {
        batches,
        output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE)),
        points: points.unwrap_or_else(|| PathBuf::from(DEFAULT_POINTS_FILE)),
    })
}

fn tier_label(tier: UrgencyTier) -> String {
    t(tier.i18n_key())
}

fn print_summary(dto: &MissionReportDto, output: &Path) {
    println!(
        "{}",
        t_with_args(
            "cli.report_written",
            &[("id", &dto.id), ("path", &output.display().to_string())]
        )
    );
    for stat in &dto.stats {
        println!(
            "{}",
            t_with_args(
                "cli.tier_line",
                &[
                    ("tier", &tier_label(stat.urgence)),
                    ("count", &stat.count.to_string()),
                    ("hours", &stat.heures.to_string()),
                    ("staff", &stat.staff_unit.to_string()),
                ]
            )
        );
    }
    println!(
        "{}",
        t_with_args(
            "cli.report_summary",
            &[
                ("zones", &dto.zones.to_string()),
                ("hours", &dto.total_heures.to_string()),
                ("budget", &dto.total_budget),
            ]
        )
    );
}

async fn run(args: CliArgs) -> Result<(), ApiError> {
    let (api, config_source) = MissionApi::from_environment()?;
    match config_source {
        Some(path) => tracing::info!(
            "{}",
            t_with_args("cli.config_loaded", &[("path", &path.display().to_string())])
        ),
        None => tracing::info!("{}", t("cli.config_default")),
    }

    let now = chrono::Local::now().naive_local();
    let output = api.generate_from_files(&args.batches, now).await?;
    api.write_report(&output.report, &args.output)?;
    api.write_points(&output.points, &args.points)?;

    print_summary(&output.report, &args.output);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let locale = i18n::init_from_env();

    tracing::info!(
        version = cleancity_logistics::VERSION,
        locale,
        "{}",
        cleancity_logistics::APP_NAME
    );

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("{}", message);
            }
            eprintln!("{}", t("cli.usage"));
            return ExitCode::from(1);
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, exit_code = err.exit_code(), "任务报告生成失败");
            let detail = match &err {
                ApiError::InputMissing(inner) => inner.to_string(),
                ApiError::Validation(inner) => inner.to_string(),
                ApiError::Config(inner) => inner.to_string(),
                ApiError::Output { .. } => err.to_string(),
            };
            eprintln!("{}", t_with_args(err.i18n_key(), &[("detail", &detail)]));
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
