//! png2jpeg - PNG TO JPEG BATCH CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

use png2jpeg::{
    cli::{version_string, Args},
    config::RunConfig,
    encoder::CjpegEncoder,
    error::ConvertError,
    pipeline::Pipeline,
    stats::{Reporter, RunSummary},
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // 버전 출력은 파일 시스템 작업 없이 즉시 종료
    if args.version {
        println!("{}", version_string());
        return Ok(ExitCode::SUCCESS);
    }

    setup_logging(args.verbose);

    // 설정 검증 (실패 시 탐색 전에 종료)
    let config = args.to_config();
    config.validate().context("설정 검증 실패")?;

    // 헤더 출력
    print_header(&args, &config);

    let encoder = Arc::new(CjpegEncoder::new(&args.encoder));
    let pipeline = Pipeline::new(config, encoder);
    let reporter = Reporter::new(args.verbose);

    let summary = pipeline.run(&reporter).await;

    if args.dry_run {
        summary.print_dry_run_summary();
        return Ok(ExitCode::SUCCESS);
    }

    // 로그 파일 작성
    if let Some(ref log_path) = args.log {
        if let Err(e) = write_error_log(log_path, &summary) {
            error!("{}", e);
        }
    }

    // 통계 출력
    if args.stats {
        summary.print_summary();
    }

    Ok(exit_code(&summary))
}

/// 종료 코드: 변환 실패가 하나라도 있으면 1
fn exit_code(summary: &RunSummary) -> ExitCode {
    if summary.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// 로깅 설정 (표준 에러로 출력, RUST_LOG가 있으면 우선)
fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("png2jpeg=debug,warn")
        } else {
            EnvFilter::new("png2jpeg=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 헤더 출력
fn print_header(args: &Args, config: &RunConfig) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!(
        "{}",
        " 🚀 PNG TO JPEG BATCH CONVERTER".bright_white().bold()
    );
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 폴더: {:?}", "📂".bright_cyan(), config.root);
    println!(
        "  {} 변환: .{} → .{}",
        "🔁".bright_green(),
        config.source_ext,
        config.target_ext
    );

    if !config.dry_run {
        println!("  {} 인코더: {:?}", "⚙️".bright_yellow(), args.encoder);
        println!("  {} 품질: {}", "🎚️".bright_magenta(), config.quality);
    }

    println!(
        "  {} 동시 변환: {} / 동시 읽기: {}",
        "⚡".bright_white(),
        config.workers,
        config.read_workers
    );

    if config.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변환 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!("\n{}", "📁 파일 검색 중...".bright_cyan());
}

/// 에러 로그 파일 작성
fn write_error_log(log_path: &PathBuf, summary: &RunSummary) -> Result<(), ConvertError> {
    write_log_entries(log_path, &summary.failures).map_err(|e| ConvertError::LogWrite {
        path: log_path.clone(),
        reason: e.to_string(),
    })?;

    println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);

    Ok(())
}

fn write_log_entries(log_path: &Path, errors: &[(PathBuf, String)]) -> std::io::Result<()> {
    let mut log_file = File::create(log_path)?;

    writeln!(log_file, "png2jpeg 에러 로그")?;
    writeln!(log_file, "생성 시간: {}", chrono_now())?;
    writeln!(log_file, "총 에러 수: {}", errors.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for (path, error) in errors {
        writeln!(log_file, "\n파일: {:?}", path)?;
        writeln!(log_file, "에러: {}", error)?;
    }

    Ok(())
}

/// 현재 시간 문자열 반환
fn chrono_now() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now();
    let duration = now
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", duration.as_secs())
}
