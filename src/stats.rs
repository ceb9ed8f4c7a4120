//! 결과 집계 및 통계 모듈
//!
//! 결과 채널을 끝까지 소비하며 진행 상황을 출력하고,
//! 실행 통계를 집계하여 요약합니다.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::converter::ConversionResult;
use crate::pipeline::PipelineEvent;

/// 실행 통계
///
/// 집계 루프만 소유하고 수정하므로 동기화가 필요 없습니다.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// 변환 성공 수
    pub converted: usize,
    /// 변환 실패 수
    pub failed: usize,
    /// 발견된 대상 파일 수 (드라이런)
    pub discovered: usize,
    /// 읽지 못한 폴더 수
    pub directory_errors: usize,
    /// 원본 총 크기
    pub original_total: u64,
    /// 변환 후 총 크기
    pub converted_total: u64,
    /// 실패 목록 (경로, 진단 텍스트)
    pub failures: Vec<(PathBuf, String)>,
    start_time: Instant,
    elapsed: Option<Duration>,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            converted: 0,
            failed: 0,
            discovered: 0,
            directory_errors: 0,
            original_total: 0,
            converted_total: 0,
            failures: Vec::new(),
            start_time: Instant::now(),
            elapsed: None,
        }
    }

    /// 변환 결과 하나 반영
    pub fn record(&mut self, result: &ConversionResult) {
        if result.success {
            self.converted += 1;
            self.original_total += result.original_size;
            self.converted_total += result.converted_size;
        } else {
            self.failed += 1;
            self.failures.push((
                result.source.clone(),
                result.diagnostic.clone().unwrap_or_default(),
            ));
        }
    }

    /// 발견된 파일 반영 (드라이런)
    pub fn record_discovered(&mut self) {
        self.discovered += 1;
    }

    /// 폴더 읽기 실패 반영
    pub fn record_directory_error(&mut self, path: PathBuf, reason: String) {
        self.directory_errors += 1;
        self.failures.push((path, reason));
    }

    /// 절감률(%) 계산
    ///
    /// 원본 총 크기가 0이면 `None`을 반환하며 요약에는 "N/A"로 표시됩니다.
    /// 변환 결과가 더 크면 음수가 됩니다.
    pub fn percent_saved(&self) -> Option<f64> {
        if self.original_total == 0 {
            return None;
        }
        let original = self.original_total as f64;
        let converted = self.converted_total as f64;
        Some((original - converted) / original * 100.0)
    }

    /// 변환 실패가 있었는지 여부
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.start_time.elapsed())
    }

    fn finish(mut self) -> Self {
        self.elapsed = Some(self.start_time.elapsed());
        self
    }

    /// 통계 요약 출력
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 변환 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 변환 완료:    {}",
            "✅".bright_green(),
            self.converted.to_string().green()
        );

        if self.failed > 0 {
            println!(
                "  {} 변환 실패:    {}",
                "❌".bright_red(),
                self.failed.to_string().red()
            );
        } else {
            println!("  {} 변환 실패:    {}", "✅".bright_green(), "0".green());
        }

        if self.directory_errors > 0 {
            println!(
                "  {} 폴더 오류:    {}",
                "⚠️".bright_yellow(),
                self.directory_errors.to_string().yellow()
            );
        }

        println!(
            "  {} 원본 용량:    {}",
            "📥".bright_yellow(),
            format_bytes_iec(self.original_total)
        );
        println!(
            "  {} 변환 용량:    {}",
            "📤".bright_magenta(),
            format_bytes_iec(self.converted_total)
        );

        let saved = match self.percent_saved() {
            Some(percent) => format!("{:.1}%", percent),
            None => "N/A".to_string(),
        };
        println!("  {} 절감률:       {}", "📉".bright_white(), saved);

        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }

    /// 드라이런 요약 출력
    pub fn print_dry_run_summary(&self) {
        println!(
            "\n{} 총 {} 개의 파일이 변환될 예정입니다.",
            "ℹ️".bright_blue(),
            self.discovered.to_string().bright_green()
        );
    }
}

/// 진행 상황 출력기
///
/// 진행 줄은 표준 출력, 진단 줄은 표준 에러로 출력합니다.
pub struct Reporter {
    progress: ProgressBar,
    verbose: bool,
    quiet: bool,
}

impl Reporter {
    /// 스피너를 사용하는 출력기 생성
    pub fn new(verbose: bool) -> Self {
        Self {
            progress: create_spinner(),
            verbose,
            quiet: false,
        }
    }

    /// 아무것도 출력하지 않는 출력기 (테스트/라이브러리 용)
    pub fn silent() -> Self {
        Self {
            progress: ProgressBar::hidden(),
            verbose: false,
            quiet: true,
        }
    }

    fn println(&self, line: String) {
        if !self.quiet {
            self.progress.suspend(|| println!("{}", line));
        }
    }

    fn eprintln(&self, line: String) {
        if !self.quiet {
            self.progress.suspend(|| eprintln!("{}", line));
        }
    }

    fn converted(&self, result: &ConversionResult) {
        self.progress.inc(1);
        if result.success {
            self.println(format_converted(result));
            return;
        }

        let diagnostic = result.diagnostic.as_deref().unwrap_or_default();
        let headline = diagnostic.lines().next().unwrap_or_default();
        self.eprintln(format!(
            "  {} 실패: {}: {}",
            "✗".red(),
            result.source.display(),
            headline
        ));
        if self.verbose {
            for line in diagnostic.lines().skip(1) {
                self.eprintln(format!("    {}", line.dimmed()));
            }
        }
    }

    fn discovered(&self, count: usize, path: &Path) {
        self.progress.inc(1);
        self.println(format_discovered(count, path));
    }

    fn directory_failed(&self, path: &Path, reason: &str) {
        self.eprintln(format!(
            "  {} 폴더 읽기 실패: {}: {}",
            "⚠".yellow(),
            path.display(),
            reason
        ));
    }

    fn finish(&self) {
        self.progress.finish_and_clear();
    }
}

/// 결과 채널이 닫힐 때까지 이벤트를 소비하며 통계 집계
///
/// # Arguments
/// * `events` - 파이프라인 결과 스트림
/// * `reporter` - 진행 상황 출력기
///
/// # Returns
/// 최종 실행 통계
pub async fn aggregate(
    mut events: mpsc::Receiver<PipelineEvent>,
    reporter: &Reporter,
) -> RunSummary {
    let mut summary = RunSummary::new();

    while let Some(event) = events.recv().await {
        match event {
            PipelineEvent::Converted(result) => {
                reporter.converted(&result);
                summary.record(&result);
            }
            PipelineEvent::Discovered(path) => {
                summary.record_discovered();
                reporter.discovered(summary.discovered, &path);
            }
            PipelineEvent::DirectoryFailed { path, reason } => {
                reporter.directory_failed(&path, &reason);
                summary.record_directory_error(path, reason);
            }
        }
    }

    reporter.finish();
    summary.finish()
}

/// 변환 성공 진행 줄
pub fn format_converted(result: &ConversionResult) -> String {
    format!(
        "converted: {} to: {}",
        result.source.display(),
        result.destination.display()
    )
}

/// 드라이런 발견 진행 줄 (`count`는 지금까지 발견된 수)
pub fn format_discovered(count: usize, path: &Path) -> String {
    format!("{} files {}", count, path.display())
}

/// 진행 스피너 생성 (전체 개수를 미리 알 수 없으므로 스피너 사용)
fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} 파일 처리됨 {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// 바이트를 1024 단위(IEC) 형식으로 변환
///
/// # Arguments
/// * `bytes` - 바이트 수
///
/// # Returns
/// 소수점 한 자리 형식 문자열 (예: "1.5 KiB")
///
/// # Examples
/// ```
/// use png2jpeg::stats::format_bytes_iec;
///
/// assert_eq!(format_bytes_iec(1023), "1023 B");
/// assert_eq!(format_bytes_iec(1024), "1.0 KiB");
/// assert_eq!(format_bytes_iec(1 << 30), "1.0 GiB");
/// ```
pub fn format_bytes_iec(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1} {}iB", bytes as f64 / div as f64, PREFIXES[exp])
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}시간 {}분", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}분 {}초", mins, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(name: &str, original: u64, converted: u64) -> ConversionResult {
        ConversionResult::success(
            PathBuf::from(format!("{}.png", name)),
            PathBuf::from(format!("{}.jpg", name)),
            original,
            converted,
        )
    }

    #[test]
    fn test_format_bytes_iec() {
        assert_eq!(format_bytes_iec(0), "0 B");
        assert_eq!(format_bytes_iec(1023), "1023 B");
        assert_eq!(format_bytes_iec(1024), "1.0 KiB");
        assert_eq!(format_bytes_iec(1536), "1.5 KiB");
        assert_eq!(format_bytes_iec(1 << 20), "1.0 MiB");
        assert_eq!(format_bytes_iec(1 << 30), "1.0 GiB");
        assert_eq!(format_bytes_iec(1 << 40), "1.0 TiB");
        assert_eq!(format_bytes_iec(u64::MAX), "16.0 EiB");
    }

    #[test]
    fn test_format_converted_line() {
        let line = format_converted(&ok("a/b/photo", 10, 5));
        assert_eq!(line, "converted: a/b/photo.png to: a/b/photo.jpg");
    }

    #[test]
    fn test_format_discovered_line() {
        assert_eq!(
            format_discovered(3, Path::new("imgs/cat.PNG")),
            "3 files imgs/cat.PNG"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.000초");
        assert_eq!(format_duration(Duration::from_secs(65)), "1분 5초");
        assert_eq!(format_duration(Duration::from_secs(3665)), "1시간 1분");
    }

    #[test]
    fn test_summary_counts_and_totals() {
        let mut summary = RunSummary::new();
        summary.record(&ok("a", 1000, 400));
        summary.record(&ok("b", 1000, 600));
        summary.record(&ConversionResult::failure(
            PathBuf::from("c.png"),
            PathBuf::from("c.jpg"),
            "인코더 실패".to_string(),
        ));

        assert_eq!(summary.converted, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.original_total, 2000);
        assert_eq!(summary.converted_total, 1000);
        assert_eq!(summary.percent_saved(), Some(50.0));
        assert!(summary.has_failures());
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].0, PathBuf::from("c.png"));
    }

    #[test]
    fn test_percent_saved_with_zero_total() {
        let summary = RunSummary::new();
        assert_eq!(summary.percent_saved(), None);
        summary.print_summary();
    }

    #[test]
    fn test_percent_saved_negative_when_larger() {
        let mut summary = RunSummary::new();
        summary.record(&ok("a", 100, 150));
        assert_eq!(summary.percent_saved(), Some(-50.0));
    }

    #[test]
    fn test_directory_error_does_not_count_as_failure() {
        let mut summary = RunSummary::new();
        summary.record_directory_error(PathBuf::from("locked"), "권한 없음".to_string());
        assert_eq!(summary.directory_errors, 1);
        assert!(!summary.has_failures());
    }

    #[tokio::test]
    async fn test_aggregate_consumes_until_closed() {
        let (tx, rx) = mpsc::channel(4);
        let producer = tokio::spawn(async move {
            tx.send(PipelineEvent::Converted(ok("a", 10, 5))).await.unwrap();
            tx.send(PipelineEvent::Discovered(PathBuf::from("b.png")))
                .await
                .unwrap();
            tx.send(PipelineEvent::DirectoryFailed {
                path: PathBuf::from("locked"),
                reason: "권한 없음".to_string(),
            })
            .await
            .unwrap();
        });

        let summary = aggregate(rx, &Reporter::silent()).await;
        producer.await.unwrap();

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.discovered, 1);
        assert_eq!(summary.directory_errors, 1);
        assert_eq!(summary.original_total, 10);
    }
}
