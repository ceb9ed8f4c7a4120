//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{
    default_workers, RunConfig, DEFAULT_ENCODER, DEFAULT_QUALITY, DEFAULT_SOURCE_EXT,
    DEFAULT_TARGET_EXT,
};

/// 프로그램 이름
pub const NAME: &str = "png2jpeg";

/// png2jpeg CLI 인자 구조체
#[derive(Parser, Debug, Clone)]
#[command(
    name = "png2jpeg",
    author = "YourName <your@email.com>",
    disable_version_flag = true,
    about = "PNG TO JPEG BATCH CONVERTER - 폴더 내 PNG 이미지를 외부 인코더로 병렬 변환하는 CLI 도구",
    long_about = r#"
PNG TO JPEG BATCH CONVERTER
===========================

지정된 폴더를 재귀적으로 탐색하여 모든 PNG 파일을
외부 인코더(cjpeg)로 같은 위치의 JPEG 파일로 변환합니다.

특징:
  • 동시 변환 수 제한 (기본값: CPU 코어 수)
  • 파일/폴더 단위 오류는 해당 항목만 건너뜀
  • 변환 전후 용량 및 절감률 통계

예제:
  png2jpeg -d images
  png2jpeg -d images -q 60
  png2jpeg -d images -q 60 -w 1 --stats
  png2jpeg -d images --dry-run
"#
)]
pub struct Args {
    /// PNG 이미지가 있는 폴더 경로
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// 이미지 품질 (관례상 5-95, 인코더에 그대로 전달)
    #[arg(short, long, default_value_t = DEFAULT_QUALITY, allow_negative_numbers = true)]
    pub quality: i64,

    /// 동시 변환 최대 수 (기본값: CPU 코어 수)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// 동시 폴더 읽기 최대 수 (기본값: workers와 동일)
    #[arg(long)]
    pub read_workers: Option<usize>,

    /// 종료 시 변환 통계 출력
    #[arg(long)]
    pub stats: bool,

    /// 사용할 인코더 프로그램
    #[arg(long, default_value = DEFAULT_ENCODER)]
    pub encoder: PathBuf,

    /// 변환할 원본 확장자
    #[arg(long = "from", default_value = DEFAULT_SOURCE_EXT)]
    pub source_ext: String,

    /// 생성할 대상 확장자
    #[arg(long = "to", default_value = DEFAULT_TARGET_EXT)]
    pub target_ext: String,

    /// 실제 변환 없이 변환될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,

    /// 에러 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// 버전 정보 출력
    #[arg(long)]
    pub version: bool,
}

impl Args {
    /// 실행 설정으로 변환
    pub fn to_config(&self) -> RunConfig {
        let workers = self.workers.unwrap_or_else(default_workers);
        RunConfig::new(&self.dir)
            .with_quality(self.quality)
            .with_workers(workers)
            .with_read_workers(self.read_workers.unwrap_or(workers))
            .with_extensions(&self.source_ext, &self.target_ext)
            .with_dry_run(self.dry_run)
    }
}

/// 버전 문자열: 이름, 버전, 실행 환경
pub fn version_string() -> String {
    format!(
        "{} version {} (runtime: {}/{})",
        NAME,
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
