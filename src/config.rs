//! 실행 설정 모듈
//!
//! 파이프라인 한 번의 실행에 필요한 설정 값과 검증을 담당합니다.

use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// 기본 변환 원본 확장자
pub const DEFAULT_SOURCE_EXT: &str = "png";
/// 기본 변환 대상 확장자
pub const DEFAULT_TARGET_EXT: &str = "jpg";
/// 기본 인코더 프로그램
pub const DEFAULT_ENCODER: &str = "cjpeg";
/// 기본 이미지 품질 (관례상 5-95)
pub const DEFAULT_QUALITY: i64 = 75;

/// 호스트의 처리 유닛 수 (알 수 없으면 1)
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// 파이프라인 실행 설정
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// 탐색 시작 폴더
    pub root: PathBuf,
    /// 인코더에 그대로 전달되는 품질 값
    pub quality: i64,
    /// 동시 변환 최대 수
    pub workers: usize,
    /// 동시 폴더 읽기 최대 수
    pub read_workers: usize,
    /// 원본 확장자 (점 없이)
    pub source_ext: String,
    /// 대상 확장자 (점 없이)
    pub target_ext: String,
    /// 변환 없이 대상 파일만 나열
    pub dry_run: bool,
}

impl RunConfig {
    /// 기본 설정 생성
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let workers = default_workers();
        Self {
            root: root.into(),
            quality: DEFAULT_QUALITY,
            workers,
            read_workers: workers,
            source_ext: DEFAULT_SOURCE_EXT.to_string(),
            target_ext: DEFAULT_TARGET_EXT.to_string(),
            dry_run: false,
        }
    }

    pub fn with_quality(mut self, quality: i64) -> Self {
        self.quality = quality;
        self
    }

    /// 동시 변환 수 설정 (폴더 읽기 수도 같은 값으로 맞춤)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self.read_workers = workers;
        self
    }

    pub fn with_read_workers(mut self, read_workers: usize) -> Self {
        self.read_workers = read_workers;
        self
    }

    /// 원본/대상 확장자 설정 (앞의 점은 제거)
    pub fn with_extensions(mut self, source: &str, target: &str) -> Self {
        self.source_ext = source.trim_start_matches('.').to_string();
        self.target_ext = target.trim_start_matches('.').to_string();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 파일 시스템 작업 전에 설정 값 검증
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(invalid("workers는 1 이상이어야 합니다"));
        }
        if self.read_workers == 0 {
            return Err(invalid("read-workers는 1 이상이어야 합니다"));
        }
        if self.source_ext.is_empty() || self.target_ext.is_empty() {
            return Err(invalid("확장자는 비어 있을 수 없습니다"));
        }
        if self.source_ext.eq_ignore_ascii_case(&self.target_ext) {
            return Err(invalid("원본과 대상 확장자가 같습니다"));
        }

        validate_root(&self.root)
    }
}

fn invalid(reason: &str) -> ConvertError {
    ConvertError::InvalidConfig {
        reason: reason.to_string(),
    }
}

fn validate_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(ConvertError::InputNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(ConvertError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_defaults() {
        let config = RunConfig::new(".");
        assert_eq!(config.quality, 75);
        assert_eq!(config.source_ext, "png");
        assert_eq!(config.target_ext, "jpg");
        assert!(config.workers >= 1);
        assert_eq!(config.workers, config.read_workers);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_with_extensions_strips_dot() {
        let config = RunConfig::new(".").with_extensions(".tif", ".webp");
        assert_eq!(config.source_ext, "tif");
        assert_eq!(config.target_ext, "webp");
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig::new(temp_dir.path()).with_workers(0);
        assert!(matches!(
            config.validate(),
            Err(ConvertError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_same_extension() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig::new(temp_dir.path()).with_extensions("png", "PNG");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_root() {
        let temp_dir = TempDir::new().unwrap();
        assert!(RunConfig::new(temp_dir.path()).validate().is_ok());

        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            RunConfig::new(&missing).validate(),
            Err(ConvertError::InputNotFound { .. })
        ));

        let file = temp_dir.path().join("file.png");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            RunConfig::new(&file).validate(),
            Err(ConvertError::NotADirectory { .. })
        ));
    }
}
