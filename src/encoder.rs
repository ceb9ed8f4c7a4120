//! 외부 인코더 모듈
//!
//! 실제 인코딩은 외부 프로그램(기본값 `cjpeg`)에 맡깁니다.
//! [`Encoder`] 트레이트를 통해 테스트에서는 가짜 인코더로 교체할 수 있습니다.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::config::DEFAULT_ENCODER;
use crate::error::{ConvertError, Result};

/// 인코딩 요청 한 건
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRequest {
    /// 입력 파일
    pub input: PathBuf,
    /// 출력 파일 (있으면 덮어씀)
    pub output: PathBuf,
    /// 품질 값 (검증 없이 그대로 전달)
    pub quality: i64,
}

/// 외부 인코더 인터페이스
#[async_trait]
pub trait Encoder: Send + Sync {
    /// 입력 파일을 인코딩하여 출력 파일을 생성
    ///
    /// 실패 시 에러에 인코더의 출력이 포함됩니다.
    async fn encode(&self, request: &EncodeRequest) -> Result<()>;

    /// 로그용 인코더 이름
    fn name(&self) -> &str;
}

/// `cjpeg` 호환 명령줄 인코더
///
/// `<program> -quality <N> -optimize -progressive -outfile <output> <input>`
#[derive(Debug, Clone)]
pub struct CjpegEncoder {
    program: PathBuf,
}

impl CjpegEncoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// 고정된 인자 목록 생성
    pub fn build_args(request: &EncodeRequest) -> Vec<OsString> {
        vec![
            "-quality".into(),
            request.quality.to_string().into(),
            "-optimize".into(),
            "-progressive".into(),
            "-outfile".into(),
            request.output.clone().into_os_string(),
            request.input.clone().into_os_string(),
        ]
    }
}

impl Default for CjpegEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_ENCODER)
    }
}

#[async_trait]
impl Encoder for CjpegEncoder {
    async fn encode(&self, request: &EncodeRequest) -> Result<()> {
        debug!(program = %self.program.display(), input = %request.input.display(), "인코더 실행");

        let output = Command::new(&self.program)
            .args(Self::build_args(request))
            .output()
            .await
            .map_err(|e| ConvertError::Launch {
                program: self.program.display().to_string(),
                reason: e.to_string(),
            })?;

        if output.status.success() {
            return Ok(());
        }

        // stdout 뒤에 stderr를 이어 붙여 하나의 진단 텍스트로 보관
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Err(ConvertError::EncoderFailed {
            file: request.input.clone(),
            status: output.status.to_string(),
            output: combined,
        })
    }

    fn name(&self) -> &str {
        self.program.to_str().unwrap_or("encoder")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EncodeRequest {
        EncodeRequest {
            input: PathBuf::from("a/b/photo.PNG"),
            output: PathBuf::from("a/b/photo.jpg"),
            quality: 60,
        }
    }

    #[test]
    fn test_build_args_fixed_template() {
        let args = CjpegEncoder::build_args(&request());
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(
            args,
            vec![
                "-quality",
                "60",
                "-optimize",
                "-progressive",
                "-outfile",
                "a/b/photo.jpg",
                "a/b/photo.PNG"
            ]
        );
    }

    #[test]
    fn test_out_of_range_quality_forwarded_verbatim() {
        let mut req = request();
        req.quality = 150;
        let args = CjpegEncoder::build_args(&req);
        assert_eq!(args[1], OsString::from("150"));

        req.quality = -3;
        let args = CjpegEncoder::build_args(&req);
        assert_eq!(args[1], OsString::from("-3"));
    }

    #[test]
    fn test_default_program() {
        assert_eq!(CjpegEncoder::default().program(), Path::new("cjpeg"));
        assert_eq!(CjpegEncoder::default().name(), "cjpeg");
    }

    #[tokio::test]
    async fn test_launch_failure() {
        let encoder = CjpegEncoder::new("png2jpeg-nonexistent-encoder-xyz");
        let result = encoder.encode(&request()).await;
        assert!(matches!(result, Err(ConvertError::Launch { .. })));
    }
}
