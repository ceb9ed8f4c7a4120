//! 파일 변환 모듈
//!
//! 파일 하나를 인코더로 변환하고 변환 전후 크기를 기록합니다.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::encoder::{EncodeRequest, Encoder};
use crate::error::{ConvertError, Result};

/// 파일 변환 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    /// 원본 파일 경로
    pub source: PathBuf,
    /// 생성된 파일 경로
    pub destination: PathBuf,
    /// 원본 크기 (바이트)
    pub original_size: u64,
    /// 변환 후 크기 (바이트)
    pub converted_size: u64,
    /// 변환 성공 여부
    pub success: bool,
    /// 실패 시 진단 텍스트 (인코더 출력 포함)
    pub diagnostic: Option<String>,
}

impl ConversionResult {
    /// 성공 결과 생성
    pub fn success(
        source: PathBuf,
        destination: PathBuf,
        original_size: u64,
        converted_size: u64,
    ) -> Self {
        Self {
            source,
            destination,
            original_size,
            converted_size,
            success: true,
            diagnostic: None,
        }
    }

    /// 실패 결과 생성 (크기는 측정하지 않음)
    pub fn failure(source: PathBuf, destination: PathBuf, diagnostic: String) -> Self {
        Self {
            source,
            destination,
            original_size: 0,
            converted_size: 0,
            success: false,
            diagnostic: Some(diagnostic),
        }
    }
}

/// 출력 경로 생성: 원본 확장자를 대상 확장자로 교체
///
/// # Examples
/// ```
/// use png2jpeg::converter::derive_output_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     derive_output_path(Path::new("a/b/photo.PNG"), "jpg"),
///     PathBuf::from("a/b/photo.jpg")
/// );
/// ```
pub fn derive_output_path(source: &Path, target_ext: &str) -> PathBuf {
    source.with_extension(target_ext)
}

/// 단일 파일 변환
///
/// # Arguments
/// * `encoder` - 사용할 인코더
/// * `source` - 변환할 파일 경로
/// * `target_ext` - 대상 확장자
/// * `quality` - 인코더에 전달할 품질 값
///
/// # Returns
/// 변환 결과. 인코더 실패는 실패 결과로 반환되며 에러로 전파되지 않습니다.
pub async fn convert_file(
    encoder: &dyn Encoder,
    source: PathBuf,
    target_ext: &str,
    quality: i64,
) -> ConversionResult {
    let destination = derive_output_path(&source, target_ext);
    let request = EncodeRequest {
        input: source,
        output: destination,
        quality,
    };

    debug!(encoder = encoder.name(), file = %request.input.display(), "변환 시작");

    if let Err(e) = encoder.encode(&request).await {
        return ConversionResult::failure(request.input, request.output, e.diagnostic());
    }

    let original_size = size_or_zero(&request.input).await;
    let converted_size = size_or_zero(&request.output).await;

    ConversionResult::success(request.input, request.output, original_size, converted_size)
}

/// 파일 크기 조회
async fn file_size(path: &Path) -> Result<u64> {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.len())
        .map_err(|e| ConvertError::Stat {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// 크기 조회 실패는 변환 결과를 바꾸지 않음. 경고 후 0으로 처리
async fn size_or_zero(path: &Path) -> u64 {
    file_size(path).await.unwrap_or_else(|e| {
        warn!("{}", e);
        0
    })
}
