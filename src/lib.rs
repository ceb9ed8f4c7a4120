//! png2jpeg - PNG TO JPEG BATCH CONVERTER
//!
//! 폴더를 재귀적으로 탐색하여 PNG 이미지를 외부 인코더(`cjpeg`)로
//! 같은 위치의 JPEG 파일로 변환하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🚀 **병렬 변환**: 허가 풀로 동시 실행 수를 제한한 비동기 변환
//! - 🌲 **재귀 탐색**: 폴더마다 독립 작업으로 하위 트리 탐색
//! - 🛡️ **오류 격리**: 파일/폴더 단위 오류는 해당 항목만 건너뜀
//! - 📈 **상세 통계**: 변환 수, 변환 전후 용량(IEC), 절감률
//! - 🧪 **드라이런 모드**: 실제 변환 없이 대상 파일 목록 확인
//!
//! # 예제
//!
//! ```bash
//! # 기본 사용법
//! png2jpeg -d ./images
//!
//! # 품질 60, 동시 변환 1개, 통계 출력
//! png2jpeg -d ./images -q 60 -w 1 --stats
//! ```

pub mod cli;
pub mod config;
pub mod converter;
pub mod encoder;
pub mod enumerator;
pub mod error;
pub mod governor;
pub mod ledger;
pub mod pipeline;
pub mod stats;
mod walker;

// Re-exports for convenient access
pub use cli::Args;
pub use config::RunConfig;
pub use converter::{convert_file, derive_output_path, ConversionResult};
pub use encoder::{CjpegEncoder, EncodeRequest, Encoder};
pub use error::{ConvertError, Result};
pub use governor::Governor;
pub use ledger::{JobGuard, JobLedger};
pub use pipeline::{Pipeline, PipelineEvent, PipelineHandle};
pub use stats::{
    aggregate, format_bytes_iec, format_converted, format_discovered, Reporter, RunSummary,
};
