//! 에러 타입 정의 모듈
//!
//! png2jpeg에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! 파일/폴더 단위 에러는 해당 작업 안에서만 처리되고,
//! 설정 에러만 실행 시작 전에 전체 실행을 중단시킵니다.

use std::path::PathBuf;
use thiserror::Error;

/// png2jpeg에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 입력 폴더가 존재하지 않음
    #[error("입력 폴더를 찾을 수 없습니다: {path}")]
    InputNotFound { path: PathBuf },

    /// 입력이 폴더가 아님
    #[error("입력 경로가 폴더가 아닙니다: {path}")]
    NotADirectory { path: PathBuf },

    /// 잘못된 설정 값
    #[error("잘못된 설정: {reason}")]
    InvalidConfig { reason: String },

    /// 폴더 목록 읽기 실패
    #[error("폴더를 읽을 수 없습니다 ({path}): {reason}")]
    Enumeration { path: PathBuf, reason: String },

    /// 인코더 실행 실패
    #[error("인코더를 실행할 수 없습니다 ({program}): {reason}")]
    Launch { program: String, reason: String },

    /// 인코더가 0이 아닌 코드로 종료
    #[error("인코더 실패 ({file}): {status}")]
    EncoderFailed {
        file: PathBuf,
        status: String,
        output: String,
    },

    /// 파일 크기 측정 실패
    #[error("파일 정보를 읽을 수 없습니다 ({file}): {reason}")]
    Stat { file: PathBuf, reason: String },

    /// 에러 로그 파일 쓰기 실패
    #[error("에러 로그 쓰기 실패 ({path}): {reason}")]
    LogWrite { path: PathBuf, reason: String },
}

impl ConvertError {
    /// 진단용 전체 텍스트 (인코더 출력 포함)
    pub fn diagnostic(&self) -> String {
        match self {
            ConvertError::EncoderFailed { output, .. } if !output.trim().is_empty() => {
                format!("{}\n{}", self, output.trim_end())
            }
            _ => self.to_string(),
        }
    }
}

/// png2jpeg 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ConvertError>;
