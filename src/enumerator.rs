//! 폴더 목록 모듈
//!
//! 한 폴더의 직계 항목(파일/하위 폴더)만 나열합니다.
//! 재귀는 walker가 담당하며, 여기서는 재시도 없이 한 번만 읽습니다.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::error::{ConvertError, Result};

/// 폴더의 직계 항목 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// 파일 이름
    pub name: OsString,
    /// 전체 경로 (폴더 경로 + 이름)
    pub path: PathBuf,
    /// 폴더 여부 (심볼릭 링크는 따라가지 않으므로 false)
    pub is_dir: bool,
}

/// 폴더의 직계 항목을 파일 이름 순으로 나열
///
/// # Arguments
/// * `dir` - 읽을 폴더 경로
///
/// # Returns
/// 항목 목록, 또는 폴더 자체를 열 수 없으면 `ConvertError::Enumeration`
///
/// 개별 항목을 읽지 못한 경우는 경고만 남기고 건너뜁니다.
pub fn read_entries(dir: &Path) -> Result<Vec<DirEntryInfo>> {
    if !dir.is_dir() {
        return Err(ConvertError::Enumeration {
            path: dir.to_path_buf(),
            reason: "폴더가 아니거나 존재하지 않습니다".to_string(),
        });
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    let mut entries = Vec::new();
    for item in walker {
        match item {
            Ok(entry) => entries.push(DirEntryInfo {
                name: entry.file_name().to_os_string(),
                path: entry.path().to_path_buf(),
                is_dir: entry.file_type().is_dir(),
            }),
            Err(e) if e.depth() == 0 => {
                let reason = e
                    .io_error()
                    .map(|io| io.to_string())
                    .unwrap_or_else(|| e.to_string());
                return Err(ConvertError::Enumeration {
                    path: dir.to_path_buf(),
                    reason,
                });
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "항목을 읽을 수 없어 건너뜁니다");
            }
        }
    }

    Ok(entries)
}

/// 확장자가 대소문자 구분 없이 일치하는지 확인
///
/// `.png`처럼 점으로 시작하는 이름 전체는 확장자로 보지 않습니다 (숨김 파일).
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_entries_lists_direct_children_sorted() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.png"), b"b").unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"a").unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("sub").join("deep.png"), b"d").unwrap();

        let entries = read_entries(temp_dir.path()).unwrap();
        let names: Vec<_> = entries
            .iter()
            .map(|e| e.name.to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.txt", "b.png", "sub"]);
        assert!(entries[2].is_dir);
        assert!(!entries[0].is_dir);
        assert_eq!(entries[1].path, temp_dir.path().join("b.png"));
    }

    #[test]
    fn test_read_entries_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_entries(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_read_entries_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_entries(&temp_dir.path().join("gone"));
        assert!(matches!(result, Err(ConvertError::Enumeration { .. })));
    }

    #[test]
    fn test_read_entries_on_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("x.png");
        fs::write(&file, b"x").unwrap();
        assert!(read_entries(&file).is_err());
    }

    #[test]
    fn test_has_extension_case_insensitive() {
        assert!(has_extension(Path::new("a/b/photo.PNG"), "png"));
        assert!(has_extension(Path::new("photo.png"), "PNG"));
        assert!(!has_extension(Path::new("photo.jpg"), "png"));
        assert!(!has_extension(Path::new("png"), "png"));
        assert!(!has_extension(Path::new("dir/.png"), "png"));
        assert!(has_extension(Path::new("dir/.hidden.png"), "png"));
        assert!(!has_extension(Path::new("archive.png.zip"), "png"));
    }
}
