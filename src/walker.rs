//! 재귀 폴더 탐색 모듈
//!
//! 폴더마다 추적되는 작업을 하나씩 띄워 트리 전체를 탐색하고,
//! 변환 대상 파일을 찾으면 변환 허가를 받은 뒤 변환 작업을 띄웁니다.
//! 형제 폴더 사이, 하위 트리 사이의 순서는 보장하지 않습니다.

use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::RunConfig;
use crate::converter::{convert_file, derive_output_path, ConversionResult};
use crate::encoder::Encoder;
use crate::enumerator::{has_extension, read_entries};
use crate::error::ConvertError;
use crate::governor::Governor;
use crate::ledger::JobGuard;
use crate::pipeline::PipelineEvent;

/// 탐색/변환 작업이 공유하는 읽기 전용 상태
pub(crate) struct WalkContext {
    pub config: RunConfig,
    pub encoder: Arc<dyn Encoder>,
    pub conversions: Governor,
    pub reads: Governor,
}

/// 결과 채널 송신자와 작업 카운터 가드의 묶음
///
/// 필드 선언 순서대로 drop 되므로 송신자가 가드보다 먼저 해제됩니다.
pub(crate) struct WorkUnit {
    tx: mpsc::Sender<PipelineEvent>,
    guard: JobGuard,
}

impl WorkUnit {
    pub fn new(tx: mpsc::Sender<PipelineEvent>, guard: JobGuard) -> Self {
        Self { tx, guard }
    }

    /// 파생 작업 단위 생성 (카운터 증가)
    pub fn fork(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            guard: self.guard.fork(),
        }
    }

    async fn send(&self, event: PipelineEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("결과 수신자가 이미 종료되었습니다");
        }
    }
}

/// 폴더 하나를 탐색
///
/// 하위 폴더는 별도 작업으로 띄우고, 이 작업은 자기 폴더의 항목을
/// 모두 내보낸 뒤 끝납니다. 작업 단위(`unit`)는 끝날 때 해제됩니다.
pub(crate) fn walk_dir(ctx: Arc<WalkContext>, dir: PathBuf, unit: WorkUnit) -> BoxFuture<'static, ()> {
    async move {
        let entries = {
            let _permit = ctx.reads.acquire().await;
            let target = dir.clone();
            match tokio::task::spawn_blocking(move || read_entries(&target)).await {
                Ok(result) => result,
                Err(e) => Err(ConvertError::Enumeration {
                    path: dir.clone(),
                    reason: e.to_string(),
                }),
            }
        };

        let entries = match entries {
            Ok(entries) => entries,
            Err(e) => {
                unit.send(PipelineEvent::DirectoryFailed {
                    path: dir,
                    reason: e.to_string(),
                })
                .await;
                return;
            }
        };

        // 출력 파일 이름(소문자) -> 먼저 차지한 입력 파일
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();

        for entry in entries {
            if entry.is_dir {
                debug!(dir = %entry.path.display(), "하위 폴더 탐색 시작");
                tokio::spawn(walk_dir(Arc::clone(&ctx), entry.path, unit.fork()));
                continue;
            }

            if !has_extension(&entry.path, &ctx.config.source_ext) {
                continue;
            }

            if ctx.config.dry_run {
                unit.send(PipelineEvent::Discovered(entry.path)).await;
                continue;
            }

            let destination = derive_output_path(&entry.path, &ctx.config.target_ext);
            let key = claim_key(&destination);
            if let Some(winner) = claimed.get(&key) {
                let diagnostic = format!(
                    "출력 경로 충돌: {}는 이미 {}의 출력으로 사용됩니다",
                    destination.display(),
                    winner.display()
                );
                let result = ConversionResult::failure(entry.path, destination, diagnostic);
                unit.send(PipelineEvent::Converted(result)).await;
                continue;
            }
            claimed.insert(key, entry.path.clone());

            schedule_conversion(&ctx, entry.path, &unit).await;
        }
    }
    .boxed()
}

/// 변환 허가를 받은 뒤 변환 작업을 띄움
///
/// 허가를 얻을 때까지 탐색이 멈추므로 대기 중인 변환이 무한히 쌓이지 않습니다.
async fn schedule_conversion(ctx: &Arc<WalkContext>, source: PathBuf, unit: &WorkUnit) {
    let permit = ctx.conversions.acquire().await;
    let worker = unit.fork();
    let ctx = Arc::clone(ctx);

    tokio::spawn(async move {
        let result = convert_file(
            ctx.encoder.as_ref(),
            source,
            &ctx.config.target_ext,
            ctx.config.quality,
        )
        .await;
        drop(permit);
        worker.send(PipelineEvent::Converted(result)).await;
    });
}

fn claim_key(destination: &Path) -> String {
    destination
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
