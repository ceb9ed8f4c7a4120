//! 탐색-변환 파이프라인 모듈
//!
//! 탐색 작업, 변환 작업, 결과 집계를 연결합니다.
//!
//! ```text
//! walker ──(경로)──> 변환 허가 ──> 변환 작업 ──(PipelineEvent)──> 집계
//! ```
//!
//! 모든 작업 단위가 끝나 카운터가 0이 되면 조정 작업이 마지막 송신자를
//! 해제하고, 그 뒤 집계 루프가 끝납니다.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::RunConfig;
use crate::converter::ConversionResult;
use crate::encoder::Encoder;
use crate::governor::Governor;
use crate::ledger::JobLedger;
use crate::stats::{aggregate, Reporter, RunSummary};
use crate::walker::{walk_dir, WalkContext, WorkUnit};

/// 결과 채널로 전달되는 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// 파일 변환 완료 (성공 또는 실패)
    Converted(ConversionResult),
    /// 변환 대상 파일 발견 (드라이런)
    Discovered(PathBuf),
    /// 폴더를 읽지 못해 해당 하위 트리를 건너뜀
    DirectoryFailed { path: PathBuf, reason: String },
}

/// 실행 중인 파이프라인
pub struct PipelineHandle {
    /// 결과 이벤트 스트림
    pub events: mpsc::Receiver<PipelineEvent>,
    /// 작업 카운터
    pub ledger: JobLedger,
    closer: JoinHandle<()>,
}

impl PipelineHandle {
    /// 채널을 닫는 조정 작업이 끝날 때까지 대기
    pub async fn closed(self) {
        if let Err(e) = self.closer.await {
            debug!(error = %e, "조정 작업이 비정상 종료되었습니다");
        }
    }
}

/// 탐색-변환 파이프라인
pub struct Pipeline {
    config: RunConfig,
    encoder: Arc<dyn Encoder>,
    conversions: Governor,
    reads: Governor,
}

impl Pipeline {
    /// 설정 값으로 허가 풀을 만들어 파이프라인 생성
    pub fn new(config: RunConfig, encoder: Arc<dyn Encoder>) -> Self {
        let conversions = Governor::new("convert", config.workers);
        let reads = Governor::new("read", config.read_workers);
        Self::with_governors(config, encoder, conversions, reads)
    }

    /// 외부에서 만든 허가 풀을 주입하여 생성
    ///
    /// 변환과 폴더 읽기는 서로 다른 풀을 사용합니다.
    pub fn with_governors(
        config: RunConfig,
        encoder: Arc<dyn Encoder>,
        conversions: Governor,
        reads: Governor,
    ) -> Self {
        Self {
            config,
            encoder,
            conversions,
            reads,
        }
    }

    /// 탐색을 시작하고 결과 스트림을 반환
    ///
    /// tokio 런타임 안에서 호출해야 합니다.
    pub fn start(&self) -> PipelineHandle {
        let (tx, events) = mpsc::channel(self.conversions.limit());
        let (ledger, root) = JobLedger::root();

        let ctx = Arc::new(WalkContext {
            config: self.config.clone(),
            encoder: Arc::clone(&self.encoder),
            conversions: self.conversions.clone(),
            reads: self.reads.clone(),
        });

        debug!(root = %self.config.root.display(), "탐색 시작");
        tokio::spawn(walk_dir(
            ctx,
            self.config.root.clone(),
            WorkUnit::new(tx.clone(), root),
        ));

        let closer = {
            let ledger = ledger.clone();
            tokio::spawn(async move {
                ledger.drained().await;
                debug!("모든 작업이 끝나 결과 채널을 닫습니다");
                drop(tx);
            })
        };

        PipelineHandle {
            events,
            ledger,
            closer,
        }
    }

    /// 파이프라인 전체 실행 후 집계 결과 반환
    pub async fn run(&self, reporter: &Reporter) -> RunSummary {
        let PipelineHandle { events, closer, .. } = self.start();
        let summary = aggregate(events, reporter).await;
        if let Err(e) = closer.await {
            debug!(error = %e, "조정 작업이 비정상 종료되었습니다");
        }
        summary
    }
}
