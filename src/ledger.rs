//! 진행 중 작업 카운터 모듈
//!
//! 폴더 탐색 작업과 변환 작업마다 하나씩 증가하고, 작업이 끝나면
//! 정확히 한 번 감소하는 카운터입니다. 카운터가 0이 되면 대기 중인
//! 조정 작업이 깨어나 결과 채널을 닫습니다.
//!
//! 새 작업 단위는 살아 있는 [`JobGuard`]에서만 `fork` 할 수 있으므로,
//! 카운터는 0에 도달한 뒤 다시 증가할 수 없습니다.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::debug;

#[derive(Debug, Default)]
struct LedgerState {
    outstanding: AtomicUsize,
    drained: AtomicUsize,
    notify: Notify,
}

/// 작업 카운터 핸들 (대기용)
#[derive(Debug, Clone)]
pub struct JobLedger {
    state: Arc<LedgerState>,
}

/// 진행 중인 작업 단위 하나. drop 시 카운터가 감소합니다.
#[derive(Debug)]
pub struct JobGuard {
    state: Arc<LedgerState>,
}

impl JobLedger {
    /// 새 카운터와 루트 작업 단위를 생성
    pub fn root() -> (Self, JobGuard) {
        let state = Arc::new(LedgerState::default());
        state.outstanding.store(1, Ordering::SeqCst);

        let guard = JobGuard {
            state: Arc::clone(&state),
        };
        (Self { state }, guard)
    }

    /// 현재 진행 중인 작업 수
    pub fn outstanding(&self) -> usize {
        self.state.outstanding.load(Ordering::SeqCst)
    }

    /// 카운터가 0에 도달한 횟수
    pub fn drain_count(&self) -> usize {
        self.state.drained.load(Ordering::SeqCst)
    }

    /// 모든 작업 단위가 끝날 때까지 대기
    pub async fn drained(&self) {
        loop {
            // notified()는 생성 시점부터 notify_waiters()를 받으므로 확인보다 먼저 만듦
            let notified = self.state.notify.notified();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl JobGuard {
    /// 현재 작업에서 파생된 새 작업 단위 등록
    pub fn fork(&self) -> JobGuard {
        self.state.outstanding.fetch_add(1, Ordering::SeqCst);
        JobGuard {
            state: Arc::clone(&self.state),
        }
    }
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        if self.state.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.state.drained.fetch_add(1, Ordering::SeqCst);
            debug!("모든 작업 완료");
            self.state.notify.notify_waiters();
        }
    }
}
