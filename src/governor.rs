//! 동시 실행 제한 모듈
//!
//! 세마포어 기반 허가(permit) 풀로 동시에 실행되는 작업 수를 제한합니다.
//! 허가는 소유권을 가진 값으로 작업에 넘겨지며, drop 시점에
//! (성공, 실패, 패닉 모두) 자동으로 반환됩니다.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// 허가 풀
#[derive(Debug, Clone)]
pub struct Governor {
    name: &'static str,
    semaphore: Arc<Semaphore>,
    limit: usize,
}

/// 획득한 허가. drop 되면 풀로 반환됩니다.
#[derive(Debug)]
pub struct Permit {
    _permit: OwnedSemaphorePermit,
}

impl Governor {
    /// 새 허가 풀 생성
    ///
    /// # Arguments
    /// * `name` - 로그에 표시할 풀 이름
    /// * `limit` - 동시에 발급할 수 있는 최대 허가 수 (0이면 1로 보정)
    pub fn new(name: &'static str, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            name,
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    /// 허가를 얻을 때까지 대기
    pub async fn acquire(&self) -> Permit {
        // 세마포어를 닫는 곳이 없으므로 acquire_owned는 실패하지 않음
        let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => unreachable!("governor semaphore is never closed"),
        };
        debug!(pool = self.name, in_use = self.in_use(), "허가 획득");
        Permit { _permit: permit }
    }

    /// 최대 허가 수
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// 현재 사용 중인 허가 수
    pub fn in_use(&self) -> usize {
        self.limit - self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permit_released_on_drop() {
        let governor = Governor::new("test", 2);
        assert_eq!(governor.limit(), 2);

        let first = governor.acquire().await;
        let second = governor.acquire().await;
        assert_eq!(governor.in_use(), 2);

        drop(first);
        assert_eq!(governor.in_use(), 1);
        drop(second);
        assert_eq!(governor.in_use(), 0);
    }

    #[tokio::test]
    async fn test_zero_limit_is_clamped() {
        let governor = Governor::new("test", 0);
        assert_eq!(governor.limit(), 1);
        let _permit = governor.acquire().await;
        assert_eq!(governor.in_use(), 1);
    }

    #[tokio::test]
    async fn test_acquire_waits_for_release() {
        let governor = Governor::new("test", 1);
        let permit = governor.acquire().await;

        let waiter = {
            let governor = governor.clone();
            tokio::spawn(async move {
                let _permit = governor.acquire().await;
            })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(permit);
        waiter.await.unwrap();
        assert_eq!(governor.in_use(), 0);
    }

    #[tokio::test]
    async fn test_permit_released_when_task_panics() {
        let governor = Governor::new("test", 1);
        let permit = governor.acquire().await;

        let handle = tokio::spawn(async move {
            let _permit = permit;
            panic!("작업 실패");
        });
        assert!(handle.await.is_err());

        assert_eq!(governor.in_use(), 0);
    }
}
