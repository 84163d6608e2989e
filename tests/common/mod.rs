//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use booking_lockout::config::GuardConfig;
use booking_lockout::guard::AttemptRecord;
use booking_lockout::{
    AttemptStore, HttpServer, LockoutGuard, ManualClock, MemoryStore, Shutdown, StoreError,
    SubjectId,
};
use tokio::net::TcpListener;

/// Fixed starting instant for the manual clock.
pub const T0: u64 = 1_700_000_000_000;

/// A running service bound to an ephemeral port.
#[allow(dead_code)]
pub struct TestService {
    pub addr: SocketAddr,
    pub clock: Arc<ManualClock>,
    pub store: MemoryStore,
    pub guard: LockoutGuard,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the service with `config`, an empty memory store and a manual clock.
#[allow(dead_code)]
pub async fn spawn_service(config: GuardConfig) -> TestService {
    let clock = Arc::new(ManualClock::new(T0));
    let store = MemoryStore::new(None);
    let guard = LockoutGuard::with_clock(
        Arc::new(store.clone()),
        clock.clone(),
        config.policy.to_policy(),
    );
    let (addr, shutdown) = spawn_with_guard(&config, guard.clone(), Shutdown::new()).await;
    TestService {
        addr,
        clock,
        store,
        guard,
        shutdown,
    }
}

/// Start the service around an existing guard.
#[allow(dead_code)]
pub async fn spawn_with_guard(
    config: &GuardConfig,
    guard: LockoutGuard,
    shutdown: Shutdown,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, guard);
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Wait until the listener answers.
    let client = client();
    for _ in 0..50 {
        if client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    (addr, shutdown)
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}

/// Store that is always down.
#[allow(dead_code)]
pub struct UnavailableStore;

impl AttemptStore for UnavailableStore {
    fn get(&self, _: &SubjectId) -> Result<Option<AttemptRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn update(
        &self,
        _: &SubjectId,
        _: &mut dyn FnMut(Option<AttemptRecord>) -> Option<AttemptRecord>,
    ) -> Result<Option<AttemptRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn set(&self, _: &SubjectId, _: AttemptRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn delete(&self, _: &SubjectId) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn retain(
        &self,
        _: &mut dyn FnMut(&SubjectId, &AttemptRecord) -> bool,
    ) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn snapshot(&self) -> Result<Vec<(SubjectId, AttemptRecord)>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}
