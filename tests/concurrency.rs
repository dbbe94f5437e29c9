mod common;

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Barrier;

use common::ScriptedGenerator;
use snaplink::application::services::LinkService;
use snaplink::domain::entities::{Link, NewLink};
use snaplink::domain::repositories::LinkRepository;
use snaplink::error::AppError;
use snaplink::infrastructure::persistence::InMemoryLinkRepository;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolves_count_every_click() {
    const CLICKS: usize = 200;

    let repo = Arc::new(InMemoryLinkRepository::new());
    let service = Arc::new(LinkService::new(repo.clone()));
    let link = service.create_link("example.com").await.unwrap();

    let handles: Vec<_> = (0..CLICKS)
        .map(|_| {
            let service = service.clone();
            let code = link.code.clone();
            tokio::spawn(async move { service.resolve(&code).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "https://example.com");
    }

    let stats = service.get_stats(&link.code).await.unwrap();
    assert_eq!(stats.click_count, CLICKS as i64);
}

/// Holds its first `exists` call until every racer has passed the check, so all
/// of them go on to insert the same candidate.
struct RacingRepository {
    inner: Arc<InMemoryLinkRepository>,
    barrier: Arc<Barrier>,
    waited: AtomicBool,
    creates: Arc<AtomicUsize>,
}

impl RacingRepository {
    fn new(
        inner: Arc<InMemoryLinkRepository>,
        barrier: Arc<Barrier>,
        creates: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            inner,
            barrier,
            waited: AtomicBool::new(false),
            creates,
        }
    }
}

#[async_trait]
impl LinkRepository for RacingRepository {
    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists = self.inner.exists(code).await?;
        if !self.waited.swap(true, Ordering::SeqCst) {
            self.barrier.wait().await;
        }
        Ok(exists)
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(new_link).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.inner.find_by_code(code).await
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<String>, AppError> {
        self.inner.increment_clicks(code).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.inner.ping().await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creators_never_share_a_code() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let barrier = Arc::new(Barrier::new(2));
    let creates = Arc::new(AtomicUsize::new(0));

    let racer = |next: &'static str| {
        LinkService::new(Arc::new(RacingRepository::new(
            repo.clone(),
            barrier.clone(),
            creates.clone(),
        )))
        .with_code_generator(Arc::new(ScriptedGenerator::new(&["dup111", next])))
    };
    let first = Arc::new(racer("aaa111"));
    let second = Arc::new(racer("bbb222"));

    let a = tokio::spawn({
        let first = first.clone();
        async move { first.create_link("https://a.example.com").await }
    });
    let b = tokio::spawn({
        let second = second.clone();
        async move { second.create_link("https://b.example.com").await }
    });
    let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());

    assert_ne!(a.code, b.code);
    assert!(a.code == "dup111" || b.code == "dup111");
    assert_eq!(repo.len(), 2);

    // Both inserted the shared candidate; the loser retried once.
    assert_eq!(creates.load(Ordering::SeqCst), 3);

    let owner = repo.find_by_code("dup111").await.unwrap().unwrap();
    let winner = if a.code == "dup111" { &a } else { &b };
    assert_eq!(owner.long_url, winner.long_url);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_all_stored() {
    const LINKS: usize = 100;

    let repo = Arc::new(InMemoryLinkRepository::new());
    let service = Arc::new(LinkService::new(repo.clone()));

    let handles: Vec<_> = (0..LINKS)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_link(&format!("https://example.com/{i}"))
                    .await
            })
        })
        .collect();

    let mut codes = std::collections::HashSet::new();
    for handle in handles {
        let link = handle.await.unwrap().unwrap();
        assert!(codes.insert(link.code));
    }

    assert_eq!(repo.len(), LINKS);
}

#[tokio::test]
async fn test_exhausted_retries_store_nothing_new() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    common::create_test_link(&repo, "taken1", "https://example.com").await;

    let service = LinkService::new(repo.clone())
        .with_code_generator(Arc::new(ScriptedGenerator::new(&[
            "taken1", "taken1", "taken1",
        ])))
        .with_max_attempts(3);

    let err = service.create_link("https://other.example.com").await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to generate unique code");
    assert_eq!(repo.len(), 1);
}
