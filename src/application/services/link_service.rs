//! Link creation, redirect resolution and statistics service.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use crate::utils::url_normalizer::{SchemePolicy, UrlNormalizationError, normalize_long_url};
use serde_json::json;
use tracing::{debug, info, warn};

/// Default number of codes tried before giving up on a creation.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Service for creating, resolving and inspecting short links.
///
/// Owns the generate-check-insert loop. The repository's unique constraint is the
/// final arbiter: a candidate that passes the existence check but loses an insert
/// race comes back as [`AppError::Conflict`] and is retried like any other
/// collision.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    code_generator: Arc<dyn CodeGenerator>,
    scheme_policy: SchemePolicy,
    max_attempts: usize,
}

impl LinkService {
    /// Creates a service with the random generator and default policy.
    pub fn new(link_repository: Arc<dyn LinkRepository>) -> Self {
        Self {
            link_repository,
            code_generator: Arc::new(RandomCodeGenerator),
            scheme_policy: SchemePolicy::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_code_generator(mut self, code_generator: Arc<dyn CodeGenerator>) -> Self {
        self.code_generator = code_generator;
        self
    }

    pub fn with_scheme_policy(mut self, scheme_policy: SchemePolicy) -> Self {
        self.scheme_policy = scheme_policy;
        self
    }

    /// Sets the collision retry cap. Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn scheme_policy(&self) -> SchemePolicy {
        self.scheme_policy
    }

    /// Creates a short link for `long_url`.
    ///
    /// The URL is normalized according to the configured [`SchemePolicy`] before a
    /// code is generated. Collisions are retried internally and never surface.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty or contains control
    /// characters. Nothing is read from or written to storage in that case.
    ///
    /// Returns [`AppError::Internal`] if storage fails or no free code is found
    /// within the retry cap.
    pub async fn create_link(&self, long_url: &str) -> Result<Link, AppError> {
        let long_url = normalize_long_url(long_url, self.scheme_policy).map_err(|e| match e {
            UrlNormalizationError::Empty => AppError::bad_request("URL is required", json!({})),
            e @ UrlNormalizationError::ControlCharacter => AppError::bad_request(
                "Invalid URL format",
                json!({ "reason": e.to_string() }),
            ),
        })?;

        for attempt in 1..=self.max_attempts {
            let code = self.code_generator.generate();

            if self.link_repository.exists(&code).await? {
                debug!(attempt, code = %code, "Short code collision, regenerating");
                continue;
            }

            match self
                .link_repository
                .create(NewLink::new(code, long_url.clone()))
                .await
            {
                Ok(link) => {
                    info!(code = %link.code, id = link.id, "Short link created");
                    return Ok(link);
                }
                Err(e) if e.is_conflict() => {
                    debug!(attempt, "Short code taken by a concurrent insert, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.max_attempts,
            "Gave up generating a unique short code"
        );
        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Resolves a short code for a redirect, counting the click.
    ///
    /// The code is used as given. Exactly one click is recorded per successful call.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code; nothing is recorded.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        self.link_repository
            .increment_clicks(code)
            .await?
            .ok_or_else(|| not_found(code))
    }

    /// Returns the full record for a short code, including its live click count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_stats(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))
    }

    /// Checks that the link store is reachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    /// Constructs the full short URL from a base URL and code.
    pub fn short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Hands out a fixed sequence of codes.
    struct ScriptedGenerator(Mutex<VecDeque<&'static str>>);

    impl ScriptedGenerator {
        fn new(codes: &[&'static str]) -> Arc<Self> {
            Arc::new(Self(Mutex::new(codes.iter().copied().collect())))
        }
    }

    impl CodeGenerator for ScriptedGenerator {
        fn generate(&self) -> String {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted generator exhausted")
                .to_string()
        }
    }

    fn stored(new_link: NewLink) -> Link {
        Link::new(1, new_link.code, new_link.long_url, Utc::now(), 0)
    }

    fn service(repo: MockLinkRepository, codes: &[&'static str]) -> LinkService {
        LinkService::new(Arc::new(repo)).with_code_generator(ScriptedGenerator::new(codes))
    }

    #[tokio::test]
    async fn test_create_link_success() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new_link| new_link.code == "abc123" && new_link.long_url == "https://example.com")
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let link = service(repo, &["abc123"])
            .create_link("https://example.com")
            .await
            .unwrap();

        assert_eq!(link.code, "abc123");
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.click_count, 0);
    }

    #[tokio::test]
    async fn test_create_link_prepends_scheme() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new_link| new_link.long_url == "https://example.com")
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let link = service(repo, &["abc123"])
            .create_link("example.com")
            .await
            .unwrap();

        assert_eq!(link.long_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_create_link_keeps_http_scheme() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new_link| new_link.long_url == "http://example.com")
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let link = service(repo, &["abc123"])
            .create_link("http://example.com")
            .await
            .unwrap();

        assert_eq!(link.long_url, "http://example.com");
    }

    #[tokio::test]
    async fn test_create_link_preserve_policy() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new_link| new_link.long_url == "example.com")
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let link = service(repo, &["abc123"])
            .with_scheme_policy(SchemePolicy::Preserve)
            .create_link("example.com")
            .await
            .unwrap();

        assert_eq!(link.long_url, "example.com");
    }

    #[tokio::test]
    async fn test_create_link_control_characters_skip_storage() {
        // No expectations: any repository call would panic.
        let repo = MockLinkRepository::new();

        let err = service(repo, &[])
            .create_link("example.com/a\nb")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.to_string(), "Invalid URL format");
    }

    #[tokio::test]
    async fn test_create_link_empty_url_skips_storage() {
        // No expectations: any repository call would panic.
        let repo = MockLinkRepository::new();

        let result = service(repo, &[]).create_link("").await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.to_string(), "URL is required");
    }

    #[tokio::test]
    async fn test_create_link_retries_on_existing_code() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists()
            .withf(|code| code == "taken1")
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_exists()
            .withf(|code| code == "free22")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new_link| new_link.code == "free22")
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let link = service(repo, &["taken1", "free22"])
            .create_link("https://example.com")
            .await
            .unwrap();

        assert_eq!(link.code, "free22");
    }

    #[tokio::test]
    async fn test_create_link_retries_on_insert_conflict() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().times(2).returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new_link| new_link.code == "raced1")
            .times(1)
            .returning(|_| Err(AppError::conflict("Short code already exists", json!({}))));
        repo.expect_create()
            .withf(|new_link| new_link.code == "fresh2")
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let link = service(repo, &["raced1", "fresh2"])
            .create_link("https://example.com")
            .await
            .unwrap();

        assert_eq!(link.code, "fresh2");
    }

    #[tokio::test]
    async fn test_create_link_gives_up_after_max_attempts() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().times(3).returning(|_| Ok(true));
        repo.expect_create().times(0);

        let result = service(repo, &["aaaaaa", "bbbbbb", "cccccc"])
            .with_max_attempts(3)
            .create_link("https://example.com")
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
        assert_eq!(err.to_string(), "Failed to generate unique code");
    }

    #[tokio::test]
    async fn test_create_link_propagates_storage_error() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().times(1).returning(|_| Ok(false));
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let result = service(repo, &["abc123", "def456"])
            .create_link("https://example.com")
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut repo = MockLinkRepository::new();

        repo.expect_increment_clicks()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(Some("https://example.com".to_string())));

        let url = service(repo, &[]).resolve("abc123").await.unwrap();

        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut repo = MockLinkRepository::new();

        repo.expect_increment_clicks()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repo, &[]).resolve("nosuch").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_stats() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|code| {
                Ok(Some(Link::new(
                    7,
                    code.to_string(),
                    "https://example.com".to_string(),
                    Utc::now(),
                    42,
                )))
            });

        let link = service(repo, &[]).get_stats("abc123").await.unwrap();

        assert_eq!(link.id, 7);
        assert_eq!(link.click_count, 42);
    }

    #[tokio::test]
    async fn test_get_stats_not_found() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_code().returning(|_| Ok(None));

        let result = service(repo, &[]).get_stats("nosuch").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[test]
    fn test_short_url() {
        let service = LinkService::new(Arc::new(MockLinkRepository::new()));

        assert_eq!(
            service.short_url("https://s.example.com/", "abc123"),
            "https://s.example.com/abc123"
        );
        assert_eq!(
            service.short_url("http://localhost:8080", "abc123"),
            "http://localhost:8080/abc123"
        );
    }

    #[test]
    fn test_max_attempts_floor() {
        let service = LinkService::new(Arc::new(MockLinkRepository::new())).with_max_attempts(0);
        assert_eq!(service.max_attempts, 1);
    }
}
