use async_trait::async_trait;
use shortlink_core::{
    is_valid_long_url, LinkRecord, LinkRepository, ShortCode, Shortener, ShortenerError,
    StorageError,
};
use shortlink_generator::{GeneratedCode, Generator};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

/// Budget for finding an unused short code.
pub const DEFAULT_GENERATE_TIMEOUT: Duration = Duration::from_secs(3);

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `LinkRepository` and a `Generator` to handle:
/// - Long URL validation
/// - Short code generation with a storage uniqueness check
/// - Bounding the generate-and-check loop by a wall-clock budget
///
/// It holds no state of its own besides its collaborators.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    generate_timeout: Duration,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            generate_timeout: self.generate_timeout,
        }
    }
}

impl<R: LinkRepository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with the default three second budget.
    pub fn new(repository: R, generator: G) -> Self {
        Self::from_shared(Arc::new(repository), Arc::new(generator))
    }

    /// Creates a service over collaborators that are shared elsewhere.
    pub fn from_shared(repository: Arc<R>, generator: Arc<G>) -> Self {
        Self {
            repository,
            generator,
            generate_timeout: DEFAULT_GENERATE_TIMEOUT,
        }
    }

    /// Overrides the budget for the generate-and-check loop.
    pub fn with_generate_timeout(mut self, generate_timeout: Duration) -> Self {
        self.generate_timeout = generate_timeout;
        self
    }

    pub fn generate_timeout(&self) -> Duration {
        self.generate_timeout
    }

    /// Draws a candidate and checks it against storage.
    ///
    /// Returns `None` when the code is taken, and the storage error when the
    /// lookup itself failed.
    async fn probe(&self) -> Result<Option<GeneratedCode>, ShortenerError> {
        let candidate = self.generator.generate();

        match self.repository.get_link(&candidate.code).await {
            Err(StorageError::NotFound(_)) => Ok(Some(candidate)),
            Ok(_) => {
                trace!(short_code = %candidate.code, "generated code collides");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl<R: LinkRepository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn create_short_link(&self, long_url: &str) -> Result<ShortCode, ShortenerError> {
        if !is_valid_long_url(long_url) {
            debug!(long_url, "rejecting invalid link");
            return Err(ShortenerError::InvalidLink(long_url.to_string()));
        }

        let deadline = Instant::now() + self.generate_timeout;
        let mut attempts: u32 = 0;

        loop {
            if Instant::now() >= deadline {
                warn!(
                    attempts,
                    timeout_ms = self.generate_timeout.as_millis() as u64,
                    "no free short code found before deadline"
                );
                return Err(ShortenerError::GenerateTimeout(self.generate_timeout));
            }
            attempts += 1;

            let Some(candidate) = self.probe().await? else {
                tokio::task::yield_now().await;
                continue;
            };
            let short_code = candidate.code.clone();
            let record = LinkRecord {
                short_code: candidate.code,
                long_url: long_url.to_string(),
                created_at: candidate.created_at,
            };

            match self.repository.add_link(record).await {
                Ok(()) => {
                    info!(short_code = %short_code, attempts, "created short link");
                    return Ok(short_code);
                }
                // another creator stored the same code between our lookup and insert
                Err(StorageError::Conflict(_)) => {
                    debug!(short_code = %short_code, "lost insert race, retrying");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn resolve_short_link(&self, code: &str) -> Result<String, ShortenerError> {
        let code = ShortCode::parse(code)?;

        let record = self.repository.get_link(&code).await?;
        trace!(short_code = %code, long_url = %record.long_url, "resolved short code");
        Ok(record.long_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use parking_lot::Mutex;
    use shortlink_core::{MockLinkRepository, SHORT_CODE_LENGTH};
    use shortlink_generator::RandomGenerator;
    use shortlink_storage::InMemoryRepository;
    use std::collections::VecDeque;

    const ADDED_AT: i64 = 1_686_557_090;

    /// Hands out a fixed sequence of codes, repeating the last one forever.
    struct ScriptedGenerator {
        codes: Mutex<VecDeque<&'static str>>,
    }

    impl ScriptedGenerator {
        fn new(codes: &[&'static str]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().copied().collect()),
            }
        }
    }

    impl Generator for ScriptedGenerator {
        fn generate(&self) -> GeneratedCode {
            let mut codes = self.codes.lock();
            let code = if codes.len() > 1 {
                codes.pop_front().unwrap()
            } else {
                *codes.front().unwrap()
            };
            GeneratedCode {
                code: ShortCode::new_unchecked(code),
                created_at: Timestamp::from_second(ADDED_AT).unwrap(),
            }
        }
    }

    fn stored(code: &str, url: &str) -> LinkRecord {
        LinkRecord {
            short_code: ShortCode::new_unchecked(code),
            long_url: url.to_string(),
            created_at: Timestamp::from_second(ADDED_AT).unwrap(),
        }
    }

    fn db_shutdown() -> StorageError {
        StorageError::Unavailable("db shutdown".to_string())
    }

    fn in_memory_service() -> ShortenerService<InMemoryRepository, RandomGenerator> {
        ShortenerService::new(InMemoryRepository::new(), RandomGenerator::new())
    }

    #[tokio::test]
    async fn create_success_persists_generated_record() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_link()
            .withf(|code| code.as_str() == "GoodLink12")
            .times(1)
            .returning(|code| Err(StorageError::NotFound(code.to_string())));
        repo.expect_add_link()
            .withf(|record| *record == stored("GoodLink12", "google.com"))
            .times(1)
            .returning(|_| Ok(()));

        let service = ShortenerService::new(repo, ScriptedGenerator::new(&["GoodLink12"]));

        let code = service.create_short_link("google.com").await.unwrap();
        assert_eq!(code.as_str(), "GoodLink12");
    }

    #[tokio::test]
    async fn create_invalid_link_never_touches_storage() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_link().never();
        repo.expect_add_link().never();

        let service = ShortenerService::new(repo, RandomGenerator::new());

        for link in ["httpgooglecom", "", "ftp://example.com", "http://example.com /x"] {
            let err = service.create_short_link(link).await.unwrap_err();
            assert!(matches!(err, ShortenerError::InvalidLink(_)), "{link}");
        }
    }

    #[tokio::test]
    async fn create_times_out_when_every_code_collides() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_link()
            .returning(|code| Ok(stored(code.as_str(), "taken.com")));
        repo.expect_add_link().never();

        let service = ShortenerService::new(repo, ScriptedGenerator::new(&["TakenCode1"]))
            .with_generate_timeout(Duration::from_millis(50));

        let started = std::time::Instant::now();
        let err = service.create_short_link("google.com").await.unwrap_err();

        assert_eq!(err, ShortenerError::GenerateTimeout(Duration::from_millis(50)));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn create_uses_three_second_budget_by_default() {
        let service = in_memory_service();
        assert_eq!(service.generate_timeout(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn create_aborts_on_lookup_failure() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_link()
            .times(1)
            .returning(|_| Err(db_shutdown()));
        repo.expect_add_link().never();

        let service = ShortenerService::new(repo, RandomGenerator::new());

        let err = service.create_short_link("google.com").await.unwrap_err();
        assert_eq!(err, ShortenerError::Storage(db_shutdown()));
    }

    #[tokio::test]
    async fn create_propagates_add_failure_without_retry() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_link()
            .times(1)
            .returning(|code| Err(StorageError::NotFound(code.to_string())));
        repo.expect_add_link()
            .times(1)
            .returning(|_| Err(db_shutdown()));

        let service = ShortenerService::new(repo, ScriptedGenerator::new(&["BadLuck123"]));

        let err = service.create_short_link("google.com").await.unwrap_err();
        assert_eq!(err, ShortenerError::Storage(db_shutdown()));
    }

    #[tokio::test]
    async fn create_skips_colliding_codes() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_link().returning(|code| match code.as_str() {
            "TakenCode1" | "TakenCode2" => Ok(stored(code.as_str(), "taken.com")),
            _ => Err(StorageError::NotFound(code.to_string())),
        });
        repo.expect_add_link()
            .withf(|record| record.short_code.as_str() == "FreeCode_3")
            .times(1)
            .returning(|_| Ok(()));

        let generator = ScriptedGenerator::new(&["TakenCode1", "TakenCode2", "FreeCode_3"]);
        let service = ShortenerService::new(repo, generator);

        let code = service.create_short_link("google.com").await.unwrap();
        assert_eq!(code.as_str(), "FreeCode_3");
    }

    #[tokio::test]
    async fn create_retries_after_losing_insert_race() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_link()
            .returning(|code| Err(StorageError::NotFound(code.to_string())));
        repo.expect_add_link()
            .withf(|record| record.short_code.as_str() == "RacedCode1")
            .times(1)
            .returning(|record| Err(StorageError::Conflict(record.short_code.to_string())));
        repo.expect_add_link()
            .withf(|record| record.short_code.as_str() == "FreeCode_2")
            .times(1)
            .returning(|_| Ok(()));

        let generator = ScriptedGenerator::new(&["RacedCode1", "FreeCode_2"]);
        let service = ShortenerService::new(repo, generator);

        let code = service.create_short_link("google.com").await.unwrap();
        assert_eq!(code.as_str(), "FreeCode_2");
    }

    #[tokio::test]
    async fn create_then_resolve_round_trip() {
        let service = in_memory_service();

        let code = service.create_short_link("google.com").await.unwrap();
        assert_eq!(code.as_str().len(), SHORT_CODE_LENGTH);
        assert!(code.is_canonical());

        let long_url = service.resolve_short_link(code.as_str()).await.unwrap();
        assert_eq!(long_url, "google.com");
    }

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let service = in_memory_service();
        let code = service
            .create_short_link("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        let first = service.resolve_short_link(code.as_str()).await.unwrap();
        let second = service.resolve_short_link(code.as_str()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn many_creates_yield_distinct_codes() {
        let service = in_memory_service();

        let mut codes = std::collections::HashSet::new();
        for i in 0..20 {
            let code = service
                .create_short_link(&format!("https://example{i}.com"))
                .await
                .unwrap();
            assert!(codes.insert(code));
        }
    }

    #[tokio::test]
    async fn resolve_rejects_long_code_without_storage() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_link().never();

        let service = ShortenerService::new(repo, RandomGenerator::new());

        let err = service
            .resolve_short_link("abcdefghij0123456789")
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidShortCode(_)));
    }

    #[tokio::test]
    async fn resolve_missing_code_is_not_found() {
        let service = in_memory_service();

        let err = service.resolve_short_link("GoodLink12").await.unwrap_err();
        assert_eq!(err, ShortenerError::NotFound("GoodLink12".to_string()));
    }

    #[tokio::test]
    async fn resolve_passes_storage_errors_through() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_link()
            .times(1)
            .returning(|_| Err(db_shutdown()));

        let service = ShortenerService::new(repo, RandomGenerator::new());

        let err = service.resolve_short_link("GoodLink12").await.unwrap_err();
        assert_eq!(err, ShortenerError::Storage(db_shutdown()));
    }

    #[tokio::test]
    async fn concurrent_creates_share_one_namespace() {
        let service = in_memory_service();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    let url = format!("https://example{i}.com");
                    let code = service.create_short_link(&url).await.unwrap();
                    (code, url)
                })
            })
            .collect();

        let mut seen = std::collections::HashSet::new();
        for handle in handles {
            let (code, url) = handle.await.unwrap();
            assert!(seen.insert(code.clone()));
            assert_eq!(service.resolve_short_link(code.as_str()).await.unwrap(), url);
        }
    }
}
