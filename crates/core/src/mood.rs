use crate::catalog::CatalogClient;
use crate::error::diagnostic;
use crate::genre;
use crate::llm::CompletionClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub const MAX_MOVIES: usize = 10;

/// `mood` must be a JSON string. Any other JSON type fails to decode, and the
/// HTTP layer treats that as a missing mood.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoodRequest {
    #[serde(default)]
    pub mood: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodResponse {
    pub mood: String,
    pub genres: Vec<String>,
    pub movies: Vec<Value>,
}

#[derive(Debug)]
pub enum ServiceError {
    /// Client input was missing or empty. Nothing was sent upstream.
    Validation(&'static str),
    /// An outbound call failed. Detail is for logs only.
    Upstream(anyhow::Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::Upstream(err) => write!(f, "upstream failure: {err:#}"),
        }
    }
}

impl std::error::Error for ServiceError {}

#[derive(Clone)]
pub struct MoodService {
    llm: Arc<dyn CompletionClient>,
    catalog: Arc<dyn CatalogClient>,
}

impl MoodService {
    pub fn new(llm: Arc<dyn CompletionClient>, catalog: Arc<dyn CatalogClient>) -> Self {
        Self { llm, catalog }
    }

    /// Mood text to genre labels to canonical ids to the top movies.
    pub async fn handle(&self, req: MoodRequest) -> Result<MoodResponse, ServiceError> {
        let mood = match req.mood {
            Some(mood) if !mood.is_empty() => mood,
            _ => return Err(ServiceError::Validation("Mood required")),
        };

        match self.run_pipeline(&mood).await {
            Ok((genres, movies)) => Ok(MoodResponse {
                mood,
                genres,
                movies,
            }),
            Err(err) => {
                tracing::error!(
                    llm = ?self.llm.provider(),
                    catalog = self.catalog.provider_name(),
                    error = %diagnostic(&err),
                    "mood pipeline failed"
                );
                Err(ServiceError::Upstream(err))
            }
        }
    }

    async fn run_pipeline(&self, mood: &str) -> anyhow::Result<(Vec<String>, Vec<Value>)> {
        let text = self.llm.complete(mood).await?;
        let labels = genre::split_labels(&text);
        let genre_ids = genre::resolve(self.catalog.as_ref(), &labels).await?;
        let mut movies = self.catalog.discover(&genre_ids).await?;
        movies.truncate(MAX_MOVIES);
        Ok((labels, movies))
    }

    /// Detail payload for `id`, passed through untouched.
    pub async fn movie(&self, id: &str) -> Result<Value, ServiceError> {
        self.catalog.movie(id).await.map_err(|err| {
            tracing::error!(
                catalog = self.catalog.provider_name(),
                %id,
                error = %diagnostic(&err),
                "movie detail fetch failed"
            );
            ServiceError::Upstream(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::CanonicalGenre;
    use crate::llm::Provider;
    use serde_json::json;
    use std::sync::Mutex;

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct FakeLlm {
        reply: Option<&'static str>,
        calls: CallLog,
    }

    #[async_trait::async_trait]
    impl CompletionClient for FakeLlm {
        fn provider(&self) -> Provider {
            Provider::OpenRouter
        }

        async fn complete(&self, mood: &str) -> anyhow::Result<String> {
            self.calls.lock().unwrap().push(format!("complete:{mood}"));
            match self.reply {
                Some(text) => Ok(text.to_string()),
                None => Err(anyhow::anyhow!("connection refused")),
            }
        }
    }

    struct FakeCatalog {
        genres: Vec<CanonicalGenre>,
        movies: Vec<Value>,
        fail_genres: bool,
        fail_discover: bool,
        calls: CallLog,
    }

    #[async_trait::async_trait]
    impl CatalogClient for FakeCatalog {
        fn provider_name(&self) -> &'static str {
            "fake"
        }

        async fn genres(&self) -> anyhow::Result<Vec<CanonicalGenre>> {
            self.calls.lock().unwrap().push("genres".to_string());
            anyhow::ensure!(!self.fail_genres, "taxonomy unavailable");
            Ok(self.genres.clone())
        }

        async fn discover(&self, genre_ids: &[i64]) -> anyhow::Result<Vec<Value>> {
            let filter = genre_ids
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            self.calls.lock().unwrap().push(format!("discover:{filter}"));
            anyhow::ensure!(!self.fail_discover, "discover unavailable");
            Ok(self.movies.clone())
        }

        async fn movie(&self, id: &str) -> anyhow::Result<Value> {
            self.calls.lock().unwrap().push(format!("movie:{id}"));
            match id.parse::<i64>() {
                Ok(n) => Ok(json!({"id": n, "title": "X"})),
                Err(_) => Err(anyhow::anyhow!("resource not found")),
            }
        }
    }

    fn canonical() -> Vec<CanonicalGenre> {
        [(35, "Comedy"), (27, "Horror"), (18, "Drama")]
            .into_iter()
            .map(|(id, name)| CanonicalGenre {
                id,
                name: name.to_string(),
            })
            .collect()
    }

    fn movies(n: i64) -> Vec<Value> {
        (1..=n).map(|id| json!({"id": id, "title": format!("Movie {id}")})).collect()
    }

    fn service(reply: Option<&'static str>, movie_count: i64) -> (MoodService, CallLog) {
        let calls = CallLog::default();
        let llm = FakeLlm {
            reply,
            calls: calls.clone(),
        };
        let catalog = FakeCatalog {
            genres: canonical(),
            movies: movies(movie_count),
            fail_genres: false,
            fail_discover: false,
            calls: calls.clone(),
        };
        (MoodService::new(Arc::new(llm), Arc::new(catalog)), calls)
    }

    fn calls(log: &CallLog) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    fn mood(s: &str) -> MoodRequest {
        MoodRequest {
            mood: Some(s.to_string()),
        }
    }

    #[tokio::test]
    async fn missing_or_empty_mood_makes_no_calls() {
        let (svc, log) = service(Some("Comedy"), 3);

        let err = svc.handle(MoodRequest::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation("Mood required")));

        let err = svc.handle(mood("")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation("Mood required")));

        assert!(calls(&log).is_empty());
    }

    #[tokio::test]
    async fn runs_steps_in_order_and_shapes_response() {
        let (svc, log) = service(Some("Comedy, Drama , Thriller"), 3);

        let res = svc.handle(mood("happy but tired")).await.unwrap();
        assert_eq!(res.mood, "happy but tired");
        assert_eq!(res.genres, vec!["Comedy", "Drama", "Thriller"]);
        assert_eq!(res.movies, movies(3));
        assert_eq!(
            calls(&log),
            vec!["complete:happy but tired", "genres", "discover:35,18"]
        );
    }

    #[tokio::test]
    async fn movies_are_a_prefix_of_at_most_ten() {
        let (svc, _) = service(Some("Horror"), 20);

        let res = svc.handle(mood("spooky")).await.unwrap();
        assert_eq!(res.movies.len(), MAX_MOVIES);
        assert_eq!(res.movies, movies(20)[..MAX_MOVIES].to_vec());
    }

    #[tokio::test]
    async fn unmatched_labels_still_run_discovery_unfiltered() {
        let (svc, log) = service(Some("Sci-Fi"), 2);

        let res = svc.handle(mood("curious")).await.unwrap();
        assert_eq!(res.genres, vec!["Sci-Fi"]);
        assert_eq!(res.movies.len(), 2);
        assert_eq!(calls(&log), vec!["complete:curious", "genres", "discover:"]);
    }

    #[tokio::test]
    async fn completion_failure_skips_catalog() {
        let (svc, log) = service(None, 3);

        let err = svc.handle(mood("angry")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream(_)));
        assert_eq!(calls(&log), vec!["complete:angry"]);
    }

    #[tokio::test]
    async fn taxonomy_failure_skips_discovery() {
        let calls_log = CallLog::default();
        let llm = FakeLlm {
            reply: Some("Comedy"),
            calls: calls_log.clone(),
        };
        let catalog = FakeCatalog {
            genres: canonical(),
            movies: movies(3),
            fail_genres: true,
            fail_discover: false,
            calls: calls_log.clone(),
        };
        let svc = MoodService::new(Arc::new(llm), Arc::new(catalog));

        let err = svc.handle(mood("sad")).await.unwrap_err();
        let ServiceError::Upstream(err) = err else {
            panic!("expected upstream failure");
        };
        assert!(format!("{err:#}").contains("taxonomy unavailable"));
        assert_eq!(calls(&calls_log), vec!["complete:sad", "genres"]);
    }

    #[tokio::test]
    async fn discovery_failure_is_upstream_failure() {
        let calls_log = CallLog::default();
        let llm = FakeLlm {
            reply: Some("Comedy"),
            calls: calls_log.clone(),
        };
        let catalog = FakeCatalog {
            genres: canonical(),
            movies: movies(3),
            fail_genres: false,
            fail_discover: true,
            calls: calls_log.clone(),
        };
        let svc = MoodService::new(Arc::new(llm), Arc::new(catalog));

        let err = svc.handle(mood("bored")).await.unwrap_err();
        let ServiceError::Upstream(err) = err else {
            panic!("expected upstream failure");
        };
        assert!(format!("{err:#}").contains("discover unavailable"));
        assert_eq!(
            calls(&calls_log),
            vec!["complete:bored", "genres", "discover:35"]
        );
    }

    #[tokio::test]
    async fn movie_id_is_forwarded_verbatim() {
        let (svc, log) = service(Some("Comedy"), 0);

        assert_eq!(svc.movie("123").await.unwrap(), json!({"id": 123, "title": "X"}));
        assert!(matches!(
            svc.movie("abc").await.unwrap_err(),
            ServiceError::Upstream(_)
        ));
        assert_eq!(calls(&log), vec!["movie:123", "movie:abc"]);
    }
}
