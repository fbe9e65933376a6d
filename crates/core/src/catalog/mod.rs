pub mod tmdb;
pub mod types;

use crate::catalog::types::CanonicalGenre;
use serde_json::Value;

#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Full movie genre taxonomy.
    async fn genres(&self) -> anyhow::Result<Vec<CanonicalGenre>>;

    /// First page of discovery results filtered by `genre_ids`.
    async fn discover(&self, genre_ids: &[i64]) -> anyhow::Result<Vec<Value>>;

    /// Raw detail payload for `id`, forwarded as given.
    async fn movie(&self, id: &str) -> anyhow::Result<Value>;
}
