use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalGenre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreListResponse {
    pub genres: Vec<CanonicalGenre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverResponse {
    pub results: Vec<Value>,
}
