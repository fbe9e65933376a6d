use crate::catalog::types::CanonicalGenre;
use crate::catalog::CatalogClient;
use anyhow::Context;

/// Splits raw completion text on commas into trimmed labels. Empty segments
/// are kept.
pub fn split_labels(text: &str) -> Vec<String> {
    text.split(',').map(|s| s.trim().to_string()).collect()
}

/// Ids of every canonical genre whose name contains any label,
/// case-insensitively. Output follows the canonical order.
pub fn match_genre_ids(canonical: &[CanonicalGenre], labels: &[String]) -> Vec<i64> {
    let labels: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();
    canonical
        .iter()
        .filter(|genre| {
            let name = genre.name.to_lowercase();
            labels.iter().any(|label| name.contains(label.as_str()))
        })
        .map(|genre| genre.id)
        .collect()
}

/// Fetches the taxonomy (never cached) and matches `labels` against it.
pub async fn resolve(catalog: &dyn CatalogClient, labels: &[String]) -> anyhow::Result<Vec<i64>> {
    let canonical = catalog
        .genres()
        .await
        .context("genre taxonomy fetch failed")?;
    Ok(match_genre_ids(&canonical, labels))
}
