pub mod openrouter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenRouter,
}

#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Asks the model for genres matching `mood` and returns its raw text.
    async fn complete(&self, mood: &str) -> anyhow::Result<String>;
}

pub fn genre_prompt(mood: &str) -> String {
    format!(
        "Convert this mood into exactly 3 movie genres. Only return comma separated genres. Mood: {mood}"
    )
}
