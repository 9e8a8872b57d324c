use anyhow::Result;

/// One rewrite step of a content pipeline.
///
/// A stage gets the output of the previous one. Returning an error (or
/// panicking) only skips this stage; the pipeline carries on with its input.
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, content: &str) -> Result<String>;
}
