#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("entity source failure: {0}")]
    Source(#[from] anyhow::Error),
}
