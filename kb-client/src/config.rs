use anyhow::{Context, Result};
use std::path::PathBuf;

/// Connection settings for the hosted backend, read from the environment.
/// A `.env` file is honored when present.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the backend project, e.g. `https://xyz.supabase.co`.
    pub backend_url: String,
    /// The project's public API key, sent as the `apikey` header.
    pub anon_key: String,
    /// The access token of the signed-in user.
    pub access_token: String,
    /// Directory for locally persisted edit drafts.
    pub draft_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let backend_url = dotenvy::var("KOCHBUCH_BACKEND_URL")
            .context("KOCHBUCH_BACKEND_URL is not set")?
            .trim_end_matches('/')
            .to_string();
        let anon_key = dotenvy::var("KOCHBUCH_ANON_KEY").context("KOCHBUCH_ANON_KEY is not set")?;
        let access_token =
            dotenvy::var("KOCHBUCH_ACCESS_TOKEN").context("KOCHBUCH_ACCESS_TOKEN is not set")?;
        let draft_dir = dotenvy::var("KOCHBUCH_DRAFT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/drafts"));
        Ok(Self {
            backend_url,
            anon_key,
            access_token,
            draft_dir,
        })
    }
}
