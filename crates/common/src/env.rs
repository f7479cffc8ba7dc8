//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use tracing::warn;

/// Warn when the frontend bundle is missing; the API keeps working without it.
pub async fn ensure_env(frontend_dir: &str) -> anyhow::Result<()> {
    match tokio::fs::metadata(frontend_dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(anyhow::anyhow!("{frontend_dir} exists but is not a directory"));
        }
        Err(_) => {
            warn!(%frontend_dir, "frontend assets directory not found; static assets may 404");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_dir_is_only_a_warning() {
        ensure_env("/definitely/not/here").await.unwrap();
    }

    #[tokio::test]
    async fn file_in_place_of_dir_is_rejected() {
        let path = std::env::temp_dir().join(format!("frontend_file_{}", std::process::id()));
        tokio::fs::write(&path, b"x").await.unwrap();
        let res = ensure_env(path.to_str().unwrap()).await;
        let _ = tokio::fs::remove_file(&path).await;
        assert!(res.is_err());
    }
}
