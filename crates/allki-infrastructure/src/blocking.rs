use allki_core::{AllkiError, Result};

/// Runs synchronous file work on the blocking pool.
pub(crate) async fn run_blocking<F, R>(f: F) -> Result<R>
where
    F: FnOnce() -> Result<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AllkiError::internal(format!("Blocking task failed: {e}")))?
}
