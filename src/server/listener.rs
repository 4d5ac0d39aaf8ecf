use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;

/// Binds the configured address and serves the document root until the
/// process is stopped.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let doc_root = tokio::fs::canonicalize(&cfg.static_files.doc_root)
        .await
        .with_context(|| {
            format!(
                "document root {} is not accessible",
                cfg.static_files.doc_root.display()
            )
        })?;

    if !tokio::fs::metadata(&doc_root).await?.is_dir() {
        anyhow::bail!("document root {} is not a directory", doc_root.display());
    }

    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.listen_addr))?;
    info!(
        addr = %cfg.server.listen_addr,
        doc_root = %doc_root.display(),
        "Listening"
    );

    serve(listener, doc_root, cfg.read_timeout()).await;
    Ok(())
}

/// Accepts connections on `listener` forever, one task per connection.
///
/// A failed accept is logged and skipped; it never stops the loop.
pub async fn serve(listener: TcpListener, doc_root: PathBuf, read_timeout: Duration) {
    let doc_root = Arc::new(doc_root);

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let doc_root = doc_root.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, doc_root, read_timeout);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {:#}", peer, e);
            }
            tracing::debug!(%peer, "Connection closed");
        });
    }
}
