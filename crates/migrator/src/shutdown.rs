//! Signal handling for interrupting a migration.

#[cfg(unix)]
pub async fn signal_handler() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    // equivalent to Ctrl+C
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => tracing::warn!("received SIGTERM signal"),
        _ = sigint.recv() => tracing::warn!("received SIGINT signal"),
    }
}

#[cfg(not(unix))]
pub async fn signal_handler() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C handler");
    tracing::warn!("received CTRL+C signal");
}
