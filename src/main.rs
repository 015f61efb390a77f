use std::net::SocketAddr;
use std::time::Duration;

use assessment_backend::{
    build_router,
    config::{get_config, init_config},
    services::question_bank::QuestionBank,
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let bank = QuestionBank::load(&config.questions_path).map_err(|e| {
        tracing::error!(error = %e, "Failed to load question bank");
        e
    })?;

    let app_state = AppState::new(config, bank);

    {
        let sessions = app_state.sessions.clone();
        let every = Duration::from_secs(config.session_ttl_secs.clamp(1, 60));
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(every).await;
                let removed = sessions.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "Expired sessions swept");
                }
            }
        });
    }

    let app = build_router(app_state, config);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
