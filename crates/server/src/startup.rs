use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging;
use configs::{AdminConfig, AppConfig};
use dotenvy::dotenv;
use service::store::{memory::InMemoryCoasterStore, CoasterStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::{AdminCredentials, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Read the admin secret from the env var named in config. Serving without it is not allowed.
pub fn load_admin_credentials(cfg: &AdminConfig) -> Result<AdminCredentials, StartupError> {
    let password = common::env::require_var(&cfg.password_env)
        .map_err(|e| StartupError::MissingSecret(e.to_string()))?;
    Ok(AdminCredentials::new(password))
}

fn load_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.server.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address {raw}: {e}")))
}

/// Fresh state with an empty in-memory store.
pub fn build_state(admin: AdminCredentials) -> AppState {
    let store: Arc<dyn CoasterStore> = Arc::new(InMemoryCoasterStore::new());
    AppState::new(store, admin)
}

/// Load `.env`, start logging and read the config. A config file that exists
/// but is invalid is a startup error.
pub fn bootstrap() -> Result<AppConfig, StartupError> {
    dotenv().ok();
    init_logging();
    AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(format!("{e:#}")))
}

/// Standalone entry: bootstrap, then serve until a shutdown signal arrives.
pub async fn run() -> anyhow::Result<()> {
    let cfg = bootstrap()?;
    run_with_config(cfg).await
}

/// Load the admin secret named by `cfg`, then run the HTTP server until a
/// shutdown signal arrives.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let admin = load_admin_credentials(&cfg.admin)?;
    let addr = load_bind_addr(&cfg)?;

    let app = routes::build_router(build_state(admin), build_cors());

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.to_string(), source })?;
    info!(%addr, "starting coaster api");
    serve(listener, app).await
}

/// Serve `app` on an already bound listener with graceful shutdown.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("coaster api stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_secret_is_a_startup_error() {
        let cfg = AdminConfig { password_env: "COASTER_TEST_UNSET_SECRET_91B2".into() };
        std::env::remove_var(&cfg.password_env);
        let err = load_admin_credentials(&cfg).unwrap_err();
        assert!(matches!(err, StartupError::MissingSecret(_)));
        assert!(err.to_string().contains("COASTER_TEST_UNSET_SECRET_91B2"));
    }

    #[test]
    fn secret_from_configured_env_var_is_used() {
        let cfg = AdminConfig { password_env: "COASTER_TEST_SET_SECRET_91B2".into() };
        std::env::set_var(&cfg.password_env, "letmein");
        let creds = load_admin_credentials(&cfg).unwrap();
        assert!(creds.verify("admin", "letmein"));
    }

    #[test]
    fn invalid_config_file_fails_bootstrap() {
        let path = std::env::temp_dir().join(format!("server_bootstrap_{}.toml", std::process::id()));
        std::fs::write(&path, "[server]\nport = 0\n\n[admin]\npassword_env = \"MY_SECRET\"\n").unwrap();
        std::env::set_var("CONFIG_PATH", &path);

        let err = bootstrap().unwrap_err();
        assert!(matches!(err, StartupError::InvalidConfig(_)), "{err}");

        std::env::remove_var("CONFIG_PATH");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn bind_addr_comes_from_server_config() {
        let cfg = AppConfig::default();
        assert_eq!(load_bind_addr(&cfg).unwrap().port(), 8081);
    }
}
