use tracing::{error, info};
use uuid::Uuid;

fn main() -> std::process::ExitCode {
    // Loads .env, starts tracing (RUST_LOG / LOG_FORMAT) and reads the config once.
    let cfg = match server::bootstrap() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "coaster-api", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    info!(service = "coaster-api", event = "logger_init", "tracing subscriber initialized");

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "coaster-api",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = cfg.server.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "coaster-api", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "coaster-api",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "coaster api starting"
    );

    // server::run_with_config owns signal handling and returns once connections are drained.
    match rt.block_on(server::run_with_config(cfg)) {
        Ok(()) => {
            info!(service = "coaster-api", event = "stop", %service_id, pid, "coaster api stopped normally");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "coaster-api", event = "run_failed", error = %e, "coaster api failed");
            std::process::ExitCode::FAILURE
        }
    }
}
