use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Builds the log filter for all tempus crates at `log_level`.
///
/// `RUST_LOG` takes precedence when it is set.
pub fn get_log_env(log_level: String) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tempus={},tempus_api={},tempus_core={},tempus_benchmark={}",
            log_level, log_level, log_level, log_level
        ))
    })
}

/// Installs a global pretty-printing subscriber. Calling it again is a no-op.
pub fn init_global_logger(log_level: String) {
    let filter = get_log_env(log_level);
    Registry::default()
        .with(filter)
        .with(fmt::layer().pretty())
        .try_init()
        .ok();
}

pub fn global_info_logger() {
    init_global_logger("INFO".to_string())
}
