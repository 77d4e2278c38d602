//! Diagnóstico de desarrollo vía `RUST_LOG`, a stderr.
//!
//! La salida de producto (tabla de resultados por Step) va a stdout y no
//! pasa por tracing; esto es sólo para seguir la corrida por dentro.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Inicializa el subscriber. Sin `RUST_LOG`, el default es `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry().with(filter)
                                  .with(fmt::layer().with_writer(std::io::stderr).compact())
                                  .init();
}
