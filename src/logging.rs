//! # Logging
//! src/logging.rs
//!
//! Subscriber de `tracing` para el binario. `RUST_LOG` tiene prioridad
//! sobre el nivel configurado.

use tracing_subscriber::EnvFilter;

/// Inicializa el subscriber global; llamadas repetidas no hacen nada
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init();
}
