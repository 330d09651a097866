//! # tiny_httpd - Entry Point
//! src/main.rs
//!
//! Lee la configuración (CLI + entorno), arma la tabla de rutas y bloquea
//! el thread principal en el loop de accept.

use anyhow::{bail, Context};
use tiny_httpd::config::Config;
use tiny_httpd::logging;
use tiny_httpd::router::Router;
use tiny_httpd::server::Server;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::new();
    logging::init(&config.log_level);

    if let Err(e) = config.validate() {
        bail!("configuración inválida: {}", e);
    }

    info!(
        address = %config.address(),
        root = %config.root.display(),
        param_mode = ?config.param_mode,
        update = config.enable_update,
        "configuración cargada"
    );

    let mut router = Router::new();
    if config.enable_update {
        router.add_update_route();
    }

    let address = config.address();
    let server = Server::new(config, router);
    server
        .run()
        .with_context(|| format!("no se pudo iniciar el servidor en {}", address))
}
