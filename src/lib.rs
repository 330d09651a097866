//! # tiny_httpd
//! src/lib.rs
//!
//! Servidor HTTP minimalista para dispositivos embebidos con muy poca
//! memoria: bloqueante, un thread por conexión, una respuesta por conexión.
//!
//! ## Arquitectura
//!
//! - `http`: parsing de requests, parámetros y escritura de respuestas
//! - `router`: tabla de rutas exactas con fallback a archivos estáticos
//! - `static_files`: archivos en disco con tipo MIME y blacklists
//! - `commands`: rutas built-in (subida de archivos por `/update`)
//! - `server`: loop de accept y ciclo de cada conexión
//! - `config`: CLI, variables de entorno y tablas estáticas
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use tiny_httpd::config::Config;
//! use tiny_httpd::router::Router;
//! use tiny_httpd::server::Server;
//!
//! let mut router = Router::new();
//! router.register("/ping", |_req, out| out.send_json(&"pong"));
//! router.add_update_route();
//!
//! let server = Server::new(Config::default(), router);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
pub mod static_files;
