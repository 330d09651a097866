//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes, un thread por conexión
//! 3. Lee y parsea un request por conexión
//! 4. Despacha al router y cierra

pub mod connection;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::Connection;
pub use tcp::{handle_connection, Server};
