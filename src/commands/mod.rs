//! # Comandos del Servidor
//!
//! Rutas built-in que el servidor puede registrar además de las del usuario.
//! Cada comando es un handler con la misma firma que cualquier ruta
//! registrada: recibe el `Request` y el `ResponseWriter` de la conexión.
//!
//! - **update**: subida de archivos terminada por centinela

pub mod update;

pub use update::{update_handler, UPDATE_PATH};
