//! # Configuración del Servidor
//! src/config.rs
//!
//! Tablas estáticas del proceso (blacklists, páginas de error, raíz de
//! archivos) con soporte para argumentos CLI y variables de entorno. Se
//! carga una sola vez en `main` y se comparte como `Arc<Config>`; nunca se
//! modifica mientras el servidor acepta conexiones.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./tiny_httpd --port 80 --root /flash/www \
//!   --deny-file boot.py,main.py,secrets.json \
//!   --enable-update
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 WEB_ROOT=./www ./tiny_httpd
//! ```

use crate::http::{ParamMode, StatusCode};
use clap::Parser;
use std::path::PathBuf;

/// Bytes de la única lectura que alimenta al parser
pub const REQUEST_BUFFER_SIZE: usize = 1024;

/// Tamaño de cada chunk al servir archivos estáticos
pub const FILE_CHUNK_SIZE: usize = 1024;

/// Tamaño de cada lectura adicional durante un upload
pub const UPLOAD_CHUNK_SIZE: usize = 8192;

/// Marca de fin de archivo del protocolo de upload
pub const UPLOAD_SENTINEL: &[u8] = b"#fileend#";

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "tiny_httpd")]
#[command(about = "Servidor HTTP minimalista para dispositivos embebidos")]
#[command(version)]
pub struct Config {
    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Directorio base de archivos estáticos, páginas de error y uploads
    #[arg(long, default_value = ".", env = "WEB_ROOT")]
    pub root: PathBuf,

    /// Template que se renderiza con 404 Not Found
    #[arg(long = "page-404", default_value = "html/404.html", env = "PAGE_404")]
    pub page_404: PathBuf,

    /// Template que se renderiza con 500 Internal Server Error
    #[arg(long = "page-500", default_value = "html/500.html", env = "PAGE_500")]
    pub page_500: PathBuf,

    /// Archivos que nunca se sirven (path exacto)
    #[arg(long = "deny-file", value_delimiter = ',', default_values = ["boot.py", "main.py"], env = "DENY_FILES")]
    pub deny_files: Vec<String>,

    /// Directorios de primer nivel que nunca se sirven
    #[arg(long = "deny-dir", value_delimiter = ',', default_values = ["python"], env = "DENY_DIRS")]
    pub deny_dirs: Vec<String>,

    /// Cómo se leen los parámetros de un GET
    #[arg(long = "param-mode", value_enum, default_value_t = ParamMode::Literal, env = "PARAM_MODE")]
    pub param_mode: ParamMode,

    /// Registrar la ruta built-in /update
    #[arg(long = "enable-update", env = "ENABLE_UPDATE")]
    pub enable_update: bool,

    /// Nivel de log cuando RUST_LOG no está definido
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use tiny_httpd::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.page_404.as_os_str().is_empty() || self.page_500.as_os_str().is_empty() {
            return Err("Error page paths must not be empty".to_string());
        }
        if self.deny_dirs.iter().any(|d| d.contains('/')) {
            return Err("Denied directories must be a single path segment".to_string());
        }
        Ok(())
    }

    /// Resuelve un path relativo a la raíz; los absolutos pasan tal cual
    pub fn resolve(&self, relative: impl AsRef<std::path::Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Template asociado a un código de error (solo 404 y 500)
    pub fn error_page(&self, status: StatusCode) -> Option<PathBuf> {
        match status {
            StatusCode::NotFound => Some(self.resolve(&self.page_404)),
            StatusCode::InternalServerError => Some(self.resolve(&self.page_500)),
            _ => None,
        }
    }

    /// `true` si el path pedido está en la blacklist de archivos
    pub fn is_denied_file(&self, filename: &str) -> bool {
        self.deny_files.iter().any(|f| f == filename)
    }

    /// `true` si el primer segmento del path está en la blacklist de directorios
    pub fn is_denied_dir(&self, filename: &str) -> bool {
        match filename.split_once('/') {
            Some((dir, _)) => self.deny_dirs.iter().any(|d| d == dir),
            None => false,
        }
    }
}

impl Default for Config {
    /// Configuración por defecto (igual a los defaults del CLI)
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            root: PathBuf::from("."),
            page_404: PathBuf::from("html/404.html"),
            page_500: PathBuf::from("html/500.html"),
            deny_files: vec!["boot.py".to_string(), "main.py".to_string()],
            deny_dirs: vec!["python".to_string()],
            param_mode: ParamMode::Literal,
            enable_update: false,
            log_level: "info".to_string(),
        }
    }
}
