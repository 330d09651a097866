//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea el path del request (sin query string) a un handler registrado.
//!
//! ```text
//! Request → Router ─┬─ handler registrado
//!                   └─ archivo estático (path sin la `/` inicial)
//! ```
//!
//! La tabla se arma una sola vez antes de aceptar conexiones y después se
//! comparte de solo lectura entre todos los threads, por eso no lleva lock.
//! El match es exacto: sin wildcards ni normalización de `/` final.

use crate::commands;
use crate::error::ServeError;
use crate::http::{Request, ResponseWriter, StatusCode};
use crate::static_files;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tipo de función handler
///
/// Recibe el request parseado y el escritor sobre la conexión cruda, y es
/// responsable de producir la respuesta completa.
pub type Handler = Arc<dyn Fn(&Request, &mut ResponseWriter<'_>) -> io::Result<()> + Send + Sync>;

/// Router que mapea paths a handlers
#[derive(Clone, Default)]
pub struct Router {
    routes: HashMap<String, Handler>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Registra una ruta con su handler; una ruta repetida se sobrescribe
    ///
    /// # Ejemplo
    /// ```
    /// use tiny_httpd::router::Router;
    ///
    /// let mut router = Router::new();
    /// router.register("/led", |_req, out| out.send_json(&["on"]));
    /// assert!(router.contains("/led"));
    /// ```
    pub fn register<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut ResponseWriter<'_>) -> io::Result<()> + Send + Sync + 'static,
    {
        self.routes.insert(path.to_string(), Arc::new(handler));
    }

    /// Reemplaza la tabla completa
    pub fn set_routes<I>(&mut self, routes: I)
    where
        I: IntoIterator<Item = (String, Handler)>,
    {
        self.routes = routes.into_iter().collect();
    }

    /// Agrega varias rutas; las claves repetidas ganan sobre las existentes
    pub fn add_routes<I>(&mut self, routes: I)
    where
        I: IntoIterator<Item = (String, Handler)>,
    {
        self.routes.extend(routes);
    }

    /// Registra la ruta built-in `/update` de subida de archivos
    pub fn add_update_route(&mut self) {
        self.register(commands::UPDATE_PATH, commands::update_handler);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Despacha un request ya parseado
    ///
    /// - Sin método: página 500
    /// - Ruta registrada: su handler; si falla, página 500
    /// - Cualquier otra cosa: archivo estático
    pub fn dispatch(&self, request: &Request, out: &mut ResponseWriter<'_>) {
        if request.method().is_none() {
            warn!(error = %ServeError::MissingMethod, "request sin método");
            out.render_error(StatusCode::InternalServerError);
            return;
        }

        let key = request.route_key();
        match self.routes.get(key) {
            Some(handler) => {
                debug!(route = key, "handler registrado");
                if let Err(e) = handler(request, out) {
                    warn!(route = key, error = %e, "handler fallido");
                    out.fail(StatusCode::InternalServerError);
                }
            }
            None => {
                let filename = key.strip_prefix('/').unwrap_or(key);
                debug!(file = filename, "sin ruta, sirviendo archivo estático");
                static_files::send_file(filename, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::connection::mock::MockConnection;
    use std::fs;

    fn hello_handler(_req: &Request, out: &mut ResponseWriter<'_>) -> io::Result<()> {
        out.send_status(StatusCode::Ok)?;
        out.send_headers([("Content-Type", "text/plain")])?;
        out.send_body(b"hello from handler")
    }

    fn ok_handler(_req: &Request, out: &mut ResponseWriter<'_>) -> io::Result<()> {
        out.send_ok()
    }

    fn dispatch(router: &Router, raw: &[u8], config: &Config) -> MockConnection {
        let request = Request::parse(raw).unwrap();
        let mut conn = MockConnection::new();
        let mut out = ResponseWriter::new(&mut conn, config);
        router.dispatch(&request, &mut out);
        conn
    }

    fn site() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("html")).unwrap();
        fs::write(dir.path().join("html/404.html"), "not found").unwrap();
        fs::write(dir.path().join("html/500.html"), "error").unwrap();
        let config = Config {
            root: dir.path().to_path_buf(),
            ..Config::default()
        };
        (dir, config)
    }

    #[test]
    fn test_router_creation() {
        let router = Router::new();
        assert!(router.is_empty());
    }

    #[test]
    fn test_register_overwrites() {
        let mut router = Router::new();
        router.register("/test", hello_handler);
        router.register("/test", ok_handler);
        assert_eq!(router.len(), 1);

        let (_dir, config) = site();
        let conn = dispatch(&router, b"GET /test HTTP/1.1\r\nHost: esp32\r\n\r\n", &config);
        assert_eq!(conn.output(), "HTTP/1.1 200 OK\n\n\n\n");
    }

    #[test]
    fn test_set_and_add_routes() {
        let hello: Handler = Arc::new(hello_handler);
        let ok: Handler = Arc::new(ok_handler);

        let mut router = Router::new();
        router.register("/old", hello_handler);
        router.set_routes([("/a".to_string(), Arc::clone(&hello))]);
        assert!(!router.contains("/old"));
        assert!(router.contains("/a"));

        router.add_routes([("/b".to_string(), Arc::clone(&hello)), ("/a".to_string(), ok)]);
        assert_eq!(router.len(), 2);

        let (_dir, config) = site();
        let conn = dispatch(&router, b"GET /a HTTP/1.1\r\nHost: esp32\r\n\r\n", &config);
        assert_eq!(conn.output(), "HTTP/1.1 200 OK\n\n\n\n");
    }

    #[test]
    fn test_route_found_ignores_query() {
        let mut router = Router::new();
        router.register("/hello", hello_handler);

        let (_dir, config) = site();
        let conn = dispatch(&router, b"GET /hello?x=1 HTTP/1.1\r\nHost: esp32\r\n\r\n", &config);
        assert!(conn.output().contains("hello from handler"));
    }

    #[test]
    fn test_exact_match_only() {
        let mut router = Router::new();
        router.register("/hello", hello_handler);

        let (_dir, config) = site();
        let conn = dispatch(&router, b"GET /hello/ HTTP/1.1\r\nHost: esp32\r\n\r\n", &config);
        assert!(conn.output().starts_with("HTTP/1.1 404 Not Found\n"));
    }

    #[test]
    fn test_unrouted_path_served_from_disk() {
        let router = Router::new();
        let (dir, config) = site();
        fs::write(dir.path().join("style.css"), "body{}").unwrap();

        let conn = dispatch(&router, b"GET /style.css?v=2 HTTP/1.1\r\nHost: esp32\r\n\r\n", &config);
        assert_eq!(conn.output(), "HTTP/1.1 200 OK\nContent-Type: text/css\n\nbody{}\n\n");
    }

    #[test]
    fn test_missing_method_renders_500() {
        let mut router = Router::new();
        router.register("/hello", hello_handler);
        let (_dir, config) = site();

        let conn = dispatch(&router, b"GET /hello\r\nHost: esp32\r\n\r\n", &config);
        assert_eq!(
            conn.output(),
            "HTTP/1.1 500 Internal Server Error\nContent-Type: text/html\n\nerror\n\n"
        );
    }

    #[test]
    fn test_failing_handler_renders_500() {
        let mut router = Router::new();
        router.register("/boom", |_req, _out| {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        });
        let (_dir, config) = site();

        let conn = dispatch(&router, b"GET /boom HTTP/1.1\r\nHost: esp32\r\n\r\n", &config);
        assert!(conn.output().starts_with("HTTP/1.1 500 Internal Server Error\n"));
        assert!(conn.closed);
    }
}
