//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Un thread acepta conexiones en un loop infinito y cada conexión se
//! procesa en su propio thread: una lectura, parse, dispatch, respuesta y
//! cierre. Sin pool, sin límite de threads y sin timeouts; un cliente lento
//! bloquea solo su propio thread.
//!
//! Lo único compartido entre threads es la configuración y la tabla de
//! rutas, ambas inmutables una vez que arranca el loop de accept.

use super::Connection;
use crate::config::{Config, REQUEST_BUFFER_SIZE};
use crate::error::ServeError;
use crate::http::{Method, Request, ResponseWriter};
use crate::router::Router;
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

/// Servidor HTTP, un thread por conexión
pub struct Server {
    config: Arc<Config>,
    router: Arc<Router>,
}

impl Server {
    pub fn new(config: Config, router: Router) -> Self {
        Self {
            config: Arc::new(config),
            router: Arc::new(router),
        }
    }

    /// Abre el socket en la dirección configurada
    pub fn bind(&self) -> io::Result<TcpListener> {
        let address = self.config.address();
        let listener = TcpListener::bind(&address)?;
        info!(address = %address, routes = self.router.len(), "servidor escuchando");
        Ok(listener)
    }

    /// Acepta conexiones en el thread actual; no retorna salvo error de bind
    pub fn run(&self) -> io::Result<()> {
        let listener = self.bind()?;
        self.serve(listener)
    }

    /// Lanza el thread dedicado de accept y retorna la dirección real
    pub fn start(self) -> io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener = self.bind()?;
        let address = listener.local_addr()?;
        let handle = thread::spawn(move || {
            if let Err(e) = self.serve(listener) {
                error!(error = %e, "loop de accept terminado");
            }
        });
        Ok((address, handle))
    }

    /// Loop de accept sobre un listener ya abierto
    pub fn serve(&self, listener: TcpListener) -> io::Result<()> {
        for stream in listener.incoming() {
            match stream {
                Ok(mut stream) => {
                    let router = Arc::clone(&self.router);
                    let config = Arc::clone(&self.config);
                    debug!(peer = %stream.peer(), "nueva conexión");

                    thread::spawn(move || {
                        if let Err(e) = handle_connection(&mut stream, &router, &config) {
                            warn!(error = %e, "error en conexión");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "error al aceptar conexión");
                }
            }
        }

        Ok(())
    }
}

/// Ciclo completo de una conexión: lectura, parse, dispatch y cierre
///
/// Los errores de protocolo se convierten en páginas de error acá; lo único
/// que puede salir como `Err` es una falla de lectura o de cierre del socket.
pub fn handle_connection(conn: &mut dyn Connection, router: &Router, config: &Config) -> io::Result<()> {
    let mut buffer = [0u8; REQUEST_BUFFER_SIZE];
    let bytes_read = conn.read(&mut buffer)?;

    if bytes_read == 0 {
        debug!("conexión cerrada sin datos");
        return conn.close();
    }

    let mut out = ResponseWriter::new(conn, config);
    match Request::parse(&buffer[..bytes_read]) {
        Ok(request) => {
            info!(
                method = request.method().map(Method::as_str),
                path = request.path(),
                "request"
            );
            router.dispatch(&request, &mut out);
        }
        Err(e) => {
            let err = ServeError::from(e);
            warn!(bytes = bytes_read, error = %err, "request malformado");
            out.render_error(err.status());
        }
    }

    out.close()
}
