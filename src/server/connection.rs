//! # Conexiones
//! src/server/connection.rs
//!
//! Los handlers reciben la conexión cruda como `&mut dyn Connection`, así el
//! mismo código corre sobre un `TcpStream` real o sobre una conexión en
//! memoria en los tests.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

/// Canal bidireccional que se cierra después de una única respuesta
pub trait Connection: Read + Write + Send {
    /// Vacía lo pendiente y cierra ambos sentidos
    fn close(&mut self) -> io::Result<()>;

    /// Dirección del peer para los logs
    fn peer(&self) -> String {
        "unknown".to_string()
    }
}

impl Connection for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.flush()?;
        match self.shutdown(Shutdown::Both) {
            // El peer ya cerró
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }

    fn peer(&self) -> String {
        self.peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}
