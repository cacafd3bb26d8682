//! TCP transport for the dashboard port
//!
//! Owns the one socket a session is allowed and frames replies on the
//! terminator the firmware appends. Partial reads are buffered internally,
//! so a reply split across TCP segments survives multiple read calls.

use crate::{DashboardError, Result};
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;

/// Dashboard replies are terminated with a semicolon.
const REPLY_TERMINATOR: u8 = b';';

/// Blocking transport over the robot's dashboard TCP port.
pub struct Transport {
    socket: Option<TcpStream>,
    buffer: Vec<u8>,
}

impl Transport {
    /// Open a blocking connection to the robot.
    ///
    /// The timeout bounds both the connect itself and every subsequent
    /// reply read. No retry happens here; retry policy belongs to the
    /// caller.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let addr = resolve(host, port)?;
        let socket = TcpStream::connect_timeout(&addr, timeout)
            .map_err(|e| DashboardError::Connection(format!("{host}:{port}: {e}")))?;
        socket
            .set_read_timeout(Some(timeout))
            .map_err(|e| DashboardError::Connection(format!("failed to set read timeout: {e}")))?;

        debug!("Connected to dashboard at {}:{}", host, port);
        Ok(Self {
            socket: Some(socket),
            buffer: Vec::new(),
        })
    }

    /// Send one encoded command.
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let socket = self.socket.as_mut().ok_or(DashboardError::NotConnected)?;
        socket.write_all(bytes)?;
        Ok(())
    }

    /// Read one reply, blocking until the terminator arrives or the read
    /// timeout elapses.
    ///
    /// Returns the reply text without the terminator, trimmed of
    /// surrounding whitespace. Bytes received past the terminator stay
    /// buffered for the next call.
    pub fn read_reply(&mut self) -> Result<String> {
        let socket = self.socket.as_mut().ok_or(DashboardError::NotConnected)?;

        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == REPLY_TERMINATOR) {
                let reply: Vec<u8> = self.buffer.drain(..=pos).collect();
                let text = String::from_utf8_lossy(&reply[..pos]).trim().to_string();
                return Ok(text);
            }

            let mut chunk = [0u8; 1024];
            match socket.read(&mut chunk) {
                Ok(0) => return Err(DashboardError::ConnectionClosed),
                Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                    return Err(DashboardError::Timeout);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Close the connection. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(socket) = self.socket.take() {
            let _ = socket.shutdown(Shutdown::Both);
            debug!("Dashboard connection closed");
        }
        self.buffer.clear();
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.close();
    }
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| DashboardError::Connection(format!("{host}:{port}: {e}")))?
        .next()
        .ok_or_else(|| DashboardError::Connection(format!("{host}:{port}: no address resolved")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::net::TcpListener;
    use std::thread;

    fn local_server<F>(serve: F) -> SocketAddr
    where
        F: FnOnce(TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            serve(stream);
        });
        addr
    }

    #[test]
    fn splits_replies_on_terminator() {
        let addr = local_server(|mut stream| {
            stream.write_all(b"0,{},PowerOn();0,{},EnableRobot();").unwrap();
            // Keep the connection open until the client is done reading.
            thread::sleep(Duration::from_millis(200));
        });

        let mut transport =
            Transport::connect(&addr.ip().to_string(), addr.port(), Duration::from_secs(1))
                .unwrap();
        assert_eq!(transport.read_reply().unwrap(), "0,{},PowerOn()");
        assert_eq!(transport.read_reply().unwrap(), "0,{},EnableRobot()");
    }

    #[test]
    fn buffers_partial_reads_across_segments() {
        let addr = local_server(|mut stream| {
            stream.write_all(b"0,12.5,-3.2").unwrap();
            stream.flush().unwrap();
            thread::sleep(Duration::from_millis(50));
            stream.write_all(b",100.0;").unwrap();
            thread::sleep(Duration::from_millis(200));
        });

        let mut transport =
            Transport::connect(&addr.ip().to_string(), addr.port(), Duration::from_secs(1))
                .unwrap();
        assert_eq!(transport.read_reply().unwrap(), "0,12.5,-3.2,100.0");
    }

    #[test]
    fn read_times_out_when_robot_is_silent() {
        let addr = local_server(|_stream| {
            thread::sleep(Duration::from_millis(500));
        });

        let mut transport =
            Transport::connect(&addr.ip().to_string(), addr.port(), Duration::from_millis(100))
                .unwrap();
        assert!(matches!(
            transport.read_reply(),
            Err(DashboardError::Timeout)
        ));
    }

    #[test]
    fn reports_closed_connection() {
        let addr = local_server(|stream| {
            drop(stream);
        });

        let mut transport =
            Transport::connect(&addr.ip().to_string(), addr.port(), Duration::from_secs(1))
                .unwrap();
        // Give the server thread time to drop its end.
        thread::sleep(Duration::from_millis(50));
        assert!(matches!(
            transport.read_reply(),
            Err(DashboardError::ConnectionClosed)
        ));
    }

    #[test]
    fn close_is_idempotent() {
        let addr = local_server(|_stream| {
            thread::sleep(Duration::from_millis(100));
        });

        let mut transport =
            Transport::connect(&addr.ip().to_string(), addr.port(), Duration::from_secs(1))
                .unwrap();
        assert!(transport.is_connected());
        transport.close();
        transport.close();
        assert!(!transport.is_connected());
        assert!(matches!(
            transport.send(b"GetPose()"),
            Err(DashboardError::NotConnected)
        ));
    }
}
