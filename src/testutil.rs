//! Scripted mock robot for wire-level tests
//!
//! Listens on a loopback port, answers each received command with the next
//! scripted reply, and records the commands as they arrive. Commands are
//! framed on the closing parenthesis, replies carry their own `;`
//! terminator in the script.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;

pub(crate) struct MockRobot {
    pub addr: SocketAddr,
    pub received: mpsc::Receiver<String>,
    handle: thread::JoinHandle<()>,
}

impl MockRobot {
    /// Spawn a mock that answers immediately.
    pub fn spawn(replies: Vec<&str>) -> Self {
        let (robot, _gate) = Self::start(replies, false);
        robot
    }

    /// Spawn a mock that waits for a `()` on the returned channel before
    /// sending each reply, so tests can observe the in-flight window.
    pub fn spawn_gated(replies: Vec<&str>) -> (Self, mpsc::Sender<()>) {
        Self::start(replies, true)
    }

    fn start(replies: Vec<&str>, gated: bool) -> (Self, mpsc::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (command_tx, command_rx) = mpsc::channel();
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let replies: Vec<String> = replies.into_iter().map(String::from).collect();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            for reply in replies {
                let command = read_command(&mut stream);
                if command.is_empty() {
                    return;
                }
                command_tx.send(command).ok();
                if gated && gate_rx.recv().is_err() {
                    return;
                }
                stream.write_all(reply.as_bytes()).unwrap();
            }
            // Record anything sent after the script ran out, so tests can
            // assert that no further command reached the wire.
            loop {
                let tail = read_command(&mut stream);
                if tail.is_empty() {
                    return;
                }
                command_tx.send(tail).ok();
            }
        });

        (
            Self {
                addr,
                received: command_rx,
                handle,
            },
            gate_tx,
        )
    }

    /// Wait for the mock to finish and return every command it saw, in
    /// order. The peer connection must be closed first.
    pub fn commands(self) -> Vec<String> {
        let _ = self.handle.join();
        self.received.try_iter().collect()
    }
}

/// Read one command, framed on the closing parenthesis. Returns an empty
/// string when the peer closes the connection.
fn read_command(stream: &mut TcpStream) -> String {
    let mut collected = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match stream.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                collected.push(byte[0]);
                if byte[0] == b')' {
                    break;
                }
            }
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&collected).to_string()
}
