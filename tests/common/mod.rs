//! Shared helpers for session integration tests.

#![allow(dead_code)]

use cdtp::{LineTransport, Session, SessionOptions};
use serde_json::Value;
use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf,
};
use tracing_subscriber::EnvFilter;

/// Installs a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Scripted remote end on the far side of an in-memory pipe.
pub struct Remote {
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    writer: WriteHalf<DuplexStream>,
}

impl Remote {
    /// Reads the next command frame sent by the session.
    pub async fn recv(&mut self) -> Value {
        let line = self
            .lines
            .next_line()
            .await
            .expect("read")
            .expect("session closed the pipe");
        serde_json::from_str(&line).expect("json")
    }

    /// Returns `None` once the session has closed its write half.
    pub async fn recv_eof(&mut self) -> Option<String> {
        self.lines.next_line().await.expect("read")
    }

    /// Writes one JSON frame.
    pub async fn send(&mut self, value: Value) {
        self.send_raw(&value.to_string()).await;
    }

    /// Writes one raw line.
    pub async fn send_raw(&mut self, text: &str) {
        self.send_bytes(text.as_bytes()).await;
    }

    /// Writes one line of arbitrary bytes, which need not be UTF-8.
    pub async fn send_bytes(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.expect("write");
        self.writer.write_all(b"\n").await.expect("write");
        self.writer.flush().await.expect("flush");
    }

    /// Answers `command` with `result`.
    pub async fn reply(&mut self, command: &Value, result: Value) {
        self.send(serde_json::json!({"id": command["id"], "result": result}))
            .await;
    }

    /// Closes the remote end.
    pub async fn hang_up(mut self) {
        let _ = self.writer.shutdown().await;
    }
}

/// Opens a session over a duplex pipe and returns its scripted peer.
pub fn pair(options: SessionOptions) -> (Session, Remote) {
    init_tracing();

    let (local, remote) = tokio::io::duplex(64 * 1024);
    let session = Session::open(LineTransport::from_stream(local), options).expect("open");
    let (read, writer) = tokio::io::split(remote);

    (
        session,
        Remote {
            lines: BufReader::new(read).lines(),
            writer,
        },
    )
}
