use std::io;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

use crate::dispatch::Args;
use crate::error::ErrorCode;
use crate::players::{SeatError, Transport};
use crate::protocol::{self, check_welcome, parse_response, render_request, Line, Response};

/// How long a single request may take, connect to reply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connection failed: {0}")]
    Io(#[from] io::Error),

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    #[error("bad welcome: {0}")]
    Welcome(String),

    #[error("bad reply: {0}")]
    Reply(String),

    #[error("{code} {message}")]
    Refused { code: ErrorCode, message: String },
}

/// Talks to a server over TCP, one connection per request.
#[derive(Debug, Clone)]
pub struct Client {
    addr: String,
    timeout: Duration,
}

impl Client {
    pub fn new(addr: impl Into<String>) -> Self {
        Client { addr: addr.into(), timeout: DEFAULT_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub async fn call(&self, operation: &str, args: &Args) -> Result<Value, ClientError> {
        let exchange = self.exchange(operation, args);
        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ClientError::Timeout(self.timeout)),
        }
    }

    async fn exchange(&self, operation: &str, args: &Args) -> Result<Value, ClientError> {
        let stream = TcpStream::connect(&self.addr).await?;
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        let welcome = complete(protocol::read_line(&mut reader).await?, "welcome")?;
        check_welcome(&welcome).map_err(ClientError::Welcome)?;

        let request = render_request(operation, args);
        debug!(addr = %self.addr, %request, "sending");
        writer.write_all(format!("{request}\n").as_bytes()).await?;
        writer.flush().await?;

        let reply = complete(protocol::read_line(&mut reader).await?, "reply")?;
        match parse_response(&reply).map_err(ClientError::Reply)? {
            Response::Success(payload) => Ok(payload),
            Response::Error { code, message } => Err(ClientError::Refused { code, message }),
        }
    }
}

fn complete(line: Line, what: &str) -> Result<String, ClientError> {
    match line {
        Line::Complete(text) => Ok(text),
        Line::Closed => Err(ClientError::Reply(format!("server closed before the {what}"))),
        Line::TooLong => Err(ClientError::Reply(format!("{what} too long"))),
    }
}

impl Transport for Client {
    async fn request(&self, operation: &str, args: Args) -> Result<Value, SeatError> {
        Ok(self.call(operation, &args).await?)
    }
}
