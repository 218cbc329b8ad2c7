use std::io;

use serde_json::{Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::dispatch::Args;
use crate::error::{Error, ErrorCode, Result};

pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest line either side reads, newline excluded.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

const WAITING: &str = "WAITING_FOR_REQUEST";

pub fn welcome_line() -> String {
    format!("{SERVER_NAME}/{SERVER_VERSION} {WAITING}")
}

/// Accept only a greeting from a server speaking this exact version.
pub fn check_welcome(line: &str) -> std::result::Result<(), String> {
    let line = line.trim_end();
    let (header, status) = line
        .split_once(' ')
        .ok_or_else(|| format!("no status in welcome {line:?}"))?;
    let (name, version) = header
        .split_once('/')
        .ok_or_else(|| format!("no version in welcome {line:?}"))?;
    if name != SERVER_NAME {
        return Err(format!("unexpected server {name:?}"));
    }
    if version != SERVER_VERSION {
        return Err(format!("incompatible server version {version}"));
    }
    if status != WAITING {
        return Err(format!("server is not waiting for a request: {status:?}"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub operation: String,
    pub args: Args,
}

pub fn parse_request(line: &str) -> Result<Request> {
    let line = line.trim();
    let (operation, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    if operation.is_empty() {
        return Err(Error::UnrecognizedOperation(String::new()));
    }

    let args = if rest.is_empty() {
        Map::new()
    } else {
        match serde_json::from_str::<Value>(rest) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(Error::InvalidArgumentValue {
                    name: "arguments",
                    reason: "expected a JSON object".to_string(),
                })
            }
            Err(e) => {
                return Err(Error::InvalidArgumentValue {
                    name: "arguments",
                    reason: e.to_string(),
                })
            }
        }
    };
    Ok(Request { operation: operation.to_string(), args })
}

pub fn render_request(operation: &str, args: &Args) -> String {
    format!("{operation} {}", Value::Object(args.clone()))
}

pub fn render_response(result: &Result<Value>) -> String {
    match result {
        Ok(payload) => format!("SUCCESS {payload}"),
        Err(e) => format!("ERROR {} {}", e.code(), e),
    }
}

/// A reply as the client sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success(Value),
    Error { code: ErrorCode, message: String },
}

pub fn parse_response(line: &str) -> std::result::Result<Response, String> {
    let line = line.trim_end();
    let (status, rest) = line.split_once(' ').unwrap_or((line, ""));
    match status {
        "SUCCESS" => serde_json::from_str(rest)
            .map(Response::Success)
            .map_err(|e| format!("bad payload: {e}")),
        "ERROR" => {
            let (code, message) = rest.split_once(' ').unwrap_or((rest, ""));
            Ok(Response::Error { code: code.parse()?, message: message.to_string() })
        }
        other => Err(format!("unknown reply status {other:?}")),
    }
}

#[derive(Debug, PartialEq)]
pub enum Line {
    Complete(String),
    /// The peer closed before sending anything.
    Closed,
    /// More than [`MAX_LINE_BYTES`] arrived without a newline.
    TooLong,
}

/// Read one newline-terminated line, never buffering more than
/// [`MAX_LINE_BYTES`] plus the newline.
pub async fn read_line<R>(reader: &mut R) -> io::Result<Line>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let limit = MAX_LINE_BYTES as u64 + 1;
    let n = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(Line::Closed);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    } else if buf.len() > MAX_LINE_BYTES {
        return Ok(Line::TooLong);
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    String::from_utf8(buf)
        .map(Line::Complete)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
