use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::protocol::{self, parse_request, render_response, welcome_line, Line, MAX_LINE_BYTES};

/// Why the accept loop stopped.
#[derive(Debug)]
pub enum Stopped {
    Shutdown,
    Fatal(Error),
}

/// Greet the client, answer a single request line, and close. The whole
/// exchange must finish within `timeout`. Returns the error if it was fatal.
pub async fn serve_connection<S>(
    stream: S,
    dispatcher: &Dispatcher,
    timeout: Duration,
) -> io::Result<Option<Error>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match tokio::time::timeout(timeout, exchange(stream, dispatcher)).await {
        Ok(result) => result,
        Err(_elapsed) => {
            debug!(timeout_ms = timeout.as_millis() as u64, "client too slow, closing connection");
            Ok(None)
        }
    }
}

async fn exchange<S>(stream: S, dispatcher: &Dispatcher) -> io::Result<Option<Error>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    writer.write_all(format!("{}\n", welcome_line()).as_bytes()).await?;
    writer.flush().await?;

    let result = match protocol::read_line(&mut BufReader::new(reader)).await? {
        Line::Closed => {
            debug!("client closed before sending a request");
            return Ok(None);
        }
        Line::TooLong => Err(Error::InvalidArgumentValue {
            name: "request",
            reason: format!("longer than {MAX_LINE_BYTES} bytes"),
        }),
        Line::Complete(line) => parse_request(&line)
            .and_then(|request| dispatcher.handle(&request.operation, &request.args)),
    };
    writer.write_all(format!("{}\n", render_response(&result)).as_bytes()).await?;
    writer.shutdown().await?;

    Ok(result.err().filter(Error::is_fatal))
}

/// Accept connections until `shutdown` resolves or a request hits a fatal
/// error.
pub async fn run(
    listener: TcpListener,
    dispatcher: Dispatcher,
    request_timeout: Duration,
    shutdown: impl Future<Output = ()>,
) -> io::Result<Stopped> {
    let (fatal_tx, mut fatal_rx) = mpsc::unbounded_channel::<Error>();
    tokio::pin!(shutdown);

    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {addr}");
    }

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down");
                return Ok(Stopped::Shutdown);
            }
            Some(e) = fatal_rx.recv() => {
                error!(error = %e, "fatal error, no longer accepting connections");
                return Ok(Stopped::Fatal(e));
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Failed to accept connection: {e}");
                        continue;
                    }
                };
                let dispatcher = dispatcher.clone();
                let fatal_tx = fatal_tx.clone();
                tokio::spawn(async move {
                    match serve_connection(stream, &dispatcher, request_timeout).await {
                        Ok(Some(fatal)) => {
                            let _ = fatal_tx.send(fatal);
                        }
                        Ok(None) => {}
                        Err(e) => debug!(%peer, "connection dropped: {e}"),
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::io::AsyncReadExt;
    use tokio::net::TcpStream;

    use super::*;
    use crate::registry::Registry;

    const PATIENCE: Duration = Duration::from_secs(5);

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(Registry::new()))
    }

    async fn exchange_text(dispatcher: &Dispatcher, request: &str) -> (String, Option<Error>) {
        let (client, server) = tokio::io::duplex(4096);
        let (mut client_read, mut client_write) = tokio::io::split(client);
        client_write.write_all(request.as_bytes()).await.unwrap();
        let fatal = serve_connection(server, dispatcher, PATIENCE).await.unwrap();
        let mut output = String::new();
        client_read.read_to_string(&mut output).await.unwrap();
        (output, fatal)
    }

    #[tokio::test]
    async fn greets_then_answers_once() {
        let d = dispatcher();
        let (output, fatal) = exchange_text(&d, "REGISTER {\"name\": \"Alice\"}\n").await;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], welcome_line());
        assert!(lines[1].starts_with("SUCCESS {\"playerID\":"), "{}", lines[1]);
        assert!(fatal.is_none());
        assert_eq!(d.registry().player_count(), 1);
    }

    #[tokio::test]
    async fn errors_are_rendered_with_their_code() {
        let d = dispatcher();
        let (output, _) = exchange_text(&d, "RESIGN {}\n").await;
        assert!(output.lines().nth(1).unwrap().starts_with("ERROR UNRECOGNIZED_OPERATION "));

        let (output, _) = exchange_text(&d, "REGISTER {\"name\":\n").await;
        assert!(output.lines().nth(1).unwrap().starts_with("ERROR INVALID_ARGUMENTS "));
    }

    #[tokio::test]
    async fn oversized_requests_are_cut_off() {
        let d = dispatcher();
        let (client, server) = tokio::io::duplex(MAX_LINE_BYTES * 2);
        let (mut client_read, mut client_write) = tokio::io::split(client);
        client_write.write_all(&vec![b'R'; MAX_LINE_BYTES + 100]).await.unwrap();

        serve_connection(server, &d, PATIENCE).await.unwrap();
        let mut output = String::new();
        client_read.read_to_string(&mut output).await.unwrap();
        let reply = output.lines().nth(1).unwrap();
        assert!(reply.starts_with("ERROR INVALID_ARGUMENTS "), "{reply}");
        assert!(reply.len() < 200);
    }

    #[tokio::test]
    async fn idle_clients_are_dropped() {
        let d = dispatcher();
        let (_client, server) = tokio::io::duplex(4096);
        let served = tokio::time::timeout(
            PATIENCE,
            serve_connection(server, &d, Duration::from_millis(50)),
        )
        .await;
        assert!(matches!(served, Ok(Ok(None))));
    }

    #[tokio::test]
    async fn serves_over_tcp_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(run(listener, dispatcher(), PATIENCE, async {
            let _ = stop_rx.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"REGISTER {\"name\": \"Bob\"}\n").await.unwrap();
        let mut output = String::new();
        stream.read_to_string(&mut output).await.unwrap();
        assert!(output.lines().nth(1).unwrap().starts_with("SUCCESS "));

        stop_tx.send(()).unwrap();
        assert!(matches!(server.await.unwrap().unwrap(), Stopped::Shutdown));
    }
}
