use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use tracing::{info, warn};

use crate::config::PlannerConfig;

pub mod api;
pub mod routes;

/// Largest request body accepted, in bytes.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// How long a client may stall between bytes before its request is abandoned.
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Serve the JSON API, one connection at a time, until the listener fails.
pub fn run_server(bind_addr: &str, config: &PlannerConfig) -> io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    info!("rinkplan server listening on http://{bind_addr}");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, config, READ_TIMEOUT) {
                    warn!(error = %err, "request error");
                }
            }
            Err(err) => warn!(error = %err, "connection failed"),
        }
    }

    Ok(())
}

/// Request line and body. `body` is `None` when the declared length is over [MAX_BODY_BYTES].
struct RawRequest {
    method: String,
    path: String,
    body: Option<String>,
}

fn handle_connection(
    stream: &mut TcpStream,
    config: &PlannerConfig,
    read_timeout: Duration,
) -> io::Result<()> {
    stream.set_read_timeout(Some(read_timeout))?;
    let mut reader = BufReader::new(stream.try_clone()?);

    let response = match read_request(&mut reader) {
        Ok(None) => return Ok(()),
        Ok(Some(request)) => {
            let response = match &request.body {
                Some(body) => routes::route_request(&request.method, &request.path, body, config),
                None => routes::error_response(
                    413,
                    "Payload Too Large",
                    "error",
                    "Request body too large",
                ),
            };
            info!(
                method = %request.method,
                path = %request.path,
                status = response.status_code,
                "request handled"
            );
            response
        }
        Err(err) if is_incomplete(&err) => {
            warn!(error = %err, "incomplete request");
            routes::error_response(400, "Bad Request", "error", "Incomplete request")
        }
        Err(err) => return Err(err),
    };

    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}

/// Short reads and stalled clients end the request instead of the connection loop.
fn is_incomplete(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::UnexpectedEof | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

fn read_request<R: BufRead>(reader: &mut R) -> io::Result<Option<RawRequest>> {
    let mut request_line = String::new();
    if reader.read_line(&mut request_line)? == 0 {
        return Ok(None);
    }
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET").to_string();
    let path = request_parts.next().unwrap_or("/").to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    if content_length > MAX_BODY_BYTES {
        return Ok(Some(RawRequest {
            method,
            path,
            body: None,
        }));
    }
    let mut body = vec![0_u8; content_length];
    reader.read_exact(&mut body)?;
    Ok(Some(RawRequest {
        method,
        path,
        body: Some(String::from_utf8_lossy(&body).into_owned()),
    }))
}
