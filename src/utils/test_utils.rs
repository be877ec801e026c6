//! Minimal HTTP/1.1 server for exercising the reqwest-backed clients.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

pub struct CannedResponse {
    pub status_line: &'static str,
    pub content_type: &'static str,
    /// Written one after another with a short pause so the client sees
    /// separate chunks.
    pub body_parts: Vec<String>,
    /// Hold the connection open this long after the last part, with the
    /// advertised length one byte short of what was sent.
    pub stall: Option<Duration>,
}

impl CannedResponse {
    pub fn new(status_line: &'static str, content_type: &'static str, parts: &[&str]) -> Self {
        Self {
            status_line,
            content_type,
            body_parts: parts.iter().map(|part| part.to_string()).collect(),
            stall: None,
        }
    }

    pub fn stalling(mut self, stall: Duration) -> Self {
        self.stall = Some(stall);
        self
    }
}

pub type CapturedRequests = Arc<Mutex<Vec<CapturedRequest>>>;

/// Serve each canned response to one connection, in order. Returns the base
/// URL and the requests seen so far.
pub async fn spawn_http_server(responses: Vec<CannedResponse>) -> (String, CapturedRequests) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let captured: CapturedRequests = Arc::new(Mutex::new(Vec::new()));
    let captured_for_server = Arc::clone(&captured);

    tokio::spawn(async move {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(request) = read_http_request(&mut stream).await else {
                return;
            };
            captured_for_server
                .lock()
                .expect("capture lock poisoned")
                .push(request);
            if write_response(&mut stream, &response).await.is_err() {
                return;
            }
        }
    });

    (format!("http://{addr}"), captured)
}

async fn write_response(stream: &mut TcpStream, response: &CannedResponse) -> std::io::Result<()> {
    let sent: usize = response.body_parts.iter().map(String::len).sum();
    let content_length = sent + usize::from(response.stall.is_some());
    let head = format!(
        "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        response.status_line, response.content_type, content_length
    );
    stream.write_all(head.as_bytes()).await?;
    stream.flush().await?;

    for part in &response.body_parts {
        stream.write_all(part.as_bytes()).await?;
        stream.flush().await?;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    if let Some(stall) = response.stall {
        tokio::time::sleep(stall).await;
    }

    stream.shutdown().await
}

async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end + 4..].to_vec();
    while body.len() < content_length {
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}
