//! Helpers shared by the unit test modules.
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::error::{AppError, AppResult};

pub(crate) const TEST_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_HEADER_BYTES: usize = 16 * 1024;

pub(crate) fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

pub(crate) fn run_multi_thread_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

/// One request seen by [`TestHttpServer`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub request_line: String,
    pub headers: String,
    pub body: String,
}

/// Minimal HTTP/1.1 server answering every request with a fixed status.
pub(crate) struct TestHttpServer {
    pub addr: SocketAddr,
    pub requests: mpsc::UnboundedReceiver<RecordedRequest>,
    task: JoinHandle<()>,
}

impl TestHttpServer {
    pub(crate) async fn start(status: u16, body: &'static str) -> AppResult<Self> {
        Self::start_with_delay(status, body, Duration::ZERO).await
    }

    pub(crate) async fn start_with_delay(
        status: u16,
        body: &'static str,
        delay: Duration,
    ) -> AppResult<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|err| AppError::validation(format!("Failed to bind server: {}", err)))?;
        let addr = listener
            .local_addr()
            .map_err(|err| AppError::validation(format!("Failed to read addr: {}", err)))?;
        let (requests_tx, requests) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let requests_tx = requests_tx.clone();
                tokio::spawn(async move {
                    drop(serve_connection(stream, status, body, delay, &requests_tx).await);
                });
            }
        });

        Ok(Self {
            addr,
            requests,
            task,
        })
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub(crate) async fn next_request(&mut self) -> AppResult<RecordedRequest> {
        timeout(TEST_TIMEOUT, self.requests.recv())
            .await
            .map_err(|_err| AppError::validation("Timed out waiting for request"))?
            .ok_or_else(|| AppError::validation("Server stopped before a request arrived"))
    }
}

impl Drop for TestHttpServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    status: u16,
    body: &'static str,
    delay: Duration,
    requests_tx: &mpsc::UnboundedSender<RecordedRequest>,
) -> std::io::Result<()> {
    loop {
        let Some(request) = read_request(&mut stream).await? else {
            return Ok(());
        };
        drop(requests_tx.send(request));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let response = if status == 204 {
            format!("HTTP/1.1 {} No Content\r\n\r\n", status)
        } else {
            format!(
                "HTTP/1.1 {} Test\r\ncontent-type: text/plain\r\ncontent-length: {}\r\n\r\n{}",
                status,
                body.len(),
                body
            )
        };
        stream.write_all(response.as_bytes()).await?;
    }
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<RecordedRequest>> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    let header_end = loop {
        if let Some(position) = find_header_end(&buffer) {
            break position;
        }
        if buffer.len() > MAX_HEADER_BYTES {
            return Ok(None);
        }
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Ok(None);
        }
        buffer.extend_from_slice(chunk.get(..read).unwrap_or_default());
    };

    let head = String::from_utf8_lossy(buffer.get(..header_end).unwrap_or_default()).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_owned();
    let headers: Vec<&str> = lines.collect();
    let content_length = headers
        .iter()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end.saturating_add(4);
    let mut body = buffer.get(body_start..).unwrap_or_default().to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(chunk.get(..read).unwrap_or_default());
    }

    Ok(Some(RecordedRequest {
        request_line,
        headers: headers.join("\n").to_ascii_lowercase(),
        body: String::from_utf8_lossy(&body).into_owned(),
    }))
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

/// An address nothing listens on: bind, read the port, release it.
pub(crate) async fn unused_local_addr() -> AppResult<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| AppError::validation(format!("Failed to bind: {}", err)))?;
    listener
        .local_addr()
        .map_err(|err| AppError::validation(format!("Failed to read addr: {}", err)))
}
