use bytes::Bytes;
use http::{header, Method, Request, StatusCode, Uri};
use http_body_util::{BodyExt, Empty};
use hyper_util::rt::TokioIo;
use log::debug;
use tokio::net::TcpStream;

use crate::error::FetchError;

/// What came back from a request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

/// Sends one GET and waits for the whole response.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn get(&self, uri: &str) -> Result<Reply, FetchError>;
}

/// HTTP/1.1 client speaking hyper over a fresh tokio connection per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl HttpFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl Fetch for HttpFetcher {
    async fn get(&self, uri: &str) -> Result<Reply, FetchError> {
        // url escapes what http::Uri refuses, e.g. '"' in the query
        let normalized = url::Url::parse(uri)?;
        if normalized.scheme() != "http" {
            return Err(FetchError::UnsupportedScheme(normalized.scheme().to_string()));
        }
        let url: Uri = normalized.as_str().parse()?;

        let host = url.host().ok_or(FetchError::MissingHost)?;
        let port = url.port_u16().unwrap_or(80);
        let addr = format!("{}:{}", host, port);

        debug!("connecting to {addr} for {uri}");
        let stream = TcpStream::connect(addr).await?;

        let (mut sender, conn) =
            hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
        tokio::task::spawn(async move {
            if let Err(err) = conn.await {
                debug!("connection closed with error: {:?}", err);
            }
        });

        let host_header = match url.port_u16() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let target = url.path_and_query().map(|p| p.as_str()).unwrap_or("/");

        let req = Request::builder()
            .method(Method::GET)
            .uri(target)
            .header(header::HOST, host_header)
            .body(Empty::<Bytes>::new())?;

        let res = sender.send_request(req).await?;
        let status = res.status();

        let body = res.collect().await?.to_bytes();
        debug!("{uri} answered {status} with {} bytes", body.len());

        Ok(Reply {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Answers a single connection with `response` and hands back the request head.
    async fn serve_once(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn reads_status_and_body() {
        let (base, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot found",
        )
        .await;

        let reply = HttpFetcher::new()
            .get(&format!("{base}/users?id=-1"))
            .await
            .unwrap();

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body, "not found");

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /users?id=-1 HTTP/1.1\r\n"), "{head}");
        assert!(head.to_lowercase().contains(&format!(
            "host: {}",
            base.trim_start_matches("http://")
        )));
    }

    #[tokio::test]
    async fn root_path_is_requested_when_uri_has_none() {
        let (base, server) =
            serve_once("HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
                .await;

        let reply = HttpFetcher::new().get(&base).await.unwrap();

        assert!(reply.status.is_success());
        assert!(server.await.unwrap().starts_with("GET / HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpFetcher::new()
            .get(&format!("http://{addr}/"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Connect(_)), "{err:?}");
    }

    #[tokio::test]
    async fn rejects_what_it_cannot_send() {
        let fetcher = HttpFetcher::new();

        let err = fetcher.get("https://x.test/").await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(ref s) if s == "https"));

        let err = fetcher.get("http://[::1/").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)), "{err:?}");

        let err = fetcher.get("/relative/only").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)), "{err:?}");
    }

    #[tokio::test]
    async fn quotes_in_the_query_are_escaped_on_the_wire() {
        let cases = [
            ("\"fskjnjsdjlk\"", "%22fskjnjsdjlk%22"),
            ("\"\"", "%22%22"),
        ];
        for (value, escaped) in cases {
            let (base, server) =
                serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                    .await;

            let reply = HttpFetcher::new()
                .get(&format!("{base}/a?id={value}"))
                .await
                .unwrap();

            assert_eq!(reply.status, StatusCode::OK);
            let head = server.await.unwrap();
            assert!(
                head.starts_with(&format!("GET /a?id={escaped} HTTP/1.1\r\n")),
                "{head}"
            );
        }
    }

    #[tokio::test]
    async fn host_header_leaves_out_userinfo() {
        let (base, server) =
            serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await;
        let addr = base.trim_start_matches("http://").to_string();

        HttpFetcher::new()
            .get(&format!("http://user:secret@{addr}/"))
            .await
            .unwrap();

        let head = server.await.unwrap().to_lowercase();
        assert!(head.contains(&format!("host: {addr}\r\n")), "{head}");
        assert!(!head.contains("secret"), "{head}");
    }
}
