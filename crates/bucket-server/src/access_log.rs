use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Outermost layer: one log line per request with method, target, remote
/// address, status and latency, whatever the outcome.
pub async fn log_request(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let target = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.as_str().to_string());
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "-".to_string(), |ConnectInfo(addr)| addr.to_string());

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        target = %target,
        remote = %remote,
        status = response.status().as_u16(),
        elapsed = ?start.elapsed(),
        "request completed"
    );
    response
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{header, Method, StatusCode};
    use bucket_gate::{AccessGate, Credential};
    use bucket_store::BlobStore;
    use tower::util::ServiceExt;

    use super::*;
    use crate::{build_router, AppState};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn request_lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .filter(|line| line.contains("request completed"))
                .map(str::to_string)
                .collect()
        }
    }

    fn request(method: Method, uri: &str, auth: Option<&str>, peer: Option<SocketAddr>) -> Request {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        if let Some(peer) = peer {
            request.extensions_mut().insert(ConnectInfo(peer));
        }
        request
    }

    #[tokio::test]
    async fn one_line_per_request_including_rejections() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(
            BlobStore::open(dir.path()).unwrap(),
            AccessGate::new(Credential::new("token")),
            1024,
        );
        let router = build_router(state);
        let peer: SocketAddr = "10.1.2.3:4567".parse().unwrap();

        let admitted = router
            .clone()
            .oneshot(request(
                Method::GET,
                "/fetch?hash=deadbeef.png",
                Some("Bearer token"),
                Some(peer),
            ))
            .await
            .unwrap();
        assert_eq!(admitted.status(), StatusCode::NOT_FOUND);

        let rejected = router
            .clone()
            .oneshot(request(Method::POST, "/upload", Some("Bearer wrong"), Some(peer)))
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

        let anonymous = router
            .oneshot(request(Method::GET, "/health", None, None))
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::OK);

        let lines = captured.request_lines();
        assert_eq!(lines.len(), 3, "{lines:#?}");

        for field in [
            "method=GET",
            "target=/fetch?hash=deadbeef.png",
            "remote=10.1.2.3:4567",
            "status=404",
            "elapsed=",
        ] {
            assert!(lines[0].contains(field), "{field} missing from {}", lines[0]);
        }
        for field in ["method=POST", "target=/upload", "remote=10.1.2.3:4567", "status=401"] {
            assert!(lines[1].contains(field), "{field} missing from {}", lines[1]);
        }
        for field in ["target=/health", "remote=-", "status=200"] {
            assert!(lines[2].contains(field), "{field} missing from {}", lines[2]);
        }
    }
}
