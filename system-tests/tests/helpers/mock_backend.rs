// system-tests/tests/helpers/mock_backend.rs
// ============================================================================
// Module: Mock Backend
// Description: Multi-threaded tiny_http server standing in for a backend.
// Purpose: Give end-to-end suites a deterministic HTTP peer.
// Dependencies: tiny_http
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;

use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// Running mock backend; stops when dropped.
pub struct MockBackend {
    base_url: String,
    server: Arc<Server>,
    served: Arc<AtomicUsize>,
    workers: Vec<JoinHandle<()>>,
}

impl MockBackend {
    /// Starts `workers` threads answering request `n` (0-based, in arrival
    /// order) with the status `status_for(n)` and an empty JSON object.
    pub fn start<F>(workers: usize, status_for: F) -> Self
    where
        F: Fn(usize) -> u16 + Send + Sync + 'static,
    {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("http server"));
        let base_url = format!("http://{}", server.server_addr());
        let served = Arc::new(AtomicUsize::new(0));
        let status_for = Arc::new(status_for);
        let workers = (0..workers)
            .map(|_| {
                let server = Arc::clone(&server);
                let served = Arc::clone(&served);
                let status_for = Arc::clone(&status_for);
                thread::spawn(move || {
                    for request in server.incoming_requests() {
                        let n = served.fetch_add(1, Ordering::SeqCst);
                        let response = Response::from_string("{}")
                            .with_status_code(status_for(n))
                            .with_header(
                                Header::from_bytes("Content-Type", "application/json")
                                    .expect("header"),
                            );
                        let _ = request.respond(response);
                    }
                })
            })
            .collect();
        Self {
            base_url,
            server,
            served,
            workers,
        }
    }

    /// Returns the base URL to point a client at.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the number of requests answered so far.
    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        for _ in 0..self.workers.len() {
            self.server.unblock();
        }
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
