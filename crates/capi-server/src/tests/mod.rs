mod routes;

use crate::{AppState, build_router};

use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use capi_config::ServerConfig;
use capi_core::{LogBridge, OutputSink};

/// Output sink that keeps every line.
#[derive(Default)]
pub(crate) struct RecordingSink(Mutex<Vec<String>>);

impl RecordingSink {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl OutputSink for RecordingSink {
    fn append_line(&self, line: &str) {
        self.0.lock().unwrap().push(line.to_owned());
    }
}

pub(crate) fn recording_bridge() -> (LogBridge, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    (LogBridge::new(sink.clone()), sink)
}

/// Create a TestServer for `config`, returning the sink its bridge writes to.
pub(crate) fn create_test_server(config: ServerConfig) -> (TestServer, Arc<RecordingSink>) {
    let (bridge, sink) = recording_bridge();
    let app = build_router(AppState::new(config, bridge));
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    (server, sink)
}

pub(crate) fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
