//! Shared fixtures: a scripted, counting transport and config helpers.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use braintree_gateway::{
    Braintree, GatewayConfig, GatewayError, Result,
    transport::{Transport, TransportRequest, TransportResponse},
};

/// What the mock answers to the next request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Status plus body.
    Respond(u16, String),
    /// Never completes.
    Hang,
    /// Fails at the transport level.
    Fail(String),
}

impl Reply {
    pub fn ok(status: u16, body: &str) -> Self {
        Self::Respond(status, body.to_owned())
    }
}

/// Replays scripted replies in order and records every request.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<TransportRequest>>,
    calls: AtomicUsize,
}

impl MockTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self { script: Mutex::new(replies.into_iter().collect()), ..Self::default() }
    }

    /// Number of `send` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_body(&self) -> String {
        let requests = self.requests.lock().unwrap();
        let body = requests.last().and_then(|r| r.body.clone()).unwrap_or_default();
        String::from_utf8(body).unwrap()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        let reply = self.script.lock().unwrap().pop_front();

        match reply {
            Some(Reply::Respond(status, body)) => Ok(TransportResponse {
                status,
                body: body.into_bytes(),
                headers: vec![("Content-Type".to_owned(), "application/xml".to_owned())],
            }),
            Some(Reply::Hang) => std::future::pending().await,
            Some(Reply::Fail(message)) => Err(GatewayError::TransportError(message)),
            None => Err(GatewayError::TransportError("no scripted reply left".to_owned())),
        }
    }

    fn protocol_name(&self) -> &'static str {
        "mock"
    }
}

pub fn config(environment: &str) -> GatewayConfig {
    GatewayConfig::from_toml(&format!(
        r#"
        environment = "{environment}"
        merchant_id = "merchant_1"

        [auth]
        type = "api_keys"
        public_key = "pub"
        private_key = "priv"
        "#
    ))
    .expect("test config should parse")
}

pub fn client(
    environment: &str,
    replies: impl IntoIterator<Item = Reply>,
) -> Braintree<MockTransport> {
    Braintree::with_transport(&config(environment), MockTransport::new(replies))
        .expect("client should build")
}

pub fn transport(braintree: &Braintree<MockTransport>) -> &MockTransport {
    braintree.executor().transport()
}
