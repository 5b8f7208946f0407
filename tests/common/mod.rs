//! Shared test fixtures: scripted completion client and catalogue builders

use async_trait::async_trait;
use finperf_gateway::catalog::CatalogStore;
use finperf_gateway::completion::CompletionClient;
use finperf_gateway::error::{GatewayError, Result};
use finperf_gateway::invoker::EndpointInvoker;
use finperf_gateway::orchestrator::OrchestrationEngine;
use std::collections::VecDeque;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Completion client that replays scripted responses in order and counts calls
pub struct ScriptedCompletion {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedCompletion {
    pub fn new<I, S>(responses: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(Vec::<String>::new())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GatewayError::completion("no scripted response left"))
    }
}

/// Write a catalogue file and load a store from it. The tempfile is returned
/// so it outlives the store.
pub fn catalog_store(content: &str) -> (Arc<CatalogStore>, tempfile::NamedTempFile) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    let store = Arc::new(CatalogStore::load(file.path()).unwrap());
    (store, file)
}

/// Catalogue with the sharpe_ratio endpoint and reference names used across
/// the engine tests
pub const SHARPE_CATALOG: &str = r#"{
    "apis": [
        {
            "name": "sharpe_ratio",
            "route": "/analytics/sharpe",
            "method": "POST",
            "description": "Risk-adjusted return of a portfolio",
            "parameters": [
                {"name": "portfolio_name", "type": "string", "required": true},
                {"name": "period", "type": "string", "required": true}
            ],
            "keywords": ["sharpe", "risk-adjusted"]
        },
        {
            "name": "returns_window",
            "route": "/analytics/returns",
            "method": "GET",
            "parameters": [
                {"name": "start_date", "type": "date", "required": true},
                {"name": "end_date", "type": "date", "required": true}
            ],
            "validation_rules": {
                "start_date": "must be an ISO 8601 date",
                "end_date": "must be an ISO 8601 date"
            },
            "keywords": ["returns", "performance window"]
        }
    ],
    "portfolio_names": ["Growth Fund", "Income Fund"],
    "benchmark_names": ["S&P 500"]
}"#;

/// Build an engine over a catalogue, a scripted client, and a base URL for
/// the downstream invoker
pub fn engine(
    catalog: Arc<CatalogStore>,
    completion: Arc<ScriptedCompletion>,
    base_url: &str,
) -> OrchestrationEngine {
    let invoker = EndpointInvoker::new(base_url.to_string(), 5).unwrap();
    OrchestrationEngine::new(catalog, completion, invoker)
}
