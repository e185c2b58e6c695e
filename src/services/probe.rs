use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::models::ProbeResult;
use crate::services::integrations::{AnyConfig, ProviderConfig, ProviderId};

/// Ticker substituted into `{ticker}` placeholders and appended to quote paths.
pub const PROBE_TICKER: &str = "ITUB4";
pub const JSON_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const BULK_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// How a provider expects its API key. Each provider uses exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    None,
    Bearer(String),
    Header { name: &'static str, value: String },
    Query { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutClass {
    Json,
    Bulk,
}

/// Minimal structural check applied to a 2xx body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    JsonField(&'static str),
    JsonPayload,
    MinTextLength(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub url: String,
    pub credential: Credential,
    pub query: Vec<(&'static str, String)>,
    pub timeout: TimeoutClass,
    pub expectation: Expectation,
    pub distinct_auth_failures: bool,
    pub success_message: String,
}

impl ProbeRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credential: Credential::None,
            query: Vec::new(),
            timeout: TimeoutClass::Json,
            expectation: Expectation::JsonPayload,
            distinct_auth_failures: false,
            success_message: "Conexão OK".to_string(),
        }
    }

    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = credential;
        self
    }

    pub fn query_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }

    pub fn timeout(mut self, timeout: TimeoutClass) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn expecting(mut self, expectation: Expectation) -> Self {
        self.expectation = expectation;
        self
    }

    /// Reports 401/403 as an authentication failure instead of a bare status.
    pub fn distinct_auth_failures(mut self) -> Self {
        self.distinct_auth_failures = true;
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbePlan {
    /// Decided without touching the network.
    Verdict(ProbeResult),
    Request(ProbeRequest),
}

impl ProbePlan {
    pub fn disabled(provider: ProviderId) -> Self {
        ProbePlan::Verdict(ProbeResult::failed(format!(
            "Integração {} está desabilitada.",
            provider.label()
        )))
    }

    pub fn requires_network(&self) -> bool {
        matches!(self, ProbePlan::Request(_))
    }
}

pub fn substitute_ticker(template: &str) -> String {
    template.replace("{ticker}", PROBE_TICKER)
}

pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Runs one-shot connection tests. No retry, no caching.
#[derive(Clone)]
pub struct ConnectionProber {
    client: Client,
    json_timeout: Duration,
    bulk_timeout: Duration,
}

impl ConnectionProber {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            json_timeout: JSON_PROBE_TIMEOUT,
            bulk_timeout: BULK_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, json: Duration, bulk: Duration) -> Self {
        self.json_timeout = json;
        self.bulk_timeout = bulk;
        self
    }

    pub fn timeout_for(&self, class: TimeoutClass) -> Duration {
        match class {
            TimeoutClass::Json => self.json_timeout,
            TimeoutClass::Bulk => self.bulk_timeout,
        }
    }

    pub async fn test<C: ProviderConfig>(&self, config: &C) -> ProbeResult {
        let result = self.run(config.probe_plan()).await;
        log_verdict(C::PROVIDER, &result);
        result
    }

    pub async fn test_any(&self, config: &AnyConfig) -> ProbeResult {
        let result = self.run(config.probe_plan()).await;
        log_verdict(config.provider(), &result);
        result
    }

    pub async fn run(&self, plan: ProbePlan) -> ProbeResult {
        match plan {
            ProbePlan::Verdict(result) => result,
            ProbePlan::Request(request) => self.execute(request).await,
        }
    }

    async fn execute(&self, request: ProbeRequest) -> ProbeResult {
        let timeout = self.timeout_for(request.timeout);
        debug!(url = %request.url, ?timeout, "probing integration endpoint");
        match self.send(&request, timeout).await {
            Ok(result) => result,
            Err(error) => transport_failure(&error, timeout),
        }
    }

    async fn send(
        &self,
        request: &ProbeRequest,
        timeout: Duration,
    ) -> Result<ProbeResult, reqwest::Error> {
        let mut builder = self.client.get(&request.url).timeout(timeout);
        let mut query: Vec<(&'static str, String)> = Vec::new();
        match &request.credential {
            Credential::None => {}
            Credential::Bearer(token) => builder = builder.bearer_auth(token),
            Credential::Header { name, value } => builder = builder.header(*name, value),
            Credential::Query { name, value } => query.push((*name, value.clone())),
        }
        query.extend(request.query.iter().cloned());
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(status_failure(status, request.distinct_auth_failures));
        }
        let body = response.text().await?;
        Ok(classify_body(&body, &request.expectation, &request.success_message))
    }
}

fn log_verdict(provider: ProviderId, result: &ProbeResult) {
    if result.success {
        info!(provider = %provider, message = %result.message, "connection test passed");
    } else {
        warn!(provider = %provider, message = %result.message, "connection test failed");
    }
}

fn status_failure(status: StatusCode, distinct_auth_failures: bool) -> ProbeResult {
    if distinct_auth_failures
        && (status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN)
    {
        return ProbeResult::failed(format!(
            "Falha de autenticação (HTTP {}): verifique a API key.",
            status.as_u16()
        ));
    }
    ProbeResult::failed(format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    ))
}

fn classify_body(body: &str, expect: &Expectation, success_message: &str) -> ProbeResult {
    match expect {
        Expectation::MinTextLength(min) => {
            if body.chars().count() < *min {
                return ProbeResult::failed("Resposta inválida (CSV vazio ou incompleto)");
            }
        }
        Expectation::JsonPayload | Expectation::JsonField(_) => {
            let payload: Value = match serde_json::from_str(body) {
                Ok(payload) => payload,
                Err(error) => return ProbeResult::failed(describe(&error.to_string())),
            };
            if payload.is_null() {
                return ProbeResult::failed("Resposta vazia");
            }
            if let Expectation::JsonField(field) = expect {
                if payload.get(field).map_or(true, Value::is_null) {
                    return ProbeResult::failed(format!(
                        "Resposta inválida (esperado campo \"{field}\")"
                    ));
                }
            }
        }
    }
    ProbeResult::ok(success_message)
}

fn transport_failure(error: &reqwest::Error, timeout: Duration) -> ProbeResult {
    if error.is_timeout() {
        return ProbeResult::failed(format!(
            "Tempo limite excedido ({})",
            format_duration(timeout)
        ));
    }
    ProbeResult::failed(describe(&error.to_string()))
}

fn describe(message: &str) -> String {
    if message.trim().is_empty() {
        "Erro desconhecido".to_string()
    } else {
        message.to_string()
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.subsec_millis() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}
