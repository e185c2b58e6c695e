use crate::models::HgBrasilConfig;
use crate::services::integrations::{AnyConfig, ProviderConfig, ProviderId};
use crate::services::probe::{
    join_url, Credential, Expectation, ProbePlan, ProbeRequest, PROBE_TICKER,
};

impl ProviderConfig for HgBrasilConfig {
    const PROVIDER: ProviderId = ProviderId::HgBrasil;

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn display_base_url(&self) -> String {
        self.base_url.clone()
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn last_sync(&self) -> Option<&str> {
        self.last_sync.as_deref()
    }

    /// The key always travels as `?key=`, empty when unset; HG Brasil answers
    /// keyless requests with a restricted payload rather than an error.
    fn probe_plan(&self) -> ProbePlan {
        if !self.enabled {
            return ProbePlan::disabled(Self::PROVIDER);
        }
        let url = join_url(&self.base_url, &self.endpoints.stock_price);
        ProbePlan::Request(
            ProbeRequest::get(url)
                .credential(Credential::Query {
                    name: "key",
                    value: self.api_key.clone().unwrap_or_default(),
                })
                .query_param("symbol", PROBE_TICKER)
                .expecting(Expectation::JsonField("results")),
        )
    }

    fn into_any(self) -> AnyConfig {
        AnyConfig::HgBrasil(self)
    }
}
