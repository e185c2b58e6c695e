use crate::models::BrapiConfig;
use crate::services::integrations::{AnyConfig, ProviderConfig, ProviderId};
use crate::services::probe::{
    join_url, non_blank, Credential, Expectation, ProbePlan, ProbeRequest, PROBE_TICKER,
};

impl ProviderConfig for BrapiConfig {
    const PROVIDER: ProviderId = ProviderId::Brapi;

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

    /// `GET {baseUrl}{quote}/ITUB4`, bearer token when a key is configured.
    fn probe_plan(&self) -> ProbePlan {
        if !self.enabled {
            return ProbePlan::disabled(Self::PROVIDER);
        }
        let url = join_url(
            &self.base_url,
            &format!("{}/{}", self.endpoints.quote, PROBE_TICKER),
        );
        let credential = match non_blank(self.api_key.as_deref()) {
            Some(key) => Credential::Bearer(key.to_string()),
            None => Credential::None,
        };
        ProbePlan::Request(
            ProbeRequest::get(url)
                .credential(credential)
                .expecting(Expectation::JsonField("results")),
        )
    }

    fn into_any(self) -> AnyConfig {
        AnyConfig::Brapi(self)
    }
}
