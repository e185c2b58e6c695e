use crate::models::FintzConfig;
use crate::services::integrations::{AnyConfig, ProviderConfig, ProviderId};
use crate::services::probe::{
    join_url, non_blank, substitute_ticker, Credential, Expectation, ProbePlan, ProbeRequest,
};

const API_KEY_HEADER: &str = "X-API-Key";

impl ProviderConfig for FintzConfig {
    const PROVIDER: ProviderId = ProviderId::Fintz;

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

    fn probe_plan(&self) -> ProbePlan {
        if !self.enabled {
            return ProbePlan::disabled(Self::PROVIDER);
        }
        let url = join_url(
            &self.base_url,
            &substitute_ticker(&self.endpoints.fundamentals),
        );
        let credential = match non_blank(self.api_key.as_deref()) {
            Some(key) => Credential::Header {
                name: API_KEY_HEADER,
                value: key.to_string(),
            },
            None => Credential::None,
        };
        ProbePlan::Request(
            ProbeRequest::get(url)
                .credential(credential)
                .expecting(Expectation::JsonPayload)
                .distinct_auth_failures(),
        )
    }

    fn into_any(self) -> AnyConfig {
        AnyConfig::Fintz(self)
    }
}
