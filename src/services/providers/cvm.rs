use serde_json::{Map, Value};

use crate::models::CvmConfig;
use crate::services::card::CardPatch;
use crate::services::integrations::{AnyConfig, ProviderConfig, ProviderId};
use crate::services::probe::{join_url, Expectation, ProbePlan, ProbeRequest, TimeoutClass};

const COMPANY_REGISTRY_FILE: &str = "cad_cia_aberta.csv";
const MIN_CSV_LENGTH: usize = 100;

impl ProviderConfig for CvmConfig {
    const PROVIDER: ProviderId = ProviderId::Cvm;

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
        None
    }

    fn last_sync(&self) -> Option<&str> {
        self.last_sync.as_deref()
    }

    /// Downloads the public company registry CSV; the payload is large,
    /// hence the bulk timeout.
    fn probe_plan(&self) -> ProbePlan {
        if !self.enabled {
            return ProbePlan::disabled(Self::PROVIDER);
        }
        let url = join_url(
            &self.base_url,
            &format!("{}/{}", self.endpoints.companies, COMPANY_REGISTRY_FILE),
        );
        ProbePlan::Request(
            ProbeRequest::get(url)
                .timeout(TimeoutClass::Bulk)
                .expecting(Expectation::MinTextLength(MIN_CSV_LENGTH))
                .success_message("Conexão OK (fonte oficial CVM)"),
        )
    }

    fn card_patch(&self, patch: &CardPatch) -> Value {
        let mut fields = Map::new();
        fields.insert("baseUrl".into(), Value::String(patch.base_url.clone()));
        Value::Object(fields)
    }

    fn into_any(self) -> AnyConfig {
        AnyConfig::Cvm(self)
    }
}
