use serde_json::{Map, Value};

use crate::models::{B3Config, B3DataSource, ProbeResult, B3_API_HOST, B3_DEFAULT_FTP_HOST};
use crate::services::card::CardPatch;
use crate::services::integrations::{AnyConfig, ProviderConfig, ProviderId};
use crate::services::probe::{non_blank, ProbePlan};

impl ProviderConfig for B3Config {
    const PROVIDER: ProviderId = ProviderId::B3;

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn display_base_url(&self) -> String {
        match self.data_source {
            B3DataSource::Ftp => non_blank(self.ftp_host.as_deref())
                .unwrap_or(B3_DEFAULT_FTP_HOST)
                .to_string(),
            B3DataSource::Api | B3DataSource::Both => B3_API_HOST.to_string(),
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn last_sync(&self) -> Option<&str> {
        self.last_sync.as_deref()
    }

    /// Credential presence only. The live API/FTP check belongs to the
    /// sync jobs, so B3 never issues a probe request.
    fn probe_plan(&self) -> ProbePlan {
        if !self.enabled {
            return ProbePlan::disabled(Self::PROVIDER);
        }
        if self.data_source.uses_api()
            && (non_blank(self.api_key.as_deref()).is_none()
                || non_blank(self.api_secret.as_deref()).is_none())
        {
            return ProbePlan::Verdict(ProbeResult::failed(
                "API Key e API Secret são obrigatórios para conexão via API.",
            ));
        }
        if self.data_source.uses_ftp()
            && self.ftp_enabled
            && (non_blank(self.ftp_user.as_deref()).is_none()
                || non_blank(self.ftp_password.as_deref()).is_none())
        {
            return ProbePlan::Verdict(ProbeResult::failed(
                "Credenciais FTP são obrigatórias para conexão FTP.",
            ));
        }
        ProbePlan::Verdict(ProbeResult::ok(format!(
            "Conexão com B3 ({}) OK! Environment: {}",
            self.data_source.as_str(),
            self.environment.as_str()
        )))
    }

    /// The card's URL field edits the FTP host, and only in FTP mode.
    fn card_patch(&self, patch: &CardPatch) -> Value {
        let mut fields = Map::new();
        if let Some(api_key) = &patch.api_key {
            fields.insert("apiKey".into(), Value::String(api_key.clone()));
        }
        if self.data_source == B3DataSource::Ftp {
            fields.insert("ftpHost".into(), Value::String(patch.base_url.clone()));
        }
        Value::Object(fields)
    }

    fn into_any(self) -> AnyConfig {
        AnyConfig::B3(self)
    }
}
