use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::IntegrationError;
use crate::models::{B3Config, BrapiConfig, CvmConfig, FintzConfig, HgBrasilConfig};
use crate::services::card::{CardPatch, CardView};
use crate::services::probe::ProbePlan;

/// Arena index of the integration registry: one slot per market-data source.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Brapi,
    Fintz,
    HgBrasil,
    Cvm,
    B3,
}

impl ProviderId {
    pub const ALL: [ProviderId; 5] = [
        ProviderId::Brapi,
        ProviderId::Fintz,
        ProviderId::HgBrasil,
        ProviderId::Cvm,
        ProviderId::B3,
    ];

    pub const fn slug(self) -> &'static str {
        match self {
            ProviderId::Brapi => "brapi",
            ProviderId::Fintz => "fintz",
            ProviderId::HgBrasil => "hgbrasil",
            ProviderId::Cvm => "cvm",
            ProviderId::B3 => "b3",
        }
    }

    /// Position of this provider's slot in the registry arena.
    pub const fn index(self) -> usize {
        match self {
            ProviderId::Brapi => 0,
            ProviderId::Fintz => 1,
            ProviderId::HgBrasil => 2,
            ProviderId::Cvm => 3,
            ProviderId::B3 => 4,
        }
    }

    /// Short human name used in probe messages.
    pub const fn label(self) -> &'static str {
        match self {
            ProviderId::Brapi => "Brapi",
            ProviderId::Fintz => "Fintz",
            ProviderId::HgBrasil => "HG Brasil",
            ProviderId::Cvm => "CVM",
            ProviderId::B3 => "B3",
        }
    }

    /// Backend path that stores this provider's config, for both GET and POST.
    pub fn config_path(self) -> String {
        format!("/api/admin/integrations/{}", self.slug())
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ProviderId {
    type Err = IntegrationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ProviderId::ALL
            .into_iter()
            .find(|id| id.slug() == value)
            .ok_or_else(|| IntegrationError::UnknownProvider(value.to_string()))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct IntegrationDescriptor {
    pub key: ProviderId,
    pub display_name: String,
    pub description: String,
    pub data_source: String,
    pub rate_limit_hint: Option<u32>,
    pub requires_credentials: bool,
}

pub fn available_providers() -> Vec<IntegrationDescriptor> {
    ProviderId::ALL.into_iter().map(descriptor).collect()
}

pub fn descriptor(id: ProviderId) -> IntegrationDescriptor {
    let (display_name, description, data_source, rate_limit_hint, requires_credentials) =
        match id {
            ProviderId::Brapi => (
                "Brapi (brapi.dev)",
                "Cotações em tempo real, histórico de preços e dividendos.",
                "brapi.dev REST API",
                Some(60),
                false,
            ),
            ProviderId::Fintz => (
                "Fintz (fintz.com.br)",
                "Dados contábeis normalizados e histórico de proventos.",
                "Fintz REST API",
                Some(30),
                true,
            ),
            ProviderId::HgBrasil => (
                "HG Brasil Finance",
                "Cotações, índices e moedas.",
                "HG Brasil REST API",
                Some(60),
                true,
            ),
            ProviderId::Cvm => (
                "CVM Dados Abertos",
                "Balanços oficiais (DFP/ITR).",
                "Portal de Dados Abertos CVM (CSV)",
                None,
                false,
            ),
            ProviderId::B3 => (
                "B3 (Bolsa de Valores)",
                "Dados oficiais da bolsa via API autenticada ou FTP público.",
                "B3 Market Data / FTP",
                None,
                true,
            ),
        };
    IntegrationDescriptor {
        key: id,
        display_name: display_name.to_string(),
        description: description.to_string(),
        data_source: data_source.to_string(),
        rate_limit_hint,
        requires_credentials,
    }
}

/// One capsule: a provider's config shape plus its pluggable strategy.
///
/// `Default` is the compiled-in config used before the first load and
/// whenever the backend cannot be read.
pub trait ProviderConfig:
    Serialize + DeserializeOwned + Default + Clone + PartialEq + fmt::Debug + Send + Sync + 'static
{
    const PROVIDER: ProviderId;

    fn enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// URL shown on the card. Not necessarily the probed URL.
    fn display_base_url(&self) -> String;

    fn api_key(&self) -> Option<&str>;

    fn last_sync(&self) -> Option<&str>;

    /// Decides how to probe this config, running precondition checks first.
    fn probe_plan(&self) -> ProbePlan;

    /// Translates a card edit into a JSON patch over this provider's shape.
    fn card_patch(&self, patch: &CardPatch) -> Value {
        let mut fields = Map::new();
        if let Some(api_key) = &patch.api_key {
            fields.insert("apiKey".into(), Value::String(api_key.clone()));
        }
        fields.insert("baseUrl".into(), Value::String(patch.base_url.clone()));
        Value::Object(fields)
    }

    fn into_any(self) -> AnyConfig;
}

/// Deep-merges `patch` into `target`. Objects merge key by key, anything
/// else (arrays, scalars, `null`) replaces the target value.
pub fn merge_json(target: &mut Value, patch: Value) {
    match patch {
        Value::Object(patch_map) => {
            if let Value::Object(target_map) = &mut *target {
                for (key, value) in patch_map {
                    match target_map.get_mut(&key) {
                        Some(slot) if slot.is_object() && value.is_object() => {
                            merge_json(slot, value)
                        }
                        _ => {
                            target_map.insert(key, value);
                        }
                    }
                }
            } else {
                *target = Value::Object(patch_map);
            }
        }
        other => *target = other,
    }
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key, strip_nulls(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Decodes a backend payload, filling absent or `null` fields from the
/// provider's default. Keys the config does not model land in its `extra`.
pub fn complete_shape<C: ProviderConfig>(loaded: Value) -> Result<C, serde_json::Error> {
    let mut base = serde_json::to_value(C::default())?;
    merge_json(&mut base, strip_nulls(loaded));
    serde_json::from_value(base)
}

/// Applies a partial update to a config, keeping every field the patch omits.
pub fn apply_patch<C: ProviderConfig>(
    current: &C,
    patch: Value,
) -> Result<C, serde_json::Error> {
    let mut base = serde_json::to_value(current)?;
    merge_json(&mut base, patch);
    serde_json::from_value(base)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyConfig {
    Brapi(BrapiConfig),
    Fintz(FintzConfig),
    HgBrasil(HgBrasilConfig),
    Cvm(CvmConfig),
    B3(B3Config),
}

macro_rules! with_config {
    ($any:expr, $config:ident => $body:expr) => {
        match $any {
            AnyConfig::Brapi($config) => $body,
            AnyConfig::Fintz($config) => $body,
            AnyConfig::HgBrasil($config) => $body,
            AnyConfig::Cvm($config) => $body,
            AnyConfig::B3($config) => $body,
        }
    };
}

fn patched<C: ProviderConfig>(config: &C, patch: Value) -> Result<AnyConfig, IntegrationError> {
    apply_patch(config, patch)
        .map(C::into_any)
        .map_err(|source| IntegrationError::InvalidPatch {
            provider: C::PROVIDER,
            source,
        })
}

fn view_of<C: ProviderConfig>(config: &C) -> CardView {
    let descriptor = descriptor(C::PROVIDER);
    CardView {
        provider: C::PROVIDER,
        name: descriptor.display_name,
        description: descriptor.description,
        enabled: config.enabled(),
        base_url: config.display_base_url(),
        api_key: config.api_key().map(str::to_string),
        last_sync: config.last_sync().map(str::to_string),
    }
}

impl AnyConfig {
    pub fn defaults(id: ProviderId) -> Self {
        match id {
            ProviderId::Brapi => BrapiConfig::default().into_any(),
            ProviderId::Fintz => FintzConfig::default().into_any(),
            ProviderId::HgBrasil => HgBrasilConfig::default().into_any(),
            ProviderId::Cvm => CvmConfig::default().into_any(),
            ProviderId::B3 => B3Config::default().into_any(),
        }
    }

    /// Decodes a backend payload for `id` into a complete config.
    pub fn from_value(id: ProviderId, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match id {
            ProviderId::Brapi => complete_shape::<BrapiConfig>(value)?.into_any(),
            ProviderId::Fintz => complete_shape::<FintzConfig>(value)?.into_any(),
            ProviderId::HgBrasil => complete_shape::<HgBrasilConfig>(value)?.into_any(),
            ProviderId::Cvm => complete_shape::<CvmConfig>(value)?.into_any(),
            ProviderId::B3 => complete_shape::<B3Config>(value)?.into_any(),
        })
    }

    pub fn provider(&self) -> ProviderId {
        match self {
            AnyConfig::Brapi(_) => ProviderId::Brapi,
            AnyConfig::Fintz(_) => ProviderId::Fintz,
            AnyConfig::HgBrasil(_) => ProviderId::HgBrasil,
            AnyConfig::Cvm(_) => ProviderId::Cvm,
            AnyConfig::B3(_) => ProviderId::B3,
        }
    }

    pub fn enabled(&self) -> bool {
        with_config!(self, config => config.enabled())
    }

    pub fn probe_plan(&self) -> ProbePlan {
        with_config!(self, config => config.probe_plan())
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        with_config!(self, config => serde_json::to_value(config))
    }

    /// Returns a copy with `patch` merged in; `self` is left untouched.
    pub fn with_patch(&self, patch: Value) -> Result<Self, IntegrationError> {
        with_config!(self, config => patched(config, patch))
    }

    pub fn with_enabled(&self, enabled: bool) -> Self {
        with_config!(self, config => {
            let mut updated = config.clone();
            updated.set_enabled(enabled);
            updated.into_any()
        })
    }

    pub fn card_patch(&self, patch: &CardPatch) -> Value {
        with_config!(self, config => config.card_patch(patch))
    }

    pub fn view(&self) -> CardView {
        with_config!(self, config => view_of(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_ids_round_trip_through_slugs() {
        for (position, id) in ProviderId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), position);
            assert_eq!(id.slug().parse::<ProviderId>().unwrap(), id);
            assert_eq!(
                serde_json::to_value(id).unwrap(),
                Value::String(id.slug().to_string())
            );
        }
        assert!(matches!(
            "yahoo".parse::<ProviderId>(),
            Err(IntegrationError::UnknownProvider(name)) if name == "yahoo"
        ));
    }

    #[test]
    fn config_paths_are_isolated_per_provider() {
        assert_eq!(ProviderId::HgBrasil.config_path(), "/api/admin/integrations/hgbrasil");
        let paths: std::collections::BTreeSet<String> =
            ProviderId::ALL.iter().map(|id| id.config_path()).collect();
        assert_eq!(paths.len(), ProviderId::ALL.len());
    }

    #[test]
    fn catalog_has_one_descriptor_per_provider() {
        let catalog = available_providers();
        assert_eq!(catalog.len(), ProviderId::ALL.len());
        for id in ProviderId::ALL {
            assert_eq!(descriptor(id).key, id);
        }
        assert!(!descriptor(ProviderId::Cvm).requires_credentials);
    }

    #[test]
    fn merge_recurses_into_objects_and_replaces_scalars() {
        let mut target = json!({
            "enabled": false,
            "endpoints": { "quote": "/quote", "history": "/h" },
            "tags": [1, 2]
        });
        merge_json(
            &mut target,
            json!({ "enabled": true, "endpoints": { "quote": "/q2" }, "tags": [3] }),
        );
        assert_eq!(
            target,
            json!({
                "enabled": true,
                "endpoints": { "quote": "/q2", "history": "/h" },
                "tags": [3]
            })
        );
    }

    #[test]
    fn complete_shape_fills_missing_and_null_fields() {
        let loaded = json!({
            "enabled": true,
            "baseUrl": null,
            "endpoints": { "quote": "/v2/quote" }
        });
        let config: BrapiConfig = complete_shape(loaded).unwrap();
        let defaults = BrapiConfig::default();
        assert!(config.enabled);
        assert_eq!(config.base_url, defaults.base_url);
        assert_eq!(config.endpoints.quote, "/v2/quote");
        assert_eq!(config.endpoints.history, defaults.endpoints.history);
        assert_eq!(config.rate_limit, defaults.rate_limit);
    }

    #[test]
    fn unmodelled_keys_survive_load_and_patch() {
        let loaded = json!({
            "enabled": false,
            "autoSync": true,
            "syncSchedule": "weekly",
            "cost": { "monthly": 0 }
        });
        let config: CvmConfig = complete_shape(loaded).unwrap();
        assert_eq!(config.extra.get("autoSync"), Some(&json!(true)));

        let patched = apply_patch(&config, json!({ "enabled": true })).unwrap();
        let written = serde_json::to_value(&patched).unwrap();
        assert_eq!(written["enabled"], true);
        assert_eq!(written["autoSync"], true);
        assert_eq!(written["syncSchedule"], "weekly");
        assert_eq!(written["cost"], json!({ "monthly": 0 }));
        assert_eq!(written["baseUrl"], "https://dados.cvm.gov.br/dados");
    }

    #[test]
    fn patch_preserves_untouched_fields() {
        let current = FintzConfig {
            enabled: true,
            last_sync: Some("2025-01-02T03:04:05Z".into()),
            ..FintzConfig::default()
        };
        let updated = apply_patch(&current, json!({ "apiKey": "X" })).unwrap();
        assert_eq!(updated.api_key.as_deref(), Some("X"));
        assert_eq!(
            FintzConfig {
                api_key: None,
                ..updated
            },
            current
        );
    }

    #[test]
    fn ill_typed_patch_is_rejected() {
        let any = AnyConfig::defaults(ProviderId::Cvm);
        let err = any.with_patch(json!({ "enabled": "sim" })).unwrap_err();
        assert!(matches!(
            err,
            IntegrationError::InvalidPatch { provider: ProviderId::Cvm, .. }
        ));
    }

    #[test]
    fn any_config_dispatches_to_the_right_provider() {
        for id in ProviderId::ALL {
            let any = AnyConfig::defaults(id);
            assert_eq!(any.provider(), id);
            assert!(!any.enabled());
            assert!(any.with_enabled(true).enabled());
            let round_trip = AnyConfig::from_value(id, any.to_value().unwrap()).unwrap();
            assert_eq!(round_trip, any);
        }
    }
}
