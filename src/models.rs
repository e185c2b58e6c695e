use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub requests_per_minute: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BrapiEndpoints {
    pub quote: String,
    pub dividends: String,
    pub history: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrapiConfig {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub endpoints: BrapiEndpoints,
    pub rate_limit: RateLimit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
    /// Keys stored by the backend that this struct does not model. Written
    /// back untouched on every save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for BrapiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            base_url: "https://brapi.dev/api".into(),
            endpoints: BrapiEndpoints {
                quote: "/quote".into(),
                dividends: "/dividends".into(),
                history: "/quote/{ticker}/history".into(),
            },
            rate_limit: RateLimit {
                requests_per_minute: 60,
            },
            last_sync: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FintzEndpoints {
    pub fundamentals: String,
    pub dividends: String,
    pub balance_sheet: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FintzConfig {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub endpoints: FintzEndpoints,
    pub rate_limit: RateLimit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for FintzConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            base_url: "https://api.fintz.com.br/v1".into(),
            endpoints: FintzEndpoints {
                fundamentals: "/stocks/{ticker}/fundamentals".into(),
                dividends: "/stocks/{ticker}/dividends".into(),
                balance_sheet: "/stocks/{ticker}/balance-sheet".into(),
            },
            rate_limit: RateLimit {
                requests_per_minute: 30,
            },
            last_sync: None,
            extra: Map::new(),
        }
    }
}

/// HG Brasil endpoint set. The legacy backend shape (`stocks`, `indexes`,
/// `currencies` under a `/finance` base URL) is not honored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HgBrasilEndpoints {
    pub stock_price: String,
    pub taxes: String,
    pub dividends_v2: String,
    pub indicators_v2: String,
    pub historical_v2: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HgBrasilConfig {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub endpoints: HgBrasilEndpoints,
    pub rate_limit: RateLimit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HgBrasilConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            base_url: "https://api.hgbrasil.com".into(),
            endpoints: HgBrasilEndpoints {
                stock_price: "/finance/stock_price".into(),
                taxes: "/finance/taxes".into(),
                dividends_v2: "/v2/finance/dividends".into(),
                indicators_v2: "/v2/finance/indicators".into(),
                historical_v2: "/v2/finance/historical".into(),
            },
            rate_limit: RateLimit {
                requests_per_minute: 60,
            },
            last_sync: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CvmEndpoints {
    pub companies: String,
    pub dfp: String,
    pub itr: String,
}

/// CVM open data is public, so there are no credentials.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CvmConfig {
    pub enabled: bool,
    pub base_url: String,
    pub endpoints: CvmEndpoints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CvmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://dados.cvm.gov.br/dados".into(),
            endpoints: CvmEndpoints {
                companies: "/CIA_ABERTA/CAD/DADOS".into(),
                dfp: "/CIA_ABERTA/DOC/DFP".into(),
                itr: "/CIA_ABERTA/DOC/ITR".into(),
            },
            last_sync: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum B3Environment {
    Production,
    Sandbox,
}

impl B3Environment {
    pub const fn as_str(self) -> &'static str {
        match self {
            B3Environment::Production => "production",
            B3Environment::Sandbox => "sandbox",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum B3DataSource {
    Api,
    Ftp,
    Both,
}

impl B3DataSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            B3DataSource::Api => "api",
            B3DataSource::Ftp => "ftp",
            B3DataSource::Both => "both",
        }
    }

    pub const fn uses_api(self) -> bool {
        matches!(self, B3DataSource::Api | B3DataSource::Both)
    }

    pub const fn uses_ftp(self) -> bool {
        matches!(self, B3DataSource::Ftp | B3DataSource::Both)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct B3Config {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
    pub environment: B3Environment,
    pub ftp_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftp_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftp_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftp_password: Option<String>,
    pub data_source: B3DataSource,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub const B3_DEFAULT_FTP_HOST: &str = "ftp.b3.com.br";
pub const B3_API_HOST: &str = "https://api.b3.com.br";

impl Default for B3Config {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: Some(String::new()),
            api_secret: Some(String::new()),
            environment: B3Environment::Sandbox,
            ftp_enabled: false,
            ftp_host: Some(B3_DEFAULT_FTP_HOST.into()),
            ftp_user: Some(String::new()),
            ftp_password: Some(String::new()),
            data_source: B3DataSource::Api,
            notes: "B3 oferece dados via API (requer credenciais) e FTP público (histórico)."
                .into(),
            last_sync: None,
            extra: Map::new(),
        }
    }
}

/// Verdict of a connection probe. Display-only, never persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub success: bool,
    pub message: String,
}

impl ProbeResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub ticker: String,
    pub company_name: String,
    pub sector: String,
    pub current_price: f64,
    pub ceiling_price: f64,
    pub dividend_yield: f64,
    pub consistency: f64,
    pub below_ceiling: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LastSyncInfo {
    pub created_at: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompanyStats {
    pub total_empresas: u64,
    pub empresas_ativas: u64,
    #[serde(default)]
    pub empresas_besst: u64,
    pub total_acoes: u64,
    pub total_dividendos: u64,
    #[serde(default)]
    pub database_size_mb: f64,
    #[serde(default)]
    pub ultima_sincronizacao: Option<LastSyncInfo>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Company {
    pub id: i64,
    pub cnpj: String,
    #[serde(default)]
    pub codigo_cvm: Option<String>,
    pub razao_social: String,
    #[serde(default)]
    pub nome_fantasia: Option<String>,
    #[serde(default)]
    pub setor: Option<String>,
    pub situacao: String,
    #[serde(default)]
    pub setor_besst: Option<String>,
    #[serde(default)]
    pub monitorar: bool,
    #[serde(default)]
    pub elegivel_barsi: bool,
    #[serde(default)]
    pub dividend_yield_atual: Option<f64>,
    #[serde(default)]
    pub consistencia_dividendos: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CompanyListResponse {
    #[serde(default)]
    pub empresas: Option<Vec<Company>>,
}
