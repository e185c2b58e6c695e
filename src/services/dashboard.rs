use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, warn};

use crate::error::IntegrationError;
use crate::models::{Company, CompanyListResponse, CompanyStats, Stock};
use crate::services::lifecycle::MountGuard;
use crate::services::probe::join_url;

pub const STOCKS_LOAD_ERROR: &str = "Não foi possível carregar as ações agora.";

/// Read-only client for the ranking and company directory endpoints.
#[derive(Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn fetch_stocks(&self) -> Result<Vec<Stock>, IntegrationError> {
        let payload: Value = self.get_json("/api/stocks").await?;
        if !payload.is_array() {
            return Err(IntegrationError::Payload("Formato inválido".to_string()));
        }
        serde_json::from_value(payload)
            .map_err(|err| IntegrationError::Payload(err.to_string()))
    }

    pub async fn fetch_stats(&self) -> Result<CompanyStats, IntegrationError> {
        self.get_json("/api/stats").await
    }

    pub async fn fetch_companies(
        &self,
        only_monitored: bool,
    ) -> Result<Vec<Company>, IntegrationError> {
        let path = if only_monitored {
            "/api/empresas?apenas_monitoradas=true"
        } else {
            "/api/empresas"
        };
        let response: CompanyListResponse = self.get_json(path).await?;
        Ok(response.empresas.unwrap_or_default())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, IntegrationError> {
        let response = self.client.get(join_url(&self.base_url, path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IntegrationError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| IntegrationError::Payload(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockListState {
    pub stocks: Vec<Stock>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for StockListState {
    fn default() -> Self {
        Self {
            stocks: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

impl StockListState {
    /// Case-insensitive match on ticker or company name, plus an exact sector
    /// match unless `sector` is `"all"`.
    pub fn filtered<'a>(
        &'a self,
        search: &str,
        sector: &'a str,
    ) -> impl Iterator<Item = &'a Stock> + 'a {
        let needle = search.to_lowercase();
        self.stocks.iter().filter(move |stock| {
            let matches_search = stock.ticker.to_lowercase().contains(&needle)
                || stock.company_name.to_lowercase().contains(&needle);
            matches_search && (sector == "all" || stock.sector == sector)
        })
    }

    pub fn below_ceiling_count(&self) -> usize {
        self.stocks.iter().filter(|stock| stock.below_ceiling).count()
    }

    pub fn average_dividend_yield(&self) -> f64 {
        if self.stocks.is_empty() {
            return 0.0;
        }
        let total: f64 = self.stocks.iter().map(|stock| stock.dividend_yield).sum();
        total / self.stocks.len() as f64
    }
}

/// Never fails: a bad response empties the list and sets [`STOCKS_LOAD_ERROR`].
/// Nothing is written to `state` once `guard` reports an unmount.
pub async fn load_stock_list(
    client: &DashboardClient,
    guard: &MountGuard,
    state: &mut StockListState,
) {
    state.loading = true;
    state.error = None;

    let outcome = client.fetch_stocks().await;
    if !guard.is_mounted() {
        return;
    }
    match outcome {
        Ok(stocks) => state.stocks = stocks,
        Err(error) => {
            warn!(%error, "failed to load stock list");
            state.stocks.clear();
            state.error = Some(STOCKS_LOAD_ERROR.to_string());
        }
    }
    state.loading = false;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyDirectory {
    pub stats: Option<CompanyStats>,
    pub companies: Vec<Company>,
    pub loading: bool,
}

impl CompanyDirectory {
    /// Search over razão social, nome fantasia and CNPJ, plus a situação filter.
    pub fn filtered<'a>(
        &'a self,
        search: &str,
        situacao: &'a str,
    ) -> impl Iterator<Item = &'a Company> + 'a {
        let needle = search.to_lowercase();
        self.companies.iter().filter(move |company| {
            let matches_search = company.razao_social.to_lowercase().contains(&needle)
                || company.cnpj.contains(&needle)
                || company
                    .nome_fantasia
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle));
            matches_search && (situacao == "all" || company.situacao == situacao)
        })
    }
}

/// Loads stats then the company list. Errors are logged and leave whatever
/// was already loaded in place.
pub async fn load_company_directory(
    client: &DashboardClient,
    guard: &MountGuard,
    only_monitored: bool,
    directory: &mut CompanyDirectory,
) {
    directory.loading = true;
    let loaded = async {
        let stats = client.fetch_stats().await?;
        if !guard.is_mounted() {
            return Ok(None);
        }
        directory.stats = Some(stats);
        let companies = client.fetch_companies(only_monitored).await?;
        Ok::<_, IntegrationError>(Some(companies))
    }
    .await;
    if !guard.is_mounted() {
        return;
    }
    match loaded {
        Ok(Some(companies)) => directory.companies = companies,
        Ok(None) => {}
        Err(error) => error!(%error, "failed to load company directory"),
    }
    directory.loading = false;
}
