//! Provider-agnostic integration card.
//!
//! The card never touches a config directly: it renders a [`CardView`] and
//! proposes changes through [`CardActions`]. Everything it stores itself is
//! ephemeral UI state.

use async_trait::async_trait;
use chrono::DateTime;
use serde::Serialize;

use crate::error::IntegrationError;
use crate::models::ProbeResult;
use crate::services::integrations::ProviderId;
use crate::services::lifecycle::MountGuard;

/// The fields every capsule must expose to be rendered by the card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub provider: ProviderId,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<String>,
    pub last_sync: Option<String>,
}

impl CardView {
    pub fn status_label(&self) -> &'static str {
        if self.enabled {
            "Ativo"
        } else {
            "Inativo"
        }
    }

    /// `last_sync` as `dd/mm/yyyy HH:MM`, or verbatim when it is not RFC 3339.
    pub fn last_sync_display(&self) -> Option<String> {
        let raw = self.last_sync.as_deref()?;
        Some(match DateTime::parse_from_rfc3339(raw) {
            Ok(timestamp) => timestamp.format("%d/%m/%Y %H:%M").to_string(),
            Err(_) => raw.to_string(),
        })
    }
}

/// Edit submitted from the card form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub api_key: Option<String>,
    pub base_url: String,
}

/// Callbacks wired by the registry: `onToggle`, `onSave`, `onTest`.
#[async_trait]
pub trait CardActions: Send {
    async fn on_toggle(&mut self, enabled: bool) -> Result<(), IntegrationError>;

    async fn on_save(&mut self, patch: CardPatch) -> Result<(), IntegrationError>;

    async fn on_test(&mut self) -> ProbeResult;
}

#[derive(Debug, Clone, Default)]
pub struct IntegrationCard {
    editing: bool,
    draft_api_key: String,
    draft_base_url: String,
    saving: bool,
    testing: bool,
    test_result: Option<ProbeResult>,
    alert: Option<String>,
}

impl IntegrationCard {
    pub fn new(view: &CardView) -> Self {
        Self {
            draft_api_key: view.api_key.clone().unwrap_or_default(),
            draft_base_url: view.base_url.clone(),
            ..Self::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_testing(&self) -> bool {
        self.testing
    }

    pub fn test_result(&self) -> Option<&ProbeResult> {
        self.test_result.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn draft_api_key(&self) -> &str {
        &self.draft_api_key
    }

    pub fn draft_base_url(&self) -> &str {
        &self.draft_base_url
    }

    /// Opens the form, seeding the drafts from the latest view.
    pub fn begin_edit(&mut self, view: &CardView) {
        self.draft_api_key = view.api_key.clone().unwrap_or_default();
        self.draft_base_url = view.base_url.clone();
        self.editing = true;
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
    }

    pub fn set_api_key(&mut self, value: impl Into<String>) {
        self.draft_api_key = value.into();
    }

    pub fn set_base_url(&mut self, value: impl Into<String>) {
        self.draft_base_url = value.into();
    }

    /// Whether the save button should be enabled. Advisory only: `submit`
    /// does not consult it.
    pub fn can_submit(&self) -> bool {
        !self.saving
    }

    pub fn can_test(&self) -> bool {
        !self.testing
    }

    pub async fn toggle<A: CardActions>(
        &mut self,
        actions: &mut A,
        enabled: bool,
        guard: &MountGuard,
    ) {
        let outcome = actions.on_toggle(enabled).await;
        if !guard.is_mounted() {
            return;
        }
        if let Err(error) = outcome {
            self.alert = Some(format!("Erro ao salvar: {error}"));
        }
    }

    pub async fn submit<A: CardActions>(&mut self, actions: &mut A, guard: &MountGuard) {
        self.saving = true;
        let patch = CardPatch {
            api_key: Some(self.draft_api_key.clone()),
            base_url: self.draft_base_url.clone(),
        };
        let outcome = actions.on_save(patch).await;
        if !guard.is_mounted() {
            return;
        }
        match outcome {
            Ok(()) => {
                self.editing = false;
                self.test_result = None;
            }
            Err(error) => self.alert = Some(format!("Erro ao salvar: {error}")),
        }
        self.saving = false;
    }

    /// The newest verdict replaces whatever was shown before.
    pub async fn run_test<A: CardActions>(&mut self, actions: &mut A, guard: &MountGuard) {
        self.testing = true;
        self.test_result = None;
        let result = actions.on_test().await;
        if !guard.is_mounted() {
            return;
        }
        self.test_result = Some(result);
        self.testing = false;
    }
}
