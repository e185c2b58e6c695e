use std::path::PathBuf;
use std::sync::Arc;

use crate::storage::FileConfigStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FileConfigStore>,
    pub stocks_snapshot: Option<PathBuf>,
}
