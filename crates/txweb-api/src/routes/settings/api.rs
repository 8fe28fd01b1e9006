//! Settings API endpoints - JSON API

use crate::AppState;
use txweb_config::Config;

/// Running configuration, as loaded and validated at start-up
pub async fn api_settings(state: axum::extract::State<AppState>) -> axum::Json<Config> {
    axum::Json(state.config.clone())
}
