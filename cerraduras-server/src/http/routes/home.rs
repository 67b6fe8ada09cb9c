//! Service banner

use axum::{routing::get, Router};

/// Plain-text greeting served at `/`
pub const BANNER: &str = "¡Bienvenido a la API de Fabrica de Cerraduras!";

/// GET /
async fn home() -> &'static str {
    BANNER
}

/// Banner route
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(home))
}
