mod readiness;

use axum::routing::get;
use axum::Router;

use crate::state::State;

pub fn router(state: State) -> Router<State> {
    Router::new()
        .route("/healthz", get(readiness::handler))
        .with_state(state)
}
