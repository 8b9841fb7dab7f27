//! Cross-dataset version export lookups.

use axum::routing::get;
use axum::Router;

mod get_by_bag_id;
pub mod unconfirmed;

use crate::state::State;

pub fn router(state: State) -> Router<State> {
    Router::new()
        .route("/unconfirmed", get(unconfirmed::handler))
        .route("/:bag_id", get(get_by_bag_id::handler))
        .with_state(state)
}
