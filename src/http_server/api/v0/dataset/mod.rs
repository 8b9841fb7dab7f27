//! Dataset endpoints: registration, lookup, and the version export
//! lifecycle scoped to one dataset.

use axum::routing::{get, post, put};
use axum::Router;

pub mod amend_export;
pub mod append_export;
pub mod create;
pub mod get;
mod get_by_sword_token;
mod get_export;
pub mod set_archived;

use crate::state::State;

pub fn router(state: State) -> Router<State> {
    Router::new()
        .route("/sword-token/:sword_token", get(get_by_sword_token::handler))
        .route("/:nbn", put(create::handler).get(get::handler))
        .route("/:nbn/version-export", post(append_export::handler))
        .route(
            "/:nbn/version-export/:version_number",
            put(amend_export::handler).get(get_export::handler),
        )
        .route(
            "/:nbn/version-export/:version_number/archived-timestamp",
            put(set_archived::handler),
        )
        .with_state(state)
}
