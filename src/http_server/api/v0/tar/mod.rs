//! Tar endpoints: sealing object versions into vault containers.

use axum::routing::{get, post, put};
use axum::Router;

pub mod create;
mod get;
pub mod update;

use crate::state::State;

pub fn router(state: State) -> Router<State> {
    Router::new()
        .route("/", post(create::handler))
        .route("/:tar_id", get(get::handler).put(update::handler))
        .with_state(state)
}
