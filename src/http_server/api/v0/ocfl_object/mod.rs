//! OCFL object version endpoints: the archive-side registry keyed by
//! `(bag_id, object_version)`.

use axum::routing::{get, put};
use axum::Router;

mod by_nbn;
mod by_sword_token;
mod get;
mod list_by_bag_id;
pub mod save;

use crate::state::State;

pub fn router(state: State) -> Router<State> {
    Router::new()
        .route("/sword-token/:sword_token", get(by_sword_token::handler))
        .route("/nbn/:nbn", get(by_nbn::handler))
        .route("/:bag_id", get(list_by_bag_id::handler))
        .route(
            "/:bag_id/:object_version",
            put(save::handler).get(get::handler),
        )
        .with_state(state)
}
