use axum::Router;

pub mod dataset;
pub mod ocfl_object;
pub mod tar;
pub mod version_export;

use crate::state::State;

pub fn router(state: State) -> Router<State> {
    Router::new()
        .nest("/dataset", dataset::router(state.clone()))
        .nest("/version-export", version_export::router(state.clone()))
        .nest("/ocfl-object", ocfl_object::router(state.clone()))
        .nest("/tar", tar::router(state.clone()))
        .with_state(state)
}
