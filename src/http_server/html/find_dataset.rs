use askama::Template;

/// Landing page with a lookup form for an NBN.
#[derive(Template, Default)]
#[template(path = "find_dataset.html")]
pub struct FindDatasetTemplate {}
