use askama::Template;

/// Not-found page, linking back to the dataset lookup form.
#[derive(Template, Default)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {}
