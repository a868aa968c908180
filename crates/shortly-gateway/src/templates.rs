use askama::Template;

/// Submission form, optionally with an error and the rejected input.
#[derive(Template)]
#[template(path = "new_url.html")]
pub struct NewUrlTemplate<'a> {
    pub error: Option<&'a str>,
    pub url: &'a str,
}

/// Statistics page for a single short link.
#[derive(Template)]
#[template(path = "short_link_details.html")]
pub struct LinkDetailsTemplate<'a> {
    pub token: &'a str,
    pub redirect_path: &'a str,
    pub url: &'a str,
    pub click_count: u64,
}
