use askama::Template;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use shortly_core::ShortToken;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::model::NewUrlForm;
use crate::state::AppState;
use crate::templates::{LinkDetailsTemplate, NewUrlTemplate};
use crate::validate::validate_url;

fn render_form(error: Option<&str>, url: &str) -> Result<Html<String>> {
    Ok(Html(NewUrlTemplate { error, url }.render()?))
}

/// Any non-empty path segment is looked up; anything else is simply unknown.
fn parse_token(raw: &str) -> Result<ShortToken> {
    ShortToken::new(raw).map_err(|_| AppError::NotFound)
}

/// `GET /`
pub async fn new_url_form_handler() -> Result<Html<String>> {
    render_form(None, "")
}

/// `POST /`
///
/// Valid URLs are registered and answered with a redirect to their details
/// page. Invalid ones re-render the form with the input echoed back and never
/// reach the store.
pub async fn submit_url_handler(
    State(state): State<AppState>,
    Form(form): Form<NewUrlForm>,
) -> Result<Response> {
    if let Err(err) = validate_url(&form.url) {
        debug!(url = %form.url, "rejected submitted url");
        let message = err.to_string();
        let page = render_form(Some(&message), &form.url)?;
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    let token = state.store().register_url(&form.url).await?;
    Ok(Redirect::to(&token.details_path()).into_response())
}

/// `GET /{token}` redirects and counts a click, `GET /{token}+` shows details.
pub async fn short_link_handler(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Response> {
    match segment.strip_suffix('+') {
        Some(token) => link_details(&state, token).await,
        None => follow_short_link(&state, &segment).await,
    }
}

async fn follow_short_link(state: &AppState, token: &str) -> Result<Response> {
    let token = parse_token(token)?;
    let url = state.store().resolve(&token).await?;

    let location =
        HeaderValue::from_bytes(url.as_bytes()).map_err(|_| AppError::InvalidTarget(url.clone()))?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

async fn link_details(state: &AppState, token: &str) -> Result<Response> {
    let token = parse_token(token)?;
    let details = state.store().get_details(&token).await?;

    let redirect_path = token.redirect_path();
    let page = LinkDetailsTemplate {
        token: token.as_str(),
        redirect_path: &redirect_path,
        url: &details.url,
        click_count: details.click_count,
    }
    .render()?;
    Ok(Html(page).into_response())
}
