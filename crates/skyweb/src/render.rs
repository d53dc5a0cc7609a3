//! Page renderer: one template, one context, one 200 response.

use anyhow::Context;
use axum::response::Html;

use crate::context::RenderContext;
use crate::error::PageError;
use crate::templates::Templates;

/// Render template `name` with `ctx` as an HTTP 200 page.
///
/// Degraded contexts still render with 200; only a template failure turns
/// into an error, which the error responder renders as a 500.
pub fn page(
    templates: &Templates,
    name: &str,
    ctx: RenderContext,
) -> Result<Html<String>, PageError> {
    let body = templates
        .render(name, &ctx)
        .with_context(|| format!("rendering template {name}"))?;
    Ok(Html(body))
}
