//! Server-rendered HTML pages.
//!
//! Templates are compiled into the binary and rendered with minijinja; a fresh
//! [`Environment`] is built per render.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use minijinja::{context, Environment};

use scholar_rag::summarize::DEFAULT_QUERY;

use crate::api::summarize::{run_summary, SummaryResponse};
use crate::api::{from_upload, upload_status};
use crate::state::AppState;
use crate::upload::{read_pdf_upload, UploadError};

const TEMPLATES: [(&str, &str); 3] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("summarize.html", include_str!("../templates/summarize.html")),
];

const UPLOAD_PROMPT: &str = "Please upload a PDF file.";

fn render(name: &str, ctx: minijinja::Value) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    for (template_name, source) in TEMPLATES {
        env.add_template(template_name, source)?;
    }
    let template = env.get_template(name)?;
    template.render(ctx)
}

fn page(status: StatusCode, name: &str, ctx: minijinja::Value) -> Response {
    match render(name, ctx) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template '{name}' failed to render: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed").into_response()
        }
    }
}

/// Browsers send `text/html` in `Accept`; API clients generally don't.
pub fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

pub async fn home(State(state): State<Arc<AppState>>) -> Response {
    page(
        StatusCode::OK,
        "index.html",
        context! {
            llm_provider => state.llm_provider,
            compression => state.summarizer.compressor().mode_name(),
        },
    )
}

pub async fn summarize_form() -> Response {
    page(
        StatusCode::OK,
        "summarize.html",
        context! { default_query => DEFAULT_QUERY },
    )
}

/// Form submission. Renders HTML for browsers and JSON for everyone else.
pub async fn summarize_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let html = wants_html(&headers);
    let upload = match read_pdf_upload(multipart).await {
        Ok(upload) => upload,
        Err(err) if html => {
            let message = match err {
                UploadError::MissingFile | UploadError::NotPdf => UPLOAD_PROMPT.to_string(),
                ref other => other.to_string(),
            };
            return page(
                upload_status(&err),
                "summarize.html",
                context! { default_query => DEFAULT_QUERY, error => message },
            );
        }
        Err(err) => return from_upload(err).into_response(),
    };

    let filename = upload.filename.clone();
    let query = upload.query.clone().unwrap_or_default();
    let result = run_summary(&state, upload).await;

    match (result, html) {
        (Ok(summary), true) => page(
            StatusCode::OK,
            "summarize.html",
            context! { default_query => DEFAULT_QUERY, query, filename, summary },
        ),
        (Ok(summary), false) => Json(SummaryResponse { summary }).into_response(),
        (Err((status, Json(body))), true) => page(
            status,
            "summarize.html",
            context! { default_query => DEFAULT_QUERY, query, error => body.error },
        ),
        (Err(err), false) => err.into_response(),
    }
}
