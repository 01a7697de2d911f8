//! OpenAPI documentation, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "scholar API",
        version = "0.1.0",
        description = "Retrieval-augmented summarization of academic PDFs.",
    ),
    tags(
        (name = "Health", description = "Server readiness and endpoint listing"),
        (name = "Summarize", description = "PDF upload and LLM summary"),
        (name = "Compress", description = "Text compression through the compression endpoint"),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::api_root,
        crate::api::summarize::summarize_api,
        crate::api::compress::compress,
    ),
    components(schemas(
        crate::api::ErrorBody,
        crate::api::health::HealthResponse,
        crate::api::health::ApiRootResponse,
        crate::api::summarize::SummaryResponse,
        crate::api::compress::CompressResponse,
    ))
)]
pub struct ApiDoc;
