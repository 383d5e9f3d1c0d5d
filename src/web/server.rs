use crate::apidoc::DocPipeline;
use crate::models::DocRequest;
use anyhow::Result;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

const FORM_PAGE: &str = include_str!("form.html");

// commands and responses are pasted by hand, a megabyte is plenty
const MAX_FORM_BYTES: u64 = 1024 * 1024;

pub fn routes(
    pipeline: DocPipeline,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let pipeline = Arc::new(pipeline);

    let form_route = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::html(FORM_PAGE));

    let generate_route = warp::path("generate")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_FORM_BYTES))
        .and(warp::body::form())
        .and_then(move |request: DocRequest| {
            let pipeline = pipeline.clone();
            async move { Ok::<_, warp::Rejection>(generate(&pipeline, &request)) }
        });

    let health_route = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})));

    form_route
        .or(generate_route)
        .or(health_route)
        .with(warp::trace::request())
}

fn generate(pipeline: &DocPipeline, request: &DocRequest) -> warp::reply::WithStatus<String> {
    match pipeline.generate(request) {
        Ok(doc) => {
            for warning in &doc.warnings {
                tracing::warn!(%warning, "curl command accepted with warnings");
            }
            warp::reply::with_status(doc.text, StatusCode::OK)
        }
        Err(e) => {
            tracing::info!(error = %e, "rejected curl command");
            warp::reply::with_status(e.to_string(), StatusCode::BAD_REQUEST)
        }
    }
}

pub async fn run_server(host: IpAddr, port: u16, pipeline: DocPipeline) -> Result<()> {
    let addr = SocketAddr::new(host, port);
    tracing::info!(%addr, "serving curl2apidoc form");
    warp::serve(routes(pipeline)).run(addr).await;

    Ok(())
}
