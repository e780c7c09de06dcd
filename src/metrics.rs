use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and spawns its upkeep task.
/// Returns `Ok(None)` if observability is disabled.
pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5,
                10.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Records request count, latency and in-flight requests per route template.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    // Unmatched paths share one label so ids never reach the label set.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let in_flight = gauge!("http_requests_active");
    in_flight.increment(1.0);
    let response = next.run(req).await;
    in_flight.decrement(1.0);

    let status = response.status();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.as_str().to_owned()
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "route" => route)
        .record(start.elapsed().as_secs_f64());

    response
}

/// Router for metrics server
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics helpers

/// Redemption attempts by outcome (`success`, `not_found`, `expired`, ...).
pub fn track_code_redeemed(outcome: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("code_redemptions_total", "outcome" => outcome.to_string()).increment(1);
}

pub fn track_access_resolved(groups: usize) {
    if !is_observability_enabled() {
        return;
    }
    counter!("access_resolutions_total").increment(1);
    histogram!("access_resolution_groups").record(groups as f64);
}

/// Preview responses served instead of full content.
pub fn track_fallback_served(content_type: &str, source: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!(
        "fallback_responses_total",
        "content_type" => content_type.to_string(),
        "source" => source.to_string()
    )
    .increment(1);
}

pub fn track_free_pool_rebuilt(total_copied: i64, failed_sections: usize) {
    if !is_observability_enabled() {
        return;
    }
    counter!("free_pool_rebuilds_total").increment(1);
    gauge!("free_pool_groups").set(total_copied as f64);
    counter!("free_pool_section_failures_total").increment(failed_sections as u64);
}

pub fn track_codes_generated(count: i64) {
    if !is_observability_enabled() {
        return;
    }
    counter!("codes_generated_total").increment(count.max(0) as u64);
}

pub fn track_rate_limited(route: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("rate_limited_requests_total", "route" => route.to_string()).increment(1);
}
