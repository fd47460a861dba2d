//! Built-in endpoints: health probes and the messaging checkout handoff

use std::collections::HashMap;

use hyper::StatusCode;
use serde_json::json;
use url::form_urlencoded;

use crate::config::AppState;
use crate::handler::classify::Endpoint;
use crate::handler::router::RequestContext;
use crate::http::{self, HttpResponse};
use crate::logger;

pub async fn serve_endpoint(
    ctx: &RequestContext<'_>,
    endpoint: Endpoint,
    state: &AppState,
) -> HttpResponse {
    match endpoint {
        Endpoint::Liveness => {
            http::build_json_response(StatusCode::OK, &json!({ "status": "ok" }), &state.policy.cors)
        }
        Endpoint::Readiness => readiness(state).await,
        Endpoint::MessagingHandoff => messaging_handoff(ctx, state),
    }
}

/// Ready once the root document can be served
async fn readiness(state: &AppState) -> HttpResponse {
    let cors = &state.policy.cors;
    let reason = match state.storage.fetch(&state.policy.root_document).await {
        Ok(Some(_)) => {
            return http::build_json_response(StatusCode::OK, &json!({ "status": "ready" }), cors);
        }
        Ok(None) => "root document missing",
        Err(e) => {
            logger::log_warning(&format!("Readiness check failed: {e}"));
            "storage unavailable"
        }
    };
    http::build_json_response(
        StatusCode::SERVICE_UNAVAILABLE,
        &json!({ "status": "unavailable", "reason": reason }),
        cors,
    )
}

fn messaging_handoff(ctx: &RequestContext<'_>, state: &AppState) -> HttpResponse {
    let cors = &state.policy.cors;
    let Some(handoff) = &state.handoff else {
        return http::build_404_response(cors);
    };

    let params: HashMap<String, String> =
        form_urlencoded::parse(ctx.query.unwrap_or_default().as_bytes())
            .into_owned()
            .collect();
    let param = |name: &str| params.get(name).map(String::as_str);

    match handoff.start(param("service"), param("amount"), param("reference")) {
        Ok(started) => {
            logger::log_info(&format!(
                "Messaging handoff {} for {} left pending",
                started.payment_id,
                started.amount.as_str()
            ));
            http::build_json_response(StatusCode::OK, &started, cors)
        }
        Err(e) => http::build_json_response(
            StatusCode::BAD_REQUEST,
            &json!({ "error": e.to_string() }),
            cors,
        ),
    }
}
