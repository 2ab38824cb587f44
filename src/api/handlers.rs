//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{CalculateRequest, CashflowQuery, CashflowRecord, ErrorResponse};
use crate::quote::{Quote, calculate_with_fallback};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn no_quote() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "no quote has been computed".to_string(),
            kind: None,
        }),
    )
}

/// Returns the startup quote.
///
/// `GET /quote` → 200 + `Quote` JSON, or 404 when none was computed
pub async fn get_quote(State(state): State<Arc<AppState>>) -> Result<Json<Quote>, ApiError> {
    state.quote.clone().map(Json).ok_or_else(no_quote)
}

/// Returns yearly cash-flow records, optionally filtered by year range.
///
/// `GET /cashflow` → 200 + `Vec<CashflowRecord>` JSON
/// `GET /cashflow?from=N&to=M` → filtered range (inclusive)
/// `GET /cashflow?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_cashflow(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CashflowQuery>,
) -> Result<Json<Vec<CashflowRecord>>, ApiError> {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(u32::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
                kind: None,
            }),
        ));
    }

    let quote = state.quote.as_ref().ok_or_else(no_quote)?;
    let records: Vec<CashflowRecord> = quote
        .projection
        .years_between(from, to)
        .map(CashflowRecord::from)
        .collect();

    Ok(Json(records))
}

/// Computes a quote for the posted outline.
///
/// Locations outside every irradiance class are quoted with the configured
/// default class.
///
/// `POST /calculate` → 200 + `Quote` JSON, or 422 + `ErrorResponse` with the
/// calculator error `kind`
pub async fn post_calculate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<Quote>, ApiError> {
    let costs = req.costs.unwrap_or_else(|| state.config.costs.clone());
    calculate_with_fallback(&req.outline, req.site.as_ref(), &costs, &state.config)
        .map(Json)
        .map_err(|e| {
            tracing::debug!(kind = e.kind(), error = %e, "calculation rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: e.to_string(),
                    kind: Some(e.kind().to_string()),
                }),
            )
        })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::CalculatorConfig;
    use crate::geometry::{GeoPoint, LocalFrame, RoofPolygon};

    fn outline() -> RoofPolygon {
        let f = LocalFrame::new(GeoPoint::new(47.37, 8.54));
        RoofPolygon::new(vec![
            f.unproject(0.0, 0.0),
            f.unproject(12.0, 0.0),
            f.unproject(12.0, 6.0),
            f.unproject(0.0, 6.0),
        ])
    }

    fn make_test_state(with_quote: bool) -> Arc<AppState> {
        let config = CalculatorConfig::baseline();
        let quote = with_quote.then(|| calculate_with_fallback(&outline(), None, &config.costs, &config).unwrap());
        Arc::new(AppState { config, quote })
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn quote_returns_startup_quote() {
        let app = router(make_test_state(true));
        let req = Request::builder().uri("/quote").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["sizing"]["irradiance_class"], "central_europe");
    }

    #[tokio::test]
    async fn quote_missing_returns_404() {
        let app = router(make_test_state(false));
        let req = Request::builder().uri("/quote").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cashflow_range_query() {
        let app = router(make_test_state(true));
        let req = Request::builder()
            .uri("/cashflow?from=5&to=10")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 6); // years 5..=10
        assert_eq!(rows[0]["year"], 5);
        assert_eq!(rows[5]["year"], 10);
    }

    #[tokio::test]
    async fn cashflow_invalid_range_returns_400() {
        let app = router(make_test_state(true));
        let req = Request::builder()
            .uri("/cashflow?from=10&to=5")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await.get("error").is_some());
    }

    #[tokio::test]
    async fn calculate_falls_back_outside_known_regions() {
        let app = router(make_test_state(false));
        let f = LocalFrame::new(GeoPoint::new(-33.9, 18.4));
        let roof = RoofPolygon::new(vec![
            f.unproject(0.0, 0.0),
            f.unproject(10.0, 0.0),
            f.unproject(10.0, 6.0),
            f.unproject(0.0, 6.0),
        ]);
        let body = serde_json::to_vec(&CalculateRequest {
            outline: roof,
            site: None,
            costs: None,
        })
        .unwrap();
        let req = Request::builder()
            .method("POST")
            .uri("/calculate")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["sizing"]["irradiance_class"], "central_europe");
    }

    #[tokio::test]
    async fn calculate_reports_calc_errors_as_422() {
        let app = router(make_test_state(false));
        let two = RoofPolygon::new(outline().points()[..2].to_vec());
        let body = serde_json::to_vec(&CalculateRequest {
            outline: two,
            site: None,
            costs: None,
        })
        .unwrap();
        let req = Request::builder()
            .method("POST")
            .uri("/calculate")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(resp).await["kind"], "insufficient_vertices");
    }
}
