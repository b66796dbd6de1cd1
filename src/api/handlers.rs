//! Route handlers - thin wrappers over the catalog and loan modules

use crate::api::{ApiError, AppState};
use crate::catalog::{ComparisonSet, FilterForm, LocationType, PriceRange, PropertyRecord, Toggle};
use crate::loan::{self, LoanInput, LoanResult, YearlyBreakdown};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Serialize, Deserialize)]
pub struct ApiResponse {
    message: String,
    status: String,
}

#[derive(Serialize)]
pub struct PropertyList {
    count: usize,
    properties: Vec<PropertyRecord>,
}

impl PropertyList {
    fn from_refs(records: Vec<&PropertyRecord>) -> Self {
        Self {
            count: records.len(),
            properties: records.into_iter().cloned().collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    locations: Vec<String>,
    markets: Vec<LocationType>,
    price_range: PriceRange,
}

#[derive(Deserialize)]
pub struct SimilarParams {
    limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SessionCreated {
    session: Uuid,
}

#[derive(Serialize)]
pub struct ComparisonView {
    session: Uuid,
    ids: Vec<String>,
    properties: Vec<PropertyRecord>,
}

#[derive(Serialize)]
pub struct ComparisonUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<Toggle>,
    ids: Vec<String>,
}

impl ComparisonUpdate {
    fn new(action: Option<Toggle>, set: &ComparisonSet) -> Self {
        Self {
            action,
            ids: set.ids().to_vec(),
        }
    }
}

pub async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "Realty catalog API is running!".to_string(),
        status: "ok".to_string(),
    })
}

pub async fn list_properties(
    State(state): State<AppState>,
    Query(form): Query<FilterForm>,
) -> Json<PropertyList> {
    let spec = form.to_spec();
    let results = state.catalog.query(&spec);
    debug!("GET /api/properties -> {} results", results.len());
    Json(PropertyList::from_refs(results))
}

pub async fn featured_properties(State(state): State<AppState>) -> Json<PropertyList> {
    Json(PropertyList::from_refs(state.catalog.featured()))
}

pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PropertyRecord>, ApiError> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::PropertyNotFound(id))
}

pub async fn similar_properties(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SimilarParams>,
) -> Result<Json<PropertyList>, ApiError> {
    if !state.catalog.contains(&id) {
        return Err(ApiError::PropertyNotFound(id));
    }

    let limit = params.limit.unwrap_or(state.similar_limit);
    Ok(Json(PropertyList::from_refs(state.catalog.similar(&id, limit))))
}

pub async fn filter_options(State(state): State<AppState>) -> Json<FilterOptions> {
    let catalog = &state.catalog;
    Json(FilterOptions {
        locations: catalog.locations().into_iter().map(str::to_string).collect(),
        markets: LocationType::ALL
            .into_iter()
            .filter(|m| !catalog.by_market(*m).is_empty())
            .collect(),
        price_range: catalog.price_bounds(),
    })
}

pub async fn estimate_loan(Json(input): Json<LoanInput>) -> Result<Json<LoanResult>, ApiError> {
    Ok(Json(loan::estimate(&input)?))
}

pub async fn loan_schedule(
    Json(input): Json<LoanInput>,
) -> Result<Json<Vec<YearlyBreakdown>>, ApiError> {
    Ok(Json(loan::amortization_schedule(&input)?))
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session = state.sessions.write().await.create();

    info!("Created comparison session {}", session);

    (StatusCode::CREATED, Json(SessionCreated { session }))
}

pub async fn end_session(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.sessions.write().await.remove(&session) {
        return Err(ApiError::SessionNotFound(session));
    }

    info!("Ended comparison session {}", session);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_comparison(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<Json<ComparisonView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let set = sessions
        .get_mut(&session)
        .ok_or(ApiError::SessionNotFound(session))?;

    let properties = set.resolve(&state.catalog).into_iter().cloned().collect();

    Ok(Json(ComparisonView {
        session,
        ids: set.ids().to_vec(),
        properties,
    }))
}

pub async fn toggle_comparison(
    State(state): State<AppState>,
    Path((session, id)): Path<(Uuid, String)>,
) -> Result<Json<ComparisonUpdate>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let set = sessions
        .get_mut(&session)
        .ok_or(ApiError::SessionNotFound(session))?;

    // Removing a delisted id is still allowed
    if !set.contains(&id) && !state.catalog.contains(&id) {
        return Err(ApiError::PropertyNotFound(id));
    }

    let action = set.toggle(&id)?;
    debug!("Session {} {:?} {}", session, action, id);

    Ok(Json(ComparisonUpdate::new(Some(action), set)))
}

pub async fn remove_from_comparison(
    State(state): State<AppState>,
    Path((session, id)): Path<(Uuid, String)>,
) -> Result<Json<ComparisonUpdate>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let set = sessions
        .get_mut(&session)
        .ok_or(ApiError::SessionNotFound(session))?;

    let action = set.remove(&id).then_some(Toggle::Removed);

    Ok(Json(ComparisonUpdate::new(action, set)))
}

pub async fn clear_comparison(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<Json<ComparisonUpdate>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let set = sessions
        .get_mut(&session)
        .ok_or(ApiError::SessionNotFound(session))?;

    set.clear();

    Ok(Json(ComparisonUpdate::new(None, set)))
}

#[cfg(test)]
mod tests {
    use crate::api::sessions::SessionStore;
    use crate::api::{router, AppState};
    use crate::catalog::fixtures::sample_records;
    use crate::catalog::Catalog;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> Router {
        let catalog = Catalog::new(sample_records()).unwrap();
        router(AppState::new(catalog, 3))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = send(&app(), Method::GET, "/api/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_properties_with_filters() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/properties?market=dubai&sortBy=price-asc&bedrooms=any",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        let ids: Vec<&str> = body["properties"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["7", "5", "6"]);
    }

    #[tokio::test]
    async fn test_malformed_filters_are_ignored() {
        let (status, body) = send(
            &app(),
            Method::GET,
            "/api/properties?bedrooms=lots&minPrice=cheap&propertyType=all",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 8);
    }

    #[tokio::test]
    async fn test_property_detail_and_similar() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/api/properties/5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"], "Dubai Marina");

        let (status, _) = send(&app, Method::GET, "/api/properties/404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let uri = "/api/properties/1/similar?limit=1";
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["properties"][0]["type"], "luxury");
    }

    #[tokio::test]
    async fn test_featured_and_filter_options() {
        let app = app();

        let (_, body) = send(&app, Method::GET, "/api/properties/featured", None).await;
        assert_eq!(body["count"], 3);

        let (_, body) = send(&app, Method::GET, "/api/filters", None).await;
        assert_eq!(body["markets"], json!(["india", "dubai"]));
        assert_eq!(body["priceRange"]["min"], 45_000.0);
        assert_eq!(body["priceRange"]["max"], 18_000_000.0);
        assert!(body["locations"]
            .as_array()
            .unwrap()
            .contains(&json!("Shimla")));
    }

    #[tokio::test]
    async fn test_loan_estimate() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/loan/estimate",
            Some(json!({
                "propertyPrice": 5_000_000.0,
                "downPayment": 1_000_000.0,
                "loanTermYears": 20,
                "annualInterestRatePercent": 8.5
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loanAmount"], 4_000_000.0);
        assert!(body["monthlyPayment"].as_f64().unwrap() > 0.0);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/loan/estimate",
            Some(json!({
                "propertyPrice": 100.0,
                "downPayment": 200.0,
                "loanTermYears": 20,
                "annualInterestRatePercent": 8.5
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("exceeds"));
    }

    #[tokio::test]
    async fn test_loan_schedule() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/loan/schedule",
            Some(json!({
                "propertyPrice": 1_000_000.0,
                "downPayment": 200_000.0,
                "loanTermYears": 10,
                "annualInterestRatePercent": 0.0
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[9]["closingBalance"], 0.0);
    }

    #[tokio::test]
    async fn test_comparison_session_flow() {
        let app = app();

        let (status, body) = send(&app, Method::POST, "/api/compare", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let session = body["session"].as_str().unwrap().to_string();

        for id in ["1", "2", "3"] {
            let uri = format!("/api/compare/{}/{}", session, id);
            let (status, body) = send(&app, Method::POST, &uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["action"], "added");
        }

        // Fourth selection is refused with a notice
        let uri = format!("/api/compare/{}/4", session);
        let (status, body) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("up to 3"));

        // Toggling a member removes it
        let uri = format!("/api/compare/{}/2", session);
        let (_, body) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(body["action"], "removed");
        assert_eq!(body["ids"], json!(["1", "3"]));

        let uri = format!("/api/compare/{}", session);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["properties"].as_array().unwrap().len(), 2);

        let uri = format!("/api/compare/{}/9", session);
        let (_, body) = send(&app, Method::DELETE, &uri, None).await;
        assert!(body.get("action").is_none());
        assert_eq!(body["ids"], json!(["1", "3"]));

        let uri = format!("/api/compare/{}", session);
        let (_, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(body["ids"], json!([]));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let app = app();

        let (_, first) = send(&app, Method::POST, "/api/compare", None).await;
        let (_, second) = send(&app, Method::POST, "/api/compare", None).await;
        let first = first["session"].as_str().unwrap().to_string();
        let second = second["session"].as_str().unwrap().to_string();

        send(&app, Method::POST, &format!("/api/compare/{}/1", first), None).await;

        let (_, body) = send(&app, Method::GET, &format!("/api/compare/{}", second), None).await;
        assert_eq!(body["ids"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_session_and_property() {
        let app = app();

        let uri = format!("/api/compare/{}", uuid::Uuid::new_v4());
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, Method::POST, "/api/compare", None).await;
        let session = body["session"].as_str().unwrap().to_string();
        let uri = format!("/api/compare/{}/missing", session);
        let (status, _) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_end_session() {
        let app = app();

        let (_, body) = send(&app, Method::POST, "/api/compare", None).await;
        let session = body["session"].as_str().unwrap().to_string();

        let uri = format!("/api/sessions/{}", session);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let uri = format!("/api/compare/{}", session);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_cap_evicts_oldest() {
        let catalog = Catalog::new(sample_records()).unwrap();
        let state = AppState::new(catalog, 3)
            .with_sessions(SessionStore::new(Duration::from_secs(1800), 2));
        let app = router(state.clone());

        let mut ids = Vec::new();
        for _ in 0..3 {
            let (_, body) = send(&app, Method::POST, "/api/compare", None).await;
            ids.push(body["session"].as_str().unwrap().to_string());
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        assert_eq!(state.sessions.read().await.len(), 2);

        let uri = format!("/api/compare/{}", ids[0]);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        for id in &ids[1..] {
            let uri = format!("/api/compare/{}", id);
            let (status, _) = send(&app, Method::GET, &uri, None).await;
            assert_eq!(status, StatusCode::OK);
        }
    }
}
