mod stores;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use storefinder_core::FinderError;
use storefinder_finder::NearestStoreFinder;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<NearestStoreFinder>,
    /// Present when the catalog lives in Postgres.
    pub pool: Option<PgPool>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    catalog: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    postgis: Option<String>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "external_service_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_finder_error(request_id: String, error: &FinderError) -> ApiError {
    match error {
        FinderError::ExternalService { service, .. } => {
            tracing::error!(
                request_id = %request_id,
                error = %error,
                "nearby lookup failed upstream"
            );
            ApiError::new(
                request_id,
                error.code(),
                format!("{service} service unavailable"),
            )
        }
        FinderError::Validation(_) | FinderError::NotFound(_) => {
            tracing::debug!(request_id = %request_id, error = %error, "nearby lookup rejected");
            ApiError::new(request_id, error.code(), error.to_string())
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/stores/nearby/{postal_code}",
            get(stores::find_nearby_stores),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    let Some(pool) = state.pool.as_ref() else {
        return (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    catalog: "in_memory",
                    postgis: None,
                },
                meta,
            }),
        );
    };

    match storefinder_db::health_check(pool).await {
        Ok(version) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    catalog: "postgres",
                    postgis: Some(version),
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        catalog: "unavailable",
                        postgis: None,
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use storefinder_core::{
        Address, Coordinates, FinderSettings, PackageProfile, PostalCode, Store, StoreAddress,
        StoreType,
    };
    use storefinder_finder::{
        AddressLookup, DirectionsProvider, FinderPorts, GeocodingProvider, InMemoryCatalog,
        ShippingRateProvider,
    };
    use storefinder_providers::{CarrierQuote, DrivingRoute, ProviderError};
    use tower::ServiceExt;

    const PAULISTA: Coordinates = Coordinates {
        latitude: -23.5613,
        longitude: -46.6565,
    };

    struct Addresses;

    #[async_trait]
    impl AddressLookup for Addresses {
        async fn lookup(&self, postal_code: &PostalCode) -> Result<Address, ProviderError> {
            if postal_code.as_str() == "99999999" {
                return Err(ProviderError::NotFound {
                    service: "viacep",
                    resource: postal_code.to_string(),
                });
            }
            if postal_code.as_str() == "00000001" {
                return Err(ProviderError::UnexpectedStatus {
                    status: 500,
                    path: "/ws/01310100/json/".to_string(),
                });
            }
            Ok(Address {
                street: "Avenida Paulista".to_string(),
                district: "Bela Vista".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                postal_code: postal_code.clone(),
            })
        }
    }

    struct FixedPoint;

    #[async_trait]
    impl GeocodingProvider for FixedPoint {
        async fn geocode(&self, _address: &str) -> Result<Coordinates, ProviderError> {
            Ok(PAULISTA)
        }
    }

    struct NoDirections;

    #[async_trait]
    impl DirectionsProvider for NoDirections {
        async fn driving_route(
            &self,
            _origin: Coordinates,
            _destination: Coordinates,
        ) -> Result<DrivingRoute, ProviderError> {
            Err(ProviderError::NoResults {
                service: "google directions",
                query: "test".to_string(),
            })
        }
    }

    struct NoQuotes;

    #[async_trait]
    impl ShippingRateProvider for NoQuotes {
        async fn quote(
            &self,
            _from: &PostalCode,
            _to: &PostalCode,
            _package: &PackageProfile,
            _services: &[String],
        ) -> Result<Vec<CarrierQuote>, ProviderError> {
            Ok(Vec::new())
        }
    }

    fn dropoff_point() -> Store {
        Store {
            id: 1,
            code: "pdv-paulista".to_string(),
            name: "PDV Paulista".to_string(),
            store_type: StoreType::DropoffPoint,
            address: StoreAddress {
                street: "Avenida Paulista".to_string(),
                number: Some("1000".to_string()),
                district: "Bela Vista".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                country: "Brasil".to_string(),
                postal_code: "01310100".to_string(),
            },
            location: Coordinates {
                latitude: -23.5650,
                longitude: -46.6520,
            },
            phone: None,
            email: None,
            takeout_in_store: true,
            shipping_time_days: 1,
            is_active: true,
        }
    }

    fn test_app(stores: Vec<Store>) -> Router {
        let ports = FinderPorts {
            address: Arc::new(Addresses),
            geocoding: Arc::new(FixedPoint),
            catalog: Arc::new(InMemoryCatalog::new(stores)),
            directions: Arc::new(NoDirections),
            shipping: Arc::new(NoQuotes),
        };
        let finder = NearestStoreFinder::new(ports, FinderSettings::default());
        build_app(AppState {
            finder: Arc::new(finder),
            pool: None,
        })
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&body).expect("json parse"))
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("validation_error", StatusCode::BAD_REQUEST),
            ("not_found", StatusCode::NOT_FOUND),
            ("external_service_error", StatusCode::BAD_GATEWAY),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "message").into_response();
            assert_eq!(response.status(), status, "code {code}");
        }
    }

    #[tokio::test]
    async fn nearby_returns_ranked_stores() {
        let (status, json) = get(
            test_app(vec![dropoff_point()]),
            "/api/v1/stores/nearby/01310-100",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["postal_code"], "01310-100");
        assert_eq!(json["data"]["tier"], "dropoff_points");
        let store = &json["data"]["stores"][0];
        assert_eq!(store["code"], "pdv-paulista");
        assert_eq!(store["store_type"], "PDV");
        assert_eq!(store["route_source"], "great_circle");
        assert_eq!(store["shipping_options"][0]["service_code"], "PDV001");
        assert_eq!(store["shipping_options"][0]["price"], "15.00");
        assert_eq!(store["shipping_options"][0]["delivery"], "1 business day");
        assert!(json["meta"]["request_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn nearby_rejects_malformed_postal_code() {
        let (status, json) = get(test_app(vec![dropoff_point()]), "/api/v1/stores/nearby/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn nearby_unknown_postal_code_is_not_found() {
        let (status, json) = get(
            test_app(vec![dropoff_point()]),
            "/api/v1/stores/nearby/99999-999",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn nearby_empty_catalog_is_not_found() {
        let (status, _) = get(test_app(Vec::new()), "/api/v1/stores/nearby/01310100").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn nearby_address_outage_is_bad_gateway() {
        let (status, json) = get(
            test_app(vec![dropoff_point()]),
            "/api/v1/stores/nearby/00000-001",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "external_service_error");
        assert_eq!(json["error"]["message"], "address lookup service unavailable");
    }

    #[test]
    fn upstream_error_message_hides_provider_details() {
        let error = FinderError::ExternalService {
            service: "geocoding",
            message: "unexpected HTTP status 500 from /geocode/json?key=secret-key".to_string(),
        };
        let api_error = map_finder_error("req-1".to_string(), &error);
        assert_eq!(api_error.error.code, "external_service_error");
        assert_eq!(api_error.error.message, "geocoding service unavailable");
        assert!(!api_error.error.message.contains("secret-key"));
    }

    #[tokio::test]
    async fn health_without_database_reports_in_memory_catalog() {
        let (status, json) = get(test_app(Vec::new()), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["catalog"], "in_memory");
        assert!(json["data"].get("postgis").is_none());
    }

    #[tokio::test]
    async fn request_id_header_is_echoed() {
        let response = test_app(Vec::new())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["meta"]["request_id"], "req-abc");
    }
}
