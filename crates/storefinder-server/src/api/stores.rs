use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use storefinder_core::{format_distance, Coordinates, RouteSource, ShippingOption, StoreCandidate};
use storefinder_finder::{NearbyStores, Tier};

use crate::middleware::RequestId;

use super::{map_finder_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct NearbyStoresData {
    pub postal_code: String,
    pub city: String,
    pub state: String,
    pub origin: Coordinates,
    pub tier: Tier,
    pub stores: Vec<NearbyStoreItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct NearbyStoreItem {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub store_type: &'static str,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub takeout_in_store: bool,
    pub distance_meters: u64,
    pub distance: String,
    pub duration_seconds: u64,
    pub route_source: RouteSource,
    pub shipping_options: Vec<ShippingOptionItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct ShippingOptionItem {
    pub service_code: String,
    pub label: String,
    pub carrier: Option<String>,
    pub price: Decimal,
    pub delivery: String,
}

impl From<ShippingOption> for ShippingOptionItem {
    fn from(option: ShippingOption) -> Self {
        Self {
            delivery: option.delivery.to_string(),
            service_code: option.service_code,
            label: option.label,
            carrier: option.carrier,
            price: option.price,
        }
    }
}

impl From<StoreCandidate> for NearbyStoreItem {
    fn from(candidate: StoreCandidate) -> Self {
        let StoreCandidate {
            store,
            route,
            options,
        } = candidate;
        Self {
            id: store.id,
            code: store.code,
            name: store.name,
            store_type: store.store_type.as_code(),
            city: store.address.city,
            state: store.address.state,
            postal_code: store.address.postal_code,
            latitude: store.location.latitude,
            longitude: store.location.longitude,
            phone: store.phone,
            takeout_in_store: store.takeout_in_store,
            distance_meters: route.distance_meters,
            distance: format_distance(route.distance_meters),
            duration_seconds: route.duration_seconds,
            route_source: route.source,
            shipping_options: options.into_iter().map(ShippingOptionItem::from).collect(),
        }
    }
}

impl From<NearbyStores> for NearbyStoresData {
    fn from(found: NearbyStores) -> Self {
        Self {
            postal_code: found.postal_code.formatted(),
            city: found.address.city,
            state: found.address.state,
            origin: found.origin,
            tier: found.tier,
            stores: found
                .candidates
                .into_iter()
                .map(NearbyStoreItem::from)
                .collect(),
        }
    }
}

pub(super) async fn find_nearby_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(postal_code): Path<String>,
) -> Result<Json<ApiResponse<NearbyStoresData>>, ApiError> {
    let found = state
        .finder
        .find_nearby_stores(&postal_code)
        .await
        .map_err(|e| map_finder_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: NearbyStoresData::from(found),
        meta: ResponseMeta::new(req_id.0),
    }))
}
