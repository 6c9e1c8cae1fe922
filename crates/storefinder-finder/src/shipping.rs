//! Delivery options per candidate store.

use std::sync::Arc;

use storefinder_core::{
    DeliveryEstimate, FinderSettings, PostalCode, ShippingOption, Store, StoreType,
};
use storefinder_providers::CarrierQuote;

use crate::ports::ShippingRateProvider;

pub struct ShippingQuoteResolver {
    provider: Arc<dyn ShippingRateProvider>,
    settings: FinderSettings,
}

impl ShippingQuoteResolver {
    #[must_use]
    pub fn new(provider: Arc<dyn ShippingRateProvider>, settings: FinderSettings) -> Self {
        Self { provider, settings }
    }

    /// Options for delivering from `store` to `destination`.
    ///
    /// Drop-off points get the configured fixed-fee option without any
    /// external call. Full stores are quoted by the carrier provider and
    /// filtered to the allow-list. Provider failures yield no options.
    pub async fn quote(&self, store: &Store, destination: &PostalCode) -> Vec<ShippingOption> {
        match store.store_type {
            StoreType::DropoffPoint => vec![self.dropoff_option()],
            StoreType::FullStore => self.carrier_options(store, destination).await,
        }
    }

    fn dropoff_option(&self) -> ShippingOption {
        ShippingOption {
            service_code: self.settings.dropoff_service_code.clone(),
            label: self.settings.dropoff_label.clone(),
            carrier: None,
            price: self.settings.dropoff_fee,
            delivery: DeliveryEstimate::Days {
                days: self.settings.dropoff_delivery_days,
            },
        }
    }

    async fn carrier_options(&self, store: &Store, destination: &PostalCode) -> Vec<ShippingOption> {
        let origin = match PostalCode::parse(&store.address.postal_code) {
            Ok(origin) => origin,
            Err(e) => {
                tracing::warn!(store_id = store.id, error = %e, "store has no usable postal code");
                return Vec::new();
            }
        };

        let quotes = match self
            .provider
            .quote(
                &origin,
                destination,
                &self.settings.package,
                &self.settings.allowed_services,
            )
            .await
        {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!(store_id = store.id, error = %e, "shipping quote failed");
                return Vec::new();
            }
        };

        let options: Vec<ShippingOption> = quotes
            .into_iter()
            .filter(|q| self.settings.allowed_services.contains(&q.service_id))
            .map(|q| to_option(q, store.shipping_time_days))
            .collect();
        if options.is_empty() {
            tracing::debug!(store_id = store.id, "no allowed carrier service for store");
        }
        options
    }
}

fn to_option(quote: CarrierQuote, fallback_days: u32) -> ShippingOption {
    ShippingOption {
        delivery: delivery_estimate(&quote, fallback_days),
        service_code: quote.service_id,
        label: quote.name,
        carrier: quote.company,
        price: quote.price,
    }
}

/// A real range wins; otherwise the reported days, the range's upper bound,
/// or the store's own shipping time.
fn delivery_estimate(quote: &CarrierQuote, fallback_days: u32) -> DeliveryEstimate {
    match (quote.delivery_range, quote.delivery_days) {
        (Some((min_days, max_days)), _) if min_days < max_days => {
            DeliveryEstimate::Range { min_days, max_days }
        }
        (_, Some(days)) | (Some((_, days)), None) => DeliveryEstimate::Days { days },
        (None, None) => DeliveryEstimate::Days {
            days: fallback_days,
        },
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn quote(range: Option<(u32, u32)>, days: Option<u32>) -> CarrierQuote {
        CarrierQuote {
            service_id: "1".to_string(),
            name: "PAC".to_string(),
            company: Some("Correios".to_string()),
            price: Decimal::new(2247, 2),
            delivery_days: days,
            delivery_range: range,
        }
    }

    #[test]
    fn range_wins_over_days() {
        assert_eq!(
            delivery_estimate(&quote(Some((5, 7)), Some(7)), 1),
            DeliveryEstimate::Range {
                min_days: 5,
                max_days: 7
            }
        );
    }

    #[test]
    fn degenerate_range_collapses_to_days() {
        assert_eq!(
            delivery_estimate(&quote(Some((3, 3)), None), 1),
            DeliveryEstimate::Days { days: 3 }
        );
        assert_eq!(
            delivery_estimate(&quote(Some((3, 3)), Some(4)), 1),
            DeliveryEstimate::Days { days: 4 }
        );
    }

    #[test]
    fn missing_estimate_uses_store_shipping_time() {
        assert_eq!(
            delivery_estimate(&quote(None, None), 2),
            DeliveryEstimate::Days { days: 2 }
        );
    }

    #[test]
    fn to_option_keeps_carrier_details() {
        let option = to_option(quote(None, Some(6)), 1);
        assert_eq!(option.service_code, "1");
        assert_eq!(option.label, "PAC");
        assert_eq!(option.carrier.as_deref(), Some("Correios"));
        assert_eq!(option.price, Decimal::new(2247, 2));
    }
}
