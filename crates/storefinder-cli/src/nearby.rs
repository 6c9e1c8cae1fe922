//! One-shot nearest-store lookup from the terminal.

use storefinder_core::{format_distance, AppConfig, RouteSource};
use storefinder_finder::NearbyStores;

/// Run the full lookup for `postal_code` against the configured catalog
/// and providers, then print the ranked stores.
///
/// # Errors
///
/// Returns an error if the finder cannot be built or the lookup fails
/// (malformed or unknown postal code, provider outage, no store).
pub(crate) async fn run_nearby(
    config: &AppConfig,
    postal_code: &str,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = storefinder_finder::catalog_from_config(config).await?;
    let finder = storefinder_finder::build_finder(config, catalog)?;
    let found = finder.find_nearby_stores(postal_code).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
    } else {
        print!("{}", render(&found));
    }
    Ok(())
}

fn render(found: &NearbyStores) -> String {
    let mut out = format!(
        "{} ({}, {}) tier={}\n",
        found.postal_code, found.address.city, found.address.state, found.tier
    );
    out.push_str(&format!(
        "{:<4}{:<6}{:<28}{:>10}  {:<8}OPTIONS\n",
        "#", "TYPE", "STORE", "DISTANCE", "ROUTE"
    ));

    for (rank, candidate) in found.candidates.iter().enumerate() {
        let route = match candidate.route.source {
            RouteSource::Directions => "driving",
            RouteSource::GreatCircle => "direct",
        };
        let options = if candidate.options.is_empty() {
            "-".to_string()
        } else {
            candidate
                .options
                .iter()
                .map(|o| format!("{} R$ {} ({})", o.label, o.price, o.delivery))
                .collect::<Vec<_>>()
                .join("; ")
        };
        out.push_str(&format!(
            "{:<4}{:<6}{:<28}{:>10}  {:<8}{}\n",
            rank + 1,
            candidate.store.store_type.as_code(),
            candidate.store.name,
            format_distance(candidate.route.distance_meters),
            route,
            options
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use storefinder_core::{
        Address, Coordinates, DeliveryEstimate, PostalCode, RouteResult, ShippingOption, Store,
        StoreAddress, StoreCandidate, StoreType,
    };
    use storefinder_finder::Tier;

    use super::*;

    fn found() -> NearbyStores {
        let postal_code = PostalCode::parse("55700000").unwrap();
        NearbyStores {
            address: Address {
                street: String::new(),
                district: "Centro".to_string(),
                city: "Limoeiro".to_string(),
                state: "PE".to_string(),
                postal_code: postal_code.clone(),
            },
            postal_code,
            origin: Coordinates {
                latitude: -7.87,
                longitude: -35.45,
            },
            tier: Tier::DropoffPoints,
            candidates: vec![StoreCandidate {
                store: Store {
                    id: 3,
                    code: "limoeiro".to_string(),
                    name: "PDV Limoeiro".to_string(),
                    store_type: StoreType::DropoffPoint,
                    address: StoreAddress {
                        street: "PE-050".to_string(),
                        number: None,
                        district: "Centro".to_string(),
                        city: "Limoeiro".to_string(),
                        state: "PE".to_string(),
                        country: "Brasil".to_string(),
                        postal_code: "55700000".to_string(),
                    },
                    location: Coordinates {
                        latitude: -7.8983,
                        longitude: -35.4281,
                    },
                    phone: None,
                    email: None,
                    takeout_in_store: true,
                    shipping_time_days: 1,
                    is_active: true,
                },
                route: RouteResult {
                    distance_meters: 4_210,
                    duration_seconds: 420,
                    source: RouteSource::GreatCircle,
                },
                options: vec![ShippingOption {
                    service_code: "PDV001".to_string(),
                    label: "Entrega PDV".to_string(),
                    carrier: None,
                    price: Decimal::new(1500, 2),
                    delivery: DeliveryEstimate::Days { days: 1 },
                }],
            }],
        }
    }

    #[test]
    fn render_lists_ranked_stores() {
        let text = render(&found());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("55700-000 (Limoeiro, PE) tier=dropoff_points"));
        assert!(lines[2].contains("PDV Limoeiro"));
        assert!(lines[2].contains("4.2km"));
        assert!(lines[2].contains("direct"));
        assert!(lines[2].contains("Entrega PDV R$ 15.00 (1 business day)"));
    }

    #[test]
    fn render_marks_stores_without_options() {
        let mut found = found();
        found.candidates[0].options.clear();
        let text = render(&found);
        assert!(text.lines().nth(2).unwrap().trim_end().ends_with('-'));
    }
}
