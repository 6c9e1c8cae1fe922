use super::*;

const VALID: &str = r#"
stores:
  - code: sp-centro
    name: Loja Centro São Paulo
    type: LOJA
    postal_code: "01310-100"
    street: Avenida Paulista
    number: "1000"
    district: Bela Vista
    city: São Paulo
    state: SP
    latitude: -23.5505
    longitude: -46.6333
    phone: "(11) 4321-1234"
  - code: limoeiro
    name: Loja Limoeiro I
    type: PDV
    postal_code: "55700000"
    street: PE-050
    district: Centro
    city: Limoeiro
    state: PE
    latitude: -7.8983
    longitude: -35.4281
    active: false
"#;

fn catalog_with(entry_overrides: &str) -> String {
    format!(
        r#"
stores:
  - code: a
    name: Store A
    type: LOJA
    postal_code: "01310-100"
    street: Rua A
    district: Centro
    city: São Paulo
    state: SP
    latitude: -23.5
    longitude: -46.6
{entry_overrides}
"#
    )
}

#[test]
fn parses_entries_with_defaults() {
    let catalog = parse_catalog(VALID).expect("valid catalog");
    assert_eq!(catalog.stores.len(), 2);

    let sp = &catalog.stores[0];
    assert_eq!(sp.store_type, StoreType::FullStore);
    assert_eq!(sp.country, "Brasil");
    assert!(sp.takeout_in_store);
    assert_eq!(sp.shipping_time_days, 1);
    assert!(sp.active);

    let limoeiro = &catalog.stores[1];
    assert_eq!(limoeiro.store_type, StoreType::DropoffPoint);
    assert!(limoeiro.number.is_none());
    assert!(!limoeiro.active);
}

#[test]
fn to_stores_assigns_ids_in_file_order() {
    let stores = parse_catalog(VALID).unwrap().to_stores();
    assert_eq!(stores[0].id, 1);
    assert_eq!(stores[0].code, "sp-centro");
    assert_eq!(stores[1].id, 2);
    assert!(!stores[1].is_active);
    assert!((stores[1].location.longitude - (-35.4281)).abs() < f64::EPSILON);
}

#[test]
fn rejects_duplicate_codes() {
    let yaml = catalog_with(
        r#"  - code: A
    name: Store B
    type: PDV
    postal_code: "01310-100"
    street: Rua B
    district: Centro
    city: São Paulo
    state: SP
    latitude: -23.5
    longitude: -46.6"#,
    );
    let err = parse_catalog(&yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate store code")),
        "got {err:?}"
    );
}

#[test]
fn rejects_invalid_postal_code() {
    let yaml = catalog_with(
        r#"  - code: b
    name: Store B
    type: PDV
    postal_code: "1234"
    street: Rua B
    district: Centro
    city: São Paulo
    state: SP
    latitude: -23.5
    longitude: -46.6"#,
    );
    let err = parse_catalog(&yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("invalid postal code")),
        "got {err:?}"
    );
}

#[test]
fn rejects_out_of_range_coordinates() {
    let yaml = catalog_with(
        r#"  - code: b
    name: Store B
    type: PDV
    postal_code: "01310-100"
    street: Rua B
    district: Centro
    city: São Paulo
    state: SP
    latitude: -23.5
    longitude: -246.6"#,
    );
    let err = parse_catalog(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
}

#[test]
fn rejects_unknown_store_type() {
    let yaml = VALID.replace("type: PDV", "type: KIOSK");
    let err = parse_catalog(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::CatalogFileParse(_)), "got {err:?}");
}

#[test]
fn load_catalog_reports_missing_file() {
    let err = load_catalog(Path::new("/nonexistent/stores.yaml")).unwrap_err();
    assert!(
        matches!(err, ConfigError::CatalogFileIo { ref path, .. } if path == "/nonexistent/stores.yaml"),
        "got {err:?}"
    );
}

#[test]
fn bundled_catalog_is_valid() {
    let catalog = parse_catalog(include_str!("../../../config/stores.yaml")).unwrap();
    let stores = catalog.to_stores();
    assert_eq!(stores.len(), 4);
    assert!(stores
        .iter()
        .any(|s| s.code == "limoeiro" && s.store_type == StoreType::DropoffPoint));
}
