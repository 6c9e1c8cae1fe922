//! Live integration tests for storefinder-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated database from the sqlx test
//! harness. They need a PostGIS-enabled server in `DATABASE_URL` and are
//! ignored by default: run with `cargo test -p storefinder-db -- --ignored`.

use storefinder_core::{parse_catalog, Coordinates, StoreEntry, StoreType};
use storefinder_db::{
    count_active_stores, find_nearest_store, get_store_by_code, list_nearby_stores, upsert_stores,
};

const CATALOG: &str = r"
stores:
  - code: sp-centro
    name: Loja São Paulo Centro
    type: LOJA
    postal_code: 01310-100
    street: Avenida Paulista
    number: '1000'
    district: Bela Vista
    city: São Paulo
    state: SP
    latitude: -23.5505
    longitude: -46.6333
  - code: sp-pdv-paulista
    name: Ponto Paulista
    type: PDV
    postal_code: 01311-000
    street: Avenida Paulista
    number: '2000'
    district: Bela Vista
    city: São Paulo
    state: SP
    latitude: -23.5614
    longitude: -46.6559
  - code: recife
    name: Loja Recife
    type: LOJA
    postal_code: 50870-005
    street: Avenida José Rufino
    number: '1407'
    district: Areias
    city: Recife
    state: PE
    latitude: -8.0913
    longitude: -34.9355
  - code: closed
    name: Loja Fechada
    type: PDV
    postal_code: 01310-200
    street: Rua Augusta
    district: Consolação
    city: São Paulo
    state: SP
    latitude: -23.5510
    longitude: -46.6340
    active: false
";

const PAULISTA: Coordinates = Coordinates {
    latitude: -23.5614,
    longitude: -46.6559,
};

fn entries() -> Vec<StoreEntry> {
    parse_catalog(CATALOG).expect("valid catalog").stores
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostGIS database in DATABASE_URL"]
async fn upsert_is_idempotent_by_code(pool: sqlx::PgPool) {
    let (inserted, updated) = upsert_stores(&pool, &entries()).await.unwrap();
    assert_eq!((inserted, updated), (4, 0));

    let (inserted, updated) = upsert_stores(&pool, &entries()).await.unwrap();
    assert_eq!((inserted, updated), (0, 4));

    assert_eq!(count_active_stores(&pool).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostGIS database in DATABASE_URL"]
async fn stored_coordinates_round_trip(pool: sqlx::PgPool) {
    upsert_stores(&pool, &entries()).await.unwrap();

    let store = get_store_by_code(&pool, "recife")
        .await
        .unwrap()
        .expect("recife exists");
    assert_eq!(store.store_type, StoreType::FullStore);
    assert_eq!(store.address.postal_code, "50870005");
    assert!((store.location.latitude - -8.0913).abs() < 1e-6);
    assert!((store.location.longitude - -34.9355).abs() < 1e-6);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostGIS database in DATABASE_URL"]
async fn nearby_filters_type_radius_and_inactive(pool: sqlx::PgPool) {
    upsert_stores(&pool, &entries()).await.unwrap();

    let dropoffs = list_nearby_stores(&pool, PAULISTA, StoreType::DropoffPoint, 50_000.0)
        .await
        .unwrap();
    let codes: Vec<&str> = dropoffs.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["sp-pdv-paulista"]);

    let full = list_nearby_stores(&pool, PAULISTA, StoreType::FullStore, 50_000.0)
        .await
        .unwrap();
    let codes: Vec<&str> = full.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["sp-centro"]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostGIS database in DATABASE_URL"]
async fn nearest_store_ignores_radius(pool: sqlx::PgPool) {
    upsert_stores(&pool, &entries()).await.unwrap();

    let olinda = Coordinates {
        latitude: -8.0089,
        longitude: -34.8553,
    };
    let nearest = find_nearest_store(&pool, olinda)
        .await
        .unwrap()
        .expect("catalog is not empty");
    assert_eq!(nearest.code, "recife");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostGIS database in DATABASE_URL"]
async fn nearest_store_on_empty_table_is_none(pool: sqlx::PgPool) {
    assert!(find_nearest_store(&pool, PAULISTA).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostGIS database in DATABASE_URL"]
async fn health_check_reports_postgis_version(pool: sqlx::PgPool) {
    let version = storefinder_db::health_check(&pool).await.unwrap();
    assert!(version.starts_with('3'), "unexpected PostGIS version {version}");
}
