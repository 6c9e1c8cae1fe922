//! Integration tests for `ViaCepClient` using wiremock HTTP mocks.

use storefinder_core::PostalCode;
use storefinder_providers::{ProviderError, ViaCepClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ViaCepClient {
    ViaCepClient::with_base_url(base_url, 5, "storefinder-test")
        .expect("client construction should not fail")
}

fn cep(raw: &str) -> PostalCode {
    PostalCode::parse(raw).expect("valid postal code")
}

#[tokio::test]
async fn lookup_returns_structured_address() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "cep": "01310-100",
        "logradouro": "Avenida Paulista",
        "complemento": "de 612 a 1510 - lado par",
        "bairro": "Bela Vista",
        "localidade": "São Paulo",
        "uf": "SP",
        "ibge": "3550308",
        "ddd": "11"
    });

    Mock::given(method("GET"))
        .and(path("/ws/01310100/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/ws", server.uri()));
    let address = client
        .lookup(&cep("01310-100"))
        .await
        .expect("should parse address");

    assert_eq!(address.postal_code, "01310-100");
    assert_eq!(address.street, "Avenida Paulista");
    assert_eq!(address.district, "Bela Vista");
    assert_eq!(address.city, "São Paulo");
    assert_eq!(address.state, "SP");
}

#[tokio::test]
async fn lookup_maps_erro_flag_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/99999999/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"erro": true})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.lookup(&cep("99999-999")).await.unwrap_err();

    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}

#[tokio::test]
async fn lookup_maps_http_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.lookup(&cep("12345678")).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn lookup_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.lookup(&cep("01310100")).await.unwrap_err();

    assert!(
        matches!(err, ProviderError::UnexpectedStatus { status: 503, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn lookup_rejects_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.lookup(&cep("01310100")).await.unwrap_err();

    assert!(matches!(err, ProviderError::Deserialize { .. }));
}
