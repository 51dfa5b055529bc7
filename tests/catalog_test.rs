use serde_json::json;
use steamwatch::catalog::{CatalogClient, CatalogError, StoreApiClient};
use steamwatch::config::StoreConfig;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> StoreApiClient {
    let config = StoreConfig {
        base_url: format!("{}/api/", server.uri()),
        country_code: None,
        request_timeout_secs: 5,
    };
    StoreApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appdetails"))
        .and(query_param("appids", "123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "123": {
                "success": true,
                "data": {
                    "type": "game",
                    "name": "Some Game",
                    "steam_appid": 123,
                    "packages": [77, "78"]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let details = client(&server).await.fetch_item("123", None).await.unwrap();

    assert_eq!(details.kind.as_deref(), Some("game"));
    assert_eq!(details.name.as_deref(), Some("Some Game"));
    assert_eq!(details.packages, vec!["77", "78"]);
}

#[tokio::test]
async fn test_fetch_package_with_country_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/packagedetails"))
        .and(query_param("packageids", "77"))
        .and(query_param("cc", "de"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "77": {
                "success": true,
                "data": {
                    "name": "Standard",
                    "price": { "currency": "EUR", "initial": 1999, "final": 1499, "discount_percent": 25 },
                    "platforms": { "windows": true, "mac": true, "linux": false },
                    "release_date": { "coming_soon": false, "date": "30 May, 2014" }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let details = client(&server)
        .await
        .fetch_package("77", Some("de"))
        .await
        .unwrap();

    let price = details.price.unwrap();
    assert_eq!(price.final_price, Some(1499));
    assert_eq!(price.discount_percent, Some(25));
    assert!(!details.platforms.unwrap().linux);
    assert_eq!(
        details.release_date.unwrap().date.as_deref(),
        Some("30 May, 2014")
    );
}

#[tokio::test]
async fn test_unsuccessful_lookup_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/packagedetails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "1": { "success": false }
        })))
        .mount(&server)
        .await;

    let err = client(&server).await.fetch_package("1", None).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(ref id) if id == "1"));
}

#[tokio::test]
async fn test_null_body_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appdetails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let err = client(&server).await.fetch_item("5", None).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn test_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appdetails"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client(&server).await.fetch_item("5", None).await.unwrap_err();
    assert!(matches!(err, CatalogError::Status(429)));
}

#[tokio::test]
async fn test_invalid_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appdetails"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server).await.fetch_item("5", None).await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidResponse(_)));
}
