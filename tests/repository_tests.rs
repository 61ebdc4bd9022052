//! Integration tests for the entity repository and global search.

use std::time::Duration;

use moysklad_api::model::{AttributeValue, AttributesExt, EntityAttribute};
use moysklad_api::rest::{Direction, Entity, QueryBuilder};
use moysklad_api::{
    AccessToken, BaseUrl, HttpError, MoySkladClient, MoySkladConfig, ResourceError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/api/remap/1.2";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<Vec<EntityAttribute>>,
}

impl Entity for Product {
    const NAME: &'static str = "Product";
    const PATH: &'static str = "entity/product";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

fn product(id: Option<&str>, name: &str) -> Product {
    Product {
        id: id.map(ToString::to_string),
        name: Some(name.to_string()),
        attributes: None,
    }
}

fn client_for(server: &MockServer) -> MoySkladClient {
    let config = MoySkladConfig::builder()
        .token(AccessToken::new("test-token").unwrap())
        .base_url(BaseUrl::new(format!("{}{API_PATH}", server.uri())).unwrap())
        .retry_delay(Duration::from_millis(10))
        .build()
        .unwrap();
    MoySkladClient::new(config).unwrap()
}

fn api(p: &str) -> String {
    format!("{API_PATH}/{p}")
}

#[tokio::test]
async fn test_find_all_sends_query_builder_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("entity/product")))
        .and(query_param("filter", "archived=false;name~bolt"))
        .and(query_param("order", "name,desc"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"size": 42, "limit": 10, "offset": 0},
            "rows": [{"id": "p1", "name": "Bolt M6"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let products = client.repository::<Product>();
    let query = products
        .query()
        .eq("archived", false)
        .like("name", "bolt")
        .order_by("name", Direction::Desc)
        .limit(10);

    let page = products
        .find_all(Some(&query), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(page.total_size(), 42);
    assert_eq!(page.rows()[0], product(Some("p1"), "Bolt M6"));
}

#[tokio::test]
async fn test_find_by_id_and_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("entity/product/p1")))
        .and(query_param("expand", "supplier,images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p1", "name": "Bolt"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("entity/product/missing")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": [{"error": "not found"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let products = client.repository::<Product>();
    let cancel = CancellationToken::new();

    let query = QueryBuilder::new().expand(["supplier", "images"]);
    let found = products.find_by_id("p1", Some(&query), &cancel).await.unwrap();
    assert_eq!(found.name.as_deref(), Some("Bolt"));

    let error = products
        .find_by_id("missing", None, &cancel)
        .await
        .unwrap_err();
    assert!(error.is_not_found());

    assert!(matches!(
        products.find_by_id("  ", None, &cancel).await,
        Err(ResourceError::EmptyId { resource: "Product" })
    ));
}

#[tokio::test]
async fn test_create_update_delete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("entity/product")))
        .and(body_json(json!({"name": "Nut"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "n1", "name": "Nut"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api("entity/product/n1")))
        .and(body_json(json!({"id": "n1", "name": "Nut M8"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "n1", "name": "Nut M8"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("entity/product/n1")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let products = client.repository::<Product>();
    let cancel = CancellationToken::new();

    let created = products.create(&product(None, "Nut"), &cancel).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("n1"));

    let updated = products
        .update(&product(Some("n1"), "Nut M8"), &cancel)
        .await
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Nut M8"));

    assert_ok!(products.delete("n1", &cancel).await);

    assert!(matches!(
        products.update(&product(None, "x"), &cancel).await,
        Err(ResourceError::MissingId {
            operation: "update",
            ..
        })
    ));
}

#[tokio::test]
async fn test_bulk_operations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("entity/product")))
        .and(body_json(json!([{"name": "A"}, {"name": "B"}])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "name": "A"},
            {"id": "b", "name": "B"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("entity/product/delete")))
        .and(body_json(json!(["a", "b"])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let products = client.repository::<Product>();
    let cancel = CancellationToken::new();

    let created = products
        .create_bulk(&[product(None, "A"), product(None, "B")], &cancel)
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[1].id.as_deref(), Some("b"));

    assert_ok!(products.delete_bulk(&["a", "b"], &cancel).await);

    assert!(matches!(
        products.create_bulk(&[], &cancel).await,
        Err(ResourceError::EmptyBatch { .. })
    ));
    assert!(matches!(
        products
            .update_bulk(&[product(Some("a"), "A"), product(None, "B")], &cancel)
            .await,
        Err(ResourceError::MissingId {
            operation: "bulk update",
            ..
        })
    ));
    assert!(matches!(
        products.delete_bulk(&["a", ""], &cancel).await,
        Err(ResourceError::EmptyId { .. })
    ));
}

#[tokio::test]
async fn test_metadata_is_returned_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("entity/product/metadata")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "attributes": {"meta": {"href": "https://x/attributes", "size": 1}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let metadata = client
        .repository::<Product>()
        .metadata(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(metadata["attributes"]["meta"]["size"], 1);
}

#[tokio::test]
async fn test_attributes_decode_through_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("entity/product/p1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "attributes": [
                {"id": "a1", "name": "Weight", "type": "double", "value": 1.25},
                {"id": "a2", "name": "Fragile", "type": "boolean", "value": true},
                {"id": "a3", "name": "Arrived", "type": "time", "value": "2024-01-31 08:00:00.000"}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let found = client
        .repository::<Product>()
        .find_by_id("p1", None, &CancellationToken::new())
        .await
        .unwrap();

    let mut attributes = found.attributes.unwrap();
    assert_eq!(attributes.attribute("weight").and_then(EntityAttribute::as_f64), Some(1.25));
    assert_eq!(attributes.attribute("FRAGILE").and_then(EntityAttribute::as_bool), Some(true));
    assert_eq!(attributes.attribute("Fragile").and_then(EntityAttribute::as_i64), None);
    assert!(attributes
        .attribute_by_id("a3")
        .and_then(EntityAttribute::as_date_time)
        .is_some());

    attributes.upsert_attribute(EntityAttribute::new("a2", AttributeValue::Boolean(false)));
    assert_eq!(attributes.len(), 3);
    assert_eq!(attributes.attribute_by_id("a2").and_then(EntityAttribute::as_bool), Some(false));
}

#[tokio::test]
async fn test_global_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("entity/search")))
        .and(query_param("search", "red bolt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product": {"meta": {"size": 1}, "rows": [{"id": "p1"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .search("red bolt", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result["product"]["rows"][0]["id"], "p1");
}

#[tokio::test]
async fn test_unauthorized_surfaces_through_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"errors": [{"error": "bad token"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = assert_err!(
        client
            .repository::<Product>()
            .find_all(None, &CancellationToken::new())
            .await
    );

    assert!(matches!(error.as_http(), Some(HttpError::Unauthorized(_))));
}
