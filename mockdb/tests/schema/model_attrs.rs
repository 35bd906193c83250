use mockdb::{prelude::*, serde_json::json};
use serde::Deserialize;

use crate::support::user_schema;

fn link() -> Model {
    let schema = user_schema(json!({ "users": [{ "id": 1, "name": "Link", "evil": false }] }));

    schema.kind("user").unwrap().find(1).unwrap().unwrap()
}

#[test]
fn attrs_are_the_stored_attributes() {
    let user = link();

    assert_eq!(user.to_json(), json!({ "id": "1", "name": "Link", "evil": false }));
    assert_eq!(user.id(), Some("1"));
}

#[test]
fn attributes_can_be_read_directly() {
    let user = link();

    assert_eq!(user["name"], json!("Link"));
    assert_eq!(user["name"], user.attrs()["name"]);
    assert_eq!(user.get("name"), Some(&json!("Link")));
    assert!(user["hearts"].is_null());
}

#[test]
fn models_deserialize_into_typed_views() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: String,
        name: String,
        evil: bool,
    }

    let user = link().deserialize::<User>().unwrap();

    assert_eq!(
        user,
        User { id: "1".to_string(), name: "Link".to_string(), evil: false }
    );
}

#[test]
fn models_are_equal_by_kind_and_id() {
    let schema = user_schema(json!({ "users": [{ "name": "Link" }] }));
    let users = schema.kind("user").unwrap();

    let mut first = users.find(1).unwrap().unwrap();
    let second = users.find(1).unwrap().unwrap();
    first.set("name", "Dark Link");

    assert_eq!(first, second);
    assert_ne!(users.new_model(json!({ "name": "Link" })).unwrap(), users.new_model(json!({ "name": "Link" })).unwrap());
}

#[test]
fn computed_accessors_read_the_model() {
    let schema = Schema::builder(Db::from_seed(json!({ "users": [{ "name": "Link", "hearts": 3 }] })).unwrap())
        .register(
            "user",
            ModelDef::new().computed("full_health", |user| json!(user["hearts"].as_u64().unwrap_or(0) >= 3)),
        )
        .build()
        .unwrap();

    let link = schema.kind("user").unwrap().first().unwrap().unwrap();

    assert_eq!(link.computed("full_health"), Some(json!(true)));
    assert_eq!(link.computed("rupees"), None);
}
