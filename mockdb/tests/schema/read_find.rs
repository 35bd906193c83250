use mockdb::{prelude::*, serde_json::json};

use crate::support::hyrule;

#[test]
fn finds_a_model_by_id() {
    let schema = hyrule();

    let zelda = schema.kind("user").unwrap().find(2).unwrap().unwrap();

    assert_eq!(zelda.kind(), "user");
    assert_eq!(zelda.to_json(), json!({ "id": "2", "name": "Zelda", "good": true }));
}

#[test]
fn string_and_numeric_ids_are_interchangeable() {
    let schema = hyrule();
    let users = schema.kind("user").unwrap();

    assert_eq!(users.find("2").unwrap(), users.find(2).unwrap());
}

#[test]
fn missing_ids_return_none() {
    let schema = hyrule();

    assert!(schema.kind("user").unwrap().find(4).unwrap().is_none());
}

#[test]
fn finds_many_models_in_request_order() {
    let schema = hyrule();

    let users = schema.kind("user").unwrap().find_many([3, 1]).unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users.ids(), vec!["3", "1"]);
    assert_eq!(users[1]["name"], json!("Link"));
}

#[test]
fn batch_lookups_fail_when_any_id_is_missing() {
    let schema = hyrule();

    let error = schema.kind("user").unwrap().find_many([1, 6]).unwrap_err();

    assert!(matches!(&error, DbError::PartialResult { collection, .. } if collection == "users"));
    assert!(error.to_string().starts_with("Couldn't find all users"));
}

#[test]
fn unregistered_kinds_are_rejected() {
    let schema = hyrule();

    assert!(matches!(schema.kind("post"), Err(DbError::UnknownModel(kind)) if kind == "post"));
}
