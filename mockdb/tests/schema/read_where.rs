use mockdb::{prelude::*, serde_json::json};

use crate::support::hyrule;

#[test]
fn returns_models_matching_an_attribute_query() {
    let schema = hyrule();

    let users = schema.kind("user").unwrap().filter(Where::eq("good", false)).unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].kind(), "user");
    assert_eq!(users[0].to_json(), json!({ "id": "3", "name": "Ganon", "good": false }));
}

#[test]
fn predicates_match_like_the_equivalent_attribute_query() {
    let schema = hyrule();
    let users = schema.kind("user").unwrap();

    let by_predicate = users
        .filter(Where::predicate(|user: &Record| user["good"] == json!(false)))
        .unwrap();

    assert_eq!(by_predicate, users.filter(Where::eq("good", false)).unwrap());
}

#[test]
fn json_queries_are_attribute_queries() {
    let schema = hyrule();

    let query = Where::try_from(json!({ "name": "Link", "good": true })).unwrap();
    let users = schema.kind("user").unwrap().filter(query).unwrap();

    assert_eq!(users.ids(), vec!["1"]);
}

#[test]
fn no_match_is_an_empty_collection() {
    let schema = hyrule();

    let users = schema
        .kind("user")
        .unwrap()
        .filter(Where::attrs([("name", json!("Link")), ("good", json!(false))]))
        .unwrap();

    assert!(users.is_empty());
    assert_eq!(users.model_name(), "user");
}

#[test]
fn filter_expressions_preserve_store_order() {
    let schema = hyrule();

    let users = schema
        .kind("user")
        .unwrap()
        .filter(Filter::or([Filter::eq("name", "Ganon"), Filter::starts_with("name", "L")]))
        .unwrap();

    assert_eq!(users.ids(), vec!["1", "3"]);
}

#[test]
fn find_by_returns_the_first_match() {
    let schema = hyrule();
    let users = schema.kind("user").unwrap();

    assert_eq!(users.find_by(Where::eq("good", true)).unwrap().unwrap()["name"], json!("Link"));
    assert!(users.find_by(Where::eq("name", "Navi")).unwrap().is_none());
}
