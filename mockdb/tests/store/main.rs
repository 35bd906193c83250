//! Integration tests for the raw record store.

use mockdb::{prelude::*, serde_json::json};

#[test]
fn inserted_records_round_trip_with_string_ids() {
    let db = Db::new();
    let users = db.create_collection("users").unwrap();

    let link = users.insert(json!({ "name": "Link", "hearts": 3 })).unwrap();

    assert_eq!(link.id(), Some("1"));
    assert_eq!(
        users.find(link.id().unwrap()).unwrap().unwrap().into_value(),
        json!({ "id": "1", "name": "Link", "hearts": 3 })
    );
}

#[test]
fn explicit_ids_are_honored_and_must_be_unique() {
    let db = Db::new();
    let users = db.create_collection("users").unwrap();

    users.insert(json!({ "id": 7, "name": "Link" })).unwrap();
    let zelda = users.insert(json!({ "name": "Zelda" })).unwrap();

    assert_eq!(zelda.id(), Some("8"));
    assert!(matches!(
        users.insert(json!({ "id": "7", "name": "Ganon" })),
        Err(DbError::DuplicateId { id, .. }) if id == "7"
    ));
}

#[test]
fn unknown_collections_are_rejected_unless_auto_created() {
    let strict = Db::new();
    assert!(matches!(
        strict.collection("users").insert(json!({ "name": "Link" })),
        Err(DbError::UnknownCollection(name)) if name == "users"
    ));

    let lenient = Db::builder().auto_create_collections(true).build().unwrap();
    lenient.collection("users").insert(json!({ "name": "Link" })).unwrap();
    assert_eq!(lenient.collection_names(), vec!["users".to_string()]);
}

#[test]
fn collections_cannot_be_created_twice() {
    let db = Db::new();
    db.create_collection("users").unwrap();

    assert!(matches!(
        db.create_collection("users"),
        Err(DbError::DuplicateCollection(name)) if name == "users"
    ));
}

#[test]
fn mutating_returned_records_does_not_touch_the_store() {
    let db = Db::from_seed(json!({ "users": [{ "name": "Link" }] })).unwrap();
    let users = db.collection("users");

    let mut link = users.find(1).unwrap().unwrap();
    link.insert("name", "Dark Link");

    assert_eq!(users.find(1).unwrap().unwrap()["name"], json!("Link"));
}

#[test]
fn update_and_remove_report_absence() {
    let db = Db::from_seed(json!({ "users": [{ "name": "Link", "good": true }] })).unwrap();
    let users = db.collection("users");

    let updated = users.update(1, json!({ "hearts": 3 })).unwrap().unwrap();
    assert_eq!(updated.into_value(), json!({ "id": "1", "name": "Link", "good": true, "hearts": 3 }));

    assert!(users.update(9, json!({ "hearts": 3 })).unwrap().is_none());
    assert!(users.remove(9).unwrap().is_none());
    assert!(users.remove(1).unwrap().is_some());
    assert!(users.is_empty().unwrap());
}

#[test]
fn seeds_can_be_reloaded_and_dumped() {
    let db = Db::from_seed(json!({ "users": [{ "name": "Link" }] })).unwrap();
    db.load(json!({ "users": [{ "name": "Zelda" }], "posts": [] })).unwrap();

    assert_eq!(
        db.dump().unwrap(),
        json!({
            "posts": [],
            "users": [{ "id": "1", "name": "Link" }, { "id": "2", "name": "Zelda" }],
        })
    );

    db.empty_data().unwrap();
    let navi = db.collection("users").insert(json!({ "name": "Navi" })).unwrap();

    assert_eq!(navi.id(), Some("1"));
}
