use mockdb::{prelude::*, serde_json::json};

use crate::support::user_schema;

#[test]
fn returns_every_model() {
    let schema = user_schema(json!({
        "users": [
            { "id": 1, "name": "Link" },
            { "id": 2, "name": "Zelda" },
        ],
    }));

    let users = schema.kind("user").unwrap().all().unwrap();

    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|user| user.kind() == "user"));
    assert_eq!(users[1].to_json(), json!({ "id": "2", "name": "Zelda" }));
}

#[test]
fn seeded_records_get_sequential_string_ids() {
    let schema = user_schema(json!({
        "users": [{ "name": "Link" }, { "name": "Zelda" }, { "name": "Ganon" }],
    }));

    let users = schema.kind("user").unwrap().all().unwrap();

    assert_eq!(users.ids(), vec!["1", "2", "3"]);
}

#[test]
fn empty_collections_still_know_their_kind() {
    let schema = user_schema(json!({ "users": [] }));
    let query = schema.kind("user").unwrap();

    let users = query.all().unwrap();

    assert_eq!(users.model_name(), "user");
    assert!(users.is_empty());
    assert!(query.first().unwrap().is_none());
}

#[test]
fn repeated_reads_are_equal_copies() {
    let schema = user_schema(json!({
        "users": [{ "name": "Link", "items": ["sword"] }, { "name": "Zelda" }],
    }));
    let query = schema.kind("user").unwrap();

    let mut first = query.all().unwrap();
    let second = query.all().unwrap();

    let snapshot = |users: &Collection| users.iter().map(Model::to_json).collect::<Vec<_>>();
    assert_eq!(snapshot(&first), snapshot(&second));
    assert_eq!(
        snapshot(&second),
        vec![
            json!({ "id": "1", "name": "Link", "items": ["sword"] }),
            json!({ "id": "2", "name": "Zelda" }),
        ]
    );

    for user in first.iter_mut() {
        user.set("name", "Dark Link");
    }

    assert_eq!(second[0]["name"], json!("Link"));
    assert_eq!(second[1]["name"], json!("Zelda"));
    assert_eq!(snapshot(&query.all().unwrap()), snapshot(&second));
}

#[test]
fn saved_collection_writes_reach_later_reads() {
    let schema = user_schema(json!({ "users": [{ "name": "Link" }] }));
    let query = schema.kind("user").unwrap();

    let mut users = query.all().unwrap();
    let before = query.all().unwrap();
    users.update_all(json!({ "name": "Dark Link" })).unwrap();

    assert_eq!(before[0]["name"], json!("Link"));
    assert_eq!(query.all().unwrap()[0]["name"], json!("Dark Link"));
}
