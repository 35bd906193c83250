use mockdb::{prelude::*, serde_json::json};

use crate::support::{hyrule, user_schema};

#[test]
fn setting_attributes_does_not_touch_the_store() {
    let schema = hyrule();
    let users = schema.kind("user").unwrap();

    let mut link = users.find(1).unwrap().unwrap();
    link.set("name", "Dark Link");

    assert_eq!(users.find(1).unwrap().unwrap()["name"], json!("Link"));

    link.save().unwrap();

    assert_eq!(users.find(1).unwrap().unwrap()["name"], json!("Dark Link"));
}

#[test]
fn saving_a_new_model_assigns_an_id() {
    let schema = hyrule();
    let users = schema.kind("user").unwrap();

    let mut navi = users.new_model(json!({ "name": "Navi" })).unwrap();
    assert!(navi.is_new());

    navi.save().unwrap();

    assert_eq!(navi.id(), Some("4"));
    assert_eq!(users.find(4).unwrap().unwrap().to_json(), json!({ "id": "4", "name": "Navi" }));
}

#[test]
fn explicit_ids_are_kept_on_create() {
    let schema = user_schema(json!({ "users": [] }));
    let users = schema.kind("user").unwrap();

    let link = users.create(json!({ "id": 5, "name": "Link" })).unwrap();
    let zelda = users.create(json!({ "id": "7", "name": "Zelda" })).unwrap();
    let navi = users.create(json!({ "name": "Navi" })).unwrap();

    assert_eq!(link.id(), Some("5"));
    assert_eq!(zelda.id(), Some("7"));
    assert_eq!(navi.id(), Some("8"));
    assert!(!link.is_new());
    assert_eq!(users.find("5").unwrap().unwrap().to_json(), json!({ "id": "5", "name": "Link" }));
    assert_eq!(users.all().unwrap().ids(), vec!["5", "7", "8"]);
}

#[test]
fn new_models_with_explicit_ids_are_still_new() {
    let schema = hyrule();
    let users = schema.kind("user").unwrap();

    let mut impa = users.new_model(json!({ "id": "7", "name": "Impa" })).unwrap();
    assert!(impa.is_new());
    assert_eq!(impa.id(), Some("7"));

    impa.save().unwrap();
    assert!(!impa.is_new());
    assert_eq!(users.find(7).unwrap().unwrap()["name"], json!("Impa"));

    let impostor = users.create(json!({ "id": 1, "name": "Dark Link" }));
    assert!(matches!(impostor, Err(DbError::DuplicateId { id, .. }) if id == "1"));
    assert_eq!(users.find(1).unwrap().unwrap()["name"], json!("Link"));
}

#[test]
fn unsaved_models_cannot_be_reloaded() {
    let schema = hyrule();

    let mut navi = schema.kind("user").unwrap().new_model(json!({ "name": "Navi" })).unwrap();
    let error = navi.reload().unwrap_err();

    assert_eq!(error, DbError::UnsavedModel("user".to_string()));
    assert_eq!(error.to_string(), "Model user has not been saved yet");
}

#[test]
fn saved_ids_cannot_be_changed() {
    let schema = hyrule();

    let mut link = schema.kind("user").unwrap().find(1).unwrap().unwrap();
    link.set("id", "9");

    assert_eq!(link.id(), Some("1"));
}

#[test]
fn update_merges_and_saves() {
    let schema = hyrule();
    let users = schema.kind("user").unwrap();

    let mut ganon = users.find(3).unwrap().unwrap();
    ganon.update(json!({ "good": true })).unwrap();

    assert_eq!(
        users.find(3).unwrap().unwrap().to_json(),
        json!({ "id": "3", "name": "Ganon", "good": true })
    );
}

#[test]
fn reload_reads_the_stored_record() {
    let schema = hyrule();
    let users = schema.kind("user").unwrap();

    let mut stale = users.find(2).unwrap().unwrap();
    users.find(2).unwrap().unwrap().update(json!({ "name": "Sheik" })).unwrap();

    stale.reload().unwrap();

    assert_eq!(stale["name"], json!("Sheik"));
}

#[test]
fn destroyed_models_are_gone() {
    let schema = hyrule();
    let users = schema.kind("user").unwrap();

    let ganon = users.find(3).unwrap().unwrap();
    let mut copy = ganon.clone();

    assert!(ganon.destroy().unwrap());
    assert!(users.find(3).unwrap().is_none());
    assert!(matches!(copy.reload(), Err(DbError::RecordNotFound { .. })));
    assert!(matches!(copy.save(), Err(DbError::RecordNotFound { .. })));
    assert!(!users.new_model(json!({})).unwrap().destroy().unwrap());
}

#[test]
fn create_and_first_or_create() {
    let schema = user_schema(json!({ "users": [] }));
    let users = schema.kind("user").unwrap();

    let link = users.create(json!({ "name": "Link" })).unwrap();
    let again = users.first_or_create(json!({ "name": "Link" })).unwrap();
    let zelda = users.first_or_create(json!({ "name": "Zelda" })).unwrap();

    assert_eq!(link, again);
    assert_eq!(zelda.id(), Some("2"));
    assert_eq!(users.all().unwrap().len(), 2);
}

#[test]
fn collections_apply_writes_to_every_member() {
    let schema = hyrule();
    let users = schema.kind("user").unwrap();

    let good = users.filter(Where::eq("good", true)).unwrap();
    assert_eq!(good.slice(1, 10).ids(), vec!["2"]);

    let removed = good.filter(|user| user["name"] == json!("Zelda")).destroy_all().unwrap();

    assert_eq!(removed, 1);
    assert_eq!(users.all().unwrap().ids(), vec!["1", "3"]);
}
