use mockdb::{prelude::*, serde_json::json};

#[test]
fn finds_the_first_model_of_a_registered_kind() {
    let db = Db::new();
    db.create_collection("users")
        .unwrap()
        .insert_many(vec![
            json!({ "id": 1, "name": "Link" }),
            json!({ "id": 2, "name": "Zelda" }),
        ])
        .unwrap();

    let schema = Schema::new(db);
    schema.register_model("user", ModelDef::new()).unwrap();

    let link = schema.kind("user").unwrap().first().unwrap().unwrap();

    assert_eq!(link.to_json(), json!({ "id": "1", "name": "Link" }));
}

#[test]
fn models_cannot_be_registered_twice() {
    let schema = Schema::new(Db::new());
    schema.register_model("user", ModelDef::new()).unwrap();

    assert_eq!(
        schema.register_model("user", ModelDef::new().has_many("posts", "post")),
        Err(DbError::DuplicateModel("user".to_string()))
    );
}
