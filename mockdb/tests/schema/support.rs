use mockdb::{prelude::*, serde_json::{json, Value}};

/// Builds a schema over `seed` with a base `user` kind.
pub fn user_schema(seed: Value) -> Schema {
    let db = Db::from_seed(seed).unwrap();

    Schema::builder(db)
        .register("user", ModelDef::new())
        .build()
        .unwrap()
}

pub fn hyrule() -> Schema {
    user_schema(json!({
        "users": [
            { "id": 1, "name": "Link", "good": true },
            { "id": 2, "name": "Zelda", "good": true },
            { "id": 3, "name": "Ganon", "good": false },
        ],
    }))
}
