use mockdb::{prelude::*, serde_json::json};

fn blog() -> Schema {
    let db = Db::from_seed(json!({
        "users": [{ "name": "Link" }, { "name": "Zelda" }],
        "posts": [
            { "title": "Hyrule Field", "author_id": 1 },
            { "title": "Lost Woods", "author_id": "1" },
            { "title": "Orphan", "author_id": null },
        ],
    }))
    .unwrap();

    Schema::builder(db)
        .register(
            "user",
            ModelDef::new().association(Association::has_many("posts", "post").foreign_key("author_id")),
        )
        .register("post", ModelDef::new().belongs_to("author", "user"))
        .build()
        .unwrap()
}

#[test]
fn belongs_to_finds_the_owner() {
    let schema = blog();
    let posts = schema.kind("post").unwrap();

    let woods = posts.find(2).unwrap().unwrap();
    let author = woods.related("author").unwrap().into_model().unwrap();

    assert_eq!(author.kind(), "user");
    assert_eq!(author["name"], json!("Link"));
}

#[test]
fn belongs_to_without_a_key_is_none() {
    let schema = blog();

    let orphan = schema.kind("post").unwrap().find(3).unwrap().unwrap();

    assert!(orphan.related("author").unwrap().into_model().is_none());
}

#[test]
fn has_many_collects_targets_in_store_order() {
    let schema = blog();
    let users = schema.kind("user").unwrap();

    let link = users.find(1).unwrap().unwrap();
    let posts = link.related("posts").unwrap().into_collection().unwrap();

    assert_eq!(posts.model_name(), "post");
    assert_eq!(posts.ids(), vec!["1", "2"]);

    let zelda = users.find(2).unwrap().unwrap();
    assert!(zelda.related("posts").unwrap().into_collection().unwrap().is_empty());
}

#[test]
fn unknown_associations_are_rejected() {
    let schema = blog();

    let link = schema.kind("user").unwrap().find(1).unwrap().unwrap();

    assert!(matches!(
        link.related("comments"),
        Err(DbError::UnknownAssociation { name, .. }) if name == "comments"
    ));
}

#[test]
fn unregistered_targets_are_rejected() {
    let db = Db::from_seed(json!({ "posts": [{ "title": "Hyrule Field", "author_id": 1 }] })).unwrap();
    let schema = Schema::builder(db)
        .register("post", ModelDef::new().belongs_to("author", "user"))
        .build()
        .unwrap();

    let post = schema.kind("post").unwrap().first().unwrap().unwrap();

    assert!(matches!(post.related("author"), Err(DbError::UnknownModel(_))));
}
