use qorm::metadata::Metadata;
use qorm::{FromRow, PrimaryKeyDecl, Record, Row, Value};

#[derive(Debug, PartialEq, FromRow, Record)]
#[orm(table = "articles")]
#[orm(database = "blog")]
struct Article {
    #[orm(id)]
    id: i64,
    #[orm(column = "headline")]
    title: String,
    body: Option<String>,
    published: bool,
}

#[derive(Debug, FromRow, Record)]
struct Untabled {
    value: i64,
}

#[test]
fn descriptor_reflects_attributes() {
    let d = Article::descriptor();
    assert_eq!(d.type_name, "Article");
    assert_eq!(d.table.as_deref(), Some("articles"));
    assert_eq!(d.database.as_deref(), Some("blog"));
    assert_eq!(d.primary_key, PrimaryKeyDecl::Single("id".into()));
    assert_eq!(d.fields, vec!["id", "headline", "body", "published"]);
}

#[test]
fn to_values_follows_field_order() {
    let a = Article {
        id: 3,
        title: "Hello".into(),
        body: None,
        published: true,
    };
    assert_eq!(
        a.to_values(),
        vec![Value::Int(3), Value::from("Hello"), Value::Null, Value::Bool(true)]
    );
}

#[test]
fn from_row_uses_column_names() {
    let row = Row::from_pairs([
        ("published", Value::Bool(false)),
        ("headline", Value::from("Hi")),
        ("id", Value::Int(1)),
        ("body", Value::from("text")),
    ]);
    assert_eq!(
        Article::from_row(&row).unwrap(),
        Article {
            id: 1,
            title: "Hi".into(),
            body: Some("text".into()),
            published: false,
        }
    );
}

#[test]
fn from_row_reports_the_failing_column() {
    let row = Row::from_pairs([
        ("id", Value::from("not a number")),
        ("headline", Value::from("Hi")),
        ("body", Value::Null),
        ("published", Value::Bool(true)),
    ]);
    match Article::from_row(&row) {
        Err(qorm::OrmError::Decode { column, .. }) => assert_eq!(column, "id"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn missing_table_fails_at_metadata_build() {
    let err = Metadata::build(&Untabled::descriptor()).unwrap_err();
    assert!(err.is_model_definition());
    assert_eq!(Untabled::descriptor().primary_key, PrimaryKeyDecl::None);
}
