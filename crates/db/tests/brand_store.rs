//! Store behaviour against a real engine.
//!
//! Each test opens a private in-memory SQLite database through the `Any`
//! driver. The pool holds a single connection so every statement sees the
//! same database.

use std::sync::Arc;

use db::{
    Brand, BrandRepository, BrandStore, DbConfig, DbError, Dialect, NewBrand, SqlHandle,
    SAMPLE_BRANDS,
};
use sqlx::any::{install_default_drivers, AnyPoolOptions};

const CREATE_BRANDS: &str = r#"
    CREATE TABLE brands (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        original_name TEXT NOT NULL UNIQUE,
        mapped_name   TEXT NOT NULL
    )
"#;

async fn sqlite_handle() -> SqlHandle {
    install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    sqlx::query(CREATE_BRANDS)
        .execute(&pool)
        .await
        .expect("create brands table");
    SqlHandle::from_pool(pool, Dialect::Sqlite)
}

async fn store() -> BrandStore {
    BrandStore::new(Arc::new(sqlite_handle().await))
}

#[tokio::test]
async fn create_then_read_round_trips() {
    let store = store().await;

    store.create(NewBrand::new("Glenfiddich 12", "Glenfiddich")).await.unwrap();
    let brand = store.read("Glenfiddich 12").await.unwrap();

    assert!(brand.id > 0);
    assert_eq!(brand.original_name, "Glenfiddich 12");
    assert_eq!(brand.mapped_name, "Glenfiddich");
}

#[tokio::test]
async fn ids_are_engine_assigned_and_distinct() {
    let store = store().await;

    store.create(NewBrand::new("A", "a")).await.unwrap();
    store
        .create(
            Brand {
                id: 999,
                original_name: "B".into(),
                mapped_name: "b".into(),
            }
            .into(),
        )
        .await
        .unwrap();

    let a = store.read("A").await.unwrap();
    let b = store.read("B").await.unwrap();
    assert_ne!(a.id, b.id);
    assert_ne!(b.id, 999, "caller-supplied id must be ignored");
}

#[tokio::test]
async fn duplicate_create_is_storage_error_and_keeps_original() {
    let store = store().await;

    store.create(NewBrand::new("X", "A")).await.unwrap();
    let err = store.create(NewBrand::new("X", "other")).await.unwrap_err();

    match err {
        DbError::Storage(sqlx::Error::Database(db_err)) => {
            assert!(db_err.message().to_lowercase().contains("unique"));
        }
        other => panic!("expected a constraint violation, got {other:?}"),
    }
    assert_eq!(store.read("X").await.unwrap().mapped_name, "A");
}

#[tokio::test]
async fn read_of_unknown_name_is_not_found() {
    let store = store().await;

    let err = store.read("never-inserted").await.unwrap_err();

    match err {
        DbError::NotFound { original_name } => assert_eq!(original_name, "never-inserted"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn update_then_read_sees_new_mapped_name() {
    let store = store().await;

    store.create(NewBrand::new("X", "A")).await.unwrap();
    store.update("X", "B").await.unwrap();

    let brand = store.read("X").await.unwrap();
    assert_eq!(brand.mapped_name, "B");
    assert_eq!(brand.original_name, "X");
}

#[tokio::test]
async fn update_of_unknown_name_succeeds_without_inserting() {
    let store = store().await;

    store.update("ghost", "B").await.unwrap();

    assert!(store.read("ghost").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn delete_then_read_is_not_found() {
    let store = store().await;

    store.create(NewBrand::new("X", "A")).await.unwrap();
    store.delete("X").await.unwrap();

    assert!(store.read("X").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let store = store().await;

    store.delete("nothing-here").await.unwrap();
    store.create(NewBrand::new("X", "A")).await.unwrap();
    store.delete("X").await.unwrap();
    store.delete("X").await.unwrap();
}

#[tokio::test]
async fn delete_only_touches_the_named_row() {
    let store = store().await;

    store.create(NewBrand::new("X", "A")).await.unwrap();
    store.create(NewBrand::new("Y", "B")).await.unwrap();
    store.delete("X").await.unwrap();

    assert_eq!(store.read("Y").await.unwrap().mapped_name, "B");
}

#[tokio::test]
async fn names_with_quotes_are_stored_verbatim() {
    let store = store().await;
    let name = "Jack's \"Old No. 7\"; DROP TABLE brands; --";

    store.create(NewBrand::new(name, "Jack Daniel's")).await.unwrap();

    assert_eq!(store.read(name).await.unwrap().mapped_name, "Jack Daniel's");
}

#[tokio::test]
async fn seed_then_read_returns_fixed_samples() {
    let store = store().await;

    store.seed_sample_data().await.unwrap();

    assert_eq!(store.read("Marca1").await.unwrap().mapped_name, "Marca Mapeada 1");
    assert_eq!(store.read("Marca2").await.unwrap().mapped_name, "Marca Mapeada 2");
    assert_eq!(store.read("Marca3").await.unwrap().mapped_name, "Marca Mapeada 3");
}

#[tokio::test]
async fn seeding_twice_fails_on_first_duplicate() {
    let store = store().await;

    store.seed_sample_data().await.unwrap();
    let err = store.seed_sample_data().await.unwrap_err();

    assert!(matches!(err, DbError::Storage(_)));
    for (original, mapped) in SAMPLE_BRANDS {
        assert_eq!(store.read(original).await.unwrap().mapped_name, mapped);
    }
}

#[tokio::test]
async fn read_decodes_names_stored_as_bytes() {
    // MySQL TEXT columns reach the Any driver as blob values.
    let handle = sqlite_handle().await;
    sqlx::query(
        "INSERT INTO brands (original_name, mapped_name) VALUES ('X', CAST('Mapeada X' AS BLOB))",
    )
    .execute(handle.pool())
    .await
    .unwrap();
    let store = BrandStore::new(Arc::new(handle));

    let brand = store.read("X").await.unwrap();

    assert_eq!(brand.original_name, "X");
    assert_eq!(brand.mapped_name, "Mapeada X");
}

#[tokio::test]
async fn read_of_non_utf8_bytes_is_storage_error() {
    let handle = sqlite_handle().await;
    sqlx::query("INSERT INTO brands (original_name, mapped_name) VALUES ('X', X'FF00')")
        .execute(handle.pool())
        .await
        .unwrap();
    let store = BrandStore::new(Arc::new(handle));

    match store.read("X").await {
        Err(DbError::Storage(sqlx::Error::ColumnDecode { index, .. })) => {
            assert!(index.contains("mapped_name"));
        }
        other => panic!("expected a column decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_table_is_storage_error() {
    install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = BrandStore::new(Arc::new(SqlHandle::from_pool(pool, Dialect::Sqlite)));

    assert!(matches!(store.read("X").await, Err(DbError::Storage(_))));
    assert!(matches!(
        store.create(NewBrand::new("X", "A")).await,
        Err(DbError::Storage(_))
    ));
}

#[tokio::test]
async fn connect_opens_sqlite_from_config_and_pings() {
    let handle = SqlHandle::connect(&DbConfig::new("sqlite::memory:"))
        .await
        .unwrap();

    handle.ping().await.unwrap();
    sqlx::query("SELECT 1").execute(handle.pool()).await.unwrap();
    handle.close().await;
    assert!(handle.ping().await.is_err());
}

#[tokio::test]
async fn brand_serializes_as_json() {
    let store = store().await;
    store.create(NewBrand::new("X", "A")).await.unwrap();

    let brand = store.read("X").await.unwrap();
    let json = serde_json::to_value(&brand).unwrap();

    assert_eq!(json["original_name"], "X");
    assert_eq!(json["mapped_name"], "A");
    assert_eq!(json["id"], brand.id);
}
