//! SQL credential store tests against an in-memory SQLite database.

use login_consent_provider::error::StoreError;
use login_consent_provider::store::{
    CredentialStore, DbCredentialStore, LoginLookup, hash_password,
};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};
use std::sync::Arc;

/// Create a database with a user table named `table`.
async fn create_user_db(table: &str) -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await.expect("connect");

    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        format!(
            r#"CREATE TABLE {table} (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                mail TEXT NULL,
                password_hash TEXT NOT NULL,
                roles TEXT NULL
            );"#
        ),
    ))
    .await
    .expect("create user table");

    let bob_hash = hash_password("hunter2").expect("hash");
    db.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        format!(
            "INSERT INTO {table} (id, username, mail, password_hash, roles) \
             VALUES (?, ?, ?, ?, ?)"
        ),
        [
            "u-bob".into(),
            "bob".into(),
            "bob@example.com".into(),
            bob_hash.into(),
            r#"["admin","user"]"#.into(),
        ],
    ))
    .await
    .expect("insert bob");

    let carol_hash = bcrypt::hash("letmein", 4).expect("hash");
    db.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        format!(
            "INSERT INTO {table} (id, username, mail, password_hash, roles) \
             VALUES (?, ?, NULL, ?, ?)"
        ),
        [
            "u-carol".into(),
            "carol".into(),
            carol_hash.into(),
            "not json".into(),
        ],
    ))
    .await
    .expect("insert carol");

    Arc::new(db)
}

async fn users_store(lookup: LoginLookup) -> DbCredentialStore {
    DbCredentialStore::new(create_user_db("users").await, "users", lookup)
}

#[tokio::test]
async fn test_find_by_id() {
    let store = users_store(LoginLookup::Username).await;

    let bob = store.find_by_id("u-bob").await.expect("bob exists");
    assert_eq!(bob.username, "bob");
    assert_eq!(bob.mail.as_deref(), Some("bob@example.com"));
    assert_eq!(bob.roles, vec!["admin".to_string(), "user".to_string()]);

    assert!(matches!(
        store.find_by_id("u-nobody").await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_username_lookup_ignores_mail() {
    let store = users_store(LoginLookup::Username).await;

    assert_eq!(store.find_by_login_name("bob").await.unwrap().id, "u-bob");
    assert!(matches!(
        store.find_by_login_name("bob@example.com").await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_username_or_mail_lookup() {
    let store = users_store(LoginLookup::UsernameOrMail).await;

    assert_eq!(store.find_by_login_name("bob").await.unwrap().id, "u-bob");
    assert_eq!(
        store.find_by_login_name("bob@example.com").await.unwrap().id,
        "u-bob"
    );
    assert!(matches!(
        store.find_by_login_name("mallory").await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_configured_table_name() {
    let store = DbCredentialStore::new(
        create_user_db("login_accounts").await,
        "login_accounts",
        LoginLookup::Username,
    );
    assert_eq!(store.find_by_login_name("carol").await.unwrap().id, "u-carol");
}

#[tokio::test]
async fn test_malformed_roles_and_null_mail() {
    let store = users_store(LoginLookup::Username).await;

    let carol = store.find_by_id("u-carol").await.expect("carol exists");
    assert!(carol.mail.is_none());
    assert!(carol.roles.is_empty());
}

#[tokio::test]
async fn test_verify_password_for_both_hash_kinds() {
    let store = users_store(LoginLookup::Username).await;

    let bob = store.find_by_id("u-bob").await.unwrap();
    assert!(store.verify_password(&bob, "hunter2").is_ok());
    assert!(matches!(
        store.verify_password(&bob, "hunter3"),
        Err(StoreError::Mismatch)
    ));

    let carol = store.find_by_id("u-carol").await.unwrap();
    assert!(store.verify_password(&carol, "letmein").is_ok());
    assert!(matches!(
        store.verify_password(&carol, ""),
        Err(StoreError::Mismatch)
    ));
}

#[tokio::test]
async fn test_missing_table_is_backend_error() {
    let db = create_user_db("users").await;
    let store = DbCredentialStore::new(db, "people", LoginLookup::Username);

    assert!(matches!(
        store.find_by_id("u-bob").await,
        Err(StoreError::Backend(_))
    ));
}
