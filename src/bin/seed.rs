//! Creates the initial superuser, a normal user and a few sample items.

use crud_template::{
    auth::password::hash_password,
    config::AppConfig,
    db,
    items::{
        store::{ItemStore, NewItem},
        PgItemStore,
    },
    users::{
        store::{NewUser, UserStore},
        PgUserStore, User,
    },
};
use tracing::info;

const SEED_PASSWORD: &str = "password";

async fn ensure_user(
    store: &PgUserStore,
    email: &str,
    full_name: &str,
    is_superuser: bool,
) -> anyhow::Result<User> {
    if let Some(user) = store.find_by_email(email).await? {
        return Ok(user);
    }
    let user = store
        .create(NewUser {
            email: email.into(),
            hashed_password: hash_password(SEED_PASSWORD)?,
            full_name: Some(full_name.into()),
            is_active: true,
            is_superuser,
        })
        .await?;
    info!(email = %user.email, is_superuser, "seeded user");
    Ok(user)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config.database_url).await?;
    db::migrate(&pool).await;
    let store = PgUserStore::new(pool.clone());
    let items = PgItemStore::new(pool.clone());

    ensure_user(&store, "admin@example.com", "Initial Admin", true).await?;
    let normal = ensure_user(&store, "user@example.com", "Normal User", false).await?;

    if items.list_by_owner(normal.id, 0, 1).await?.is_empty() {
        for i in 1..=3 {
            items
                .create(NewItem {
                    owner_id: normal.id,
                    title: format!("Sample item {i}"),
                    description: Some(format!("Description of sample item {i}.")),
                })
                .await?;
        }
        info!(email = %normal.email, "seeded sample items");
    }
    Ok(())
}
