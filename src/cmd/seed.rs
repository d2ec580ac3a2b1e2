use crate::{
    conf::settings,
    pkg::{internal::auth::seed_user, server::state::db_pool},
    prelude::Result,
};

pub async fn admin(email: &str, password: &str, role: &str) -> Result<()> {
    let pool = db_pool(&settings)?;
    if seed_user(&pool, email, password, role).await? {
        tracing::info!("admin login ready for {}", email);
    }
    pool.close().await;
    Ok(())
}
