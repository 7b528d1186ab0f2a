use std::sync::Arc;

use sqlx::PgPool;

use crate::config::{AdminAllowList, AppConfig};
use crate::database::admin::{AdminStore, PgAdminStore};
use crate::database::categories::{CategoryStore, PgCategoryStore};
use crate::database::transactions::{PgTransactionStore, TransactionStore};
use crate::database::users::{PgUserStore, UserStore};
use crate::services::identity::TokenIntrospector;
use crate::services::seeding::CategorySeeder;

/// Everything a request handler can reach. Cheap to clone; all members are
/// shared handles. Nothing here is mutable across requests except the
/// seeder's internal in-flight map.
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<dyn CategoryStore>,
    pub transactions: Arc<dyn TransactionStore>,
    /// Cross-user store over the elevated credential. `None` when the
    /// credential is not configured; admin handlers turn that into a
    /// configuration error after authorization.
    pub admin: Option<Arc<dyn AdminStore>>,
    pub introspector: Arc<TokenIntrospector>,
    pub seeder: Arc<CategorySeeder>,
    pub admin_emails: Arc<AdminAllowList>,
    pub pool: PgPool,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: PgPool, service_pool: Option<PgPool>) -> Self {
        let categories: Arc<dyn CategoryStore> = Arc::new(PgCategoryStore::new(pool.clone()));
        let transactions: Arc<dyn TransactionStore> =
            Arc::new(PgTransactionStore::new(pool.clone()));
        let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
        let admin = service_pool
            .map(|service| Arc::new(PgAdminStore::new(service)) as Arc<dyn AdminStore>);

        let introspector = Arc::new(TokenIntrospector::new(&config.jwt_secret, users));
        let seeder = Arc::new(CategorySeeder::new(Arc::clone(&categories)));

        Self {
            categories,
            transactions,
            admin,
            introspector,
            seeder,
            admin_emails: Arc::new(config.admin_emails.clone()),
            pool,
        }
    }
}
