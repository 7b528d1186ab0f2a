use std::collections::{HashMap, HashSet};
use std::pin::Pin;
use std::sync::Arc;

use futures::future::Shared;
use futures::{Future, FutureExt};
use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::categories::CategoryStore;
use crate::database::models::{FlowType, NewCategory};

/// The categories every user starts with.
pub static DEFAULT_CATEGORIES: Lazy<Vec<NewCategory>> = Lazy::new(|| {
    vec![
        NewCategory {
            name: "Ngopi".to_string(),
            kind: FlowType::Expense,
            color: "#facc15".to_string(),
            icon: "Coffee".to_string(),
        },
        NewCategory {
            name: "Belanja".to_string(),
            kind: FlowType::Expense,
            color: "#fb7185".to_string(),
            icon: "ShoppingBag".to_string(),
        },
        NewCategory {
            name: "Ngopi".to_string(),
            kind: FlowType::Income,
            color: "#facc15".to_string(),
            icon: "Coffee".to_string(),
        },
        NewCategory {
            name: "Belanja".to_string(),
            kind: FlowType::Income,
            color: "#fb7185".to_string(),
            icon: "ShoppingBag".to_string(),
        },
    ]
});

type SeedHandle = Shared<Pin<Box<dyn Future<Output = bool> + Send>>>;

/// Ensures the default category set exists for a user, at most once in flight
/// per user per process.
///
/// Concurrent bootstraps for the same user (rapid re-renders, multiple tabs)
/// all await the same shared operation instead of racing independent inserts.
/// Completed entries are kept for the life of the process; replaying a
/// bootstrap re-awaits the finished handle and touches the store again only
/// after a restart. Failures evict the entry so the next bootstrap retries.
///
/// An explicit component held in app state so tests can build a fresh one.
pub struct CategorySeeder {
    store: Arc<dyn CategoryStore>,
    in_flight: Mutex<HashMap<Uuid, SeedHandle>>,
}

impl CategorySeeder {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self {
            store,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Best-effort seeding: never returns an error. A failed attempt is
    /// logged and forgotten so a later bootstrap can try again.
    pub async fn ensure_defaults(&self, user_id: Uuid) {
        let handle = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(&user_id) {
                Some(existing) => existing.clone(),
                None => {
                    let store = Arc::clone(&self.store);
                    let handle: SeedHandle =
                        async move { seed_user(store, user_id).await }.boxed().shared();
                    in_flight.insert(user_id, handle.clone());
                    handle
                }
            }
        };

        let succeeded = handle.clone().await;

        if !succeeded {
            let mut in_flight = self.in_flight.lock().await;
            // Only evict our own handle; a concurrent retry may have already
            // replaced it with a fresh operation.
            if in_flight
                .get(&user_id)
                .is_some_and(|current| current.ptr_eq(&handle))
            {
                in_flight.remove(&user_id);
            }
        }
    }
}

/// One seeding pass: read the user's existing `(name, type)` pairs, diff
/// against the default set (keyed by lowercased name + type), and batch-insert
/// whatever is missing.
async fn seed_user(store: Arc<dyn CategoryStore>, user_id: Uuid) -> bool {
    let existing: HashSet<(String, FlowType)> = match store.keys(user_id).await {
        Ok(keys) => keys
            .into_iter()
            .map(|(name, kind)| (name.to_lowercase(), kind))
            .collect(),
        Err(err) => {
            tracing::warn!("failed to read categories while seeding user {user_id}: {err}");
            return false;
        }
    };

    let missing: Vec<NewCategory> = DEFAULT_CATEGORIES
        .iter()
        .filter(|category| !existing.contains(&(category.name.to_lowercase(), category.kind)))
        .cloned()
        .collect();

    if missing.is_empty() {
        return true;
    }

    match store.insert_missing(user_id, &missing).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("failed to seed default categories for user {user_id}: {err}");
            false
        }
    }
}
