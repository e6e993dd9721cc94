use std::path::Path;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::{Catalog, CatalogError};

/// Immutable, versioned view of the catalog. Evaluations hold one snapshot for
/// their whole run, so a reload never changes data under an in-flight request.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    pub catalog: Catalog,
}

/// Holder of the current catalog snapshot. Reloads swap the `Arc`, never mutate in place.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        let snapshot = CatalogSnapshot {
            version: 1,
            loaded_at: Utc::now(),
            catalog,
        };
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Install `catalog` as the next version and return the new snapshot.
    pub fn replace(&self, catalog: Catalog) -> Arc<CatalogSnapshot> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let next = Arc::new(CatalogSnapshot {
            version: guard.version + 1,
            loaded_at: Utc::now(),
            catalog,
        });
        *guard = Arc::clone(&next);

        info!(
            version = next.version,
            programs = next.catalog.program_count(),
            "catalog snapshot installed"
        );
        next
    }

    /// Re-read a CSV catalog. On failure the current snapshot stays in service.
    pub fn reload_from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        match Catalog::from_path(path.as_ref()) {
            Ok(catalog) => Ok(self.replace(catalog)),
            Err(error) => {
                warn!(path = %path.as_ref().display(), %error, "catalog reload failed");
                Err(error)
            }
        }
    }
}
