use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::catalog::{Catalog, CatalogSet, Locale};
use crate::db::Database;
use crate::wardrobe::selections::WardrobeSelections;

/// What the user is currently editing. Selections hold values of `locale`'s
/// catalog until they are translated for a prompt.
#[derive(Debug, Clone)]
pub struct Session {
    pub locale: Locale,
    pub selections: WardrobeSelections,
}

impl Session {
    pub fn new(locale: Locale) -> Self {
        Session {
            locale,
            selections: WardrobeSelections::default(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub catalogs: Arc<CatalogSet>,
    pub session: Arc<Mutex<Session>>,
    latest_request: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(db: Database, catalogs: CatalogSet, locale: Locale) -> Self {
        AppState {
            db,
            catalogs: Arc::new(catalogs),
            session: Arc::new(Mutex::new(Session::new(locale))),
            latest_request: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn locale(&self) -> Locale {
        self.session.lock().locale
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalogs.catalog(self.locale())
    }

    pub fn selections(&self) -> WardrobeSelections {
        self.session.lock().selections.clone()
    }

    pub fn update_selections<R>(&self, update: impl FnOnce(&mut WardrobeSelections) -> R) -> R {
        let mut session = self.session.lock();
        update(&mut session.selections)
    }

    /// Records a new generation and returns its id. Any request started
    /// earlier stops being the latest.
    pub fn begin_request(&self) -> u64 {
        self.latest_request.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, request_id: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) == request_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_state(dir: &tempfile::TempDir) -> AppState {
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("state.db").display());
        let db = Database::init(&url, "customWardrobePresets")
            .await
            .expect("init database");
        let catalogs = CatalogSet::load().expect("embedded catalogs");
        AppState::new(db, catalogs, Locale::Pt)
    }

    #[tokio::test]
    async fn only_the_newest_request_is_latest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = test_state(&dir).await;

        let first = state.begin_request();
        assert!(state.is_latest(first));
        let second = state.clone().begin_request();
        assert!(second > first);
        assert!(!state.is_latest(first));
        assert!(state.is_latest(second));
    }

    #[tokio::test]
    async fn clones_share_one_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = test_state(&dir).await;
        let other = state.clone();

        other.update_selections(|selections| selections.pose = "em pé".to_string());
        assert_eq!(state.selections().pose, "em pé");
        assert_eq!(state.locale(), Locale::Pt);
        assert_eq!(state.catalog().locale(), Locale::Pt);
    }
}
