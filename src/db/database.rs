use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::models::{CustomPreset, StorageRow};
use crate::error::WardrobeResult;
use crate::wardrobe::selections::WardrobeSelections;

/// Key/value store standing in for browser local storage. Custom presets
/// live as one JSON list under a single key.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    presets_key: String,
}

impl Database {
    pub async fn init(database_url: &str, presets_key: &str) -> WardrobeResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS local_storage (\
                key TEXT PRIMARY KEY,\
                value TEXT NOT NULL,\
                updated_at TEXT NOT NULL\
            );",
        )
        .execute(&pool)
        .await?;

        info!("Database tables created successfully");

        Ok(Database {
            pool,
            presets_key: presets_key.to_string(),
        })
    }

    pub async fn get_item(&self, key: &str) -> WardrobeResult<Option<String>> {
        let row = sqlx::query_as::<_, StorageRow>(
            "SELECT key, value, updated_at FROM local_storage WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| row.value))
    }

    pub async fn set_item(&self, key: &str, value: &str) -> WardrobeResult<()> {
        sqlx::query(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET \
             value = excluded.value, \
             updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove_item(&self, key: &str) -> WardrobeResult<bool> {
        let result = sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Saved presets in insertion order. A value that no longer parses is
    /// logged and read as an empty list.
    pub async fn list_presets(&self) -> WardrobeResult<Vec<CustomPreset>> {
        let Some(raw) = self.get_item(&self.presets_key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<CustomPreset>>(&raw) {
            Ok(presets) => Ok(presets),
            Err(err) => {
                warn!(
                    "Ignoring unreadable presets stored under '{}': {}",
                    self.presets_key, err
                );
                Ok(Vec::new())
            }
        }
    }

    async fn store_presets(&self, presets: &[CustomPreset]) -> WardrobeResult<()> {
        let raw = serde_json::to_string(presets)?;
        self.set_item(&self.presets_key, &raw).await
    }

    pub async fn get_preset(&self, id: &str) -> WardrobeResult<Option<CustomPreset>> {
        Ok(self
            .list_presets()
            .await?
            .into_iter()
            .find(|preset| preset.id == id))
    }

    /// Appends a snapshot. Ids are creation times in milliseconds, bumped
    /// past any id already taken.
    pub async fn save_preset(
        &self,
        name: &str,
        selections: &WardrobeSelections,
    ) -> WardrobeResult<CustomPreset> {
        let mut presets = self.list_presets().await?;
        let created_at = Utc::now();
        let mut id = created_at.timestamp_millis();
        while presets.iter().any(|preset| preset.id == id.to_string()) {
            id += 1;
        }

        let preset = CustomPreset {
            id: id.to_string(),
            name: name.trim().to_string(),
            selections: selections.clone(),
            created_at,
        };
        presets.push(preset.clone());
        self.store_presets(&presets).await?;
        info!("Saved custom preset '{}' ({})", preset.name, preset.id);
        Ok(preset)
    }

    pub async fn delete_preset(&self, id: &str) -> WardrobeResult<bool> {
        let mut presets = self.list_presets().await?;
        let before = presets.len();
        presets.retain(|preset| preset.id != id);
        if presets.len() == before {
            return Ok(false);
        }
        if presets.is_empty() {
            self.remove_item(&self.presets_key).await?;
        } else {
            self.store_presets(&presets).await?;
        }
        info!("Deleted custom preset {}", id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_db(dir: &tempfile::TempDir) -> Database {
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("wardrobe.db").display()
        );
        Database::init(&url, "customWardrobePresets")
            .await
            .expect("init database")
    }

    #[tokio::test]
    async fn items_round_trip_and_overwrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = temp_db(&dir).await;

        assert_eq!(db.get_item("k").await.unwrap(), None);
        db.set_item("k", "one").await.unwrap();
        db.set_item("k", "two").await.unwrap();
        assert_eq!(db.get_item("k").await.unwrap().as_deref(), Some("two"));
        assert!(db.remove_item("k").await.unwrap());
        assert!(!db.remove_item("k").await.unwrap());
    }

    #[tokio::test]
    async fn presets_keep_insertion_order_and_unique_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = temp_db(&dir).await;

        let mut selections = WardrobeSelections::default();
        selections.hair.color = "red".to_string();
        let first = db.save_preset("  Red hair ", &selections).await.unwrap();
        let second = db
            .save_preset("Plain", &WardrobeSelections::default())
            .await
            .unwrap();

        assert_eq!(first.name, "Red hair");
        assert_ne!(first.id, second.id);
        let listed = db.list_presets().await.unwrap();
        assert_eq!(
            listed.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["Red hair", "Plain"]
        );
        let fetched = db.get_preset(&first.id).await.unwrap().expect("preset");
        assert_eq!(fetched.selections.hair.color, "red");
    }

    #[tokio::test]
    async fn deleting_reports_whether_anything_went() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = temp_db(&dir).await;
        let preset = db
            .save_preset("Gone soon", &WardrobeSelections::default())
            .await
            .unwrap();

        let kept = db
            .save_preset("Stays", &WardrobeSelections::default())
            .await
            .unwrap();

        assert!(db.delete_preset(&preset.id).await.unwrap());
        assert!(!db.delete_preset(&preset.id).await.unwrap());
        assert!(db.get_item("customWardrobePresets").await.unwrap().is_some());

        assert!(db.delete_preset(&kept.id).await.unwrap());
        assert!(db.list_presets().await.unwrap().is_empty());
        assert_eq!(db.get_item("customWardrobePresets").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unreadable_storage_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = temp_db(&dir).await;
        db.set_item("customWardrobePresets", "{not json").await.unwrap();
        assert!(db.list_presets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn legacy_presets_with_scalar_styles_still_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = temp_db(&dir).await;
        let legacy = r#"[{"id":"1700000000000","name":"Old","selections":{"clothing":{"tops":{"type":"T-shirt","style":"v-neck"}}}}]"#;
        db.set_item("customWardrobePresets", legacy).await.unwrap();

        let presets = db.list_presets().await.unwrap();
        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].selections.clothing.tops.style, vec!["v-neck"]);
    }
}
