use rusqlite::{Connection, params, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::cache::{MeaningCache, CachedMeanings, CacheStats};
use crate::error::{Result, WordGameError};

/// SQLite-based meaning cache
///
/// ```sql
/// CREATE TABLE meaning_cache (
///     word TEXT PRIMARY KEY,
///     meanings TEXT NOT NULL,
///     hit_count INTEGER DEFAULT 0,
///     cached_at TEXT NOT NULL
/// );
/// ```
pub struct SqliteMeaningCache {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMeaningCache {
    /// Open (or create) the cache database; `:memory:` works for tests
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS meaning_cache (
                word TEXT PRIMARY KEY,
                meanings TEXT NOT NULL,
                hit_count INTEGER DEFAULT 0,
                cached_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_meaning_cached_at ON meaning_cache(cached_at)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Trim and lowercase with Turkish dotted/dotless I handling
    fn normalize_word(word: &str) -> String {
        word.trim()
            .chars()
            .flat_map(|c| match c {
                'I' => vec!['ı'],
                'İ' => vec!['i'],
                other => other.to_lowercase().collect(),
            })
            .collect()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| WordGameError::Other("meaning cache connection poisoned".to_string()))
    }

    /// Fixed-width RFC 3339 so string comparison orders correctly
    fn timestamp(at: DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    fn parse_timestamp(value: Option<String>) -> Option<DateTime<Utc>> {
        value.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
    }
}

#[async_trait]
impl MeaningCache for SqliteMeaningCache {
    async fn get(&self, word: &str) -> Result<Option<CachedMeanings>> {
        let normalized = Self::normalize_word(word);
        let conn = self.lock()?;

        let row = conn
            .query_row(
                "SELECT meanings, hit_count, cached_at FROM meaning_cache WHERE word = ?",
                params![normalized],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i32>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((meanings_json, hit_count, cached_at)) = row else {
            return Ok(None);
        };

        let meanings: Vec<String> = serde_json::from_str(&meanings_json)?;
        let cached_at = Self::parse_timestamp(Some(cached_at)).unwrap_or_else(Utc::now);

        Ok(Some(CachedMeanings {
            word: normalized,
            meanings,
            hit_count,
            cached_at,
        }))
    }

    async fn save(&self, word: &str, meanings: &[String]) -> Result<()> {
        let normalized = Self::normalize_word(word);
        let meanings_json = serde_json::to_string(meanings)?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT OR REPLACE INTO meaning_cache (word, meanings, hit_count, cached_at)
             VALUES (?1, ?2, COALESCE((SELECT hit_count FROM meaning_cache WHERE word = ?1), 0), ?3)",
            params![normalized, meanings_json, Self::timestamp(Utc::now())],
        )?;

        Ok(())
    }

    async fn increment_hit(&self, word: &str) -> Result<()> {
        let normalized = Self::normalize_word(word);
        let conn = self.lock()?;

        conn.execute(
            "UPDATE meaning_cache SET hit_count = hit_count + 1 WHERE word = ?",
            params![normalized],
        )?;

        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let conn = self.lock()?;

        let (total_entries, total_hits, oldest, newest): (u64, u64, Option<String>, Option<String>) =
            conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(hit_count), 0), MIN(cached_at), MAX(cached_at)
                 FROM meaning_cache",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        let avg_hit_count = if total_entries > 0 {
            total_hits as f64 / total_entries as f64
        } else {
            0.0
        };

        Ok(CacheStats {
            total_entries,
            total_hits,
            avg_hit_count,
            oldest_entry: Self::parse_timestamp(oldest),
            newest_entry: Self::parse_timestamp(newest),
        })
    }

    async fn cleanup(&self, max_age_days: i64) -> Result<u64> {
        let conn = self.lock()?;
        let cutoff = Utc::now() - chrono::Duration::days(max_age_days);

        let deleted = conn.execute(
            "DELETE FROM meaning_cache WHERE cached_at < ?",
            params![Self::timestamp(cutoff)],
        )?;

        Ok(deleted as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meanings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_cache_create() {
        let cache = SqliteMeaningCache::new(":memory:").await.unwrap();
        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.total_entries, 0);
        assert!(stats.oldest_entry.is_none());
    }

    #[tokio::test]
    async fn test_cache_save_and_get() {
        let cache = SqliteMeaningCache::new(":memory:").await.unwrap();

        cache
            .save("elma", &meanings(&["Gülgillerden bir ağacın meyvesi", "Elma ağacı"]))
            .await
            .unwrap();

        let cached = cache.get("elma").await.unwrap().unwrap();
        assert_eq!(cached.meanings.len(), 2);
        assert_eq!(cached.hit_count, 0);
        assert!(cache.get("armut").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_turkish_case_folding() {
        let cache = SqliteMeaningCache::new(":memory:").await.unwrap();
        cache.save("  IŞIK ", &meanings(&["Aydınlık"])).await.unwrap();

        assert!(cache.get("ışık").await.unwrap().is_some());
        assert!(cache.get("Işık").await.unwrap().is_some());

        cache.save("İnsan", &meanings(&["Düşünen varlık"])).await.unwrap();
        assert!(cache.get("insan").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cache_increment_hit_survives_resave() {
        let cache = SqliteMeaningCache::new(":memory:").await.unwrap();
        cache.save("kitap", &meanings(&["Ciltli yapraklar"])).await.unwrap();

        cache.increment_hit("kitap").await.unwrap();
        cache.increment_hit("kitap").await.unwrap();
        cache.save("kitap", &meanings(&["Yeni anlam"])).await.unwrap();

        let cached = cache.get("kitap").await.unwrap().unwrap();
        assert_eq!(cached.hit_count, 2);
        assert_eq!(cached.meanings, meanings(&["Yeni anlam"]));
    }

    #[tokio::test]
    async fn test_cache_stats() {
        let cache = SqliteMeaningCache::new(":memory:").await.unwrap();
        cache.save("elma", &meanings(&["a"])).await.unwrap();
        cache.save("armut", &meanings(&["b"])).await.unwrap();

        cache.increment_hit("elma").await.unwrap();
        cache.increment_hit("elma").await.unwrap();
        cache.increment_hit("armut").await.unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_hits, 3);
        assert_eq!(stats.avg_hit_count, 1.5);
        assert!(stats.oldest_entry.is_some());
        assert!(stats.newest_entry.is_some());
    }

    #[tokio::test]
    async fn test_cache_cleanup() {
        let cache = SqliteMeaningCache::new(":memory:").await.unwrap();
        cache.save("eski", &meanings(&["x"])).await.unwrap();

        // 0 days: everything saved before now is expired
        let deleted = cache.cleanup(0).await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(cache.stats().await.unwrap().total_entries, 0);
    }
}
