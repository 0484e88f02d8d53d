//! Search cache stores: cached repositories plus their remote keys
//!
//! The two tables always change together through [`SearchStore::commit_page`],
//! so every cached repo has a resolvable key written by the same
//! transaction. The narrower traits exist for callers that only read one
//! side.

use crate::models::{RemoteKey, RemoteKeyRow, RepoRow};
use crate::pagination::{Page, PageRequest};
use crate::{Result, StoreError};
use async_trait::async_trait;
use search_traits::Repo;
use sqlx::{query_as, SqlitePool};
use tracing::debug;

/// Read order for all repo queries. The `id` tie-break makes the order
/// total, so adjacent read windows never skip or repeat an item.
const REPO_ORDER: &str = "stars DESC, name ASC, id ASC";

/// Cached repository access
#[async_trait]
pub trait RepoStore: Send + Sync {
    /// Upsert fetched repositories by id
    async fn insert_repos(&self, repos: &[Repo]) -> Result<()>;

    /// Delete all cached repositories
    async fn clear_repos(&self) -> Result<()>;

    /// Read one window of repositories matching `query`, ordered by
    /// stars descending then name ascending
    async fn repos_by_name(&self, query: &str, request: PageRequest) -> Result<Page<Repo>>;

    /// First repository in read order, if any match `query`
    async fn first_repo(&self, query: &str) -> Result<Option<Repo>>;

    /// Last repository in read order, if any match `query`
    async fn last_repo(&self, query: &str) -> Result<Option<Repo>>;

    /// Number of cached repositories matching `query`
    async fn count_repos(&self, query: &str) -> Result<u64>;
}

/// Remote continuation key access
#[async_trait]
pub trait RemoteKeyStore: Send + Sync {
    /// Key record for one cached item
    async fn remote_key(&self, repo_id: i64) -> Result<Option<RemoteKey>>;

    /// Upsert key records by repo id
    async fn insert_keys(&self, keys: &[RemoteKey]) -> Result<()>;

    /// Atomically drop every key record and write the given ones
    async fn replace_keys(&self, keys: &[RemoteKey]) -> Result<()>;

    /// Delete all key records
    async fn clear_keys(&self) -> Result<()>;
}

/// One fetched page, ready to commit.
#[derive(Debug, Clone)]
pub struct PageCommit {
    /// Clear both tables first (refresh semantics)
    pub clear_existing: bool,
    pub repos: Vec<Repo>,
    pub keys: Vec<RemoteKey>,
}

/// Combined store with the atomic commit the sync path requires.
#[async_trait]
pub trait SearchStore: RepoStore + RemoteKeyStore {
    /// Apply one fetched page in a single transaction.
    ///
    /// With `clear_existing` set this is the refresh path: both tables
    /// are emptied and rewritten so readers observe either the old
    /// cache or the new one, never a mix.
    async fn commit_page(&self, commit: PageCommit) -> Result<()>;
}

/// SQLite implementation of the search cache
pub struct SqliteSearchStore {
    pool: SqlitePool,
}

impl SqliteSearchStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// `LIKE` pattern for a user query: substring match, with spaces
/// widened so multi-word queries match in order.
fn like_pattern(query: &str) -> String {
    format!("%{}%", query.trim().replace(' ', "%"))
}

async fn insert_repo_rows(conn: &mut sqlx::SqliteConnection, repos: &[Repo]) -> Result<()> {
    for repo in repos {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO repos (
                id, name, full_name, description, url, stars, forks, language
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(repo.id)
        .bind(&repo.name)
        .bind(&repo.full_name)
        .bind(&repo.description)
        .bind(&repo.url)
        .bind(repo.stars)
        .bind(repo.forks)
        .bind(&repo.language)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_key_rows(conn: &mut sqlx::SqliteConnection, keys: &[RemoteKey]) -> Result<()> {
    for key in keys {
        sqlx::query(
            "INSERT OR REPLACE INTO remote_keys (repo_id, prev_key, next_key) VALUES (?, ?, ?)",
        )
        .bind(key.repo_id)
        .bind(key.prev_key.map(i64::from))
        .bind(key.next_key.map(i64::from))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl RepoStore for SqliteSearchStore {
    async fn insert_repos(&self, repos: &[Repo]) -> Result<()> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::Database)?;
        insert_repo_rows(&mut conn, repos).await
    }

    async fn clear_repos(&self) -> Result<()> {
        sqlx::query("DELETE FROM repos").execute(&self.pool).await?;
        Ok(())
    }

    async fn repos_by_name(&self, query: &str, request: PageRequest) -> Result<Page<Repo>> {
        let pattern = like_pattern(query);

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM repos WHERE name LIKE ? OR description LIKE ?")
                .bind(&pattern)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;

        let rows = query_as::<_, RepoRow>(&format!(
            "SELECT * FROM repos WHERE name LIKE ? OR description LIKE ? \
             ORDER BY {} LIMIT ? OFFSET ?",
            REPO_ORDER
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(rows, total.0 as u64, request).map(Repo::from))
    }

    async fn first_repo(&self, query: &str) -> Result<Option<Repo>> {
        let pattern = like_pattern(query);

        let row = query_as::<_, RepoRow>(&format!(
            "SELECT * FROM repos WHERE name LIKE ? OR description LIKE ? \
             ORDER BY {} LIMIT 1",
            REPO_ORDER
        ))
        .bind(&pattern)
        .bind(&pattern)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Repo::from))
    }

    async fn last_repo(&self, query: &str) -> Result<Option<Repo>> {
        let pattern = like_pattern(query);

        // Reverse of REPO_ORDER, so LIMIT 1 lands on the final item
        let row = query_as::<_, RepoRow>(
            "SELECT * FROM repos WHERE name LIKE ? OR description LIKE ? \
             ORDER BY stars ASC, name DESC, id DESC LIMIT 1",
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Repo::from))
    }

    async fn count_repos(&self, query: &str) -> Result<u64> {
        let pattern = like_pattern(query);

        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM repos WHERE name LIKE ? OR description LIKE ?")
                .bind(&pattern)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0 as u64)
    }
}

#[async_trait]
impl RemoteKeyStore for SqliteSearchStore {
    async fn remote_key(&self, repo_id: i64) -> Result<Option<RemoteKey>> {
        let row = query_as::<_, RemoteKeyRow>("SELECT * FROM remote_keys WHERE repo_id = ?")
            .bind(repo_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(RemoteKey::try_from).transpose()
    }

    async fn insert_keys(&self, keys: &[RemoteKey]) -> Result<()> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::Database)?;
        insert_key_rows(&mut conn, keys).await
    }

    async fn replace_keys(&self, keys: &[RemoteKey]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(StoreError::Database)?;

        sqlx::query("DELETE FROM remote_keys")
            .execute(&mut *tx)
            .await?;
        insert_key_rows(&mut tx, keys).await?;

        tx.commit().await.map_err(StoreError::Database)?;
        Ok(())
    }

    async fn clear_keys(&self) -> Result<()> {
        sqlx::query("DELETE FROM remote_keys")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SearchStore for SqliteSearchStore {
    async fn commit_page(&self, commit: PageCommit) -> Result<()> {
        debug!(
            repos = commit.repos.len(),
            keys = commit.keys.len(),
            clear_existing = commit.clear_existing,
            "Committing fetched page"
        );

        let mut tx = self.pool.begin().await.map_err(StoreError::Database)?;

        if commit.clear_existing {
            sqlx::query("DELETE FROM remote_keys")
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM repos").execute(&mut *tx).await?;
        }

        insert_key_rows(&mut tx, &commit.keys).await?;
        insert_repo_rows(&mut tx, &commit.repos).await?;

        tx.commit().await.map_err(StoreError::Database)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    fn repo(id: i64, name: &str, stars: i64) -> Repo {
        Repo {
            id,
            name: name.to_string(),
            full_name: format!("example/{}", name),
            description: Some(format!("{} description", name)),
            url: format!("https://example.com/example/{}", name),
            stars,
            forks: 0,
            language: Some("Rust".to_string()),
        }
    }

    fn key(repo_id: i64, prev_key: Option<u32>, next_key: Option<u32>) -> RemoteKey {
        RemoteKey {
            repo_id,
            prev_key,
            next_key,
        }
    }

    async fn test_store() -> SqliteSearchStore {
        let pool = create_test_pool().await.unwrap();
        SqliteSearchStore::new(pool)
    }

    #[tokio::test]
    async fn test_read_order_stars_desc_then_name() {
        let store = test_store().await;
        store
            .insert_repos(&[
                repo(1, "zeta", 10),
                repo(2, "alpha", 10),
                repo(3, "mid", 50),
            ])
            .await
            .unwrap();

        let page = store
            .repos_by_name("", PageRequest::default())
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["mid", "alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_read_order_breaks_full_ties_by_id() {
        let store = test_store().await;
        store
            .insert_repos(&[repo(9, "same", 5), repo(3, "same", 5)])
            .await
            .unwrap();

        let page = store
            .repos_by_name("same", PageRequest::default())
            .await
            .unwrap();
        let ids: Vec<_> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 9]);
    }

    #[tokio::test]
    async fn test_insert_is_upsert_by_id() {
        let store = test_store().await;
        store.insert_repos(&[repo(1, "first", 5)]).await.unwrap();
        store.insert_repos(&[repo(1, "first", 99)]).await.unwrap();

        let page = store
            .repos_by_name("first", PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].stars, 99);
    }

    #[tokio::test]
    async fn test_query_matches_name_or_description() {
        let store = test_store().await;
        let mut named = repo(1, "searchlib", 5);
        named.description = Some("a library".to_string());
        let mut described = repo(2, "other", 5);
        described.description = Some("does searching".to_string());
        let mut unrelated = repo(3, "unrelated", 5);
        unrelated.description = Some("nothing here".to_string());

        store
            .insert_repos(&[named, described, unrelated])
            .await
            .unwrap();

        let page = store
            .repos_by_name("search", PageRequest::default())
            .await
            .unwrap();
        let ids: Vec<_> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_multi_word_query_widens_to_ordered_match() {
        let store = test_store().await;
        store
            .insert_repos(&[repo(1, "async-paging-core", 5), repo(2, "paging-async", 5)])
            .await
            .unwrap();

        let page = store
            .repos_by_name("async paging", PageRequest::default())
            .await
            .unwrap();
        let ids: Vec<_> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn test_pagination_windows_cover_without_overlap() {
        let store = test_store().await;
        let repos: Vec<Repo> = (1..=5).map(|i| repo(i, &format!("repo-{}", i), 5)).collect();
        store.insert_repos(&repos).await.unwrap();

        let first = store
            .repos_by_name("repo", PageRequest::new(0, 2))
            .await
            .unwrap();
        let second = store
            .repos_by_name("repo", PageRequest::new(1, 2))
            .await
            .unwrap();
        let third = store
            .repos_by_name("repo", PageRequest::new(2, 2))
            .await
            .unwrap();

        assert_eq!(first.total_pages, 3);
        assert!(first.has_next());
        assert!(!third.has_next());

        let mut seen: Vec<i64> = first
            .items
            .iter()
            .chain(second.items.iter())
            .chain(third.items.iter())
            .map(|r| r.id)
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 5, "windows must not skip or repeat items");
    }

    #[tokio::test]
    async fn test_first_and_last_repo() {
        let store = test_store().await;
        store
            .insert_repos(&[
                repo(1, "low", 1),
                repo(2, "high", 100),
                repo(3, "middle", 50),
            ])
            .await
            .unwrap();

        let first = store.first_repo("").await.unwrap().unwrap();
        let last = store.last_repo("").await.unwrap().unwrap();
        assert_eq!(first.name, "high");
        assert_eq!(last.name, "low");
    }

    #[tokio::test]
    async fn test_first_repo_empty_store() {
        let store = test_store().await;
        assert!(store.first_repo("anything").await.unwrap().is_none());
        assert!(store.last_repo("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remote_key_roundtrip() {
        let store = test_store().await;
        store
            .insert_keys(&[key(7, None, Some(2)), key(8, Some(1), Some(3))])
            .await
            .unwrap();

        let found = store.remote_key(7).await.unwrap().unwrap();
        assert_eq!(found.prev_key, None);
        assert_eq!(found.next_key, Some(2));

        assert!(store.remote_key(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_keys_upserts_by_repo_id() {
        let store = test_store().await;
        store.insert_keys(&[key(7, None, Some(2))]).await.unwrap();
        store
            .insert_keys(&[key(7, Some(1), Some(3))])
            .await
            .unwrap();

        let found = store.remote_key(7).await.unwrap().unwrap();
        assert_eq!(found.prev_key, Some(1));
        assert_eq!(found.next_key, Some(3));
    }

    #[tokio::test]
    async fn test_replace_keys_drops_previous_records() {
        let store = test_store().await;
        store
            .insert_keys(&[key(1, None, Some(2)), key(2, None, Some(2))])
            .await
            .unwrap();

        store.replace_keys(&[key(3, Some(1), None)]).await.unwrap();

        assert!(store.remote_key(1).await.unwrap().is_none());
        assert!(store.remote_key(2).await.unwrap().is_none());
        assert!(store.remote_key(3).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_both_tables() {
        let store = test_store().await;
        store.insert_repos(&[repo(1, "gone", 5)]).await.unwrap();
        store.insert_keys(&[key(1, None, Some(2))]).await.unwrap();

        store.clear_keys().await.unwrap();
        store.clear_repos().await.unwrap();

        assert_eq!(store.count_repos("").await.unwrap(), 0);
        assert!(store.remote_key(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_commit_page_appends_to_existing_cache() {
        let store = test_store().await;
        store
            .commit_page(PageCommit {
                clear_existing: true,
                repos: vec![repo(1, "page-one", 50)],
                keys: vec![key(1, None, Some(2))],
            })
            .await
            .unwrap();

        store
            .commit_page(PageCommit {
                clear_existing: false,
                repos: vec![repo(2, "page-two", 40)],
                keys: vec![key(2, Some(1), Some(3))],
            })
            .await
            .unwrap();

        assert_eq!(store.count_repos("").await.unwrap(), 2);
        assert!(store.remote_key(1).await.unwrap().is_some());
        assert!(store.remote_key(2).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_commit_page_refresh_replaces_cache() {
        let store = test_store().await;
        store
            .commit_page(PageCommit {
                clear_existing: false,
                repos: vec![repo(1, "stale", 50), repo(2, "stale-too", 40)],
                keys: vec![key(1, None, Some(2)), key(2, None, Some(2))],
            })
            .await
            .unwrap();

        store
            .commit_page(PageCommit {
                clear_existing: true,
                repos: vec![repo(3, "fresh", 10)],
                keys: vec![key(3, None, Some(2))],
            })
            .await
            .unwrap();

        let page = store
            .repos_by_name("", PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "fresh");
        assert!(store.remote_key(1).await.unwrap().is_none());
        assert!(store.remote_key(3).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_every_committed_repo_has_a_key() {
        let store = test_store().await;
        let repos: Vec<Repo> = (1..=3).map(|i| repo(i, &format!("r-{}", i), 5)).collect();
        let keys: Vec<RemoteKey> = repos.iter().map(|r| key(r.id, None, Some(2))).collect();

        store
            .commit_page(PageCommit {
                clear_existing: true,
                repos,
                keys,
            })
            .await
            .unwrap();

        for id in 1..=3 {
            assert!(store.remote_key(id).await.unwrap().is_some());
        }
    }
}
