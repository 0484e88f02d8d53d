//! Row types and their domain conversions

use crate::{Result, StoreError};
use search_traits::Repo;
use sqlx::FromRow;

/// Database row for a cached repository
#[derive(Debug, Clone, FromRow)]
pub struct RepoRow {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: i64,
    pub forks: i64,
    pub language: Option<String>,
}

impl From<RepoRow> for Repo {
    fn from(row: RepoRow) -> Self {
        Repo {
            id: row.id,
            name: row.name,
            full_name: row.full_name,
            description: row.description,
            url: row.url,
            stars: row.stars,
            forks: row.forks,
            language: row.language,
        }
    }
}

/// Directional continuation tokens remembered for one cached item.
///
/// `prev_key`/`next_key` are 1-based remote page numbers; `None` means
/// the service has no further data in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteKey {
    pub repo_id: i64,
    pub prev_key: Option<u32>,
    pub next_key: Option<u32>,
}

/// Database row for a remote key
#[derive(Debug, Clone, FromRow)]
pub struct RemoteKeyRow {
    pub repo_id: i64,
    pub prev_key: Option<i64>,
    pub next_key: Option<i64>,
}

impl TryFrom<RemoteKeyRow> for RemoteKey {
    type Error = StoreError;

    fn try_from(row: RemoteKeyRow) -> Result<Self> {
        Ok(RemoteKey {
            repo_id: row.repo_id,
            prev_key: convert_key(row.prev_key, "prev_key")?,
            next_key: convert_key(row.next_key, "next_key")?,
        })
    }
}

/// Page numbers are written as u32; anything outside that range was not
/// written by this crate.
fn convert_key(value: Option<i64>, column: &str) -> Result<Option<u32>> {
    value
        .map(|v| {
            u32::try_from(v).map_err(|_| StoreError::CorruptRow {
                table: "remote_keys".to_string(),
                message: format!("{} holds out-of-range value {}", column, v),
            })
        })
        .transpose()
}
