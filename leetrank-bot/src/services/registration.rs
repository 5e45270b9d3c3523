//! Register and refresh LeetCode profiles for chat callers.

use std::sync::Arc;
use thiserror::Error;

use crate::db::{ProfileStore, StoreError};
use crate::leetcode::{FetchError, StatsFetcher};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("a LeetCode username is required")]
    MissingUsername,
    /// The upstream fetch failed; the kind is kept so callers can tell outage from absence
    #[error("LeetCode profile not found ({0})")]
    NotFound(FetchError),
    #[error("username is not registered")]
    NotRegistered,
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for RegistrationError {
    fn from(e: StoreError) -> Self {
        RegistrationError::Storage(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub total_solved: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refresh {
    pub username: String,
    pub total_solved: u32,
    /// Whether the stored count was updated by this refresh
    pub changed: bool,
}

/// Outcome of refreshing every tracked username
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub checked: usize,
    pub updated: usize,
    pub failed: usize,
}

pub struct RegistrationService {
    fetcher: Arc<dyn StatsFetcher>,
    store: Arc<dyn ProfileStore>,
}

impl RegistrationService {
    pub fn new(fetcher: Arc<dyn StatsFetcher>, store: Arc<dyn ProfileStore>) -> Self {
        Self { fetcher, store }
    }

    /// Fetch the solved count for `username` and bind it to `caller_id`,
    /// replacing whatever the caller tracked before.
    pub async fn register(
        &self,
        caller_id: &str,
        username: &str,
    ) -> Result<Registration, RegistrationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RegistrationError::MissingUsername);
        }

        let total_solved = self
            .fetcher
            .fetch_solved_count(username)
            .await
            .map_err(RegistrationError::NotFound)?;

        let previous = self.store.get_profile(caller_id)?;
        let record = self.store.upsert_profile(caller_id, username, total_solved)?;
        match previous {
            Some(prev) if prev.leetcode_username != record.leetcode_username => log::info!(
                "Re-registered {}: {} -> {} ({} solved)",
                caller_id,
                prev.leetcode_username,
                record.leetcode_username,
                record.total_solved
            ),
            _ => log::info!(
                "Registered {} as {} ({} solved)",
                caller_id,
                record.leetcode_username,
                record.total_solved
            ),
        }

        Ok(Registration {
            username: record.leetcode_username,
            total_solved: record.total_solved,
        })
    }

    /// Re-fetch the count for a registered username. An upstream failure
    /// returns the stored count with `changed = false`.
    pub async fn refresh(&self, username: &str) -> Result<Refresh, RegistrationError> {
        let (refresh, fetch_error) = self.refresh_inner(username).await?;
        if let Some(e) = fetch_error {
            log::warn!(
                "Refresh of {} failed, serving stored count {}: {}",
                refresh.username,
                refresh.total_solved,
                e
            );
        }
        Ok(refresh)
    }

    /// Refresh each distinct tracked username once.
    pub async fn refresh_all(&self) -> Result<RefreshSummary, RegistrationError> {
        let usernames = self.store.list_tracked_usernames()?;
        let mut summary = RefreshSummary::default();

        for username in usernames {
            summary.checked += 1;
            match self.refresh_inner(&username).await {
                Ok((refresh, None)) => {
                    if refresh.changed {
                        summary.updated += 1;
                    }
                }
                Ok((_, Some(e))) => {
                    log::warn!("Refresh of {} failed: {}", username, e);
                    summary.failed += 1;
                }
                // Re-registered away between listing and refreshing
                Err(RegistrationError::NotRegistered) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    async fn refresh_inner(
        &self,
        username: &str,
    ) -> Result<(Refresh, Option<FetchError>), RegistrationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RegistrationError::MissingUsername);
        }

        let stored = self
            .store
            .get_profile_by_username(username)?
            .ok_or(RegistrationError::NotRegistered)?;

        match self.fetcher.fetch_solved_count(username).await {
            Ok(total_solved) => {
                // Other callers tracking the same username may hold an older count
                let rows = self.store.update_solved_count(username, total_solved)?;
                let changed = rows > 0;
                if changed {
                    log::info!(
                        "Updated {}: {} -> {} solved ({} record(s))",
                        username,
                        stored.total_solved,
                        total_solved,
                        rows
                    );
                }
                Ok((
                    Refresh {
                        username: stored.leetcode_username,
                        total_solved,
                        changed,
                    },
                    None,
                ))
            }
            Err(e) => Ok((
                Refresh {
                    username: stored.leetcode_username,
                    total_solved: stored.total_solved,
                    changed: false,
                },
                Some(e),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::leetcode::MockStatsFetcher;

    fn service(fetcher: MockStatsFetcher) -> (RegistrationService, Arc<Database>) {
        let db = Arc::new(Database::new(":memory:").expect("in-memory db"));
        (RegistrationService::new(Arc::new(fetcher), db.clone()), db)
    }

    #[tokio::test]
    async fn test_register_stores_fetched_count() {
        let (svc, db) = service(MockStatsFetcher::new().respond("alice", Ok(50)));

        let reg = svc.register("tg:1", "alice").await.unwrap();
        assert_eq!(
            reg,
            Registration {
                username: "alice".to_string(),
                total_solved: 50
            }
        );

        let stored = db.get_leetcode_profile("tg:1").unwrap().unwrap();
        assert_eq!(stored.leetcode_username, "alice");
        assert_eq!(stored.total_solved, 50);
    }

    #[tokio::test]
    async fn test_reregister_overwrites_username_and_count() {
        let fetcher = MockStatsFetcher::new()
            .respond("alice", Ok(50))
            .respond("alice_alt", Ok(7));
        let (svc, db) = service(fetcher);

        svc.register("tg:1", "alice").await.unwrap();
        svc.register("tg:1", "alice_alt").await.unwrap();

        let all = db.list_leetcode_profiles_by_solved().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].leetcode_username, "alice_alt");
        assert_eq!(all[0].total_solved, 7);
    }

    #[tokio::test]
    async fn test_register_not_found_writes_nothing() {
        let (svc, db) = service(MockStatsFetcher::new().respond("ghost", Err(FetchError::NotFound)));

        let err = svc.register("tg:1", "ghost").await.unwrap_err();
        assert!(matches!(err, RegistrationError::NotFound(FetchError::NotFound)));
        assert!(db.get_leetcode_profile("tg:1").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_keeps_unavailable_kind() {
        let fetcher =
            MockStatsFetcher::new().respond("alice", Err(FetchError::Unavailable("timeout".into())));
        let (svc, db) = service(fetcher);

        let err = svc.register("tg:1", "alice").await.unwrap_err();
        assert!(matches!(err, RegistrationError::NotFound(FetchError::Unavailable(_))));
        assert!(db.list_leetcode_profiles_by_solved().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_blank_username_skips_fetch() {
        let fetcher = MockStatsFetcher::new();
        let (svc, _db) = service(fetcher.clone());

        let err = svc.register("tg:1", "   ").await.unwrap_err();
        assert!(matches!(err, RegistrationError::MissingUsername));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_unregistered_skips_fetch() {
        let fetcher = MockStatsFetcher::new().respond("bob", Ok(3));
        let (svc, _db) = service(fetcher.clone());

        let err = svc.refresh("bob").await.unwrap_err();
        assert!(matches!(err, RegistrationError::NotRegistered));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_with_new_count_updates_store() {
        let fetcher = MockStatsFetcher::new()
            .respond("alice", Ok(50))
            .respond("alice", Ok(64));
        let (svc, db) = service(fetcher);
        svc.register("tg:1", "alice").await.unwrap();

        let refresh = svc.refresh("alice").await.unwrap();
        assert_eq!(refresh.total_solved, 64);
        assert!(refresh.changed);
        assert_eq!(db.get_leetcode_profile("tg:1").unwrap().unwrap().total_solved, 64);
    }

    #[tokio::test]
    async fn test_refresh_with_same_count_is_unchanged() {
        let fetcher = MockStatsFetcher::new()
            .respond("alice", Ok(50))
            .respond("alice", Ok(50));
        let (svc, _db) = service(fetcher);
        svc.register("tg:1", "alice").await.unwrap();

        let refresh = svc.refresh("alice").await.unwrap();
        assert_eq!(refresh.total_solved, 50);
        assert!(!refresh.changed);
    }

    #[tokio::test]
    async fn test_refresh_when_upstream_down_serves_stored_count() {
        let fetcher = MockStatsFetcher::new()
            .respond("alice", Ok(50))
            .respond("alice", Err(FetchError::Unavailable("connection refused".into())));
        let (svc, db) = service(fetcher);
        svc.register("tg:1", "alice").await.unwrap();

        let refresh = svc.refresh("alice").await.unwrap();
        assert_eq!(refresh.total_solved, 50);
        assert!(!refresh.changed);
        assert_eq!(db.get_leetcode_profile("tg:1").unwrap().unwrap().total_solved, 50);
    }

    #[tokio::test]
    async fn test_refresh_all_counts_outcomes() {
        let fetcher = MockStatsFetcher::new()
            .respond("alice", Ok(10))
            .respond("bob", Ok(20))
            .respond("carol", Ok(30))
            .respond("alice", Ok(11))
            .respond("bob", Ok(20))
            .respond("carol", Err(FetchError::NotFound));
        let (svc, db) = service(fetcher.clone());
        svc.register("tg:1", "alice").await.unwrap();
        svc.register("tg:2", "bob").await.unwrap();
        svc.register("tg:3", "carol").await.unwrap();

        let summary = svc.refresh_all().await.unwrap();
        assert_eq!(
            summary,
            RefreshSummary {
                checked: 3,
                updated: 1,
                failed: 1
            }
        );
        assert_eq!(db.get_leetcode_profile("tg:1").unwrap().unwrap().total_solved, 11);
        assert_eq!(db.get_leetcode_profile("tg:3").unwrap().unwrap().total_solved, 30);
        assert_eq!(fetcher.calls().len(), 6);
    }

    #[tokio::test]
    async fn test_refresh_repairs_every_caller_sharing_username() {
        let fetcher = MockStatsFetcher::new()
            .respond("x", Ok(10))
            .respond("x", Ok(12))
            .respond("x", Ok(12))
            .respond("x", Ok(12));
        let (svc, db) = service(fetcher);
        svc.register("tg:2", "x").await.unwrap();
        svc.register("tg:1", "x").await.unwrap();

        // tg:1 already holds 12, tg:2 still holds 10
        let refresh = svc.refresh("x").await.unwrap();
        assert_eq!(refresh.total_solved, 12);
        assert!(refresh.changed);
        assert_eq!(db.get_leetcode_profile("tg:1").unwrap().unwrap().total_solved, 12);
        assert_eq!(db.get_leetcode_profile("tg:2").unwrap().unwrap().total_solved, 12);

        let summary = svc.refresh_all().await.unwrap();
        assert_eq!(
            summary,
            RefreshSummary {
                checked: 1,
                updated: 0,
                failed: 0
            }
        );
    }
}
