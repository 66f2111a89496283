//! Duplicate-user reconciliation.
//!
//! Registration checks normalised-name uniqueness, but nothing in the store
//! enforces it, so duplicates can appear through races or legacy rows. The
//! sweep groups users by normalised name, keeps the lowest identifier in each
//! group, moves every rating onto it, and deletes the rest. Each group is
//! merged in its own transaction; a group that fails is left intact and the
//! sweep moves on.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::persistence_error_mapping::map_user_persistence_error;
use crate::domain::ports::{ReconciliationReport, UserReconciliation, UserRepository};
use crate::domain::{Error, NormalizedName, User, UserId};

/// Users sharing one normalised name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub name: NormalizedName,
    /// Lowest identifier in the group.
    pub survivor: UserId,
    /// Every other member, ascending.
    pub duplicates: Vec<UserId>,
}

/// Group `users` by normalised name, keeping only groups with more than one
/// member. Groups are ordered by name.
///
/// # Examples
/// ```
/// use teahouse::domain::{find_duplicate_groups, User, UserId};
///
/// let users = [
///     User::new(UserId::new(1), "amy"),
///     User::new(UserId::new(2), "Amy "),
///     User::new(UserId::new(3), "bob"),
/// ];
/// let groups = find_duplicate_groups(&users);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].survivor, UserId::new(1));
/// assert_eq!(groups[0].duplicates, vec![UserId::new(2)]);
/// ```
#[must_use]
pub fn find_duplicate_groups(users: &[User]) -> Vec<DuplicateGroup> {
    let mut by_name: BTreeMap<NormalizedName, Vec<UserId>> = BTreeMap::new();
    for user in users {
        by_name
            .entry(user.normalized_name())
            .or_default()
            .push(user.id());
    }
    by_name
        .into_iter()
        .filter_map(|(name, mut ids)| {
            ids.sort_unstable();
            let (survivor, duplicates) = ids.split_first()?;
            if duplicates.is_empty() {
                return None;
            }
            Some(DuplicateGroup {
                name,
                survivor: *survivor,
                duplicates: duplicates.to_vec(),
            })
        })
        .collect()
}

/// Reconciler implementing [`UserReconciliation`].
#[derive(Clone)]
pub struct UserReconciler<U> {
    users: Arc<U>,
}

impl<U> UserReconciler<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> UserReconciliation for UserReconciler<U>
where
    U: UserRepository,
{
    async fn reconcile(&self) -> Result<ReconciliationReport, Error> {
        let users = self
            .users
            .list_all()
            .await
            .map_err(map_user_persistence_error)?;
        let mut report = ReconciliationReport::default();
        for group in find_duplicate_groups(&users) {
            match self.users.merge_into(group.survivor, &group.duplicates).await {
                Ok(moved) => {
                    info!(
                        name = %group.name,
                        survivor = %group.survivor,
                        removed = group.duplicates.len(),
                        ratings_reassigned = moved,
                        "merged duplicate users"
                    );
                    report.groups_merged += 1;
                    report.users_removed += group.duplicates.len() as u64;
                    report.ratings_reassigned += moved;
                }
                Err(error) => {
                    warn!(
                        name = %group.name,
                        survivor = %group.survivor,
                        %error,
                        "failed to merge duplicate users"
                    );
                    report.failed_groups += 1;
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    //! Pure grouping and mock-driven sweep behaviour. Idempotence against a
    //! stateful store is covered in `tests/reconciliation_bdd.rs`.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use rstest::rstest;

    fn users(rows: &[(i64, &str)]) -> Vec<User> {
        rows.iter()
            .map(|(id, name)| User::new(UserId::new(*id), *name))
            .collect()
    }

    #[rstest]
    fn survivor_is_lowest_identifier_regardless_of_order() {
        let groups = find_duplicate_groups(&users(&[(9, "Cara"), (4, " cara "), (6, "CARA")]));
        assert_eq!(
            groups,
            vec![DuplicateGroup {
                name: crate::domain::normalize_name("cara"),
                survivor: UserId::new(4),
                duplicates: vec![UserId::new(6), UserId::new(9)],
            }]
        );
    }

    #[rstest]
    fn distinct_names_produce_no_groups() {
        assert!(find_duplicate_groups(&users(&[(1, "amy"), (2, "bob")])).is_empty());
    }

    #[tokio::test]
    async fn a_failing_group_does_not_stop_the_sweep() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_all().return_once(|| {
            Ok(users(&[(1, "amy"), (2, "Amy"), (3, "bob"), (4, "BOB ")]))
        });
        repo.expect_merge_into()
            .withf(|survivor, _| *survivor == UserId::new(1))
            .return_once(|_, _| Err(UserPersistenceError::query("deadlock")));
        repo.expect_merge_into()
            .withf(|survivor, duplicates| {
                *survivor == UserId::new(3) && duplicates == [UserId::new(4)]
            })
            .return_once(|_, _| Ok(2));

        let report = UserReconciler::new(Arc::new(repo))
            .reconcile()
            .await
            .expect("sweep completes");

        assert_eq!(
            report,
            ReconciliationReport {
                groups_merged: 1,
                users_removed: 1,
                ratings_reassigned: 2,
                failed_groups: 1,
            }
        );
    }

    #[tokio::test]
    async fn listing_failure_aborts_the_sweep() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_all()
            .return_once(|| Err(UserPersistenceError::connection("refused")));
        repo.expect_merge_into().never();

        let error = UserReconciler::new(Arc::new(repo))
            .reconcile()
            .await
            .expect_err("cannot list users");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
