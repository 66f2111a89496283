//! In-memory repository adapters for tests.
//!
//! [`InMemoryStore`] implements every driven port over one mutex-guarded
//! snapshot. Multi-step operations run against a clone of the snapshot that
//! replaces the live one only on success, so they share the all-or-nothing
//! behaviour of the Diesel transactions. Failure injection lets tests prove
//! that a half-finished operation leaves no trace.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    CatalogueWipe, RatingPersistenceError, RatingRepository, TeaPersistenceError, TeaRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    NormalizedName, RatingDraft, RatingId, RatingWithTea, Tea, TeaDraft, TeaId, TeaRating, User,
    UserId,
};

/// Failures the store can be told to raise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailurePlan {
    /// Every call reports a connection failure.
    pub offline: bool,
    /// `delete_all_with_ratings` fails after the ratings are gone.
    pub fail_tea_wipe: bool,
    /// `merge_into` fails when merging onto this survivor.
    pub fail_merge_for: Option<UserId>,
}

#[derive(Debug, thiserror::Error)]
enum StoreFault {
    #[error("store is offline")]
    Offline,
    #[error("store lock poisoned")]
    Poisoned,
    #[error("injected failure: {0}")]
    Injected(&'static str),
    #[error("{0}")]
    MissingReference(String),
    #[error("tea {name} from {provider} already exists")]
    Duplicate { name: String, provider: String },
}

impl From<StoreFault> for UserPersistenceError {
    fn from(fault: StoreFault) -> Self {
        match fault {
            StoreFault::Offline => Self::connection(fault.to_string()),
            other => Self::query(other.to_string()),
        }
    }
}

impl From<StoreFault> for TeaPersistenceError {
    fn from(fault: StoreFault) -> Self {
        match fault {
            StoreFault::Offline => Self::connection(fault.to_string()),
            StoreFault::Duplicate { name, provider } => Self::duplicate(name, provider),
            other => Self::query(other.to_string()),
        }
    }
}

impl From<StoreFault> for RatingPersistenceError {
    fn from(fault: StoreFault) -> Self {
        match fault {
            StoreFault::Offline => Self::connection(fault.to_string()),
            StoreFault::MissingReference(message) => Self::missing_reference(message),
            other => Self::query(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    users: BTreeMap<UserId, User>,
    teas: BTreeMap<TeaId, Tea>,
    ratings: BTreeMap<RatingId, TeaRating>,
    last_user_id: i64,
    last_tea_id: i64,
    last_rating_id: i64,
    failures: FailurePlan,
}

impl StoreState {
    fn next_user_id(&mut self) -> UserId {
        self.last_user_id += 1;
        UserId::new(self.last_user_id)
    }

    fn next_tea_id(&mut self) -> TeaId {
        self.last_tea_id += 1;
        TeaId::new(self.last_tea_id)
    }

    fn next_rating_id(&mut self) -> RatingId {
        self.last_rating_id += 1;
        RatingId::new(self.last_rating_id)
    }

    fn has_tea(&self, name: &str, provider: &str) -> bool {
        self.teas
            .values()
            .any(|tea| tea.name == name && tea.provider == provider)
    }

    fn check_references(&self, user_id: UserId, tea_id: TeaId) -> Result<(), StoreFault> {
        if !self.users.contains_key(&user_id) {
            return Err(StoreFault::MissingReference(format!(
                "user {user_id} does not exist"
            )));
        }
        if !self.teas.contains_key(&tea_id) {
            return Err(StoreFault::MissingReference(format!(
                "tea {tea_id} does not exist"
            )));
        }
        Ok(())
    }
}

/// Shared in-memory backing for the user, tea and rating ports.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use teahouse::domain::ports::UserRepository;
/// use teahouse::domain::normalize_name;
/// use teahouse::test_support::InMemoryStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = Arc::new(InMemoryStore::new());
/// let user = store.insert(&normalize_name("Amy")).await.expect("insert");
/// assert_eq!(user.name(), "amy");
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StoreFault> {
        let guard = self.state.lock().map_err(|_| StoreFault::Poisoned)?;
        if guard.failures.offline {
            return Err(StoreFault::Offline);
        }
        Ok(guard)
    }

    fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> Result<T, StoreFault> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    /// Run `f` against a working copy and publish it only when `f` succeeds.
    fn transact<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> Result<T, StoreFault>,
    ) -> Result<T, StoreFault> {
        let mut guard = self.lock()?;
        let mut working = guard.clone();
        let value = f(&mut working)?;
        *guard = working;
        Ok(value)
    }

    fn configure(&self, f: impl FnOnce(&mut FailurePlan)) {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard.failures);
    }

    /// Report connection failures from every call until cleared.
    pub fn set_offline(&self, offline: bool) {
        self.configure(|plan| plan.offline = offline);
    }

    /// Make the next catalogue wipe fail between its two deletes.
    pub fn fail_tea_wipe(&self) {
        self.configure(|plan| plan.fail_tea_wipe = true);
    }

    /// Make merges onto `survivor` fail after re-pointing ratings.
    pub fn fail_merge_for(&self, survivor: UserId) {
        self.configure(|plan| plan.fail_merge_for = Some(survivor));
    }

    /// Store a user with `raw` exactly as given, bypassing normalisation.
    ///
    /// Mirrors rows written before registration stored normalised names.
    pub fn insert_legacy_user(&self, raw: &str) -> User {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = guard.next_user_id();
        let user = User::new(id, raw);
        guard.users.insert(id, user.clone());
        user
    }

    /// Every stored user, ordered by identifier.
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.snapshot(|state| state.users.values().cloned().collect())
    }

    /// Every stored tea, ordered by identifier.
    #[must_use]
    pub fn teas(&self) -> Vec<Tea> {
        self.snapshot(|state| state.teas.values().cloned().collect())
    }

    /// Every stored rating, ordered by identifier.
    #[must_use]
    pub fn ratings(&self) -> Vec<TeaRating> {
        self.snapshot(|state| state.ratings.values().copied().collect())
    }

    fn snapshot<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&guard)
    }
}

fn to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, name: &NormalizedName) -> Result<User, UserPersistenceError> {
        let user = self.transact(|state| {
            let id = state.next_user_id();
            let user = User::new(id, name.as_str());
            state.users.insert(id, user.clone());
            Ok(user)
        })?;
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.read(|state| state.users.get(&id).cloned())?)
    }

    async fn find_by_normalized_name(
        &self,
        name: &NormalizedName,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.read(|state| {
            state
                .users
                .values()
                .find(|user| &user.normalized_name() == name)
                .cloned()
        })?)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.read(|state| state.users.values().cloned().collect())?)
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        Ok(self.read(|state| to_u64(state.users.len()))?)
    }

    async fn merge_into(
        &self,
        survivor: UserId,
        duplicates: &[UserId],
    ) -> Result<u64, UserPersistenceError> {
        let moved = self.transact(|state| {
            let mut moved = 0;
            for rating in state.ratings.values_mut() {
                if duplicates.contains(&rating.user_id) {
                    rating.user_id = survivor;
                    moved += 1;
                }
            }
            if state.failures.fail_merge_for == Some(survivor) {
                return Err(StoreFault::Injected("merge aborted after re-pointing ratings"));
            }
            for duplicate in duplicates {
                state.users.remove(duplicate);
            }
            Ok(moved)
        })?;
        Ok(moved)
    }
}

#[async_trait]
impl TeaRepository for InMemoryStore {
    async fn insert(&self, draft: &TeaDraft) -> Result<Tea, TeaPersistenceError> {
        let tea = self.transact(|state| {
            if state.has_tea(draft.name(), draft.provider()) {
                return Err(StoreFault::Duplicate {
                    name: draft.name().to_owned(),
                    provider: draft.provider().to_owned(),
                });
            }
            let id = state.next_tea_id();
            let tea = draft.clone().into_tea(id);
            state.teas.insert(id, tea.clone());
            Ok(tea)
        })?;
        Ok(tea)
    }

    async fn find_by_id(&self, id: TeaId) -> Result<Option<Tea>, TeaPersistenceError> {
        Ok(self.read(|state| state.teas.get(&id).cloned())?)
    }

    async fn find_by_name_and_provider(
        &self,
        name: &str,
        provider: &str,
    ) -> Result<Option<Tea>, TeaPersistenceError> {
        Ok(self.read(|state| {
            state
                .teas
                .values()
                .find(|tea| tea.name == name && tea.provider == provider)
                .cloned()
        })?)
    }

    async fn list_all(&self) -> Result<Vec<Tea>, TeaPersistenceError> {
        Ok(self.read(|state| state.teas.values().cloned().collect())?)
    }

    async fn list_unrated_by(&self, user_id: UserId) -> Result<Vec<Tea>, TeaPersistenceError> {
        Ok(self.read(|state| {
            state
                .teas
                .values()
                .filter(|tea| {
                    !state
                        .ratings
                        .values()
                        .any(|rating| rating.user_id == user_id && rating.tea_id == tea.id)
                })
                .cloned()
                .collect()
        })?)
    }

    async fn count(&self) -> Result<u64, TeaPersistenceError> {
        Ok(self.read(|state| to_u64(state.teas.len()))?)
    }

    async fn delete_all_with_ratings(&self) -> Result<CatalogueWipe, TeaPersistenceError> {
        let wipe = self.transact(|state| {
            let ratings_removed = to_u64(state.ratings.len());
            state.ratings.clear();
            if state.failures.fail_tea_wipe {
                return Err(StoreFault::Injected("tea delete failed"));
            }
            let teas_removed = to_u64(state.teas.len());
            state.teas.clear();
            Ok(CatalogueWipe {
                teas_removed,
                ratings_removed,
            })
        })?;
        Ok(wipe)
    }

    async fn insert_missing(&self, drafts: &[TeaDraft]) -> Result<Vec<Tea>, TeaPersistenceError> {
        let inserted = self.transact(|state| {
            let mut inserted = Vec::new();
            for draft in drafts {
                if state.has_tea(draft.name(), draft.provider()) {
                    continue;
                }
                let id = state.next_tea_id();
                let tea = draft.clone().into_tea(id);
                state.teas.insert(id, tea.clone());
                inserted.push(tea);
            }
            Ok(inserted)
        })?;
        Ok(inserted)
    }
}

#[async_trait]
impl RatingRepository for InMemoryStore {
    async fn insert(&self, draft: &RatingDraft) -> Result<TeaRating, RatingPersistenceError> {
        let rating = self.transact(|state| {
            state.check_references(draft.user_id, draft.tea_id)?;
            let id = state.next_rating_id();
            let rating = draft.into_rating(id);
            state.ratings.insert(id, rating);
            Ok(rating)
        })?;
        Ok(rating)
    }

    async fn find_by_id(&self, id: RatingId) -> Result<Option<TeaRating>, RatingPersistenceError> {
        Ok(self.read(|state| state.ratings.get(&id).copied())?)
    }

    async fn update(
        &self,
        rating: &TeaRating,
    ) -> Result<Option<TeaRating>, RatingPersistenceError> {
        let updated = self.transact(|state| {
            if !state.ratings.contains_key(&rating.id) {
                return Ok(None);
            }
            state.check_references(rating.user_id, rating.tea_id)?;
            state.ratings.insert(rating.id, *rating);
            Ok(Some(*rating))
        })?;
        Ok(updated)
    }

    async fn delete(&self, id: RatingId) -> Result<bool, RatingPersistenceError> {
        Ok(self.transact(|state| Ok(state.ratings.remove(&id).is_some()))?)
    }

    async fn list_all(&self) -> Result<Vec<TeaRating>, RatingPersistenceError> {
        Ok(self.read(|state| state.ratings.values().copied().collect())?)
    }

    async fn list_with_teas(
        &self,
        user_id: Option<UserId>,
    ) -> Result<Vec<RatingWithTea>, RatingPersistenceError> {
        Ok(self.read(|state| {
            state
                .ratings
                .values()
                .filter(|rating| user_id.is_none_or(|id| rating.user_id == id))
                .filter_map(|rating| {
                    state.teas.get(&rating.tea_id).map(|tea| RatingWithTea {
                        rating: *rating,
                        tea_name: tea.name.clone(),
                        provider: tea.provider.clone(),
                    })
                })
                .collect()
        })?)
    }

    async fn count(&self) -> Result<u64, RatingPersistenceError> {
        Ok(self.read(|state| to_u64(state.ratings.len()))?)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Attribute, FlavourProfile, ScoreError, normalize_name};
    use rstest::{fixture, rstest};

    fn profile(value: f64) -> FlavourProfile {
        FlavourProfile::try_build(|_: Attribute| Ok::<_, ScoreError>(value)).expect("valid scores")
    }

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::new()
    }

    async fn seed_rating(store: &InMemoryStore) -> (User, Tea, TeaRating) {
        let user = UserRepository::insert(store, &normalize_name("amy"))
            .await
            .expect("user");
        let tea = TeaRepository::insert(
            store,
            &TeaDraft::new("Dragonwell", "Clovis", None).expect("draft"),
        )
        .await
        .expect("tea");
        let rating = RatingRepository::insert(
            store,
            &RatingDraft {
                user_id: user.id(),
                tea_id: tea.id,
                profile: profile(5.0),
            },
        )
        .await
        .expect("rating");
        (user, tea, rating)
    }

    #[rstest]
    #[tokio::test]
    async fn failed_wipe_keeps_ratings(store: InMemoryStore) {
        seed_rating(&store).await;
        store.fail_tea_wipe();

        let result = store.delete_all_with_ratings().await;

        assert!(matches!(result, Err(TeaPersistenceError::Query { .. })));
        assert_eq!(store.ratings().len(), 1);
        assert_eq!(store.teas().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_merge_keeps_rating_owner(store: InMemoryStore) {
        let (user, _, rating) = seed_rating(&store).await;
        let survivor = store.insert_legacy_user("Amy ");
        store.fail_merge_for(survivor.id());

        let result = store.merge_into(survivor.id(), &[user.id()]).await;

        assert!(result.is_err());
        assert_eq!(store.ratings()[0].user_id, rating.user_id);
        assert_eq!(store.users().len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn offline_store_reports_connection_errors(store: InMemoryStore) {
        store.set_offline(true);
        let result = TeaRepository::count(&store).await;
        assert!(matches!(result, Err(TeaPersistenceError::Connection { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn identifiers_are_not_reused(store: InMemoryStore) {
        let (user, tea, first) = seed_rating(&store).await;
        assert!(RatingRepository::delete(&store, first.id).await.expect("delete"));
        let second = RatingRepository::insert(
            &store,
            &RatingDraft {
                user_id: user.id(),
                tea_id: tea.id,
                profile: profile(2.0),
            },
        )
        .await
        .expect("rating");
        assert!(second.id > first.id);
    }

    #[rstest]
    #[tokio::test]
    async fn rating_for_missing_tea_is_rejected(store: InMemoryStore) {
        let user = UserRepository::insert(&store, &normalize_name("amy"))
            .await
            .expect("user");
        let result = RatingRepository::insert(
            &store,
            &RatingDraft {
                user_id: user.id(),
                tea_id: TeaId::new(99),
                profile: profile(1.0),
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(RatingPersistenceError::MissingReference { .. })
        ));
    }
}
