//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, RatingRepository, RatingSummaryQuery, RatingsCommand,
    RatingsQuery, TeaCatalogueCommand, TeaCatalogueQuery, TeaRepository, UserReconciliation,
    UserRepository,
};
use crate::domain::{
    AccountService, RatingService, RatingSummaryService, TeaCatalogueService, UserReconciler,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub identities: Arc<dyn AccountQuery>,
    pub catalogue: Arc<dyn TeaCatalogueCommand>,
    pub catalogue_query: Arc<dyn TeaCatalogueQuery>,
    pub ratings: Arc<dyn RatingsCommand>,
    pub ratings_query: Arc<dyn RatingsQuery>,
    pub summaries: Arc<dyn RatingSummaryQuery>,
    pub reconciliation: Arc<dyn UserReconciliation>,
}

impl HttpState {
    /// Wire every domain service over one set of repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use teahouse::inbound::http::state::HttpState;
    /// use teahouse::test_support::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::from_repositories(store.clone(), store.clone(), store);
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn from_repositories<U, T, R>(users: Arc<U>, teas: Arc<T>, ratings: Arc<R>) -> Self
    where
        U: UserRepository + 'static,
        T: TeaRepository + 'static,
        R: RatingRepository + 'static,
    {
        let accounts = Arc::new(AccountService::new(users.clone()));
        let catalogue = Arc::new(TeaCatalogueService::new(teas.clone(), users.clone()));
        let rating_service = Arc::new(RatingService::new(
            ratings.clone(),
            teas.clone(),
            users.clone(),
        ));
        let summaries = Arc::new(RatingSummaryService::new(ratings, teas, users.clone()));
        Self {
            accounts: accounts.clone(),
            identities: accounts,
            catalogue: catalogue.clone(),
            catalogue_query: catalogue,
            ratings: rating_service.clone(),
            ratings_query: rating_service,
            summaries,
            reconciliation: Arc::new(UserReconciler::new(users)),
        }
    }
}
