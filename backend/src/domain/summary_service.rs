//! Aggregate statistics over stored ratings.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::persistence_error_mapping::{
    map_rating_persistence_error, map_tea_persistence_error, map_user_persistence_error,
};
use crate::domain::ports::{
    Dashboard, RatingRepository, RatingSummaryQuery, TeaRepository, UserRepository,
};
use crate::domain::{Error, RatingSummary, SummaryGrouping, summarise};

/// Summary service implementing [`RatingSummaryQuery`].
#[derive(Clone)]
pub struct RatingSummaryService<R, T, U> {
    ratings: Arc<R>,
    teas: Arc<T>,
    users: Arc<U>,
}

impl<R, T, U> RatingSummaryService<R, T, U> {
    pub fn new(ratings: Arc<R>, teas: Arc<T>, users: Arc<U>) -> Self {
        Self {
            ratings,
            teas,
            users,
        }
    }
}

#[async_trait]
impl<R, T, U> RatingSummaryQuery for RatingSummaryService<R, T, U>
where
    R: RatingRepository,
    T: TeaRepository,
    U: UserRepository,
{
    async fn summary(&self, grouping: SummaryGrouping) -> Result<Vec<RatingSummary>, Error> {
        let entries = self
            .ratings
            .list_with_teas(None)
            .await
            .map_err(map_rating_persistence_error)?;
        Ok(summarise(&entries, grouping))
    }

    async fn dashboard(&self) -> Result<Dashboard, Error> {
        let tea_count = self.teas.count().await.map_err(map_tea_persistence_error)?;
        let user_count = self
            .users
            .count()
            .await
            .map_err(map_user_persistence_error)?;
        let rating_count = self
            .ratings
            .count()
            .await
            .map_err(map_rating_persistence_error)?;
        let summaries = self.summary(SummaryGrouping::Tea).await?;
        Ok(Dashboard {
            tea_count,
            user_count,
            rating_count,
            summaries,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockRatingRepository, MockTeaRepository, MockUserRepository, RatingPersistenceError,
    };
    use crate::domain::ErrorCode;

    type Service = RatingSummaryService<MockRatingRepository, MockTeaRepository, MockUserRepository>;

    fn make_service(
        ratings: MockRatingRepository,
        teas: MockTeaRepository,
        users: MockUserRepository,
    ) -> Service {
        RatingSummaryService::new(Arc::new(ratings), Arc::new(teas), Arc::new(users))
    }

    #[tokio::test]
    async fn summary_reads_every_rating() {
        let mut ratings = MockRatingRepository::new();
        ratings
            .expect_list_with_teas()
            .withf(Option::is_none)
            .return_once(|_| Ok(Vec::new()));

        let summaries = make_service(ratings, MockTeaRepository::new(), MockUserRepository::new())
            .summary(SummaryGrouping::Provider)
            .await
            .expect("summary computed");
        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn dashboard_collects_counts() {
        let mut ratings = MockRatingRepository::new();
        ratings.expect_count().return_once(|| Ok(5));
        ratings
            .expect_list_with_teas()
            .return_once(|_| Ok(Vec::new()));
        let mut teas = MockTeaRepository::new();
        teas.expect_count().return_once(|| Ok(6));
        let mut users = MockUserRepository::new();
        users.expect_count().return_once(|| Ok(2));

        let dashboard = make_service(ratings, teas, users)
            .dashboard()
            .await
            .expect("dashboard built");
        assert_eq!(
            (dashboard.tea_count, dashboard.user_count, dashboard.rating_count),
            (6, 2, 5)
        );
    }

    #[tokio::test]
    async fn summary_propagates_connection_failures() {
        let mut ratings = MockRatingRepository::new();
        ratings
            .expect_list_with_teas()
            .return_once(|_| Err(RatingPersistenceError::connection("refused")));

        let error = make_service(ratings, MockTeaRepository::new(), MockUserRepository::new())
            .summary(SummaryGrouping::Tea)
            .await
            .expect_err("store down");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
