//! Domain primitives, aggregates, and services.
//!
//! Purpose: hold the tea rating core (identity normalisation, duplicate
//! reconciliation, rating aggregation, candidate filtering) independent of
//! HTTP and Diesel. Adapters reach it through [`ports`].

pub mod account_service;
pub mod catalogue_service;
pub mod error;
pub mod identity;
mod persistence_error_mapping;
pub mod ports;
pub mod rating;
pub mod rating_service;
pub mod reconciliation;
pub mod summary;
pub mod summary_service;
pub mod tea;
pub mod trace_id;

pub use self::account_service::AccountService;
pub use self::catalogue_service::TeaCatalogueService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity::{
    ADMIN_NAME, AccessToken, NameValidationError, NormalizedName, TokenError, User, UserId,
    normalize_name, require_name,
};
pub use self::rating::{
    Attribute, FlavourProfile, MAX_SCORE, MIN_SCORE, RatingDraft, RatingId, RatingPatch,
    RatingWithTea, Score, ScoreError, TeaRating,
};
pub use self::rating_service::RatingService;
pub use self::reconciliation::{DuplicateGroup, UserReconciler, find_duplicate_groups};
pub use self::summary::{
    AttributeAverages, RatingSummary, SummaryGrouping, SummaryKey, summarise,
};
pub use self::summary_service::RatingSummaryService;
pub use self::tea::{Tea, TeaDraft, TeaId, TeaValidationError, sample_teas};
pub use self::trace_id::TraceId;
