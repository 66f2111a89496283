//! JSON response bodies shared across handlers.
//!
//! Domain types stay free of OpenAPI derives; these DTOs carry the camelCase
//! wire shape and the `utoipa` schemas.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{RatingWithTea, Tea, TeaRating, User};

/// Acknowledgement for operations without a resource body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    #[schema(example = "logged out")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "amy")]
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_i64(),
            name: user.name().to_owned(),
        }
    }
}

/// A tea together with its picker label.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeaResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Dragonwell")]
    pub name: String,
    #[schema(example = "Clovis")]
    pub provider: String,
    pub source: Option<String>,
    /// Name, followed by the source in parentheses when one is recorded.
    #[schema(example = "Dragonwell (Hangzhou)")]
    pub display: String,
}

impl From<Tea> for TeaResponse {
    fn from(tea: Tea) -> Self {
        let display = tea.display_label();
        Self {
            id: tea.id.as_i64(),
            name: tea.name,
            provider: tea.provider,
            source: tea.source,
            display,
        }
    }
}

/// A stored rating with every attribute score.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub id: i64,
    pub user_id: i64,
    pub tea_id: i64,
    pub umami: f64,
    pub astringency: f64,
    pub floral: f64,
    pub vegetal: f64,
    pub nutty: f64,
    pub roasted: f64,
    pub body: f64,
    pub rating: f64,
}

impl From<TeaRating> for RatingResponse {
    fn from(rating: TeaRating) -> Self {
        let profile = rating.profile;
        Self {
            id: rating.id.as_i64(),
            user_id: rating.user_id.as_i64(),
            tea_id: rating.tea_id.as_i64(),
            umami: profile.umami.value(),
            astringency: profile.astringency.value(),
            floral: profile.floral.value(),
            vegetal: profile.vegetal.value(),
            nutty: profile.nutty.value(),
            roasted: profile.roasted.value(),
            body: profile.body.value(),
            rating: profile.rating.value(),
        }
    }
}

/// A rating joined with the tea it scores.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingWithTeaResponse {
    #[serde(flatten)]
    pub rating: RatingResponse,
    pub tea_name: String,
    pub provider: String,
}

impl From<RatingWithTea> for RatingWithTeaResponse {
    fn from(entry: RatingWithTea) -> Self {
        Self {
            rating: RatingResponse::from(entry.rating),
            tea_name: entry.tea_name,
            provider: entry.provider,
        }
    }
}
