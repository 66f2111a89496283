//! Flavour ratings submitted by users against catalogue teas.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{TeaId, UserId};

/// Lowest accepted score.
pub const MIN_SCORE: f64 = 0.0;
/// Highest accepted score.
pub const MAX_SCORE: f64 = 10.0;

/// Store-assigned rating identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingId(i64);

impl RatingId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RatingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One scored dimension of a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Umami,
    Astringency,
    Floral,
    Vegetal,
    Nutty,
    Roasted,
    Body,
    /// The overall score.
    Rating,
}

impl Attribute {
    /// Every attribute in column order.
    pub const ALL: [Self; 8] = [
        Self::Umami,
        Self::Astringency,
        Self::Floral,
        Self::Vegetal,
        Self::Nutty,
        Self::Roasted,
        Self::Body,
        Self::Rating,
    ];

    /// Field name used on the wire and in validation details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Umami => "umami",
            Self::Astringency => "astringency",
            Self::Floral => "floral",
            Self::Vegetal => "vegetal",
            Self::Nutty => "nutty",
            Self::Roasted => "roasted",
            Self::Body => "body",
            Self::Rating => "rating",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A score was not a finite number within the accepted bounds.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("{attribute} must be between {MIN_SCORE} and {MAX_SCORE}, got {value}")]
pub struct ScoreError {
    pub attribute: Attribute,
    pub value: f64,
}

/// A finite score within `MIN_SCORE..=MAX_SCORE`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    /// Validate `value` as a score for `attribute`.
    pub fn new(attribute: Attribute, value: f64) -> Result<Self, ScoreError> {
        if value.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScoreError { attribute, value })
        }
    }

    /// Wrap a value read back from the store without re-validating it.
    #[must_use]
    pub(crate) const fn from_stored(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

/// The eight scores carried by every rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlavourProfile {
    pub umami: Score,
    pub astringency: Score,
    pub floral: Score,
    pub vegetal: Score,
    pub nutty: Score,
    pub roasted: Score,
    pub body: Score,
    pub rating: Score,
}

impl FlavourProfile {
    /// Build a profile by asking `score_for` for each attribute in turn.
    ///
    /// The first failure, from the callback or from score validation, is
    /// returned.
    ///
    /// # Examples
    /// ```
    /// use teahouse::domain::{Attribute, FlavourProfile, ScoreError};
    ///
    /// let profile = FlavourProfile::try_build(|attribute| {
    ///     Ok::<_, ScoreError>(if attribute == Attribute::Rating { 8.0 } else { 3.0 })
    /// })
    /// .expect("scores in range");
    /// assert_eq!(profile.get(Attribute::Rating), 8.0);
    /// ```
    pub fn try_build<E>(mut score_for: impl FnMut(Attribute) -> Result<f64, E>) -> Result<Self, E>
    where
        E: From<ScoreError>,
    {
        let mut next = |attribute| -> Result<Score, E> {
            let value = score_for(attribute)?;
            Ok(Score::new(attribute, value)?)
        };
        Ok(Self {
            umami: next(Attribute::Umami)?,
            astringency: next(Attribute::Astringency)?,
            floral: next(Attribute::Floral)?,
            vegetal: next(Attribute::Vegetal)?,
            nutty: next(Attribute::Nutty)?,
            roasted: next(Attribute::Roasted)?,
            body: next(Attribute::Body)?,
            rating: next(Attribute::Rating)?,
        })
    }

    /// Raw value of one attribute.
    #[must_use]
    pub const fn get(&self, attribute: Attribute) -> f64 {
        self.slot(attribute).0
    }

    /// Replace one attribute.
    pub fn set(&mut self, attribute: Attribute, score: Score) {
        *self.slot_mut(attribute) = score;
    }

    const fn slot(&self, attribute: Attribute) -> &Score {
        match attribute {
            Attribute::Umami => &self.umami,
            Attribute::Astringency => &self.astringency,
            Attribute::Floral => &self.floral,
            Attribute::Vegetal => &self.vegetal,
            Attribute::Nutty => &self.nutty,
            Attribute::Roasted => &self.roasted,
            Attribute::Body => &self.body,
            Attribute::Rating => &self.rating,
        }
    }

    fn slot_mut(&mut self, attribute: Attribute) -> &mut Score {
        match attribute {
            Attribute::Umami => &mut self.umami,
            Attribute::Astringency => &mut self.astringency,
            Attribute::Floral => &mut self.floral,
            Attribute::Vegetal => &mut self.vegetal,
            Attribute::Nutty => &mut self.nutty,
            Attribute::Roasted => &mut self.roasted,
            Attribute::Body => &mut self.body,
            Attribute::Rating => &mut self.rating,
        }
    }
}

/// A stored rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeaRating {
    pub id: RatingId,
    pub user_id: UserId,
    pub tea_id: TeaId,
    pub profile: FlavourProfile,
}

impl TeaRating {
    /// Apply every field present in `patch`.
    #[must_use]
    pub fn with_patch(mut self, patch: &RatingPatch) -> Self {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(tea_id) = patch.tea_id {
            self.tea_id = tea_id;
        }
        for (attribute, score) in &patch.scores {
            self.profile.set(*attribute, *score);
        }
        self
    }
}

/// A rating that has not been stored yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingDraft {
    pub user_id: UserId,
    pub tea_id: TeaId,
    pub profile: FlavourProfile,
}

impl RatingDraft {
    /// Attach the store-assigned identifier.
    #[must_use]
    pub const fn into_rating(self, id: RatingId) -> TeaRating {
        TeaRating {
            id,
            user_id: self.user_id,
            tea_id: self.tea_id,
            profile: self.profile,
        }
    }
}

/// Partial replacement for an existing rating.
///
/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingPatch {
    pub user_id: Option<UserId>,
    pub tea_id: Option<TeaId>,
    pub scores: BTreeMap<Attribute, Score>,
}

impl RatingPatch {
    /// Whether applying the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.tea_id.is_none() && self.scores.is_empty()
    }
}

/// A rating joined with the tea it scores.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingWithTea {
    pub rating: TeaRating,
    pub tea_name: String,
    pub provider: String,
}
