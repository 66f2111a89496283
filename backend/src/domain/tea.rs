//! Tea catalogue entries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned tea identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeaId(i64);

impl TeaId {
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

impl fmt::Display for TeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A tea as stored. `(name, provider)` is unique across the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tea {
    pub id: TeaId,
    pub name: String,
    pub provider: String,
    pub source: Option<String>,
}

impl Tea {
    /// Label shown in pickers: the name, followed by the source in
    /// parentheses when one is recorded.
    ///
    /// # Examples
    /// ```
    /// use teahouse::domain::{Tea, TeaId};
    ///
    /// let tea = Tea {
    ///     id: TeaId::new(1),
    ///     name: "Dragonwell".to_owned(),
    ///     provider: "Clovis".to_owned(),
    ///     source: Some("Hangzhou".to_owned()),
    /// };
    /// assert_eq!(tea.display_label(), "Dragonwell (Hangzhou)");
    /// ```
    #[must_use]
    pub fn display_label(&self) -> String {
        match self.source.as_deref().map(str::trim) {
            Some(source) if !source.is_empty() => format!("{} ({source})", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Validation failures for a new tea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TeaValidationError {
    #[error("tea name must not be empty")]
    EmptyName,
    #[error("provider must not be empty")]
    EmptyProvider,
}

/// A tea that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeaDraft {
    name: String,
    provider: String,
    source: Option<String>,
}

impl TeaDraft {
    /// Trim every field and reject a blank name or provider. A blank source is
    /// recorded as absent.
    pub fn new(
        name: &str,
        provider: &str,
        source: Option<&str>,
    ) -> Result<Self, TeaValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TeaValidationError::EmptyName);
        }
        let provider = provider.trim();
        if provider.is_empty() {
            return Err(TeaValidationError::EmptyProvider);
        }
        let source = source
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Ok(Self {
            name: name.to_owned(),
            provider: provider.to_owned(),
            source,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Attach the store-assigned identifier.
    #[must_use]
    pub fn into_tea(self, id: TeaId) -> Tea {
        Tea {
            id,
            name: self.name,
            provider: self.provider,
            source: self.source,
        }
    }
}

const SAMPLE_TEAS: [(&str, &str); 6] = [
    ("Dragonwell", "Clovis"),
    ("Yun Wu", "Tanzeela"),
    ("Laoshan", "Itsi"),
    ("Kamairicha", "Tanzeela"),
    ("Paksong Stardust", "Tanzeela"),
    ("Spring Maofeng", "Tanzeela"),
];

/// The starter catalogue loaded by the seed operation.
#[must_use]
pub fn sample_teas() -> Vec<TeaDraft> {
    SAMPLE_TEAS
        .iter()
        .map(|(name, provider)| TeaDraft {
            name: (*name).to_owned(),
            provider: (*provider).to_owned(),
            source: None,
        })
        .collect()
}
