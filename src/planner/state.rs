//! Wedding session state and the precondition helper.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use tokio::sync::RwLock;

/// Confirmation returned to the coordinator after `update_state`.
pub const STATE_UPDATED: &str = "State updated successfully";

/// The fields of [`WeddingState`], in declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum StateField {
    Origin,
    Destination,
    GuestCount,
    MusicGenre,
}

impl StateField {
    pub const ALL: [StateField; 4] = [
        Self::Origin,
        Self::Destination,
        Self::GuestCount,
        Self::MusicGenre,
    ];

    /// Snake-case field name, as used in tool arguments.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Trip and event parameters collected by the coordinator.
///
/// A field holding only whitespace counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeddingState {
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Stored as text; callers that need a number parse it.
    pub guest_count: Option<String>,
    pub music_genre: Option<String>,
}

impl WeddingState {
    /// A fully populated state.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        guest_count: impl Into<String>,
        music_genre: impl Into<String>,
    ) -> Self {
        Self {
            origin: Some(origin.into()),
            destination: Some(destination.into()),
            guest_count: Some(guest_count.into()),
            music_genre: Some(music_genre.into()),
        }
    }

    /// The value of `field`, or `None` when absent or blank.
    pub fn get(&self, field: StateField) -> Option<&str> {
        let slot = match field {
            StateField::Origin => &self.origin,
            StateField::Destination => &self.destination,
            StateField::GuestCount => &self.guest_count,
            StateField::MusicGenre => &self.music_genre,
        };
        slot.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn is_set(&self, field: StateField) -> bool {
        self.get(field).is_some()
    }

    /// Overwrite every field. No merge with previous values.
    pub fn apply(&mut self, update: StateUpdate) {
        *self = Self {
            origin: Some(update.origin),
            destination: Some(update.destination),
            guest_count: Some(update.guest_count),
            music_genre: Some(update.music_genre),
        };
    }

    /// Check that every field in `required` is set.
    ///
    /// On failure, lists all missing fields in declaration order.
    pub fn require(&self, required: &[StateField]) -> Result<(), MissingFields> {
        let missing: Vec<StateField> = StateField::ALL
            .into_iter()
            .filter(|field| required.contains(field) && !self.is_set(*field))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingFields(missing))
        }
    }
}

/// Arguments of `update_state`. `guest_count` is normalized to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    pub origin: String,
    pub destination: String,
    pub guest_count: String,
    pub music_genre: String,
}

/// Required state fields that were absent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing state fields: {}", self.names().join(", "))]
pub struct MissingFields(pub Vec<StateField>);

impl MissingFields {
    pub fn fields(&self) -> &[StateField] {
        &self.0
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|field| field.name()).collect()
    }
}

impl fmt::Display for WeddingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, field) in StateField::ALL.into_iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}={}", self.get(field).unwrap_or("<unset>"))?;
        }
        Ok(())
    }
}

/// Session state shared between the coordinator's tools.
pub type SharedState = Arc<RwLock<WeddingState>>;

pub fn shared_state(state: WeddingState) -> SharedState {
    Arc::new(RwLock::new(state))
}

/// Overwrite the session state and return the confirmation text.
pub async fn update_state(state: &SharedState, update: StateUpdate) -> &'static str {
    let mut guard = state.write().await;
    guard.apply(update);
    tracing::info!(state = %*guard, "wedding state updated");
    STATE_UPDATED
}
