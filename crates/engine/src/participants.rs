//! Trip participants.
//!
//! A [`Participant`] is identified by an opaque [`ParticipantId`]. The engine
//! only looks at ids; the display name is carried for whoever renders the
//! settlement.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Stable, opaque participant identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    #[serde(default)]
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Name to show to users, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// Ordered set of participants with unique ids.
///
/// The roster order is the iteration order of [`Balances`](crate::Balances)
/// and breaks ties when debtors and creditors are sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    /// Builds a roster, rejecting duplicate ids.
    pub fn new(participants: Vec<Participant>) -> ResultEngine<Self> {
        let mut seen = HashSet::with_capacity(participants.len());
        for participant in &participants {
            if !seen.insert(&participant.id) {
                return Err(EngineError::ExistingKey(participant.id.to_string()));
            }
        }
        Ok(Self { participants })
    }

    /// Convenience constructor for id-only rosters.
    pub fn from_ids<I, T>(ids: I) -> ResultEngine<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<ParticipantId>,
    {
        Self::new(
            ids.into_iter()
                .map(|id| Participant::new(id, String::new()))
                .collect(),
        )
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn ids(&self) -> impl Iterator<Item = &ParticipantId> + '_ {
        self.participants.iter().map(|p| &p.id)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
