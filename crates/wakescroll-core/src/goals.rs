//! User-defined focus goals.
//!
//! Goals are a free-form wishlist the user maintains; nothing in the
//! aggregation layer reads them back. They live under their own store key
//! with the same retention-capped log machinery as every other list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{EventLog, Insert, Store};

const GOALS_CAP: usize = 50;
const GOALS: EventLog<FocusGoal> = EventLog::new("personal_focus_goals", GOALS_CAP, Insert::Front);

/// A personal focus goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusGoal {
    pub id: String,
    pub title: String,
    pub target_minutes_per_day: u32,
    pub created_at: DateTime<Utc>,
}

/// Store-backed goal list.
pub struct Goals<'s> {
    store: &'s Store,
}

impl<'s> Goals<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Save a new goal. The title is trimmed; nothing else is validated.
    pub fn save(&self, title: &str, target_minutes_per_day: u32) -> Result<FocusGoal> {
        let goal = FocusGoal {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            target_minutes_per_day,
            created_at: Utc::now(),
        };
        GOALS.append(self.store, goal.clone())?;
        Ok(goal)
    }

    /// All goals, newest first.
    pub fn list(&self) -> Result<Vec<FocusGoal>> {
        GOALS.load(self.store)
    }

    /// Delete the goal with the given id. Returns whether a record matched.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let goals = self.list()?;
        let before = goals.len();
        let kept: Vec<FocusGoal> = goals.into_iter().filter(|g| g.id != id).collect();
        if kept.len() == before {
            return Ok(false);
        }
        GOALS.replace(self.store, &kept)?;
        Ok(true)
    }
}
