//! Move intake: turns a user's submission changes into applied moves.
//!
//! Each notification carries the user's submission map before and after an
//! update. Only games that appear in `after` but not in `before` are new
//! submissions. They are applied one at a time in ascending game-key order,
//! so replaying the same notification always produces the same sequence of
//! store transactions.

mod profile;

pub use profile::{InMemoryProfiles, Profile, ProfileError, ProfileLookup};

use crate::apply::{ApplyError, MoveApplier};
use crate::grid::{GameId, GameState, Occupancy, PlayerId, UserId};
use crate::store::RecordStore;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error, info, instrument};

/// A user's submission map: game key to submitted move.
pub type Submissions = BTreeMap<GameId, Occupancy>;

/// Before/after pair delivered by the change notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct SubmissionChange {
    /// Submissions before the update.
    #[serde(default)]
    before: Submissions,
    /// Submissions after the update.
    #[serde(default)]
    after: Submissions,
}

impl SubmissionChange {
    /// Submissions present in `after` but not in `before`, in key order.
    pub fn new_submissions(&self) -> Vec<(&GameId, Occupancy)> {
        self.after
            .iter()
            .filter(|(game, _)| !self.before.contains_key(*game))
            .map(|(game, cells)| (game, *cells))
            .collect()
    }
}

/// Result of handling one notification.
#[derive(Debug, Default)]
pub struct IntakeReport {
    /// Resolved player name, if the lookup succeeded.
    pub player: Option<PlayerId>,
    /// One entry per new submission, in the order they were applied.
    pub outcomes: Vec<(GameId, Result<GameState, ApplyError>)>,
}

impl IntakeReport {
    /// Number of submissions that were written.
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|(_, result)| result.is_ok()).count()
    }

    /// Number of submissions that were dropped.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.applied()
    }
}

/// Reacts to submission notifications by applying each new move.
///
/// Holds no state between notifications; concurrent invocations only meet
/// inside the store's transactions.
#[derive(Debug, Clone)]
pub struct MoveIntake<S, P> {
    applier: MoveApplier<S>,
    profiles: P,
}

impl<S: RecordStore, P: ProfileLookup> MoveIntake<S, P> {
    /// Creates a dispatcher.
    pub fn new(applier: MoveApplier<S>, profiles: P) -> Self {
        Self { applier, profiles }
    }

    /// Returns the move applier.
    pub fn applier(&self) -> &MoveApplier<S> {
        &self.applier
    }

    /// Handles one notification for `user`.
    ///
    /// The user's name is resolved once and used for every new submission.
    /// A failed submission is logged by the applier and does not stop the
    /// remaining ones. If the name cannot be resolved nothing is applied.
    #[instrument(skip_all, fields(user = %user))]
    pub async fn handle(&self, user: &UserId, change: &SubmissionChange) -> IntakeReport {
        let pending = change.new_submissions();
        if pending.is_empty() {
            debug!("No new submissions");
            return IntakeReport::default();
        }

        let player = match self.profiles.get_profile(user).await {
            Ok(profile) => profile.name().clone(),
            Err(e) => {
                error!(error = %e, pending = pending.len(), "Failed to resolve submitting user");
                return IntakeReport::default();
            }
        };

        info!(player = %player, pending = pending.len(), "Processing new submissions");

        let mut outcomes = Vec::with_capacity(pending.len());
        for (game, cells) in pending {
            let result = self.applier.apply(game, &player, cells).await;
            outcomes.push((game.clone(), result));
        }

        let report = IntakeReport {
            player: Some(player),
            outcomes,
        };
        info!(applied = report.applied(), failed = report.failed(), "Submissions processed");
        report
    }
}
