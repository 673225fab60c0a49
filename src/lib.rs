//! Strictly Meta - optimistic-concurrency move engine for meta tic-tac-toe.
//!
//! Players submit moves by adding entries to their submission map. Each
//! change notification is turned into one store transaction per new
//! submission, and every transaction runs the pure transition function
//! against the freshest copy of the game record.
//!
//! # Architecture
//!
//! - **Grid**: game state model, legality rules and the pure transition
//! - **Store**: atomic record store seam with optimistic transactions
//! - **Apply**: transactional wrapper around the transition
//! - **Intake**: dispatcher reacting to submission notifications
//! - **Config**: TOML configuration for rules and store tuning
//!
//! # Example
//!
//! ```no_run
//! use strictly_meta::{
//!     GameId, GameState, InMemoryProfiles, InMemoryStore, MoveApplier, MoveIntake,
//!     MoveRules, Occupancy, Profile, SubmissionChange,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//! store.insert(
//!     GameId::new("game_1"),
//!     GameState::scheduled(Some("goose".into()), Some("duck".into())).into_record(),
//! )?;
//!
//! let profiles = InMemoryProfiles::new();
//! profiles.insert("uid_1".into(), Profile::new("goose".into()))?;
//!
//! let intake = MoveIntake::new(MoveApplier::new(store, MoveRules::meta_board()), profiles);
//! let change = SubmissionChange::new(
//!     Default::default(),
//!     [(GameId::new("game_1"), Occupancy::new(0b001))].into(),
//! );
//! let report = intake.handle(&"uid_1".into(), &change).await;
//! assert_eq!(report.applied(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod apply;
mod config;
mod grid;
mod intake;
mod store;

// Crate-level exports - Grid model and transition
pub use grid::{
    CELLS_PER_SUB_BOARD, CellsVacant, Contract, EmptyOriginInvariant, GameId, GameRecord,
    GameState, GridInvariants, Invariant, InvariantSet, InvariantViolation, LegalShape,
    META_CELLS, MonotonicOccupancyInvariant, MoveContract, MoveError, MoveRules,
    NonEmptyHistoryInvariant, Occupancy, PlayerId, PlayersTurn, ProposedMove, Replayed, Role,
    SUB_BOARDS, UserId, apply_move, check_history,
};

// Crate-level exports - Store
pub use store::{DEFAULT_MAX_RETRIES, InMemoryStore, RecordStore, StoreError, TransactError};

// Crate-level exports - Transactional apply
pub use apply::{ApplyError, MoveApplier};

// Crate-level exports - Intake
pub use intake::{
    InMemoryProfiles, IntakeReport, MoveIntake, Profile, ProfileError, ProfileLookup,
    SubmissionChange, Submissions,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig, RulesConfig, StoreConfig};
