pub mod builder;
pub mod config;
pub mod events;
pub mod results;
pub mod scheduler;
pub mod state;
pub mod stats;

pub use builder::{
    build_working_set,
    WorkingCard,
};
pub use config::{
    CardOrder,
    SessionConfig,
};
pub use results::{
    CardResult,
    SessionSummary,
};
pub use state::{
    SessionPhase,
    StudySession,
};
pub use stats::{
    MarkKind,
    SessionInteraction,
};
