//! The four Commands (spec §4.3). Each module exposes one entrypoint that
//! validates cost/proximity/Frost gates, spends resources, mutates state
//! through [`crate::pieces`], and refreshes [`crate::control`]. Grounded on
//! the interface shapes in `fs_bot/commands/*.py` (bodies not present in
//! the extraction; procedures below follow spec §4.3's prose).

pub mod common;
pub mod march;
pub mod raid;
pub mod rally;
pub mod seize;

pub use march::march;
pub use raid::raid;
pub use rally::rally;
pub use seize::{seize, SeizeOutcome};
