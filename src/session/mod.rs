//! Session State
//!
//! Explicit state container for one dashboard session. Every mutation goes
//! through [`Store::dispatch`], so the whole client lifecycle
//! (`Empty -> Loading -> Ready`, re-entrant on repeat uploads) can be driven
//! and checked without rendering anything.

mod store;

pub use store::{Action, Notice, Phase, SessionState, Store, Tab};
