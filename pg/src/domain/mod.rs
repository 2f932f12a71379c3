//! Domain types for plangen
//!
//! - [`profile`] - user profile and its cleaned projection
//! - [`catalog`] - exercise variation catalog entries
//! - [`plan`] - the permanent weekly plan structure
//! - [`session`] - assembled daily sessions and the persisted weekly record

mod catalog;
mod plan;
mod profile;
mod session;

pub use catalog::{Variation, distinct_tags};
pub use plan::{TrainingDayPlan, WeeklyPlan};
pub use profile::{BaselineMetrics, CleanedProfile, UserProfile};
pub use session::{ChosenVariation, PhaseKind, Session, SessionsRecord};
