#![deny(unsafe_code)]

//! Teaching recommendations from concept-resolved rubric rows.
//!
//! Concepts are ranked by impact (total points lost times students affected)
//! and labelled with an action based on how often the concept recurs after
//! the first exam.

mod action;
mod lesson;
mod recommend;
mod stats;

pub use action::Action;
pub use lesson::lesson_plan;
pub use recommend::{Recommendation, compute_recommendations};
pub use stats::{ConceptStats, concept_stats, top_concepts};
