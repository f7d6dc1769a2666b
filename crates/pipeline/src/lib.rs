//! Article pipelines
//!
//! The [`Orchestrator`] ties market data, scoring, detection, generation and
//! publishing into four pipelines, each run once per external scheduler tick:
//!
//! - routine: daily quota, next ticker, snapshot, article
//! - breaking: watchlist scan, top ranked events, one article each
//! - world news: gathered headlines, one digest article
//! - macro: one article on a macro-economic topic
//!
//! Every run ends as [`Outcome::Created`], [`Outcome::Skipped`] or a
//! [`PipelineError`]. Generation failures never fail a run; placeholder
//! content is published instead.
//!
//! # Feature Flags
//!
//! - `api` - Axum routes for the pipeline endpoints

pub mod auth;
pub mod error;
pub mod orchestrator;
pub mod outcome;
mod pipelines;
pub mod slug;

#[cfg(feature = "api")]
pub mod api;

pub use error::{PipelineError, Result};
pub use orchestrator::{Collaborators, Orchestrator, PipelineSettings};
pub use outcome::{
    BreakingArticle, BreakingReport, EventFailure, EventSummary, MacroArticle, Outcome,
    RoutineArticle, Skipped, Stage, WorldNewsArticle,
};
pub use pipelines::{MacroRequest, RoutineRequest};
