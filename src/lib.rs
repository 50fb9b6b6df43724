//! # issuesync
//!
//! A batch tool that mirrors the latest comments of a fixed set of remote
//! issue threads into local Markdown documents and triggers an external
//! indexer so a separate retrieval system can serve them.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────┐   ┌──────────┐   ┌───────────┐   ┌─────────────┐
//! │  GitHub    │──▶│  Render  │──▶│ documents/ │──▶│  external   │
//! │ issue API  │   │ Markdown │   │  *.md      │   │  indexer    │
//! └────────────┘   └──────────┘   └─────┬─────┘   └─────────────┘
//!                                       │
//!                                 ┌─────▼──────┐
//!                                 │ sync state │
//!                                 │   (JSON)   │
//!                                 └────────────┘
//! ```
//!
//! Each invocation is a single batch job: fetch the newest N comments per
//! configured issue, rewrite one document per issue that had comments,
//! replace the sync-state file with this run's successes, rebuild the index
//! once if anything changed, and print a summary. Partial failures are
//! reported in the summary, not via the exit code.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types and run outcomes |
//! | [`fetch`] | Comment source trait + GitHub API client |
//! | [`render`] | Comment window → Markdown document |
//! | [`state`] | Persisted last-sync bookkeeping |
//! | [`indexer`] | External indexer subprocess invocation |
//! | [`sync`] | Orchestration of one full sync cycle |

pub mod config;
pub mod fetch;
pub mod indexer;
pub mod models;
pub mod render;
pub mod state;
pub mod sync;
