//! Services Layer
//!
//! Business logic called by the command surface. Services are stateless;
//! anything shared lives in [`crate::state::AppState`] and is passed in.
//!
//! # Architecture
//!
//! ```text
//! Presentation --> Commands --> Services --> Market data / Store
//! ```
//!
//! # Services
//!
//! - `FilterService` - Search, multi-select filters, sorting
//! - `ComparisonService` - Bounded comparison set and metric table
//! - `QuotesService` - Optional live quote overlay and history
//! - `InstitutionalService` - Batched holder lookups and top-holder ranking
//! - `OptionsService` - Single-leg Greeks and payoff illustration
//! - `ChatService` - Keyword assistant replies

pub mod filter_service;
pub mod comparison_service;
pub mod quotes_service;
pub mod institutional_service;
pub mod options_service;
pub mod chat_service;

// Re-export commonly used types and services
pub use filter_service::{FilterCriteria, FilterService, SortKey, SortOrder, SortSpec};
pub use comparison_service::{
    AddOutcome, ComparisonRow, ComparisonService, ComparisonSet, ComparisonTable, MAX_COMPARISON,
};
pub use quotes_service::{EnhanceSummary, QuotesService, RateLimit};
pub use institutional_service::{InstitutionalService, BATCH_DELAY, DEFAULT_TOP_HOLDERS};
pub use options_service::{
    OptionAnalysis, OptionGreeks, OptionInput, OptionType, OptionsService, PayoffPoint,
    PositionSide,
};
pub use chat_service::ChatService;
