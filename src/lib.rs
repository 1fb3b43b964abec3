pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod placement;
pub mod store;

pub use config::TutorConfig;
pub use error::{Result, TutorError};
pub use models::{Flashcard, Quality, ReviewSession, ReviewState};
pub use models::sm2::apply_review;
pub use placement::{Advance, CefrLevel, DimensionScores, PlacementSession, Stage};
pub use store::{InMemoryReviewStore, ItemProgress, ReviewKey, ReviewStore};
