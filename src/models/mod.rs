pub mod flashcard;
pub mod learning_session;
pub mod quality;
pub mod review_state;
pub mod sm2;


pub use flashcard::Flashcard;
pub use learning_session::ReviewSession;
pub use quality::Quality;
pub use review_state::ReviewState;
