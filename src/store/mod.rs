pub mod repository;
pub mod scheduler;
pub mod sqlite;

pub use repository::SaveRepository;
pub use scheduler::{SaveScheduler, AUTO_SAVE_INTERVAL_MS, SAVE_DEBOUNCE_MS};
pub use sqlite::{SaveDb, SaveDbError, SAVE_SLOT_KEY};
