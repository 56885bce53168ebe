//! CLI command implementations.

mod config;
mod doctor;
mod languages;
mod lesson;
mod practice;
mod search;
mod transcript;

pub use config::run_config;
pub use doctor::run_doctor;
pub use languages::run_languages;
pub use lesson::run_lesson;
pub use practice::run_practice;
pub use search::run_search;
pub use transcript::run_transcript;
