//! Tubelingo - language lessons from YouTube videos
//!
//! Fetches a video's transcript, cuts it into fixed-size passages, indexes
//! them for similarity search and rewrites the passages matching a learner's
//! topic at a CEFR level.
//!
//! # Architecture
//!
//! - `config` - Configuration management and prompt templates
//! - `transcript_source` - Caption listing, fetching, translation and video search
//! - `chunking` - Fixed-window segmentation
//! - `embedding` - Embedding generation
//! - `vector_store` - In-memory vector storage
//! - `retrieval` - Similarity-searchable content index
//! - `rewrite` - CEFR-level rewriting
//! - `orchestrator` - The lesson pipeline and its error taxonomy
//! - `practice` - Pronunciation feedback on learner recordings
//! - `session` - Per-process application state
//!
//! # Example
//!
//! ```rust,no_run
//! use tubelingo::config::Settings;
//! use tubelingo::lesson::LessonRequest;
//! use tubelingo::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = Orchestrator::new(Settings::load()?);
//!
//!     let request = LessonRequest::new("dQw4w9WgXcQ", "en", "love", "B1", 3);
//!     for item in orchestrator.generate_lesson(&request).await? {
//!         println!("{} ({} words)", item.rewritten, item.word_count);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod components;
pub mod config;
pub mod embedding;
pub mod error;
pub mod lesson;
pub mod openai;
pub mod orchestrator;
pub mod practice;
pub mod retrieval;
pub mod rewrite;
pub mod session;
pub mod transcript_source;
pub mod vector_store;

pub use error::{LingoError, PipelineError, Result};
