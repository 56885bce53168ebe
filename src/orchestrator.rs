//! Lesson pipeline orchestrator for Tubelingo.
//!
//! Runs availability check, transcript fetch, segmentation, indexing and
//! retrieve+rewrite strictly one after another. Every collaborator failure is
//! folded into exactly one [`PipelineError`] kind with its message preserved.
//!
//! An `Orchestrator` expects one `generate_lesson` call in flight at a time:
//! each call clears and refills the shared content index.

use crate::chunking::Segmenter;
use crate::components::{ComponentFactory, DefaultComponents, RetrievalComponents};
use crate::config::Settings;
use crate::error::PipelineError;
use crate::lesson::{CefrLevel, LessonItem, LessonRequest};
use crate::transcript_source::{LanguageDescriptor, TranscriptSource};
use crate::vector_store::Metadata;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument, warn};

type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Result of a language availability check.
#[derive(Debug, Clone)]
pub struct Availability {
    pub is_available: bool,
    pub languages: Vec<LanguageDescriptor>,
}

/// Validated lesson parameters.
#[derive(Debug, Clone)]
struct ValidatedRequest<'a> {
    url: &'a str,
    language: &'a str,
    topic: &'a str,
    level: CefrLevel,
    n_chunks: usize,
}

/// The lesson pipeline.
pub struct Orchestrator {
    factory: Arc<dyn ComponentFactory>,
    transcript_source: OnceCell<Arc<dyn TranscriptSource>>,
    segmenter: OnceCell<Arc<dyn Segmenter>>,
    retrieval: OnceCell<RetrievalComponents>,
}

impl Orchestrator {
    /// Create an orchestrator that builds its collaborators from settings.
    pub fn new(settings: Settings) -> Self {
        Self::with_factory(Arc::new(DefaultComponents::new(settings)))
    }

    /// Create an orchestrator with a custom component factory.
    pub fn with_factory(factory: Arc<dyn ComponentFactory>) -> Self {
        Self {
            factory,
            transcript_source: OnceCell::new(),
            segmenter: OnceCell::new(),
            retrieval: OnceCell::new(),
        }
    }

    /// Build every collaborator that has not been built yet.
    pub async fn ensure_initialized(&self) -> PipelineResult<()> {
        self.transcript_source().await?;
        self.segmenter().await?;
        self.retrieval().await?;
        Ok(())
    }

    /// The transcript source, built on first use.
    pub async fn transcript_source(&self) -> PipelineResult<Arc<dyn TranscriptSource>> {
        self.transcript_source
            .get_or_try_init(|| async {
                info!("Initializing transcript source");
                self.factory
                    .build_transcript_source()
                    .map_err(|e| init_error("Transcript source", e))
            })
            .await
            .cloned()
    }

    async fn segmenter(&self) -> PipelineResult<Arc<dyn Segmenter>> {
        self.segmenter
            .get_or_try_init(|| async {
                info!("Initializing segmenter");
                self.factory
                    .build_segmenter()
                    .map_err(|e| init_error("Segmenter", e))
            })
            .await
            .cloned()
    }

    async fn retrieval(&self) -> PipelineResult<RetrievalComponents> {
        self.retrieval
            .get_or_try_init(|| async {
                info!("Initializing content index and rewriter");
                self.factory
                    .build_retrieval()
                    .map_err(|e| init_error("Content index", e))
            })
            .await
            .cloned()
    }

    /// Check whether `language` has a transcript for `url`.
    ///
    /// A failed lookup counts as "not available" with no languages.
    #[instrument(skip(self))]
    pub async fn check_language_availability(&self, url: &str, language: &str) -> Availability {
        let languages = match self.transcript_source().await {
            Ok(source) => match source.available_languages(url).await {
                Ok(languages) => languages,
                Err(e) => {
                    warn!("Error checking language availability: {}", e);
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("Error checking language availability: {}", e);
                Vec::new()
            }
        };

        let is_available = languages.iter().any(|l| l.code == language);
        Availability {
            is_available,
            languages,
        }
    }

    /// Turn a video into lesson items on `request.topic` at `request.level`.
    #[instrument(skip(self, request), fields(url = %request.url, language = %request.language, level = %request.level))]
    pub async fn generate_lesson(&self, request: &LessonRequest) -> PipelineResult<Vec<LessonItem>> {
        let request = validate(request).inspect_err(|e| error!("Input validation failed: {}", e))?;
        info!(
            "Starting lesson for topic '{}' ({} chunks)",
            request.topic, request.n_chunks
        );

        self.ensure_initialized().await?;

        self.require_language(request.url, request.language).await?;
        let transcript = self.fetch_transcript(request.url, request.language).await?;
        let texts = self.segment(&transcript).await?;
        self.index(&request, texts).await?;
        self.retrieve_and_rewrite(&request).await
    }

    /// Drop everything indexed by previous lessons.
    pub async fn cleanup(&self) {
        if let Some(retrieval) = self.retrieval.get() {
            if let Err(e) = retrieval.index.clear().await {
                warn!("Failed to clear content index: {}", e);
            }
        }
    }

    async fn require_language(&self, url: &str, language: &str) -> PipelineResult<()> {
        let availability = self.check_language_availability(url, language).await;
        if availability.is_available {
            return Ok(());
        }

        let err = PipelineError::LanguageNotAvailable {
            language: language.to_string(),
            available: availability.languages,
        };
        warn!("{}", err);
        Err(err)
    }

    async fn fetch_transcript(&self, url: &str, language: &str) -> PipelineResult<String> {
        let source = self.transcript_source().await?;

        info!("Fetching transcript");
        let text = source
            .transcribe(url, Some(language))
            .await
            .map(|t| t.to_text())
            .map_err(|e| {
                error!("Failed to fetch transcript: {}", e);
                PipelineError::TranscriptFetch(format!(
                    "Failed to fetch/transcribe video from {}: {}",
                    url, e
                ))
            })?;

        if text.trim().is_empty() {
            return Err(PipelineError::TranscriptFetch(
                "Transcription returned empty result".to_string(),
            ));
        }

        info!("Transcript length: {} characters", text.chars().count());
        Ok(text)
    }

    async fn segment(&self, text: &str) -> PipelineResult<Vec<String>> {
        let segmenter = self.segmenter().await?;

        let units = segmenter.segment(text).map_err(|e| {
            PipelineError::Chunking(format!("Failed to chunk transcribed text: {}", e))
        })?;
        if units.is_empty() {
            return Err(PipelineError::Chunking(
                "Segmenter returned empty result".to_string(),
            ));
        }

        info!("Created {} content units", units.len());
        Ok(units.into_iter().map(|u| u.into_content()).collect())
    }

    async fn index(&self, request: &ValidatedRequest<'_>, texts: Vec<String>) -> PipelineResult<()> {
        if texts.is_empty() {
            return Err(PipelineError::Retrieval(
                "No text content found in content units".to_string(),
            ));
        }

        let retrieval = self.retrieval().await?;
        let metadatas: Vec<Metadata> = (0..texts.len())
            .map(|i| unit_metadata(request.url, request.language, i))
            .collect();

        info!("Adding {} texts to the content index", texts.len());
        let result: crate::error::Result<()> = async {
            retrieval.index.clear().await?;
            retrieval.index.add(texts, Some(metadatas)).await
        }
        .await;

        result.map_err(|e| {
            error!("Failed to add content to index: {}", e);
            PipelineError::Retrieval(format!("Failed to add content to index: {}", e))
        })
    }

    async fn retrieve_and_rewrite(&self, request: &ValidatedRequest<'_>) -> PipelineResult<Vec<LessonItem>> {
        let retrieval = self.retrieval().await?;
        let query = format!("{} {}", request.language, request.topic);

        let wrap = |e: crate::error::LingoError| {
            error!("Failed to search and rewrite content: {}", e);
            PipelineError::Retrieval(format!("Failed to search and rewrite content: {}", e))
        };

        let matches = retrieval
            .index
            .similarity_search(&query, request.n_chunks)
            .await
            .map_err(wrap)?;

        if matches.is_empty() {
            warn!("No content matched topic '{}'", request.topic);
            return Ok(Vec::new());
        }

        let mut items = Vec::with_capacity(matches.len());
        for m in matches.into_iter().take(request.n_chunks) {
            let rewritten = retrieval
                .rewriter
                .rewrite(&m.text, request.level, request.language)
                .await
                .map_err(wrap)?;
            debug!("Rewrote match with score {:.3}", m.score);
            items.push(LessonItem::new(m.text, rewritten, m.metadata, request.level));
        }

        for (i, item) in items.iter().enumerate() {
            let missing: Vec<&str> = [("original", &item.original), ("rewritten", &item.rewritten)]
                .into_iter()
                .filter(|(_, value)| value.trim().is_empty())
                .map(|(name, _)| name)
                .collect();
            if !missing.is_empty() {
                warn!("Lesson item {} missing fields: {:?}", i, missing);
            }
        }

        info!("Generated {} lesson items", items.len());
        Ok(items)
    }
}

fn init_error(component: &str, e: crate::error::LingoError) -> PipelineError {
    error!("Failed to initialize {}: {}", component.to_lowercase(), e);
    PipelineError::General(format!("{} initialization failed: {}", component, e))
}

fn unit_metadata(url: &str, language: &str, unit_index: usize) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("video_url".to_string(), json!(url));
    metadata.insert("language".to_string(), json!(language));
    metadata.insert("unit_index".to_string(), json!(unit_index));
    metadata
}

/// Check request fields in order; the first failure wins.
///
/// `level` must be one of the upper-case CEFR codes verbatim.
fn validate(request: &LessonRequest) -> PipelineResult<ValidatedRequest<'_>> {
    let non_empty = |field: &'static str, value: &str| {
        if value.trim().is_empty() {
            Err(PipelineError::validation(field, value, "must be a non-empty string"))
        } else {
            Ok(())
        }
    };

    non_empty("url", &request.url)?;
    non_empty("language", &request.language)?;
    non_empty("topic", &request.topic)?;

    let level = CefrLevel::ALL
        .into_iter()
        .find(|level| level.as_str() == request.level)
        .ok_or_else(|| {
            PipelineError::validation(
                "level",
                &request.level,
                "not a CEFR level, must be one of A1, A2, B1, B2, C1, C2",
            )
        })?;
    if !level.is_rewritable() {
        return Err(PipelineError::validation(
            "level",
            &request.level,
            "not supported for rewriting, must be one of A2, B1, B2",
        ));
    }

    if request.n_chunks <= 0 {
        return Err(PipelineError::validation(
            "n_chunks",
            request.n_chunks.to_string(),
            "must be a positive integer",
        ));
    }
    let n_chunks = usize::try_from(request.n_chunks).map_err(|_| {
        PipelineError::validation("n_chunks", request.n_chunks.to_string(), "too large")
    })?;

    Ok(ValidatedRequest {
        url: request.url.trim(),
        language: request.language.trim(),
        topic: request.topic.trim(),
        level,
        n_chunks,
    })
}
