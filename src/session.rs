//! Per-process application state.
//!
//! One `Session` is created in `main` and handed to the command handlers. It
//! owns the orchestrator and remembers which transcript languages each video
//! offers so repeated lookups skip the network.

use crate::config::Settings;
use crate::error::PipelineError;
use crate::lesson::{LessonItem, LessonRequest};
use crate::orchestrator::{Availability, Orchestrator};
use crate::transcript_source::{LanguageDescriptor, TranscriptSource};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct Session {
    settings: Settings,
    orchestrator: Orchestrator,
    languages: HashMap<String, Vec<LanguageDescriptor>>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let orchestrator = Orchestrator::new(settings.clone());
        Self::with_orchestrator(settings, orchestrator)
    }

    pub fn with_orchestrator(settings: Settings, orchestrator: Orchestrator) -> Self {
        Self {
            settings,
            orchestrator,
            languages: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub async fn transcript_source(&self) -> Result<Arc<dyn TranscriptSource>, PipelineError> {
        self.orchestrator.transcript_source().await
    }

    /// Availability of `language` for `url`, cached per URL.
    ///
    /// Failed lookups are not cached.
    pub async fn availability(&mut self, url: &str, language: &str) -> Availability {
        if let Some(languages) = self.languages.get(url) {
            debug!("Using cached languages for {}", url);
            return Availability {
                is_available: languages.iter().any(|l| l.code == language),
                languages: languages.clone(),
            };
        }

        let availability = self.orchestrator.check_language_availability(url, language).await;
        if !availability.languages.is_empty() {
            self.languages.insert(url.to_string(), availability.languages.clone());
        }
        availability
    }

    pub async fn generate_lesson(&mut self, request: &LessonRequest) -> Result<Vec<LessonItem>, PipelineError> {
        self.orchestrator.generate_lesson(request).await
    }

    /// Tear down: clear the content index and the language cache.
    pub async fn end(mut self) {
        self.orchestrator.cleanup().await;
        self.languages.clear();
        debug!("Session ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::{FixedWindowSegmenter, Segmenter};
    use crate::components::{ComponentFactory, RetrievalComponents};
    use crate::error::{LingoError, Result};
    use crate::transcript_source::{Transcript, VideoSummary};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        lookups: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TranscriptSource for CountingSource {
        async fn available_languages(&self, url: &str) -> Result<Vec<LanguageDescriptor>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if url.contains("broken") {
                return Err(LingoError::VideoNotFound(url.to_string()));
            }
            Ok(vec![LanguageDescriptor::new("Spanish", "es", false, true)])
        }

        async fn transcribe(&self, url: &str, _language: Option<&str>) -> Result<Transcript> {
            Err(LingoError::NoTranscript(url.to_string()))
        }

        async fn transcribe_with_translation(&self, url: &str, _target: &str) -> Result<Transcript> {
            Err(LingoError::NoTranscript(url.to_string()))
        }

        async fn search_videos(&self, _query: &str, _limit: usize) -> Result<Vec<VideoSummary>> {
            Ok(Vec::new())
        }
    }

    struct Factory {
        lookups: Arc<AtomicUsize>,
    }

    impl ComponentFactory for Factory {
        fn build_transcript_source(&self) -> Result<Arc<dyn TranscriptSource>> {
            Ok(Arc::new(CountingSource {
                lookups: self.lookups.clone(),
            }))
        }

        fn build_segmenter(&self) -> Result<Arc<dyn Segmenter>> {
            Ok(Arc::new(FixedWindowSegmenter::new()))
        }

        fn build_retrieval(&self) -> Result<RetrievalComponents> {
            Err(LingoError::Config("not needed".to_string()))
        }
    }

    fn session() -> (Session, Arc<AtomicUsize>) {
        let lookups = Arc::new(AtomicUsize::new(0));
        let orchestrator = Orchestrator::with_factory(Arc::new(Factory {
            lookups: lookups.clone(),
        }));
        (Session::with_orchestrator(Settings::default(), orchestrator), lookups)
    }

    #[tokio::test]
    async fn test_availability_is_cached_per_url() {
        let (mut session, lookups) = session();

        assert!(session.availability("https://youtu.be/aaaaaaaaaaa", "es").await.is_available);
        assert!(!session.availability("https://youtu.be/aaaaaaaaaaa", "fr").await.is_available);
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_lookups_are_not_cached() {
        let (mut session, lookups) = session();

        for _ in 0..2 {
            let availability = session.availability("https://youtu.be/broken", "es").await;
            assert!(availability.languages.is_empty());
        }
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_end_without_lessons() {
        let (mut session, _) = session();
        session.availability("https://youtu.be/aaaaaaaaaaa", "es").await;
        session.end().await;
    }
}
