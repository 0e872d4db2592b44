//! Fan one document out to every (query, model) pair

use compbench_domain::{ExtractionResult, Extractor, QueryType};
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use tracing::info;

/// One query template to run against every extractor
#[derive(Debug, Clone, PartialEq)]
pub struct QueryJob {
    /// Query template
    pub query_type: QueryType,

    /// Display name recorded on results
    pub query_name: String,

    /// Prompt text sent to the model
    pub prompt: String,
}

impl QueryJob {
    /// Job named after the query type's display name
    pub fn new(query_type: QueryType, prompt: impl Into<String>) -> Self {
        Self {
            query_type,
            query_name: query_type.display_name().to_string(),
            prompt: prompt.into(),
        }
    }
}

/// Called after each completed pair with `(result, completed, total)`
pub type ProgressCallback = Box<dyn Fn(&ExtractionResult, usize, usize) + Send + Sync>;

/// Runs every query against every extractor for one document
///
/// Results come back ordered by query first, then by extractor, whatever
/// order the calls finish in. There is no retry at this level; each
/// extractor retries its own calls.
pub struct ExtractionOrchestrator {
    extractors: Vec<Box<dyn Extractor>>,
    max_concurrent: usize,
    progress: Option<ProgressCallback>,
}

impl ExtractionOrchestrator {
    /// Create a sequential orchestrator
    pub fn new(extractors: Vec<Box<dyn Extractor>>) -> Self {
        Self {
            extractors,
            max_concurrent: 1,
            progress: None,
        }
    }

    /// Allow up to `max_concurrent` pairs in flight (minimum 1)
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Install a progress callback
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ExtractionResult, usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Number of pairs a run over `jobs` will execute
    pub fn total_pairs(&self, jobs: &[QueryJob]) -> usize {
        jobs.len() * self.extractors.len()
    }

    /// Run every job against every extractor
    pub async fn run(&self, text: &str, jobs: &[QueryJob]) -> Vec<ExtractionResult> {
        let total = self.total_pairs(jobs);
        info!(
            "Running {} extractions ({} queries x {} models, max {} concurrent)",
            total,
            jobs.len(),
            self.extractors.len(),
            self.max_concurrent
        );

        let pairs = jobs
            .iter()
            .flat_map(|job| self.extractors.iter().map(move |extractor| (job, extractor)));
        let completed = AtomicUsize::new(0);

        if self.max_concurrent == 1 {
            let mut results = Vec::with_capacity(total);
            for (job, extractor) in pairs {
                let result = extractor
                    .extract(text, &job.prompt, job.query_type, &job.query_name)
                    .await;
                self.report(&result, &completed, total);
                results.push(result);
            }
            return results;
        }

        let semaphore = Semaphore::new(self.max_concurrent);
        let calls = pairs.map(|(job, extractor)| {
            let semaphore = &semaphore;
            let completed = &completed;
            async move {
                let _permit = semaphore.acquire().await;
                let result = extractor
                    .extract(text, &job.prompt, job.query_type, &job.query_name)
                    .await;
                self.report(&result, completed, total);
                result
            }
        });

        join_all(calls).await
    }

    fn report(&self, result: &ExtractionResult, completed: &AtomicUsize, total: usize) {
        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(callback) = &self.progress {
            callback(result, done, total);
        }
    }
}
