//! The summarization pipeline: load, chunk, compress, index, retrieve, generate.
//!
//! Every dependency is injected, so one `Summarizer` can be shared across
//! requests. Each call builds and drops its own [`VectorIndex`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use scholar_core::Config;
use scholar_ingest::document::chunker::{chunk_text, ChunkConfig};
use scholar_ingest::document::{DocumentLoader, PdfLoader};
use scholar_ingest::embedding::{create_embedder, Embedder};
use scholar_llm::{ChatClient, HttpTransport, LlmProvider, ReqwestTransport};

use crate::compressor::Compressor;
use crate::error::RagError;
use crate::index::VectorIndex;
use crate::retriever::Retriever;

pub const DEFAULT_QUERY: &str = "Summarize this paper";
pub const NO_TEXT_MESSAGE: &str = "No text could be extracted from the PDF.";
pub const NO_SECTIONS_MESSAGE: &str =
    "No relevant sections were retrieved. The paper may be too short or the query may not match the content.";
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

const INSTRUCTION: &str = "You are summarizing an academic research paper. Preserve technical accuracy: \
keep key terms, methods, and findings exact. Structure your response clearly (e.g. objective, methods, \
results, conclusions). Do not invent or add information not present in the excerpts.";

/// The final prompt sent to the LLM.
pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "{INSTRUCTION}\n\n\
         Relevant excerpts from the paper (may be compressed for length):\n\n\
         {context}\n\n\
         User request: {query}\n\n\
         Provide a concise, accurate summary based only on the excerpts above."
    )
}

pub struct Summarizer {
    loader: Arc<dyn DocumentLoader>,
    chunking: ChunkConfig,
    compressor: Compressor,
    embedder: Arc<dyn Embedder>,
    embed_batch_size: usize,
    retriever: Retriever,
    llm: Arc<dyn LlmProvider>,
}

impl Summarizer {
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        compressor: Compressor,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            loader,
            chunking: ChunkConfig::default(),
            compressor,
            embedder,
            embed_batch_size: 64,
            retriever: Retriever::default(),
            llm,
        }
    }

    pub fn with_chunking(mut self, chunking: ChunkConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_retriever(mut self, retriever: Retriever) -> Self {
        self.retriever = retriever;
        self
    }

    pub fn with_embed_batch_size(mut self, batch_size: usize) -> Self {
        self.embed_batch_size = batch_size.max(1);
        self
    }

    /// Wire the production components from configuration.
    pub fn from_config(config: &Config) -> Result<Self, RagError> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(Duration::from_secs(
            config.llm.request_timeout_secs,
        )));
        let llm: Arc<dyn LlmProvider> =
            Arc::new(ChatClient::from_config(&config.llm, None, transport.clone())?);
        let embedder = create_embedder(&config.embedding, transport.clone())?;
        let compressor = Compressor::from_config(&config.compression, llm.clone(), transport);

        Ok(Self::new(Arc::new(PdfLoader), compressor, embedder, llm)
            .with_chunking(ChunkConfig::new(
                config.chunking.chunk_size,
                config.chunking.chunk_overlap,
            ))
            .with_retriever(Retriever::new(config.retrieval.top_k))
            .with_embed_batch_size(config.embedding.batch_size))
    }

    pub fn compressor(&self) -> &Compressor {
        &self.compressor
    }

    /// Extract the text of the PDF at `path` off the async runtime.
    pub async fn extract(&self, path: &Path) -> Result<String, RagError> {
        let loader = self.loader.clone();
        let owned = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || loader.load(&owned)).await??;
        info!("Extracted {} chars from {}", text.len(), path.display());
        Ok(text)
    }

    /// Summarize the PDF at `path`. A blank `query` means [`DEFAULT_QUERY`].
    pub async fn summarize_pdf(&self, path: &Path, query: &str) -> Result<String, RagError> {
        let text = self.extract(path).await?;
        self.summarize_text(&text, query).await
    }

    /// Run the pipeline on already-extracted text.
    pub async fn summarize_text(&self, text: &str, query: &str) -> Result<String, RagError> {
        if text.trim().is_empty() {
            return Ok(NO_TEXT_MESSAGE.to_string());
        }
        let query = match query.trim() {
            "" => DEFAULT_QUERY,
            q => q,
        };

        let chunks: Vec<String> = chunk_text(text, &self.chunking)
            .into_iter()
            .map(|c| c.content)
            .collect();
        info!("Split into {} chunks", chunks.len());

        let compressed = self.compressor.compress(chunks).await?;
        let index = VectorIndex::build(compressed, self.embedder.clone(), self.embed_batch_size).await?;
        let relevant = self.retriever.retrieve(&index, query).await?;
        info!("Retrieved {} of {} chunks (k={})", relevant.len(), index.len(), self.retriever.k());

        if relevant.is_empty() {
            return Ok(NO_SECTIONS_MESSAGE.to_string());
        }

        let prompt = build_prompt(&relevant.join(CONTEXT_SEPARATOR), query);
        let summary = self.llm.generate(&prompt, 0.0).await?;
        info!("Summary generated ({} chars)", summary.len());
        Ok(summary)
    }
}
