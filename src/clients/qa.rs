//! Grounded answer and summary composition.
//!
//! Builds prompts from retrieved document context (and optionally
//! web results), delegates completion to the chat collaborator, and
//! reports which sources contributed. The prompts bind the model to
//! the supplied context: in document-only mode the model must refuse
//! rather than answer from its own knowledge.

use std::sync::Arc;

use crate::clients::chat::ChatModel;
use crate::clients::websearch::{format_web_context, WebSearchClient};
use crate::core::error::Result;
use crate::core::types::{Answer, AnswerSources, WebResult};

/// How many retrieved contexts make it into the prompt
const MAX_PROMPT_CONTEXTS: usize = 3;

/// How much document text the summarizer reads, in characters
const MAX_SUMMARY_INPUT_CHARS: usize = 12_000;

/// Answer and summary composition over the chat collaborator
pub struct QaService {
    chat: Arc<dyn ChatModel>,
    web: Arc<WebSearchClient>,
}

impl QaService {
    pub fn new(chat: Arc<dyn ChatModel>, web: Arc<WebSearchClient>) -> Self {
        Self { chat, web }
    }

    /// Answer a question using document context and, optionally, web
    /// search results.
    pub async fn answer(
        &self,
        question: &str,
        contexts: &[String],
        use_web_search: bool,
    ) -> Result<Answer> {
        let doc_context = contexts
            .iter()
            .take(MAX_PROMPT_CONTEXTS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");

        let web_results = if use_web_search {
            self.web.search(question).await
        } else {
            Vec::new()
        };

        let (system, user) = if use_web_search && !web_results.is_empty() {
            build_web_prompt(question, &doc_context, &web_results)
        } else {
            build_document_prompt(question, &doc_context)
        };

        let content = self.chat.complete(&system, &user).await?;

        Ok(Answer {
            answer: content.trim().to_string(),
            sources: AnswerSources {
                document: !contexts.is_empty(),
                web: use_web_search && !web_results.is_empty(),
                web_results: web_results.into_iter().take(3).collect(),
            },
        })
    }

    /// Summarize document text into bullet points plus an abstract
    pub async fn summarize(&self, text: &str, max_words: usize) -> Result<String> {
        let clipped: String = text.chars().take(MAX_SUMMARY_INPUT_CHARS).collect();
        let prompt = format!(
            "Summarize the following document in bullet points and a short abstract. \
             Keep total under ~{max_words} words. Be faithful to the text.\n\n\
             --- DOCUMENT ---\n{clipped}\n"
        );

        let content = self
            .chat
            .complete("You are a concise technical summarizer.", &prompt)
            .await?;
        Ok(content.trim().to_string())
    }
}

fn build_document_prompt(question: &str, doc_context: &str) -> (String, String) {
    let system = "You are an AI assistant that answers questions strictly using the provided \
                  document context. You MUST NOT use any information outside of the provided \
                  context. If the answer is not in the document context, respond with: \
                  'I don't have enough information in the document to answer this question. \
                  Please enable web search if you'd like me to search the internet for \
                  additional information.'"
        .to_string();

    let user = format!(
        "Document Context:\n{doc_context}\n\n\
         Question: {question}\n\n\
         Answer the question using ONLY the document context provided above. \
         Cite which snippets you used by numbering them (e.g., [1], [2]). \
         If the answer is not in the context, say you don't know."
    );

    (system, user)
}

fn build_web_prompt(question: &str, doc_context: &str, web_results: &[WebResult]) -> (String, String) {
    let system = "You are an AI assistant that helps users understand documents. \
                  You have access to both the uploaded document context and web search results. \
                  When answering:\n\
                  1. FIRST try to answer using the document context provided\n\
                  2. If the answer is not in the document, you may use web search results\n\
                  3. Always clearly indicate which source you used (Document or Web)\n\
                  4. If neither source has the answer, say 'I don't have enough information to \
                  answer this question.'\n\
                  5. Cite sources using [Doc] for document snippets and [Web] for web sources"
        .to_string();

    let web_context = format_web_context(web_results);
    let user = format!(
        "=== Document Context ===\n{doc_context}\n\n\
         {web_context}\n\n\
         Question: {question}\n\n\
         Provide a comprehensive answer using the available sources. \
         Clearly indicate whether your answer comes from the document or web search."
    );

    (system, user)
}
