// CV pipeline: text extraction, LLM normalization, persistence, and polling retrieval.
// All LLM calls go through llm_client; all storage access goes through storage.

pub mod analysis;
pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod retrieval;
pub mod upload;
