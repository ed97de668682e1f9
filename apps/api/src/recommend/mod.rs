// Job matching, course suggestions and skill summaries.
// Live results come from the LLM; demo data stands in through FallbackRecommender.

pub mod courses;
pub mod demo;
pub mod handlers;
pub mod live;
pub mod matching;
pub mod prompts;
pub mod source;
