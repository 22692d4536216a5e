pub mod client;
pub mod comparison;
pub mod extractor;
pub mod prompts;
pub mod types;

pub use client::*;
pub use comparison::*;
pub use extractor::*;
pub use prompts::{build_prompt, ComparisonPrompt};
pub use types::*;
