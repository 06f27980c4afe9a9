pub mod analyzer;
pub mod handlers;
pub mod impact;
pub mod keywords;
pub mod readability;
pub mod report;
pub mod scoring;
pub mod sections;
pub mod stopwords;
pub mod structure;
pub mod suggestions;
