pub mod config;
pub mod logger;
pub mod content;
pub mod post;
pub mod drafts;
pub mod reactions;
mod test_data;
