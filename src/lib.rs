pub mod api;
pub mod config;
pub mod data_models;
pub mod error;
pub mod extractor;
pub mod invoker;
pub mod pipeline;
pub mod renderer;

pub use config::Config;
pub use error::SearchError;
pub use pipeline::SearchService;
