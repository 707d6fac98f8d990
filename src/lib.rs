pub mod common;
pub mod parser;

pub use common::client::client::{ClientConfig, JsonFetcher, PlayerClient};
pub use common::models::{MediaResult, Protocol, StreamCandidate};
pub use parser::errors::ParseError;
pub use parser::models::ResolveOptions;
pub use parser::{EmbedParser, find_embeds};
