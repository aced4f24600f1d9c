pub mod http;
pub mod traits;

pub use http::HttpGenerationService;
pub use traits::GenerationService;
