//! Text-to-speech backends.

pub mod http;
pub mod options;
pub mod request;
pub mod synthesizer;

pub use http::HttpSynthesizer;
pub use options::SynthesisOptions;
pub use request::{NormalizationOptions, SynthesisRequest};
pub use synthesizer::{MockSynthesizer, Synthesizer};
