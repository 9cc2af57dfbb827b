mod error;
mod level;
mod sampler;

pub use error::Error;
pub use sampler::Sampler;
