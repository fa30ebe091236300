pub mod cache;
pub mod confidence;
pub mod config;
pub mod error;
pub mod http_client;
pub mod profile;
pub mod records;
pub mod rng;
pub mod service;
pub mod source;
pub mod venue;
pub mod win_prob;

pub use error::PredictError;
pub use service::PredictionService;
pub use win_prob::{PredictionRequest, PredictionResult};
