pub mod client;
pub mod dto;
pub mod retry;
pub mod transport;

pub use client::ApiClient;
pub use dto::{
    AnalysisResult, IngredientInfo, ProfileUpdate, ScanSummary, TopIngredient, UserProfile,
};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use transport::{ApiRequest, ApiResponse, Body, HttpTransport, Transport};
