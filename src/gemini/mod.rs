pub mod client;
pub mod types;

pub use client::GeminiClient;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini request failed after {attempts} attempt(s). Last response: {last_response}")]
    Exhausted { attempts: u32, last_response: String },

    #[error("Gemini request error: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_error_display() {
        let e = GeminiError::Exhausted {
            attempts: 3,
            last_response: "{\"error\":\"quota\"}".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("3 attempt(s)"));
        assert!(msg.contains("quota"));
    }
}
