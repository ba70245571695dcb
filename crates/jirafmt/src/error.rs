#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Input is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Input does not contain an ADF document or a text body")]
    NoDocument,
}
