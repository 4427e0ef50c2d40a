use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config write error: {0}")]
    WriteError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PdfPalError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("chat error: {0}")]
    Chat(String),

    #[error("file error: {0}")]
    Files(String),

    #[error("{0}")]
    Other(String),
}
