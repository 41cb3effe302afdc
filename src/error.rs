use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid tile `{0}`, expected a column a-c followed by a row 1-3")]
    InvalidTile(String),
    #[error("unknown difficulty `{0}`, expected easy, intermediate or pro")]
    UnknownDifficulty(String),
    #[error("invalid marker `{0}`, expected x or o")]
    InvalidMarker(String),
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("malformed config: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
