//! Error taxonomy shared by every stage that can fail.

pub type XpixResult<T> = Result<T, XpixError>;

#[derive(Debug, thiserror::Error)]
pub enum XpixError {
    #[error("invalid request: {0}")]
    InvalidSpec(String),
    #[error("asset unavailable: {0}")]
    AssetUnavailable(String),
    #[error("geometry overflow: {0}")]
    GeometryOverflow(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl XpixError {
    pub fn invalid_spec(msg: impl Into<String>) -> Self {
        Self::InvalidSpec(msg.into())
    }

    pub fn asset_unavailable(msg: impl Into<String>) -> Self {
        Self::AssetUnavailable(msg.into())
    }

    pub fn geometry_overflow(msg: impl Into<String>) -> Self {
        Self::GeometryOverflow(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
