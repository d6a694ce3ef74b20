use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuakeError {
    #[error("strike {0} is out of range [0, 360)")]
    StrikeOutOfRange(f64),

    #[error("dip {0} is out of range (0, 90]")]
    DipOutOfRange(f64),

    #[error("rake {0} is out of range (-180, 180]")]
    RakeOutOfRange(f64),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Tolerance violation: {0}")]
    Tolerance(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("source {id}: {source}")]
    Source {
        id: String,
        #[source]
        source: Box<QuakeError>,
    },
}

impl QuakeError {
    /// Attach the identifier of the seismic source that produced this error.
    pub fn for_source(self, id: impl Into<String>) -> Self {
        QuakeError::Source {
            id: id.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuakeError>;
