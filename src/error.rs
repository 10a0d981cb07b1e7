use thiserror::Error;

/// Errors raised at the boundary of the rounding engine.
///
/// The geometry itself never fails; these cover policy loading,
/// contour validation and master pairing.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RoundError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse policy: {0}")]
    PolicyParse(#[from] toml::de::Error),

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("invalid contour: {0}")]
    InvalidContour(String),

    #[error("masters do not share one outline topology: {0}")]
    MasterMismatch(String),

    #[cfg(feature = "ufo")]
    #[error("norad error: {0}")]
    Norad(#[from] norad::error::FontLoadError),

    #[cfg(feature = "ufo")]
    #[error("norad write error: {0}")]
    NoradWrite(#[from] norad::error::FontWriteError),
}
