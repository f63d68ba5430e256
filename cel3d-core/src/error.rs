/// Error type shared by the core library
use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A configuration value is outside its accepted range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Reading a config or mesh file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The config file is not valid TOML for `RenderConfig`
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    /// The STL data could not be parsed
    #[error("failed to parse STL: {0}")]
    Stl(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_messages_and_sources() {
        let err = Error::invalid("fps must be positive");
        assert_eq!(err.to_string(), "invalid configuration: fps must be positive");
        assert!(err.source().is_none());

        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "scene.toml"));
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: scene.toml");
        assert!(err.source().is_some());

        let err = Error::Stl("truncated facet".into());
        assert_eq!(err.to_string(), "failed to parse STL: truncated facet");
    }

    #[test]
    fn test_toml_errors_convert() {
        let parse_err = toml::from_str::<toml::Table>("width = ").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::ConfigParse(_)));
        assert!(err.to_string().starts_with("failed to parse config: "));
        assert!(err.source().is_some());
    }
}
