use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("XML parse failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("document has no root element")]
    NoRoot,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
