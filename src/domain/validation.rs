use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Missing { field: &'static str },
    Empty { field: &'static str },
    ContentTooLong { max: usize, actual: usize },
    EmptyList { field: &'static str },
    InvalidTimestamp { field: &'static str, input: String },
    UnknownVariant { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "property '{field}' cannot be null"),
            Self::Empty { field } => write!(f, "property '{field}' cannot be null or empty"),
            Self::ContentTooLong { max, actual } => {
                write!(
                    f,
                    "maximum length for content is {max} characters (got {actual})"
                )
            }
            Self::EmptyList { field } => {
                write!(f, "property '{field}' must contain at least one element")
            }
            Self::InvalidTimestamp { field, input } => {
                write!(
                    f,
                    "property '{field}' is not an ISO-8601 timestamp with a 4 digit year: {input:?}"
                )
            }
            Self::UnknownVariant { field, value } => {
                write!(f, "property '{field}' has unsupported value: {value}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
