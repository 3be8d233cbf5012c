use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid parameter value: {0}")]
    InvalidParameter(String),

    #[error("Request parameter NextToken is invalid")]
    InvalidToken,

    #[error("Gateway {gateway_id} has no attachment to vpc {vpc_id}")]
    InvalidAttachment { gateway_id: String, vpc_id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BackendError {
    /// Wire-level error code the serializing layer reports for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ResourceNotFound",
            Self::InvalidFormat(_) => "InvalidFormat",
            Self::InvalidParameter(_) => "InvalidParameterValue",
            Self::InvalidToken => "PaginationException",
            Self::InvalidAttachment { .. } => "InvalidVpnGatewayAttachment.NotFound",
            Self::Other(_) => "InternalFailure",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Other(_) => 500,
            _ => 400,
        }
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;
