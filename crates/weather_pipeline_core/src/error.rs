/// Closed set of pipeline failures. Every variant aborts the whole
/// invocation; there are no retries or partial commits anywhere in the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    MissingConfig {
        key: String,
    },
    Fetch {
        bucket: String,
        key: String,
        message: String,
    },
    Decode {
        message: String,
    },
    Send {
        message: String,
    },
}

impl PipelineError {
    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfig { key: key.into() }
    }

    pub fn fetch(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Fetch {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn send(message: impl Into<String>) -> Self {
        Self::Send {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingConfig { key } => write!(f, "{key} is missing"),
            Self::Fetch {
                bucket,
                key,
                message,
            } => write!(f, "failed to fetch object {key} from bucket {bucket}: {message}"),
            Self::Decode { message } => f.write_str(message),
            Self::Send { message } => write!(f, "failed to send message to queue: {message}"),
        }
    }
}

impl std::error::Error for PipelineError {}
