use thiserror::Error;

/// Why a gateway call failed. Every variant maps to a failed session.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
	#[error("search service unreachable: {reason}")]
	Transport { reason: String },

	#[error("search service answered HTTP {code}: {body}")]
	Status { code: u16, body: String },

	#[error("search service did not answer in time")]
	Timeout,

	#[error("search service sent an unexpected response: {reason}")]
	Malformed { reason: String },
}

/// Coarse failure class shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
	TransportFailure,
	MalformedResponse,
}

impl FetchError {
	pub fn transport(reason: impl Into<String>) -> Self {
		Self::Transport {
			reason: reason.into(),
		}
	}

	pub fn malformed(reason: impl Into<String>) -> Self {
		Self::Malformed {
			reason: reason.into(),
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Transport { .. } | Self::Status { .. } | Self::Timeout => {
				ErrorKind::TransportFailure
			}
			Self::Malformed { .. } => ErrorKind::MalformedResponse,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectError {
	#[error("publication `{title}` is not part of the current results")]
	NotInResults { title: String },
}
