use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, HeapError>;

/// Errors produced while decoding heap objects from a live target.
#[derive(Debug, Error)]
pub enum HeapError {
	/// Expression evaluation against the target failed.
	#[error("evaluate `{expr}`: {reason}")]
	Evaluation {
		/// Rendered expression text.
		expr: String,
		/// Host-reported failure description.
		reason: String,
	},
	/// Bounded memory read failed outright.
	#[error("read {len} bytes at {addr:#x}: {reason}")]
	Read {
		/// Requested start address.
		addr: u64,
		/// Requested byte count.
		len: usize,
		/// Host-reported failure description.
		reason: String,
	},
	/// Memory read returned fewer bytes than the decode step needs.
	#[error("short read at {addr:#x}: need {need}, got {got}")]
	ShortRead {
		/// Requested start address.
		addr: u64,
		/// Bytes the decode step needs.
		need: usize,
		/// Bytes the target produced.
		got: usize,
	},
	/// No list backing field matched any known candidate name.
	#[error("no backing array field on list object {addr:#x}")]
	ListBackingNotFound {
		/// List object address.
		addr: u64,
	},
	/// Map keys/values backing arrays were not both present.
	#[error("no keys/values backing arrays on map object {addr:#x}")]
	MapBackingNotFound {
		/// Map object address.
		addr: u64,
	},
	/// Shared transfer buffer could not be resolved in the target.
	#[error("string transfer buffer unavailable")]
	StringBufferUnavailable,
}

impl HeapError {
	/// Whether this error reflects an unexpected object shape rather than
	/// a target communication failure.
	pub fn is_structural(&self) -> bool {
		matches!(
			self,
			Self::ListBackingNotFound { .. } | Self::MapBackingNotFound { .. } | Self::StringBufferUnavailable
		)
	}
}
