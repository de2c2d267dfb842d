use crate::heap::Result;
use crate::heap::session::Session;
use crate::heap::target::{Expr, Target, read_exact};

/// Quoted-text decoder for string objects.
///
/// Strings have no navigable children; the whole value is the summary.
#[derive(Debug, Clone)]
pub struct StringDecoder {
	representation: Box<str>,
}

impl StringDecoder {
	/// Transcode the string at `base` through the shared transfer buffer.
	pub fn new<T: Target>(session: &mut Session<T>, base: u64) -> Result<Self> {
		let buffer = session.transfer_buffer()?;
		let len = session.target_mut().evaluate(&Expr::StringToBuffer {
			obj: base,
			buffer: buffer.addr,
			capacity: buffer.capacity,
		})? as i32;

		// A zero-length transcode covers empty and degenerate strings
		// alike; the raw address stands in rather than an empty quote
		// pair.
		let representation = if len <= 0 {
			format!("{base:#x}")
		} else {
			let bytes = read_exact(session.target_mut(), buffer.addr, len as usize)?;
			format!("\"{}\"", String::from_utf8_lossy(&bytes))
		};

		Ok(Self {
			representation: representation.into_boxed_str(),
		})
	}

	/// Strings expose no children.
	pub fn num_children(&self) -> usize {
		0
	}

	/// Strings expose no children.
	pub fn has_children(&self) -> bool {
		false
	}

	/// Quoted text, or the raw address for degenerate strings.
	pub fn summary(&self) -> String {
		self.representation.to_string()
	}
}
