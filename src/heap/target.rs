use std::fmt;

use crate::heap::{HeapError, Result};

/// Pointer width of the inspected target, in bytes.
pub const POINTER_SIZE: usize = 8;

/// Low header-word bits reserved for memory-management bookkeeping.
pub const TAG_MASK: u64 = 0x3;

/// Upper bound for NUL-terminated name reads.
pub(crate) const MAX_CSTRING: usize = 0x1000;

/// Typed introspection expression issued against the live target.
///
/// These are the only expressions the decoder ever evaluates. `Display`
/// renders the exact C call the runtime exports for each entry point, so
/// a debugger-backed host can hand the text to its expression evaluator
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
	/// Field count of an object, element count of an array.
	FieldCount(u64),
	/// Primitive-kind tag of one field or element.
	FieldType(u64, i32),
	/// Address of one field or element inside the object.
	FieldAddress(u64, i32),
	/// Address of the NUL-terminated name of one field.
	FieldName(u64, i32),
	/// Transcode a string object into the shared transfer buffer and
	/// return the produced byte length.
	StringToBuffer {
		/// String object address.
		obj: u64,
		/// Transfer buffer address.
		buffer: u64,
		/// Transfer buffer capacity in bytes.
		capacity: i32,
	},
	/// Address of the shared transfer buffer.
	DebugBuffer,
	/// Capacity of the shared transfer buffer in bytes.
	DebugBufferSize,
}

impl fmt::Display for Expr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::FieldCount(obj) => write!(f, "(int)Konan_DebugGetFieldCount((struct ObjHeader *){obj:#x})"),
			Self::FieldType(obj, index) => write!(f, "(int)Konan_DebugGetFieldType((struct ObjHeader *){obj:#x}, {index})"),
			Self::FieldAddress(obj, index) => write!(f, "(void *)Konan_DebugGetFieldAddress((struct ObjHeader *){obj:#x}, {index})"),
			Self::FieldName(obj, index) => write!(f, "(const char *)Konan_DebugGetFieldName((struct ObjHeader *){obj:#x}, {index})"),
			Self::StringToBuffer { obj, buffer, capacity } => write!(
				f,
				"(int)Konan_DebugObjectToUtf8Array((struct ObjHeader *){obj:#x}, (char *){buffer:#x}, (int){capacity})"
			),
			Self::DebugBuffer => write!(f, "(char *)Konan_DebugBuffer()"),
			Self::DebugBufferSize => write!(f, "(int)Konan_DebugBufferSize()"),
		}
	}
}

/// Narrow host contract for reaching the inspected process.
///
/// Every method is a blocking round trip to the live target; callers must
/// treat each call as a suspension point.
pub trait Target {
	/// Evaluate a typed introspection expression and return its value.
	fn evaluate(&mut self, expr: &Expr) -> Result<u64>;

	/// Read up to `len` bytes starting at `addr`.
	///
	/// May return fewer bytes than requested when the trailing range is
	/// inaccessible; fails when nothing at `addr` can be read.
	fn read_bytes(&mut self, addr: u64, len: usize) -> Result<Vec<u8>>;

	/// Resolve a symbol to its loaded address, 0 when not found.
	fn resolve_symbol(&mut self, name: &str) -> Result<u64>;

	/// Read one little-endian pointer-sized word.
	fn read_ptr(&mut self, addr: u64) -> Result<u64> {
		let bytes = read_exact(self, addr, POINTER_SIZE)?;
		let mut buf = [0_u8; POINTER_SIZE];
		buf.copy_from_slice(&bytes);
		Ok(u64::from_le_bytes(buf))
	}

	/// Read one little-endian `i32`.
	fn read_i32(&mut self, addr: u64) -> Result<i32> {
		let bytes = read_exact(self, addr, 4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(&bytes);
		Ok(i32::from_le_bytes(buf))
	}
}

/// Read exactly `len` bytes or fail with a short-read error.
pub(crate) fn read_exact<T: Target + ?Sized>(target: &mut T, addr: u64, len: usize) -> Result<Vec<u8>> {
	let bytes = target.read_bytes(addr, len)?;
	if bytes.len() < len {
		return Err(HeapError::ShortRead {
			addr,
			need: len,
			got: bytes.len(),
		});
	}
	Ok(bytes)
}

/// Read a bounded NUL-terminated string, lossily decoded.
pub(crate) fn read_cstring<T: Target + ?Sized>(target: &mut T, addr: u64) -> Result<Box<str>> {
	let bytes = target.read_bytes(addr, MAX_CSTRING)?;
	let end = bytes.iter().position(|byte| *byte == 0).unwrap_or(bytes.len());
	Ok(String::from_utf8_lossy(&bytes[..end]).into_owned().into_boxed_str())
}
