use std::fmt;

/// Raw address of a heap object reference.
///
/// Ephemeral; produced per navigation call and resolved on demand through
/// the dispatcher rather than decoded eagerly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef(pub u64);

impl ObjectRef {
	/// Referenced object address.
	pub fn addr(&self) -> u64 {
		self.0
	}
}

/// One decoded field or element value.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
	/// Unrecognized or reserved field kind, displayed as absent.
	None,
	/// Boolean field.
	Bool(bool),
	/// 8-bit signed integer field.
	I8(i8),
	/// 16-bit signed integer field.
	I16(i16),
	/// 32-bit signed integer field.
	I32(i32),
	/// 64-bit signed integer field.
	I64(i64),
	/// Single-precision float field.
	F32(f32),
	/// Double-precision float field.
	F64(f64),
	/// Raw machine pointer outside the managed heap.
	NativePtr(u64),
	/// Reference to another heap object.
	Object(ObjectRef),
	/// Synthesized key/value pair of a map entry.
	Entry {
		/// Decoded key side.
		key: Box<DecodedValue>,
		/// Decoded value side.
		value: Box<DecodedValue>,
	},
}

impl fmt::Display for DecodedValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::None => write!(f, "<no value>"),
			Self::Bool(value) => write!(f, "{value}"),
			Self::I8(value) => write!(f, "{value}"),
			Self::I16(value) => write!(f, "{value}"),
			Self::I32(value) => write!(f, "{value}"),
			Self::I64(value) => write!(f, "{value}"),
			Self::F32(value) => write!(f, "{value}"),
			Self::F64(value) => write!(f, "{value}"),
			Self::NativePtr(value) => write!(f, "{value:#x}"),
			Self::Object(reference) => write!(f, "{:#x}", reference.0),
			Self::Entry { key, value } => write!(f, "{key} => {value}"),
		}
	}
}
