use crate::heap::Result;
use crate::heap::target::{Expr, Target, read_cstring};

/// Primitive-kind tag attached to every field descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	/// Unknown or reserved tag, decoded as no value.
	Invalid,
	/// Reference to another heap object.
	Object,
	/// 8-bit signed integer.
	Int8,
	/// 16-bit signed integer.
	Int16,
	/// 32-bit signed integer.
	Int32,
	/// 64-bit signed integer.
	Int64,
	/// Single-precision float.
	Float32,
	/// Double-precision float.
	Float64,
	/// Raw machine pointer outside the managed heap.
	NativePtr,
	/// Boolean byte.
	Boolean,
}

impl FieldKind {
	/// Map a raw runtime tag to its kind, folding unknown and reserved
	/// tags to `Invalid`.
	pub fn from_raw(raw: u64) -> Self {
		match raw {
			1 => Self::Object,
			2 => Self::Int8,
			3 => Self::Int16,
			4 => Self::Int32,
			5 => Self::Int64,
			6 => Self::Float32,
			7 => Self::Float64,
			8 => Self::NativePtr,
			9 => Self::Boolean,
			_ => Self::Invalid,
		}
	}

	/// Scalar byte width, `None` when the kind carries no value.
	pub fn width(&self) -> Option<u64> {
		match self {
			Self::Invalid => None,
			Self::Int8 | Self::Boolean => Some(1),
			Self::Int16 => Some(2),
			Self::Int32 | Self::Float32 => Some(4),
			Self::Int64 | Self::Float64 => Some(8),
			Self::Object | Self::NativePtr => Some(8),
		}
	}
}

/// One decoded field descriptor of a class layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
	/// Field name as stored by the runtime.
	pub name: Box<str>,
	/// Primitive-kind tag.
	pub kind: FieldKind,
	/// Byte offset from the object base address.
	pub offset: u64,
}

/// Read the full field descriptor list for the object at `obj`.
///
/// One count call plus three calls and a name read per field; callers
/// cache the result per type record so this runs once per class.
pub(crate) fn read_field_layout<T: Target + ?Sized>(target: &mut T, obj: u64) -> Result<Vec<FieldDescriptor>> {
	let count = target.evaluate(&Expr::FieldCount(obj))? as i32;
	let count = usize::try_from(count).unwrap_or(0);

	let mut fields = Vec::with_capacity(count);
	for index in 0..count {
		let index = index as i32;
		let name_addr = target.evaluate(&Expr::FieldName(obj, index))?;
		let name = read_cstring(target, name_addr)?;
		let kind = FieldKind::from_raw(target.evaluate(&Expr::FieldType(obj, index))?);
		let address = target.evaluate(&Expr::FieldAddress(obj, index))?;
		fields.push(FieldDescriptor {
			name,
			kind,
			offset: address.saturating_sub(obj),
		});
	}

	Ok(fields)
}
