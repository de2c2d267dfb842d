use crate::heap::array::ArrayDecoder;
use crate::heap::header::{Classified, classify};
use crate::heap::list::ListDecoder;
use crate::heap::map::MapDecoder;
use crate::heap::object::ObjectDecoder;
use crate::heap::session::Session;
use crate::heap::string::StringDecoder;
use crate::heap::subtype::is_subtype;
use crate::heap::target::Target;
use crate::heap::typeinfo::TypeInfo;
use crate::heap::value::DecodedValue;
use crate::heap::{HeapError, Result};

/// Navigable decoder selected for one resolved address.
///
/// The variant is chosen once at [`resolve`] time; every navigation call
/// is a single match over it.
#[derive(Debug, Clone)]
pub enum Decoder {
	/// Address 0.
	Null,
	/// Header failed the self-reference check; only the raw value shows.
	Raw(u64),
	/// Well-known string object.
	Str(StringDecoder),
	/// Array-shaped object.
	Array(ArrayDecoder),
	/// Well-known list delegating to its backing array.
	List(ListDecoder),
	/// Well-known map over paired backing arrays.
	Map(MapDecoder),
	/// Any other class instance, shown field by field.
	Object(ObjectDecoder),
}

/// Classify `addr` and build the matching decoder.
///
/// Structural surprises inside a specialized decoder downgrade to the
/// generic object decoder with one diagnostic; evaluation and read
/// failures propagate unchanged.
pub fn resolve<T: Target>(session: &mut Session<T>, addr: u64) -> Result<Decoder> {
	let type_info = match classify(session.target_mut(), addr) {
		Classified::Null => return Ok(Decoder::Null),
		Classified::Uninitialized => return Ok(Decoder::Raw(addr)),
		Classified::Instance(type_info) => type_info,
	};

	let known = session.known_types()?;

	if let Some(string) = known.string {
		if is_subtype(session.target_mut(), type_info, &string)? {
			return match StringDecoder::new(session, addr) {
				Ok(decoder) => Ok(Decoder::Str(decoder)),
				Err(err) => fallback(session, addr, type_info, err),
			};
		}
	}
	if let Some(list) = known.list {
		if is_subtype(session.target_mut(), type_info, &list)? {
			return match ListDecoder::new(session, addr, type_info) {
				Ok(decoder) => Ok(Decoder::List(decoder)),
				Err(err) => fallback(session, addr, type_info, err),
			};
		}
	}
	if let Some(map) = known.map {
		if is_subtype(session.target_mut(), type_info, &map)? {
			return match MapDecoder::new(session, addr, type_info) {
				Ok(decoder) => Ok(Decoder::Map(decoder)),
				Err(err) => fallback(session, addr, type_info, err),
			};
		}
	}

	if TypeInfo::read(session.target_mut(), type_info)?.is_array_like() {
		return Ok(Decoder::Array(ArrayDecoder::new(session, addr)?));
	}

	Ok(Decoder::Object(ObjectDecoder::new(session, addr, type_info)?))
}

fn fallback<T: Target>(session: &mut Session<T>, addr: u64, type_info: u64, err: HeapError) -> Result<Decoder> {
	if !err.is_structural() {
		return Err(err);
	}

	log::warn!("specialized decode failed for {addr:#x}, showing fields instead: {err}");
	Ok(Decoder::Object(ObjectDecoder::new(session, addr, type_info)?))
}

impl Decoder {
	/// Number of navigable children.
	pub fn num_children(&self) -> usize {
		match self {
			Self::Null | Self::Raw(_) | Self::Str(_) => 0,
			Self::Array(decoder) => decoder.num_children(),
			Self::List(decoder) => decoder.num_children(),
			Self::Map(decoder) => decoder.num_children(),
			Self::Object(decoder) => decoder.num_children(),
		}
	}

	/// Whether any children exist.
	pub fn has_children(&self) -> bool {
		match self {
			Self::Null | Self::Raw(_) | Self::Str(_) => false,
			Self::Array(decoder) => decoder.has_children(),
			Self::List(decoder) => decoder.has_children(),
			Self::Map(decoder) => decoder.has_children(),
			Self::Object(decoder) => decoder.has_children(),
		}
	}

	/// Child position for `name`, `None` when absent.
	pub fn child_index(&self, name: &str) -> Option<usize> {
		match self {
			Self::Null | Self::Raw(_) | Self::Str(_) => None,
			Self::Array(decoder) => decoder.child_index(name),
			Self::List(decoder) => decoder.child_index(name),
			Self::Map(decoder) => decoder.child_index(name),
			Self::Object(decoder) => decoder.child_index(name),
		}
	}

	/// Decode the child at `index`, `None` when out of range.
	pub fn child_at<T: Target>(&self, session: &mut Session<T>, index: usize) -> Result<Option<DecodedValue>> {
		match self {
			Self::Null | Self::Raw(_) | Self::Str(_) => Ok(None),
			Self::Array(decoder) => decoder.child_at(session, index),
			Self::List(decoder) => decoder.child_at(session, index),
			Self::Map(decoder) => decoder.child_at(session, index),
			Self::Object(decoder) => decoder.child_at(session, index),
		}
	}

	/// Display summary for the resolved address.
	pub fn summary(&self) -> String {
		match self {
			Self::Null => "null".to_owned(),
			Self::Raw(value) => format!("{value:#x}"),
			Self::Str(decoder) => decoder.summary(),
			Self::Array(decoder) => decoder.summary(),
			Self::List(decoder) => decoder.summary(),
			Self::Map(decoder) => decoder.summary(),
			Self::Object(decoder) => decoder.summary(),
		}
	}
}
