use crate::heap::array::ArrayDecoder;
use crate::heap::session::Session;
use crate::heap::target::Target;
use crate::heap::value::DecodedValue;
use crate::heap::{HeapError, Result};

const KEYS_FIELD: &str = "keysArray";
const VALUES_FIELD: &str = "valuesArray";

/// Paired keys/values decoder over a hash map's backing arrays.
#[derive(Debug, Clone)]
pub struct MapDecoder {
	keys: ArrayDecoder,
	values: ArrayDecoder,
}

impl MapDecoder {
	/// Locate both backing arrays for the map object at `base`.
	pub fn new<T: Target>(session: &mut Session<T>, base: u64, type_info: u64) -> Result<Self> {
		let fields = session.field_layout(base, type_info)?;

		let mut keys = None;
		let mut values = None;
		for field in &fields {
			let slot = base.saturating_add(field.offset);
			match field.name.as_ref() {
				KEYS_FIELD => keys = ArrayDecoder::through_field(session, slot)?,
				VALUES_FIELD => values = ArrayDecoder::through_field(session, slot)?,
				_ => {}
			}
		}

		match (keys, values) {
			(Some(keys), Some(values)) => Ok(Self { keys, values }),
			_ => Err(HeapError::MapBackingNotFound { addr: base }),
		}
	}

	/// Materialized entry count, following the keys array.
	pub fn num_children(&self) -> usize {
		self.keys.num_children()
	}

	/// Whether any entries exist.
	pub fn has_children(&self) -> bool {
		self.keys.has_children()
	}

	/// Entry index parsed the way the keys array parses it.
	pub fn child_index(&self, name: &str) -> Option<usize> {
		self.keys.child_index(name)
	}

	/// Synthesize the key/value pair at `index` from the two backing
	/// arrays.
	pub fn child_at<T: Target>(&self, session: &mut Session<T>, index: usize) -> Result<Option<DecodedValue>> {
		let Some(key) = self.keys.child_at(session, index)? else {
			return Ok(None);
		};
		let Some(value) = self.values.child_at(session, index)? else {
			return Ok(None);
		};

		Ok(Some(DecodedValue::Entry {
			key: Box::new(key),
			value: Box::new(value),
		}))
	}

	/// Entry count with singular/plural wording.
	pub fn summary(&self) -> String {
		let count = self.keys.len();
		if count == 1 {
			"1 key/value pair".to_owned()
		} else {
			format!("{count} key/value pairs")
		}
	}
}
