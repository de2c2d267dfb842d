use crate::heap::Result;
use crate::heap::decode::decode_field;
use crate::heap::fields::FieldDescriptor;
use crate::heap::session::Session;
use crate::heap::target::Target;
use crate::heap::value::DecodedValue;

/// Field-by-field decoder for a plain class instance.
///
/// Class layouts are immutable once loaded, so field names and offsets
/// are taken from the session cache at construction and never refreshed
/// for the lifetime of the decoder.
#[derive(Debug, Clone)]
pub struct ObjectDecoder {
	base: u64,
	type_info: u64,
	fields: Vec<FieldDescriptor>,
}

impl ObjectDecoder {
	/// Build the decoder over the session's cached layout for `type_info`.
	pub fn new<T: Target>(session: &mut Session<T>, base: u64, type_info: u64) -> Result<Self> {
		let fields = session.field_layout(base, type_info)?;
		Ok(Self { base, type_info, fields })
	}

	/// Object base address.
	pub fn base(&self) -> u64 {
		self.base
	}

	/// Type record address backing the layout.
	pub fn type_info(&self) -> u64 {
		self.type_info
	}

	/// Declared field descriptors in runtime order.
	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	/// Number of declared fields.
	pub fn num_children(&self) -> usize {
		self.fields.len()
	}

	/// Whether any fields exist.
	pub fn has_children(&self) -> bool {
		!self.fields.is_empty()
	}

	/// Position of the field named `name`.
	pub fn child_index(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|field| field.name.as_ref() == name)
	}

	/// Decode the field at `index` from target memory.
	pub fn child_at<T: Target>(&self, session: &mut Session<T>, index: usize) -> Result<Option<DecodedValue>> {
		let Some(field) = self.fields.get(index) else {
			return Ok(None);
		};
		decode_field(session, field.kind, self.base.saturating_add(field.offset)).map(Some)
	}

	/// Class instances render through their children.
	pub fn summary(&self) -> String {
		String::new()
	}
}
