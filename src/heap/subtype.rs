use rustc_hash::FxHashSet;

use crate::heap::Result;
use crate::heap::session::KnownType;
use crate::heap::target::Target;
use crate::heap::typeinfo::TypeInfo;

/// Decide whether the record at `type_info` is a subtype of `known`.
///
/// Interface targets are matched by address against the record's
/// implemented-interface list; class targets are matched by walking the
/// super chain to the null root.
pub fn is_subtype<T: Target + ?Sized>(target: &mut T, type_info: u64, known: &KnownType) -> Result<bool> {
	if known.interface {
		let info = TypeInfo::read(target, type_info)?;
		let interfaces = info.implemented_interfaces(target)?;
		return Ok(interfaces.contains(&known.addr));
	}

	// Healthy chains end at a null root. The visited set keeps a corrupt
	// chain from spinning forever.
	let mut visited = FxHashSet::default();
	let mut current = type_info;
	while current != 0 {
		if current == known.addr {
			return Ok(true);
		}
		if !visited.insert(current) {
			log::debug!("super chain cycle at {current:#x}");
			return Ok(false);
		}
		current = TypeInfo::read(target, current)?.super_type;
	}

	Ok(false)
}
