use std::{
	any::Any,
	fmt,
	sync::Arc,
};

use crate::interface::{
	InterfaceId,
	ServiceInterface,
};

/// The interface views a single service object is registered under.
///
/// Each view is stored as a type-erased `Arc<S>` keyed by `S`'s interface id, and is
/// checked against the requested type again when it is taken back out.
pub struct InterfaceMap {
	views: Vec<(InterfaceId, Box<dyn Any + Sync + Send>)>,
	addresses: Vec<usize>,
}

impl InterfaceMap {
	pub fn new() -> InterfaceMap {
		return InterfaceMap {
			views: Vec::new(),
			addresses: Vec::new(),
		};
	}

	/// Adds the view of the service as `S`. The first view added is the primary one.
	///
	/// Adding a second view for the same interface replaces the first.
	pub fn with<S: ServiceInterface + ?Sized + Send + Sync>(mut self, view: Arc<S>) -> InterfaceMap {
		self.insert(view);
		return self;
	}

	pub fn insert<S: ServiceInterface + ?Sized + Send + Sync>(&mut self, view: Arc<S>) {
		let address = object_address(&view);
		let boxed: Box<dyn Any + Sync + Send> = Box::new(view);
		if let Some(index) = self.position(S::INTERFACE_ID) {
			self.views[index].1 = boxed;
			self.addresses[index] = address;
		} else {
			self.views.push((S::INTERFACE_ID, boxed));
			self.addresses.push(address);
		}
	}

	/// Retrieves the view registered for `S`, if there is one of the right type.
	pub fn get<S: ServiceInterface + ?Sized>(&self) -> Option<Arc<S>> {
		let index = self.position(S::INTERFACE_ID)?;
		return self.views[index].1.downcast_ref::<Arc<S>>().map(Arc::clone);
	}

	pub fn contains(&self, id: InterfaceId) -> bool {
		return self.position(id).is_some();
	}

	/// Interface ids in insertion order.
	pub fn interface_ids(&self) -> Vec<InterfaceId> {
		return self.views.iter().map(|(id, _)| *id).collect();
	}

	pub fn len(&self) -> usize {
		return self.views.len();
	}

	pub fn is_empty(&self) -> bool {
		return self.views.is_empty();
	}

	/// Address of the object behind the views, or `None` if the views point at
	/// different objects (or there are none).
	pub(crate) fn object_address(&self) -> Option<usize> {
		let first = *self.addresses.first()?;
		if self.addresses.iter().all(|address| *address == first) {
			return Some(first);
		} else {
			return None;
		}
	}

	fn position(&self, id: InterfaceId) -> Option<usize> {
		return self.views.iter().position(|(view_id, _)| *view_id == id);
	}
}

impl Default for InterfaceMap {
	fn default() -> Self {
		return InterfaceMap::new();
	}
}

impl fmt::Debug for InterfaceMap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		return f.debug_list().entries(self.views.iter().map(|(id, _)| id)).finish();
	}
}

/// Identity of the allocation behind an `Arc`, shared by every unsized view of it.
pub(crate) fn object_address<T: ?Sized>(object: &Arc<T>) -> usize {
	return Arc::as_ptr(object).cast::<()>() as usize;
}


#[cfg(test)]
mod tests {
	use super::*;

	trait Lamp: Send + Sync {
		fn level(&self) -> u8;
	}
	impl ServiceInterface for dyn Lamp {
		const INTERFACE_ID: InterfaceId = InterfaceId::new("test.Lamp");
	}

	trait Dimmer: Send + Sync {}
	impl ServiceInterface for dyn Dimmer {
		const INTERFACE_ID: InterfaceId = InterfaceId::new("test.Dimmer");
	}

	struct Fixture(u8);
	impl Lamp for Fixture {
		fn level(&self) -> u8 {
			return self.0;
		}
	}
	impl Dimmer for Fixture {}

	#[test]
	fn keeps_views_in_insertion_order() {
		let fixture = Arc::new(Fixture(7));
		let map = InterfaceMap::new()
			.with::<dyn Dimmer>(fixture.clone())
			.with::<dyn Lamp>(fixture.clone());

		assert_eq!(map.interface_ids(), vec![InterfaceId::new("test.Dimmer"), InterfaceId::new("test.Lamp")]);
		assert_eq!(map.get::<dyn Lamp>().unwrap().level(), 7);
		assert!(map.contains(InterfaceId::new("test.Dimmer")));
		assert_eq!(map.object_address(), Some(object_address(&fixture)));
	}

	#[test]
	fn missing_view_is_none() {
		let map = InterfaceMap::new().with::<dyn Lamp>(Arc::new(Fixture(1)));
		assert!(map.get::<dyn Dimmer>().is_none());
		assert_eq!(map.len(), 1);
	}

	#[test]
	fn mixed_objects_have_no_single_address() {
		let map = InterfaceMap::new()
			.with::<dyn Lamp>(Arc::new(Fixture(1)))
			.with::<dyn Dimmer>(Arc::new(Fixture(2)));
		assert_eq!(map.object_address(), None);
		assert_eq!(InterfaceMap::new().object_address(), None);
	}
}
