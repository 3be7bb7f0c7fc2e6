use std::{
	fmt,
	hash::{
		Hash,
		Hasher,
	},
	ptr,
	sync::{
		Arc,
		Weak,
	},
};

use serde_json::Value;

use crate::{
	interface::InterfaceId,
	properties::ServiceProperties,
	registry::{
		BundleId,
		Declaration,
		RegistrationEntry,
		ServiceId,
	},
};

/// Type-erased reference to a registered service.
///
/// A reference relates to one registration entry and is bound to one of the
/// interface ids that entry declares. Equality and hashing only look at the entry:
/// two references to the same registration are equal no matter which interface they
/// are bound to.
///
/// References don't keep the registration alive. Once the service is unregistered
/// the reference keeps its identity (equality, hash, declared interfaces) but no
/// longer yields the service or its properties.
///
/// The default value is the invalid reference. All invalid references are equal to
/// each other and hash alike.
#[derive(Clone, Default)]
pub struct ServiceReferenceBase {
	binding: Option<Binding>,
}

#[derive(Clone)]
struct Binding {
	entry: Weak<RegistrationEntry>,

	/// Immutable part of the entry. Shared with the entry itself and used as the
	/// identity of the registration.
	declaration: Arc<Declaration>,

	interface_id: InterfaceId,
}

impl ServiceReferenceBase {
	pub(crate) fn new(entry: &Arc<RegistrationEntry>, interface_id: InterfaceId) -> ServiceReferenceBase {
		return ServiceReferenceBase {
			binding: Some(Binding {
				entry: Arc::downgrade(entry),
				declaration: Arc::clone(&entry.declaration),
				interface_id,
			}),
		};
	}

	/// Creates an invalid reference.
	pub fn invalid() -> ServiceReferenceBase {
		return ServiceReferenceBase { binding: None };
	}

	/// The interface id this reference is currently bound to, or [`InterfaceId::NONE`]
	/// if it is invalid.
	pub fn interface_id(&self) -> InterfaceId {
		return match self.binding {
			Some(ref binding) => binding.interface_id,
			None => InterfaceId::NONE,
		};
	}

	/// Re-binds the reference without changing the registration it relates to.
	pub(crate) fn set_interface_id(&mut self, interface_id: InterfaceId) {
		if let Some(ref mut binding) = self.binding {
			binding.interface_id = interface_id;
		}
	}

	/// Whether the related registration declares `interface_id`.
	///
	/// The answer comes from the interfaces declared at registration time, which
	/// never change, so it stays the same after the service is unregistered.
	pub fn is_convertible_to(&self, interface_id: InterfaceId) -> bool {
		return match self.binding {
			Some(ref binding) => binding.declaration.interfaces.contains(&interface_id),
			None => false,
		};
	}

	/// Whether this reference relates to a registration at all. This is independent
	/// of whether the service is still registered; see [`Self::is_registered`].
	pub fn is_valid(&self) -> bool {
		return self.binding.is_some();
	}

	/// Whether the related service is currently registered.
	pub fn is_registered(&self) -> bool {
		return self.entry().map_or(false, |entry| entry.is_registered());
	}

	/// Drops the relation, turning this into the invalid reference.
	pub fn invalidate(&mut self) {
		self.binding = None;
	}

	pub fn service_id(&self) -> Option<ServiceId> {
		return self.binding.as_ref().map(|binding| binding.declaration.service_id);
	}

	/// The bundle that registered the service.
	pub fn bundle_id(&self) -> Option<BundleId> {
		return self.binding.as_ref().map(|binding| binding.declaration.bundle_id);
	}

	/// Interfaces the service was registered under, primary first.
	pub fn declared_interfaces(&self) -> &[InterfaceId] {
		return match self.binding {
			Some(ref binding) => binding.declaration.interfaces.as_slice(),
			None => &[],
		};
	}

	pub fn property(&self, key: &str) -> Option<Value> {
		return self.entry()?.property(key);
	}

	pub fn property_keys(&self) -> Vec<String> {
		return self.properties().map(|properties| properties.keys()).unwrap_or_default();
	}

	/// Snapshot of the service's properties while it is registered.
	pub fn properties(&self) -> Option<ServiceProperties> {
		return self.entry()?.properties();
	}

	pub(crate) fn entry(&self) -> Option<Arc<RegistrationEntry>> {
		return self.binding.as_ref()?.entry.upgrade();
	}

	fn identity(&self) -> *const Declaration {
		return match self.binding {
			Some(ref binding) => Arc::as_ptr(&binding.declaration),
			None => ptr::null(),
		};
	}
}

impl PartialEq for ServiceReferenceBase {
	fn eq(&self, other: &Self) -> bool {
		return ptr::eq(self.identity(), other.identity());
	}
}

impl Eq for ServiceReferenceBase {}

impl Hash for ServiceReferenceBase {
	fn hash<H: Hasher>(&self, state: &mut H) {
		ptr::hash(self.identity(), state);
	}
}

impl fmt::Display for ServiceReferenceBase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		return match self.binding {
			Some(ref binding) => write!(
				f,
				"ServiceReference(id={}, interface={})",
				binding.declaration.service_id,
				binding.interface_id,
			),
			None => f.write_str("ServiceReference(invalid)"),
		};
	}
}

impl fmt::Debug for ServiceReferenceBase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		return match self.binding {
			Some(ref binding) => f.debug_struct("ServiceReference")
				.field("service_id", &binding.declaration.service_id)
				.field("interface_id", &binding.interface_id)
				.field("registered", &self.is_registered())
				.finish(),
			None => f.write_str("ServiceReference(invalid)"),
		};
	}
}
