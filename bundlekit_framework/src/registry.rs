use std::{
	collections::{
		BTreeMap,
		BTreeSet,
	},
	sync::Arc,
};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use uuid::Uuid;

use crate::{
	error::{
		ServiceRegistrationError,
		UnregisterError,
	},
	interface::InterfaceId,
	interface_map::InterfaceMap,
	properties::{
		ServiceProperties,
		OBJECTCLASS,
		SERVICE_BUNDLEID,
		SERVICE_ID,
	},
	references::ServiceReferenceBase,
};

/// Id the framework assigns to each registration, in registration order starting at 1.
pub type ServiceId = u64;

/// Id of an installed bundle.
pub type BundleId = Uuid;

/// The part of a registration that never changes after it is created. References
/// keep this alive so they can still answer identity and interface queries after
/// the service is gone.
pub(crate) struct Declaration {
	pub(crate) service_id: ServiceId,
	pub(crate) bundle_id: BundleId,
	pub(crate) interfaces: Vec<InterfaceId>,
}

/// The registry's record of one registered service.
pub(crate) struct RegistrationEntry {
	pub(crate) declaration: Arc<Declaration>,
	state: RwLock<EntryState>,
}

struct EntryState {
	/// `None` once the service has been unregistered.
	interfaces: Option<Arc<InterfaceMap>>,
	properties: ServiceProperties,
}

impl RegistrationEntry {
	pub(crate) fn is_registered(&self) -> bool {
		return self.state.read().interfaces.is_some();
	}

	pub(crate) fn interface_map(&self) -> Option<Arc<InterfaceMap>> {
		return self.state.read().interfaces.clone();
	}

	pub(crate) fn properties(&self) -> Option<ServiceProperties> {
		let state = self.state.read();
		if state.interfaces.is_some() {
			return Some(state.properties.clone());
		} else {
			return None;
		}
	}

	pub(crate) fn property(&self, key: &str) -> Option<Value> {
		let state = self.state.read();
		if state.interfaces.is_some() {
			return state.properties.get(key).cloned();
		} else {
			return None;
		}
	}

	/// Replaces the user-supplied properties, keeping the framework-maintained keys.
	/// Returns `false` if the service is no longer registered.
	pub(crate) fn set_properties(&self, properties: ServiceProperties) -> bool {
		let mut state = self.state.write();
		if state.interfaces.is_none() {
			return false;
		}
		state.properties = stamp_properties(properties, &self.declaration);
		return true;
	}

	/// A reference to this entry bound to `interface_id`.
	pub(crate) fn reference(self: &Arc<Self>, interface_id: InterfaceId) -> ServiceReferenceBase {
		return ServiceReferenceBase::new(self, interface_id);
	}

	/// A reference to this entry bound to the interface it was registered under first.
	pub(crate) fn primary_reference(self: &Arc<Self>) -> ServiceReferenceBase {
		return match self.declaration.interfaces.first() {
			Some(primary) => self.reference(*primary),
			None => ServiceReferenceBase::invalid(),
		};
	}

	fn retire(&self) -> Option<Arc<InterfaceMap>> {
		return self.state.write().interfaces.take();
	}
}

fn stamp_properties(mut properties: ServiceProperties, declaration: &Declaration) -> ServiceProperties {
	properties.insert(
		OBJECTCLASS,
		declaration.interfaces.iter().map(|id| Value::from(id.as_str())).collect::<Vec<Value>>(),
	);
	properties.insert(SERVICE_ID, declaration.service_id);
	properties.insert(SERVICE_BUNDLEID, declaration.bundle_id.to_string());
	return properties;
}


/// In-memory store of registration entries.
pub(crate) struct ServiceRegistry {
	tables: RwLock<Tables>,
}

struct Tables {
	next_id: ServiceId,
	entries: BTreeMap<ServiceId, Arc<RegistrationEntry>>,
	by_interface: FxHashMap<InterfaceId, BTreeSet<ServiceId>>,
	by_object: FxHashMap<usize, ServiceId>,
}

impl ServiceRegistry {
	pub(crate) fn new() -> ServiceRegistry {
		return ServiceRegistry {
			tables: RwLock::new(Tables {
				next_id: 1,
				entries: BTreeMap::new(),
				by_interface: FxHashMap::default(),
				by_object: FxHashMap::default(),
			}),
		};
	}

	pub(crate) fn register(
		&self,
		bundle_id: BundleId,
		interfaces: InterfaceMap,
		properties: ServiceProperties,
	) -> Result<Arc<RegistrationEntry>, ServiceRegistrationError> {
		if interfaces.is_empty() {
			return Err(ServiceRegistrationError::EmptyInterfaceMap);
		}
		let address = interfaces.object_address().ok_or(ServiceRegistrationError::MixedObjects)?;

		let mut tables = self.tables.write();
		if let Some(existing) = tables.by_object.get(&address) {
			return Err(ServiceRegistrationError::AlreadyRegistered(*existing));
		}

		let service_id = tables.next_id;
		tables.next_id += 1;

		let declaration = Arc::new(Declaration {
			service_id,
			bundle_id,
			interfaces: interfaces.interface_ids(),
		});
		let entry = Arc::new(RegistrationEntry {
			state: RwLock::new(EntryState {
				interfaces: Some(Arc::new(interfaces)),
				properties: stamp_properties(properties, &declaration),
			}),
			declaration,
		});

		for interface_id in entry.declaration.interfaces.iter() {
			tables.by_interface.entry(*interface_id).or_default().insert(service_id);
		}
		tables.by_object.insert(address, service_id);
		tables.entries.insert(service_id, Arc::clone(&entry));

		return Ok(entry);
	}

	pub(crate) fn unregister(&self, entry: &RegistrationEntry) -> Result<(), UnregisterError> {
		let service_id = entry.declaration.service_id;

		let mut tables = self.tables.write();
		let interfaces = match entry.retire() {
			Some(interfaces) => interfaces,
			None => return Err(UnregisterError::AlreadyUnregistered(service_id)),
		};

		tables.entries.remove(&service_id);
		for interface_id in entry.declaration.interfaces.iter() {
			if let Some(ids) = tables.by_interface.get_mut(interface_id) {
				ids.remove(&service_id);
				if ids.is_empty() {
					tables.by_interface.remove(interface_id);
				}
			}
		}
		if let Some(address) = interfaces.object_address() {
			tables.by_object.remove(&address);
		}
		drop(tables);

		// The service object itself is released here, outside the lock
		drop(interfaces);
		return Ok(());
	}

	/// References to every service registered under `interface_id`, bound to it,
	/// in service-id order.
	pub(crate) fn references(&self, interface_id: InterfaceId) -> Vec<ServiceReferenceBase> {
		let tables = self.tables.read();
		return match tables.by_interface.get(&interface_id) {
			Some(ids) => ids.iter()
				.filter_map(|id| tables.entries.get(id))
				.map(|entry| entry.reference(interface_id))
				.collect(),
			None => Vec::new(),
		};
	}

	/// Reference to the registration with the lowest service id under `interface_id`.
	pub(crate) fn reference(&self, interface_id: InterfaceId) -> Option<ServiceReferenceBase> {
		let tables = self.tables.read();
		let id = tables.by_interface.get(&interface_id)?.iter().next()?;
		return tables.entries.get(id).map(|entry| entry.reference(interface_id));
	}

	pub(crate) fn all_references(&self) -> Vec<ServiceReferenceBase> {
		return self.tables.read().entries.values().map(|entry| entry.primary_reference()).collect();
	}

	/// Reverse lookup from the address of a registered object.
	pub(crate) fn reference_for_object(&self, address: usize) -> Option<ServiceReferenceBase> {
		let tables = self.tables.read();
		let id = tables.by_object.get(&address)?;
		return tables.entries.get(id).map(|entry| entry.primary_reference());
	}

	pub(crate) fn entries_of_bundle(&self, bundle_id: BundleId) -> Vec<Arc<RegistrationEntry>> {
		return self.tables.read().entries.values()
			.filter(|entry| entry.declaration.bundle_id == bundle_id)
			.cloned()
			.collect();
	}

	pub(crate) fn len(&self) -> usize {
		return self.tables.read().entries.len();
	}
}
