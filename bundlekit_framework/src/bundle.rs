use std::{
	sync::{
		atomic::{
			AtomicBool,
			Ordering,
		},
		Arc,
	},
};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::{
	error::{
		InstallBundleError,
		ReferenceLookupError,
		ServiceRegistrationError,
	},
	interface::{
		ReferenceTarget,
		ServiceInterface,
	},
	interface_map::{
		object_address,
		InterfaceMap,
	},
	properties::ServiceProperties,
	references::{
		ServiceReference,
		ServiceReferenceU,
	},
	registration::ServiceRegistration,
	registry::{
		BundleId,
		ServiceRegistry,
	},
};

/// An installed unit of code that registers and consumes services.
pub struct Bundle {
	id: BundleId,
	symbolic_name: String,
	active: AtomicBool,
}

impl Bundle {
	pub fn id(&self) -> BundleId {
		return self.id;
	}

	pub fn symbolic_name(&self) -> &str {
		return &self.symbolic_name;
	}

	/// `false` once the bundle has been uninstalled.
	pub fn is_active(&self) -> bool {
		return self.active.load(Ordering::Acquire);
	}
}

struct FrameworkInternal {
	registry: Arc<ServiceRegistry>,
	bundles: RwLock<FxHashMap<String, Arc<Bundle>>>,
}

/// Owns the service registry and the set of installed bundles.
///
/// Cloning a `Framework` yields another handle to the same registry.
#[derive(Clone)]
pub struct Framework(Arc<FrameworkInternal>);

impl Framework {
	pub fn new() -> Framework {
		return Framework(Arc::new(FrameworkInternal {
			registry: Arc::new(ServiceRegistry::new()),
			bundles: RwLock::new(FxHashMap::default()),
		}));
	}

	/// Installs a bundle and returns the context it uses to talk to the registry.
	pub fn install_bundle(&self, symbolic_name: impl Into<String>) -> Result<BundleContext, InstallBundleError> {
		let symbolic_name = symbolic_name.into();
		let mut bundles = self.0.bundles.write();

		if bundles.contains_key(&symbolic_name) {
			return Err(InstallBundleError::NameConflict(symbolic_name));
		}

		let bundle = Arc::new(Bundle {
			id: Uuid::new_v4(),
			symbolic_name: String::clone(&symbolic_name),
			active: AtomicBool::new(true),
		});
		bundles.insert(symbolic_name, Arc::clone(&bundle));
		drop(bundles);

		tracing::debug!(bundle = bundle.symbolic_name(), bundle_id = %bundle.id(), "installed bundle");
		return Ok(BundleContext(self.clone(), bundle));
	}

	/// Uninstalls a bundle, unregistering every service it still has registered.
	///
	/// Contexts that belong to a different framework are ignored.
	pub fn uninstall_bundle(&self, context: &BundleContext) {
		let bundle = &context.1;
		if !Arc::ptr_eq(&(context.0).0, &self.0) {
			tracing::warn!(bundle = bundle.symbolic_name(), "bundle was installed in another framework");
			return;
		}
		if !bundle.active.swap(false, Ordering::AcqRel) {
			return;
		}
		let mut bundles = self.0.bundles.write();
		if bundles.get(bundle.symbolic_name()).map_or(false, |installed| Arc::ptr_eq(installed, bundle)) {
			bundles.remove(bundle.symbolic_name());
		}
		drop(bundles);

		let leftovers = self.0.registry.entries_of_bundle(bundle.id());
		if !leftovers.is_empty() {
			tracing::warn!(
				bundle = bundle.symbolic_name(),
				count = leftovers.len(),
				"bundle uninstalled with services still registered"
			);
		}
		for entry in leftovers {
			// A concurrent unregistration of the same service is not a problem here
			self.0.registry.unregister(&entry).ok();
		}

		tracing::debug!(bundle = bundle.symbolic_name(), "uninstalled bundle");
	}

	pub fn bundles(&self) -> Vec<Arc<Bundle>> {
		return self.0.bundles.read().values().cloned().collect();
	}

	pub fn bundle(&self, symbolic_name: &str) -> Option<Arc<Bundle>> {
		return self.0.bundles.read().get(symbolic_name).cloned();
	}

	/// Number of currently registered services.
	pub fn service_count(&self) -> usize {
		return self.0.registry.len();
	}

	/// Finds the reference the registry associated with `service` when it was
	/// registered. Any `Arc` view of the registered object works.
	pub fn try_reference_from_service<T: ?Sized>(&self, service: &Arc<T>) -> Result<ServiceReferenceU, ReferenceLookupError> {
		return match self.0.registry.reference_for_object(object_address(service)) {
			Some(base) => Ok(ServiceReference::from(base)),
			None => {
				tracing::trace!("reverse lookup found no registered service");
				Err(ReferenceLookupError::NotTracked)
			},
		};
	}

	/// Like [`Self::try_reference_from_service`], but yields the invalid reference
	/// when the object isn't registered.
	pub fn reference_from_service<T: ?Sized>(&self, service: &Arc<T>) -> ServiceReferenceU {
		return self.try_reference_from_service(service).unwrap_or_default();
	}

	/// Reverse lookup viewed as interface `U`. Yields the invalid reference if the
	/// object isn't registered or wasn't registered under `U`.
	pub fn reference_from_service_as<U: ReferenceTarget + ?Sized, T: ?Sized>(&self, service: &Arc<T>) -> ServiceReference<U> {
		return self.reference_from_service(service).cast::<U>();
	}
}

impl Default for Framework {
	fn default() -> Self {
		return Framework::new();
	}
}


/// The API a bundle uses to register, look up and fetch services.
#[derive(Clone)]
pub struct BundleContext(Framework, Arc<Bundle>);

impl BundleContext {
	pub fn bundle(&self) -> &Arc<Bundle> {
		return &self.1;
	}

	pub fn framework(&self) -> &Framework {
		return &self.0;
	}

	/// Registers a service object under every interface in `interfaces`.
	pub fn register_service(&self, interfaces: InterfaceMap, properties: ServiceProperties) -> Result<ServiceRegistration, ServiceRegistrationError> {
		if !self.1.is_active() {
			return Err(ServiceRegistrationError::BundleUninstalled);
		}

		let registry = &(self.0).0.registry;
		let entry = registry.register(self.1.id(), interfaces, properties)?;

		// The bundle may have been uninstalled while the registration was in flight
		if !self.1.is_active() {
			registry.unregister(&entry).ok();
			return Err(ServiceRegistrationError::BundleUninstalled);
		}

		tracing::debug!(
			bundle = self.1.symbolic_name(),
			service_id = entry.declaration.service_id,
			interfaces = ?entry.declaration.interfaces,
			"registered service"
		);
		return Ok(ServiceRegistration::new(Arc::clone(registry), entry));
	}

	/// Registers `service` under the single interface `S`, without properties.
	pub fn register<S: ServiceInterface + ?Sized + Send + Sync>(&self, service: Arc<S>) -> Result<ServiceRegistration, ServiceRegistrationError> {
		return self.register_service(InterfaceMap::new().with::<S>(service), ServiceProperties::new());
	}

	/// Reference to the service with the lowest service id registered under `S`, or
	/// the invalid reference if there is none.
	pub fn service_reference<S: ServiceInterface + ?Sized>(&self) -> ServiceReference<S> {
		return match (self.0).0.registry.reference(S::INTERFACE_ID) {
			Some(base) => ServiceReference::from(base),
			None => ServiceReference::invalid(),
		};
	}

	/// References to every service registered under `S`, in service-id order.
	pub fn service_references<S: ServiceInterface + ?Sized>(&self) -> Vec<ServiceReference<S>> {
		return (self.0).0.registry.references(S::INTERFACE_ID)
			.into_iter()
			.map(ServiceReference::<S>::from)
			.collect();
	}

	/// References to every registered service, each bound to its primary interface.
	pub fn all_service_references(&self) -> Vec<ServiceReferenceU> {
		return (self.0).0.registry.all_references()
			.into_iter()
			.map(ServiceReferenceU::from)
			.collect();
	}

	/// Fetches the service behind `reference`. `None` if the reference is invalid or
	/// the service has been unregistered.
	pub fn service<S: ServiceInterface + ?Sized>(&self, reference: &ServiceReference<S>) -> Option<Arc<S>> {
		return reference.entry()?.interface_map()?.get::<S>();
	}

	/// Fetches every interface view of the service behind an untyped reference.
	pub fn service_interface_map<S: ReferenceTarget + ?Sized>(&self, reference: &ServiceReference<S>) -> Option<Arc<InterfaceMap>> {
		return reference.entry()?.interface_map();
	}

	pub fn try_reference_from_service<T: ?Sized>(&self, service: &Arc<T>) -> Result<ServiceReferenceU, ReferenceLookupError> {
		return self.0.try_reference_from_service(service);
	}

	pub fn reference_from_service<T: ?Sized>(&self, service: &Arc<T>) -> ServiceReferenceU {
		return self.0.reference_from_service(service);
	}

	pub fn reference_from_service_as<U: ReferenceTarget + ?Sized, T: ?Sized>(&self, service: &Arc<T>) -> ServiceReference<U> {
		return self.0.reference_from_service_as::<U, T>(service);
	}
}
