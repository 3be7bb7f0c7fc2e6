use std::{
	fmt,
	sync::Arc,
};

use crate::{
	error::UnregisterError,
	interface::ReferenceTarget,
	properties::ServiceProperties,
	references::{
		ServiceReference,
		ServiceReferenceU,
	},
	registry::{
		RegistrationEntry,
		ServiceId,
		ServiceRegistry,
	},
};

/// Handle a bundle gets back when it registers a service. Used to update the
/// service's properties and to unregister it.
#[derive(Clone)]
pub struct ServiceRegistration {
	registry: Arc<ServiceRegistry>,
	entry: Arc<RegistrationEntry>,
}

impl ServiceRegistration {
	pub(crate) fn new(registry: Arc<ServiceRegistry>, entry: Arc<RegistrationEntry>) -> ServiceRegistration {
		return ServiceRegistration { registry, entry };
	}

	pub fn service_id(&self) -> ServiceId {
		return self.entry.declaration.service_id;
	}

	/// Reference to the registered service, bound to its primary interface.
	pub fn reference(&self) -> ServiceReferenceU {
		return ServiceReference::from(self.entry.primary_reference());
	}

	/// Reference to the registered service viewed as `S`; invalid if the service
	/// wasn't registered under `S`.
	pub fn reference_as<S: ReferenceTarget + ?Sized>(&self) -> ServiceReference<S> {
		return ServiceReference::from(self.entry.primary_reference());
	}

	pub fn is_registered(&self) -> bool {
		return self.entry.is_registered();
	}

	/// Replaces the service's properties. Framework-maintained keys are kept.
	/// Returns `false` if the service has already been unregistered.
	pub fn set_properties(&self, properties: ServiceProperties) -> bool {
		return self.entry.set_properties(properties);
	}

	pub fn unregister(&self) -> Result<(), UnregisterError> {
		self.registry.unregister(&self.entry)?;
		tracing::debug!(service_id = self.service_id(), "unregistered service");
		return Ok(());
	}
}

impl fmt::Debug for ServiceRegistration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		return f.debug_struct("ServiceRegistration")
			.field("service_id", &self.service_id())
			.field("interfaces", &self.entry.declaration.interfaces)
			.field("registered", &self.is_registered())
			.finish();
	}
}
