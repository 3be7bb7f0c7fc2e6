// Mods
mod bundle;
mod error;
mod interface;
mod interface_map;
mod properties;
mod references;
mod registration;
mod registry;

// Tests
#[cfg(test)]
mod tests;

// Re-exports
pub use bundle::{
	Bundle,
	BundleContext,
	Framework,
};
pub use error::{
	InstallBundleError,
	ReferenceLookupError,
	ServiceRegistrationError,
	UnregisterError,
};
pub use interface::{
	interface_id,
	InterfaceId,
	ReferenceTarget,
	ServiceInterface,
	Void,
};
pub use interface_map::InterfaceMap;
pub use properties::{
	ServiceProperties,
	OBJECTCLASS,
	SERVICE_BUNDLEID,
	SERVICE_ID,
};
pub use references::{
	ServiceReference,
	ServiceReferenceBase,
	ServiceReferenceU,
};
pub use registration::ServiceRegistration;
pub use registry::{
	BundleId,
	ServiceId,
};

// Macro re-exports
pub use bundlekit_macros::*;
