use thiserror::Error;

use bundlekit_macros::portable;

#[portable]
#[derive(Error)]
/// An error returned when installing a bundle
pub enum InstallBundleError {
	#[error("A bundle named {0:?} is already installed.")]
	NameConflict(String),
}

#[portable]
#[derive(Error)]
/// An error returned when registering a service
pub enum ServiceRegistrationError {
	#[error("A service must be registered under at least one interface.")]
	EmptyInterfaceMap,
	#[error("All interface views of a service must point at the same object.")]
	MixedObjects,
	#[error("This object is already registered as service {0}.")]
	AlreadyRegistered(u64),
	#[error("The registering bundle has been uninstalled.")]
	BundleUninstalled,
}

#[portable]
#[derive(Error)]
/// An error returned when unregistering a service
pub enum UnregisterError {
	#[error("Service {0} has already been unregistered.")]
	AlreadyUnregistered(u64),
}

#[portable]
#[derive(Error)]
/// An error returned by a reverse lookup from a service object to its reference
pub enum ReferenceLookupError {
	#[error("The object is not registered as a service.")]
	NotTracked,
}
