mod laws;

use std::{
	collections::hash_map::DefaultHasher,
	hash::{
		Hash,
		Hasher,
	},
	sync::Arc,
};

// Create an alias for macro output to use since this is an internal module
// and the macro outputs fully-qualified type paths
mod bundlekit_framework {
	pub use crate::*;
}

use crate::{
	portable,
	service_interface,
	BundleContext,
	Framework,
	InterfaceMap,
	ServiceProperties,
	ServiceRegistration,
};

#[service_interface("IFoo")]
pub trait Foo: Send + Sync {
	fn name(&self) -> &str;
}

#[service_interface("IBar")]
pub trait Bar: Send + Sync {
	fn value(&self) -> u32;
}

#[service_interface("IBaz")]
pub trait Baz: Send + Sync {}

#[service_interface]
pub trait Unnamed: Send + Sync {}

#[service_interface("test.Clock")]
pub struct Clock(pub u64);

pub struct FooBar {
	pub name: String,
	pub value: u32,
}

impl Foo for FooBar {
	fn name(&self) -> &str {
		return &self.name;
	}
}

impl Bar for FooBar {
	fn value(&self) -> u32 {
		return self.value;
	}
}

pub struct Lonely;
impl Baz for Lonely {}
impl Unnamed for Lonely {}

#[cfg(feature = "stderr-logging")]
fn init_logging() {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init()
		.ok();
}

#[cfg(not(feature = "stderr-logging"))]
fn init_logging() {}

/// A framework with one installed bundle.
pub fn framework_with_bundle(name: &str) -> (Framework, BundleContext) {
	init_logging();
	let framework = Framework::new();
	let context = framework.install_bundle(name).expect("Couldn't install bundle");
	return (framework, context);
}

/// Registers a fresh `FooBar` under `IFoo` (primary) and `IBar`.
pub fn register_foo_bar(context: &BundleContext, name: &str) -> (Arc<FooBar>, ServiceRegistration) {
	let service = Arc::new(FooBar { name: String::from(name), value: 42 });
	let registration = context.register_service(
		InterfaceMap::new()
			.with::<dyn Foo>(service.clone())
			.with::<dyn Bar>(service.clone()),
		ServiceProperties::new().with("name", name),
	).expect("Couldn't register FooBar");
	return (service, registration);
}

pub fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
	let mut hasher = DefaultHasher::new();
	value.hash(&mut hasher);
	return hasher.finish();
}

#[test]
fn default_interface_id_is_the_module_path() {
	assert_eq!(
		crate::interface_id::<dyn Unnamed>().as_str(),
		concat!(module_path!(), "::Unnamed"),
	);
	assert_eq!(crate::interface_id::<Clock>(), "test.Clock");
}

#[portable]
#[derive(Debug, PartialEq)]
pub struct Snapshot {
	pub service_id: u64,
	pub interfaces: Vec<String>,
}

#[test]
fn portable_types_keep_their_own_derives() {
	let snapshot = Snapshot { service_id: 4, interfaces: vec![String::from("IFoo")] };
	let encoded = serde_json::to_value(&snapshot).unwrap();
	assert_eq!(encoded, serde_json::json!({ "service_id": 4, "interfaces": ["IFoo"] }));

	let decoded: Snapshot = serde_json::from_value(encoded).unwrap();
	assert_eq!(decoded, snapshot.clone());
}
