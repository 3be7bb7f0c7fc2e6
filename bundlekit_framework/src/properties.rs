use std::collections::{
	btree_map,
	BTreeMap,
};

use serde::{
	Serialize,
	Deserialize,
};
use serde_json::Value;

/// Property holding the interface ids a service was registered under.
pub const OBJECTCLASS: &str = "objectclass";

/// Property holding the id the framework assigned to a registration.
pub const SERVICE_ID: &str = "service.id";

/// Property holding the id of the bundle that registered a service.
pub const SERVICE_BUNDLEID: &str = "service.bundleid";

/// Key/value metadata attached to a service registration.
///
/// The framework maintains [`OBJECTCLASS`], [`SERVICE_ID`] and [`SERVICE_BUNDLEID`]
/// itself; values supplied for those keys are overwritten at registration time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceProperties(BTreeMap<String, Value>);

impl ServiceProperties {
	pub fn new() -> ServiceProperties {
		return ServiceProperties(BTreeMap::new());
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> ServiceProperties {
		self.insert(key, value);
		return self;
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		return self.0.insert(key.into(), value.into());
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		return self.0.get(key);
	}

	pub fn contains_key(&self, key: &str) -> bool {
		return self.0.contains_key(key);
	}

	/// Keys in sorted order.
	pub fn keys(&self) -> Vec<String> {
		return self.0.keys().cloned().collect();
	}

	pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
		return self.0.iter();
	}

	pub fn len(&self) -> usize {
		return self.0.len();
	}

	pub fn is_empty(&self) -> bool {
		return self.0.is_empty();
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ServiceProperties {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		return ServiceProperties(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect());
	}
}

impl<'a> IntoIterator for &'a ServiceProperties {
	type Item = (&'a String, &'a Value);
	type IntoIter = btree_map::Iter<'a, String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		return self.0.iter();
	}
}


#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn builder_and_lookup() {
		let properties = ServiceProperties::new()
			.with("vendor", "acme")
			.with("channels", 512);

		assert_eq!(properties.get("vendor"), Some(&json!("acme")));
		assert_eq!(properties.get("Vendor"), None);
		assert_eq!(properties.keys(), vec!["channels", "vendor"]);
	}

	#[test]
	fn serializes_as_a_plain_object() {
		let properties: ServiceProperties = [("a", 1), ("b", 2)].into_iter().collect();
		assert_eq!(serde_json::to_value(&properties).unwrap(), json!({ "a": 1, "b": 2 }));
	}
}
