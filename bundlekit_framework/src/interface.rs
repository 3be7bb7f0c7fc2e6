use std::{
	fmt,
	borrow::Borrow,
};

use serde::{
	Serialize,
	Serializer,
};

use crate::references::ServiceReferenceBase;

/// Runtime identifier of a service interface.
///
/// Interface ids are compile-time constants attached to an interface type through
/// [`ServiceInterface`], so resolving the id of a type always yields the same value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceId(&'static str);

impl InterfaceId {
	/// Sentinel reported by invalid references.
	pub const NONE: InterfaceId = InterfaceId("");

	pub const fn new(id: &'static str) -> InterfaceId {
		return InterfaceId(id);
	}

	pub const fn as_str(&self) -> &'static str {
		return self.0;
	}

	pub const fn is_none(&self) -> bool {
		return self.0.is_empty();
	}
}

impl fmt::Display for InterfaceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		return f.write_str(self.0);
	}
}

impl fmt::Debug for InterfaceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		return fmt::Debug::fmt(self.0, f);
	}
}

impl Borrow<str> for InterfaceId {
	fn borrow(&self) -> &str {
		return self.0;
	}
}

impl PartialEq<str> for InterfaceId {
	fn eq(&self, other: &str) -> bool {
		return self.0 == other;
	}
}

impl PartialEq<&str> for InterfaceId {
	fn eq(&self, other: &&str) -> bool {
		return self.0 == *other;
	}
}

impl Serialize for InterfaceId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		return serializer.serialize_str(self.0);
	}
}

/// Marks a type (usually `dyn Trait`) as a service interface that services can be
/// registered and looked up under.
///
/// Implement it with `#[service_interface]` / `#[service_interface("my.Interface")]`
/// rather than by hand.
pub trait ServiceInterface: 'static {
	const INTERFACE_ID: InterfaceId;
}

/// Resolves the interface id of `S`.
pub fn interface_id<S: ServiceInterface + ?Sized>() -> InterfaceId {
	return S::INTERFACE_ID;
}

/// Tag for references that aren't bound to any particular interface.
///
/// `ServiceReference<Void>` accepts any reference unchanged.
pub enum Void {}

mod sealed {
	pub trait Sealed {}

	impl<S: super::ServiceInterface + ?Sized> Sealed for S {}
	impl Sealed for super::Void {}
}

/// Decides how a [`ServiceReferenceBase`] is re-bound when it gets wrapped in a
/// `ServiceReference<Self>`.
///
/// Sealed: only service interfaces and [`Void`] implement it, so a valid
/// `ServiceReference<S>` is always bound to `S`'s interface id (or is untyped).
///
/// ```compile_fail
/// use bundlekit_framework::{ReferenceTarget, ServiceReferenceBase};
///
/// struct Anything;
/// impl ReferenceTarget for Anything {
/// 	fn bind(base: ServiceReferenceBase) -> ServiceReferenceBase {
/// 		return base;
/// 	}
/// }
/// ```
pub trait ReferenceTarget: sealed::Sealed + 'static {
	fn bind(base: ServiceReferenceBase) -> ServiceReferenceBase;
}

impl<S: ServiceInterface + ?Sized> ReferenceTarget for S {
	fn bind(mut base: ServiceReferenceBase) -> ServiceReferenceBase {
		let wanted = S::INTERFACE_ID;
		if base.interface_id() != wanted {
			if base.is_convertible_to(wanted) {
				base.set_interface_id(wanted);
			} else {
				if base.is_valid() {
					tracing::trace!(
						service_id = ?base.service_id(),
						bound = %base.interface_id(),
						requested = %wanted,
						"service does not provide the requested interface"
					);
				}
				base.invalidate();
			}
		}
		return base;
	}
}

impl ReferenceTarget for Void {
	fn bind(base: ServiceReferenceBase) -> ServiceReferenceBase {
		return base;
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	trait Clock: Send + Sync {}
	impl ServiceInterface for dyn Clock {
		const INTERFACE_ID: InterfaceId = InterfaceId::new("test.Clock");
	}

	#[test]
	fn resolves_the_declared_id() {
		assert_eq!(interface_id::<dyn Clock>(), "test.Clock");
		assert_eq!(interface_id::<dyn Clock>(), interface_id::<dyn Clock>());
	}

	#[test]
	fn none_sentinel_is_empty() {
		assert!(InterfaceId::NONE.is_none());
		assert!(!InterfaceId::new("a").is_none());
		assert_eq!(InterfaceId::NONE.to_string(), "");
	}

	#[test]
	fn serializes_as_a_plain_string() {
		let id = InterfaceId::new("test.Clock");
		assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!("test.Clock"));
	}
}
