use std::sync::Arc;

use proptest::prelude::*;

use super::*;
use crate::{
	InterfaceId,
	ServiceReference,
	ServiceReferenceBase,
	ServiceReferenceU,
	Void,
};

struct Everything;
impl Foo for Everything {
	fn name(&self) -> &str {
		return "everything";
	}
}
impl Bar for Everything {
	fn value(&self) -> u32 {
		return 0;
	}
}
impl Baz for Everything {}

const FOO: u8 = 0b001;
const BAR: u8 = 0b010;
const BAZ: u8 = 0b100;

/// Registers one object per mask, declaring the interfaces whose bit is set.
fn register_masks(context: &BundleContext, masks: &[u8]) -> Vec<ServiceReferenceU> {
	return masks.iter()
		.map(|mask| {
			let object = Arc::new(Everything);
			let mut interfaces = InterfaceMap::new();
			if mask & FOO != 0 {
				interfaces.insert::<dyn Foo>(object.clone());
			}
			if mask & BAR != 0 {
				interfaces.insert::<dyn Bar>(object.clone());
			}
			if mask & BAZ != 0 {
				interfaces.insert::<dyn Baz>(object.clone());
			}
			let registration = context.register_service(interfaces, ServiceProperties::new())
				.expect("Couldn't register test service");
			return registration.reference();
		})
		.collect();
}

/// Re-binds `reference` to the interface picked by `step`, through the typed wrapper.
fn convert(reference: &ServiceReferenceBase, step: u8) -> ServiceReferenceBase {
	return match step {
		0 => ServiceReference::<dyn Foo>::from(reference).into_base(),
		1 => ServiceReference::<dyn Bar>::from(reference).into_base(),
		2 => ServiceReference::<dyn Baz>::from(reference).into_base(),
		_ => ServiceReference::<Void>::from(reference).into_base(),
	};
}

fn step_interface(step: u8) -> Option<(InterfaceId, u8)> {
	return match step {
		0 => Some((InterfaceId::new("IFoo"), FOO)),
		1 => Some((InterfaceId::new("IBar"), BAR)),
		2 => Some((InterfaceId::new("IBaz"), BAZ)),
		_ => None,
	};
}

proptest! {
	/// Two references are equal exactly when they come from the same registration,
	/// and equal references hash alike.
	#[test]
	fn equality_follows_registration_identity(
		masks in prop::collection::vec(1u8..8, 1..6),
		steps in prop::collection::vec((any::<prop::sample::Index>(), 0u8..4), 0..24),
	) {
		let (_framework, context) = framework_with_bundle("laws");
		let references = register_masks(&context, &masks);

		let converted = steps.iter()
			.map(|(index, step)| {
				let origin = index.index(references.len());
				return (origin, convert(references[origin].base(), *step));
			})
			.collect::<Vec<_>>();

		for (left_origin, left) in converted.iter() {
			for (right_origin, right) in converted.iter() {
				let same = (left_origin == right_origin && left.is_valid() && right.is_valid())
					|| (!left.is_valid() && !right.is_valid());
				prop_assert_eq!(left == right, same);
				if left == right {
					prop_assert_eq!(hash_of(left), hash_of(right));
				}
			}
		}
	}

	/// A conversion stays valid exactly when the target interface was declared,
	/// and a valid conversion is still the same registration.
	#[test]
	fn conversions_follow_declarations(
		mask in 1u8..8,
		steps in prop::collection::vec(0u8..4, 0..12),
	) {
		let (_framework, context) = framework_with_bundle("conversions");
		let original = register_masks(&context, &[mask]).remove(0);

		let mut current = original.clone().into_base();
		for step in steps {
			let previous = current.clone();
			current = convert(&previous, step);

			match step_interface(step) {
				Some((id, bit)) => {
					prop_assert_eq!(current.is_valid(), previous.is_valid() && mask & bit != 0);
					if current.is_valid() {
						prop_assert_eq!(current.interface_id(), id);
					} else {
						prop_assert_eq!(current.interface_id(), InterfaceId::NONE);
					}
				},
				None => {
					prop_assert_eq!(current.is_valid(), previous.is_valid());
					prop_assert_eq!(current.interface_id(), previous.interface_id());
				},
			}

			if current.is_valid() {
				prop_assert!(current == original);
				prop_assert_eq!(hash_of(&current), hash_of(&original));
			} else {
				prop_assert!(current == ServiceReferenceBase::invalid());
			}
		}
	}
}
