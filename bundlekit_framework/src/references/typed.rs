use std::{
	fmt,
	hash::{
		Hash,
		Hasher,
	},
	marker::PhantomData,
	ops::Deref,
};

use crate::interface::{
	ReferenceTarget,
	Void,
};

use super::ServiceReferenceBase;

/// A reference to a service, viewed as interface `S`.
///
/// Building one from a [`ServiceReferenceBase`] re-binds it to `S`'s interface id if
/// the registration declares that interface, and yields the invalid reference
/// otherwise. Check [`ServiceReferenceBase::is_valid`] afterwards.
///
/// Equality and hashing are those of the wrapped base, so references to the same
/// registration are equal and hash alike regardless of `S`.
pub struct ServiceReference<S: ReferenceTarget + ?Sized> {
	base: ServiceReferenceBase,
	_marker: PhantomData<fn() -> *const S>,
}

/// A service reference that isn't bound to any particular interface.
pub type ServiceReferenceU = ServiceReference<Void>;

impl<S: ReferenceTarget + ?Sized> ServiceReference<S> {
	/// Creates an invalid reference.
	pub fn invalid() -> ServiceReference<S> {
		return ServiceReference {
			base: ServiceReferenceBase::invalid(),
			_marker: PhantomData,
		};
	}

	pub fn base(&self) -> &ServiceReferenceBase {
		return &self.base;
	}

	pub fn into_base(self) -> ServiceReferenceBase {
		return self.base;
	}

	/// Builds a reference viewed as `S` from a reference viewed as another interface.
	pub fn from_reference<T: ReferenceTarget + ?Sized>(reference: &ServiceReference<T>) -> ServiceReference<S> {
		return ServiceReference::from(reference.base());
	}

	/// Views the same registration as interface `T`. See [`ServiceReference`] for the
	/// conversion rules.
	pub fn cast<T: ReferenceTarget + ?Sized>(&self) -> ServiceReference<T> {
		return ServiceReference::<T>::from_reference(self);
	}

	/// Drops the relation, turning this into the invalid reference.
	pub fn invalidate(&mut self) {
		self.base.invalidate();
	}
}

impl<S: ReferenceTarget + ?Sized> From<ServiceReferenceBase> for ServiceReference<S> {
	fn from(base: ServiceReferenceBase) -> Self {
		return ServiceReference {
			base: S::bind(base),
			_marker: PhantomData,
		};
	}
}

impl<S: ReferenceTarget + ?Sized> From<&ServiceReferenceBase> for ServiceReference<S> {
	fn from(base: &ServiceReferenceBase) -> Self {
		return ServiceReference::from(base.clone());
	}
}

impl<S: ReferenceTarget + ?Sized> From<ServiceReference<S>> for ServiceReferenceBase {
	fn from(reference: ServiceReference<S>) -> Self {
		return reference.base;
	}
}

impl<S: ReferenceTarget + ?Sized> Deref for ServiceReference<S> {
	type Target = ServiceReferenceBase;

	fn deref(&self) -> &Self::Target {
		return &self.base;
	}
}

impl<S: ReferenceTarget + ?Sized> Default for ServiceReference<S> {
	fn default() -> Self {
		return ServiceReference::invalid();
	}
}

impl<S: ReferenceTarget + ?Sized> Clone for ServiceReference<S> {
	fn clone(&self) -> Self {
		return ServiceReference {
			base: self.base.clone(),
			_marker: PhantomData,
		};
	}
}

impl<S: ReferenceTarget + ?Sized, T: ReferenceTarget + ?Sized> PartialEq<ServiceReference<T>> for ServiceReference<S> {
	fn eq(&self, other: &ServiceReference<T>) -> bool {
		return self.base == other.base;
	}
}

impl<S: ReferenceTarget + ?Sized> Eq for ServiceReference<S> {}

impl<S: ReferenceTarget + ?Sized> PartialEq<ServiceReferenceBase> for ServiceReference<S> {
	fn eq(&self, other: &ServiceReferenceBase) -> bool {
		return self.base == *other;
	}
}

impl<S: ReferenceTarget + ?Sized> PartialEq<ServiceReference<S>> for ServiceReferenceBase {
	fn eq(&self, other: &ServiceReference<S>) -> bool {
		return *self == other.base;
	}
}

impl<S: ReferenceTarget + ?Sized> Hash for ServiceReference<S> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.base.hash(state);
	}
}

impl<S: ReferenceTarget + ?Sized> fmt::Display for ServiceReference<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		return fmt::Display::fmt(&self.base, f);
	}
}

impl<S: ReferenceTarget + ?Sized> fmt::Debug for ServiceReference<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		return fmt::Debug::fmt(&self.base, f);
	}
}
