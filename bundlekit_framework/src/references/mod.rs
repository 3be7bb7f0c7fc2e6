mod base;
mod typed;

pub use base::ServiceReferenceBase;
pub use typed::{
	ServiceReference,
	ServiceReferenceU,
};
