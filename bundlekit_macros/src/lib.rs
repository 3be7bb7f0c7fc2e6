extern crate proc_macro;
use proc_macro::TokenStream;

mod portable_object_macro;
mod service_interface_macro;


/// Implements `bundlekit_framework::ServiceInterface` for the annotated trait (as
/// `dyn Trait`), struct or enum.
///
/// `#[service_interface("org.example.Greeter")]` sets the interface id explicitly;
/// without an argument the id is the item's module path and name.
#[proc_macro_attribute]
pub fn service_interface(attr: TokenStream, body: TokenStream) -> TokenStream {
    return service_interface_macro::service_interface(attr, body);
}

/// Adds the derives a type needs to cross the framework's API boundary:
/// `Debug`, `Clone`, `serde::Serialize` and `serde::Deserialize`.
#[proc_macro_attribute]
pub fn portable(attr: TokenStream, body: TokenStream) -> TokenStream {
    return portable_object_macro::portable_object(attr, body);
}
