use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
	Generics,
	Item,
	LitStr,
};

static USAGE: &str = "service_interface can only be used on a trait, struct or enum without generics";


pub fn service_interface(attr: TokenStream, body: TokenStream) -> TokenStream {
	// Explicit interface id, if one was given
	let explicit_id: Option<LitStr> = if attr.is_empty() {
		None
	} else {
		match syn::parse::<LitStr>(attr) {
			Ok(id) => Some(id),
			Err(error) => return error.into_compile_error().into(),
		}
	};
	if let Some(ref id) = explicit_id {
		if id.value().is_empty() {
			return syn::Error::new(id.span(), "interface id must not be empty")
				.into_compile_error()
				.into();
		}
	}

	let item: Item = match syn::parse(body) {
		Ok(item) => item,
		Err(error) => return error.into_compile_error().into(),
	};

	// Traits are registered as `dyn Trait`, everything else as the type itself
	let (name, generics, self_ty) = match item {
		Item::Trait(ref input) => {
			let name = input.ident.clone();
			(name.clone(), input.generics.clone(), quote!{dyn #name})
		},
		Item::Struct(ref input) => {
			let name = input.ident.clone();
			(name.clone(), input.generics.clone(), quote!{#name})
		},
		Item::Enum(ref input) => {
			let name = input.ident.clone();
			(name.clone(), input.generics.clone(), quote!{#name})
		},
		_ => return syn::Error::new(Span::call_site(), USAGE).into_compile_error().into(),
	};
	if has_generics(&generics) {
		return syn::Error::new_spanned(generics, USAGE).into_compile_error().into();
	}

	let id = match explicit_id {
		Some(id) => quote!{#id},
		None => {
			let name = name.to_string();
			quote!{concat!(module_path!(), "::", #name)}
		},
	};

	return quote!{
		#item

		impl bundlekit_framework::ServiceInterface for #self_ty {
			const INTERFACE_ID: bundlekit_framework::InterfaceId = bundlekit_framework::InterfaceId::new(#id);
		}
	}.into();
}

fn has_generics(generics: &Generics) -> bool {
	return generics.lt_token.is_some() || !generics.params.is_empty() || generics.where_clause.is_some();
}
