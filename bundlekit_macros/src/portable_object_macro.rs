use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::ToTokens;
use syn::{
	punctuated::Punctuated,
	Attribute,
	Item,
	Path,
	Token,
};

static USAGE: &str = "portable can only be used on structs and enums";

/// Derives every portable type carries, on top of whatever it derives itself
const PORTABLE_DERIVES: [&str; 4] = ["Debug", "Clone", "serde::Serialize", "serde::Deserialize"];


pub fn portable_object(_attr: TokenStream, body: TokenStream) -> TokenStream {
	let mut item: Item = match syn::parse(body) {
		Ok(item) => item,
		Err(error) => return error.into_compile_error().into(),
	};

	let attrs = match item {
		Item::Struct(ref mut input) => &mut input.attrs,
		Item::Enum(ref mut input) => &mut input.attrs,
		_ => return syn::Error::new(Span::call_site(), USAGE).into_compile_error().into(),
	};

	return match merge_derives(attrs) {
		Ok(()) => item.into_token_stream().into(),
		Err(error) => error.into_compile_error().into(),
	};
}

/// Folds all `#[derive(...)]` attributes into one, adding the portable derives and
/// dropping duplicates.
fn merge_derives(attrs: &mut Vec<Attribute>) -> syn::Result<()> {
	let mut derives = Vec::<Path>::new();
	let mut keys = Vec::<String>::new();
	let mut push = |path: Path| {
		let key = path.to_token_stream().to_string();
		if !keys.contains(&key) {
			keys.push(key);
			derives.push(path);
		}
	};

	let mut kept = Vec::with_capacity(attrs.len());
	for attr in attrs.drain(..) {
		if attr.path.is_ident("derive") {
			let paths = attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)?;
			paths.into_iter().for_each(&mut push);
		} else {
			kept.push(attr);
		}
	}
	for name in PORTABLE_DERIVES {
		push(syn::parse_str(name)?);
	}

	*attrs = kept;
	attrs.insert(0, syn::parse_quote! {
		#[derive( #(#derives),* )]
	});
	return Ok(());
}
