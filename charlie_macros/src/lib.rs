use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote, ToTokens};
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Ident, Token};

/// This macro is added before a command method of `GameEngine` in the impl block.
/// Use this macro to first check if the current round state is one of the states
/// in the attribute.
///
/// For example, `#[allowed_state(NotStarted, Resolved)]` on `fn deal` makes the
/// method first check if the round state is `NotStarted` or `Resolved`. If not,
/// the method returns `GameError::InvalidAction { action: Action::Deal, .. }`
/// before touching any state.
#[proc_macro_attribute]
pub fn allowed_state(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let states = match Punctuated::<Ident, Token![,]>::parse_terminated.parse(attr) {
        Ok(states) => states,
        Err(err) => return err.to_compile_error().into(),
    };
    if states.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "allowed_state needs at least one RoundState variant",
        )
        .to_compile_error()
        .into();
    }

    let mut ast: syn::ImplItemFn = match syn::parse(item) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };
    let action = action_ident(&ast.sig.ident);
    let patterns = states.iter().map(|state| quote! { RoundState::#state { .. } });

    let early_return: TokenStream2 = quote! {
        if !matches!(self.state, #(#patterns)|*) {
            return Err(GameError::InvalidAction {
                action: Action::#action,
                state: self.state,
            });
        }
    };
    let early_return: syn::Stmt = match syn::parse2(early_return) {
        Ok(stmt) => stmt,
        Err(err) => return err.to_compile_error().into(),
    };
    ast.block.stmts.insert(0, early_return);
    ast.into_token_stream().into()
}

/// `deal` -> `Deal`, `autoplay_round` -> `AutoplayRound`.
fn action_ident(function_name: &Ident) -> Ident {
    let camel: String = function_name
        .to_string()
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    format_ident!("{}", camel)
}
