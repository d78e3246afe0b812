mod record;

use proc_macro::TokenStream;

/// Derive macro for `rawfeed::store::Record`.
///
/// # Usage
///
/// ```ignore
/// use rawfeed::Record;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Serialize, Deserialize, Record)]
/// #[record(collection = "products", seed = "crate::domain::seed::demo_products")]
/// pub struct Product {
///     pub id: String,
///     pub name: String,
/// }
/// ```
///
/// - `#[record(collection = "...")]` sets the collection name.
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[record(seed = "path")]` names a `fn() -> Vec<Self>` used to seed an
///   empty collection on first access.
/// - `#[record(id)]` marks the field used as the unique identifier.
///   If omitted, defaults to a field named `id`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
