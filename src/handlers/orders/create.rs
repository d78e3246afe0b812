//! Handler: orders.create
//!
//! Cart lines name products and variants; prices always come from the
//! catalog, never from the client.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::{Order, OrderItem, Product, ShippingAddress};
use crate::handlers::{now, Ctx};
use crate::store::Scope;

pub const COMMAND: &str = "orders.create";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub quantity: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

pub fn guard(ctx: &Ctx<'_>) -> bool {
    ctx.has_fields(&["items"])
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let input = ctx.input::<Input>()?;

    let catalog = ctx.store().collection::<Product>(Scope::Global).all();
    let items = input
        .items
        .iter()
        .map(|line| price_line(&catalog, line))
        .collect::<Result<Vec<_>, _>>()?;

    let order = Order::new(user_id, items, input.shipping_address, now())?;
    let order = ctx
        .store()
        .collection::<Order>(Scope::owner(user_id))
        .insert(order);

    Ok(json!({ "order": order }))
}

fn price_line(catalog: &[Product], line: &CartLine) -> Result<OrderItem, HandlerError> {
    let product = catalog
        .iter()
        .find(|p| p.id == line.product_id && p.active)
        .ok_or_else(|| HandlerError::Invalid(format!("unknown product: {}", line.product_id)))?;

    let (name, unit_price_cents) = match (&line.variant_id, product.variants.is_empty()) {
        (Some(variant_id), _) => {
            let variant = product.variant(variant_id).ok_or_else(|| {
                HandlerError::Invalid(format!("unknown variant: {}", variant_id))
            })?;
            (format!("{} - {}", product.name, variant.name), variant.price_cents)
        }
        (None, true) => (product.name.clone(), product.price_cents),
        (None, false) => {
            return Err(HandlerError::Invalid(format!(
                "product {} requires a variant",
                product.id
            )))
        }
    };

    Ok(OrderItem {
        product_id: product.id.clone(),
        variant_id: line.variant_id.clone(),
        name,
        unit_price_cents,
        quantity: line.quantity,
    })
}
