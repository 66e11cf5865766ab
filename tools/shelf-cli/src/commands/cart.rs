//! Shopping cart commands.

use anyhow::Result;
use shelf_commerce::cart::Cart;
use shelf_db::CartEngine;

use super::{CartArgs, CartCommand};
use crate::context::Context;

const CART_WIDTHS: [usize; 5] = [6, 36, 10, 5, 10];

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let user = ctx.current_user(&db)?;
    let carts = CartEngine::new(&db);

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show_cart(&carts.get_or_create_cart(&user)?, ctx),
        CartCommand::Add { book, quantity } => {
            let item = carts.add_item(&user, book, quantity)?;
            if ctx.output.is_json() {
                ctx.output.json(&item);
            } else {
                ctx.output.success(&format!(
                    "{} × {} in cart (item {})",
                    item.quantity, item.title, item.id
                ));
            }
        }
        CartCommand::Remove { item } => {
            carts.remove_item(&user, item)?;
            ctx.output
                .removed("cart_item", item, &format!("Removed item {}", item));
        }
    }
    Ok(())
}

fn show_cart(cart: &Cart, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "cart": cart,
            "pricing": cart.calculate_pricing(),
        }));
        return;
    }

    ctx.output.header("Your cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    ctx.output
        .table_header(&["ITEM", "TITLE", "PRICE", "QTY", "TOTAL"], &CART_WIDTHS);
    for item in &cart.items {
        ctx.output.table_row(
            &[
                &item.id.to_string(),
                &item.title,
                &item.unit_price.display(),
                &item.quantity.to_string(),
                &item.total_price().display(),
            ],
            &CART_WIDTHS,
        );
    }
    ctx.output.info("");
    ctx.output.kv("items", &cart.item_count().to_string());
    ctx.output.kv("total", &CartEngine::cart_total(cart).display());
}
