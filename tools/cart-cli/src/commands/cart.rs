//! Cart commands.

use anyhow::{bail, Context as _, Result};
use cart_core::{Cart, CartManager, CartSummary, Currency, UpdateProductAmount};
use serde::Serialize;

use super::{AddArgs, ListArgs, RemoveArgs, UpdateArgs};
use crate::context::Context;
use crate::output::{truncate, TerminalNotifier};

const WIDTHS: [usize; 5] = [6, 36, 12, 6, 12];

#[derive(Serialize)]
struct CartView<'a> {
    items: &'a Cart,
    summary: &'a CartSummary,
}

/// Show the stored cart. Doesn't contact the catalog.
pub async fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.persistence()?.load();

    if args.count {
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({ "size": cart.len() }));
        } else {
            println!("{}", cart.len());
        }
        return Ok(());
    }

    render(&cart, ctx.config.display.currency, ctx)
}

/// Add one unit of a product.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let mut manager = open_manager(ctx)?;

    let spinner = ctx.output.spinner(&format!("Adding product {}", args.product_id));
    let committed = manager.add_product(args.product_id).await;
    spinner.finish_and_clear();

    finish(committed, &format!("Added product {}", args.product_id), manager.cart(), ctx)
}

/// Remove a product.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let mut manager = open_manager(ctx)?;
    let committed = manager.remove_product(args.product_id);
    finish(committed, &format!("Removed product {}", args.product_id), manager.cart(), ctx)
}

/// Set a product's amount.
pub async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let mut manager = open_manager(ctx)?;

    let spinner = ctx.output.spinner(&format!("Checking stock for product {}", args.product_id));
    let request = UpdateProductAmount::new(args.product_id, args.amount);
    let committed = manager.update_product_amount(request).await;
    spinner.finish_and_clear();

    finish(
        committed,
        &format!("Product {} amount set to {}", args.product_id, args.amount),
        manager.cart(),
        ctx,
    )
}

fn open_manager(
    ctx: &Context,
) -> Result<CartManager<cart_api::HttpCatalog, cart_store::FileStore, TerminalNotifier>> {
    let catalog = ctx.catalog()?;
    let persistence = ctx.persistence()?;
    let notifier = TerminalNotifier::new(ctx.output.clone());
    Ok(CartManager::with_persistence(catalog, persistence, notifier))
}

fn finish(committed: bool, message: &str, cart: &Cart, ctx: &Context) -> Result<()> {
    if !committed {
        bail!("Cart unchanged");
    }
    ctx.output.success(message);
    render(cart, ctx.config.display.currency, ctx)
}

fn render(cart: &Cart, currency: Currency, ctx: &Context) -> Result<()> {
    let summary = CartSummary::from_cart(cart, currency).context("Failed to price cart")?;

    if ctx.output.is_json() {
        ctx.output.json(&CartView {
            items: cart,
            summary: &summary,
        });
        return Ok(());
    }

    ctx.output.header(&format!("Cart ({} products)", summary.size));
    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    ctx.output
        .table_row(&["ID", "PRODUCT", "PRICE", "AMOUNT", "SUBTOTAL"], &WIDTHS);
    for line in &summary.lines {
        let id = line.product_id.to_string();
        let title = truncate(&line.title, WIDTHS[1]);
        let price = line.unit_price.display();
        let amount = line.amount.to_string();
        let subtotal = line.subtotal.display();
        ctx.output
            .table_row(&[&id, &title, &price, &amount, &subtotal], &WIDTHS);
    }

    println!();
    ctx.output.kv("Items", &summary.item_count.to_string());
    ctx.output.kv("Total", &summary.total.display());
    Ok(())
}
