//! `stocktake status` command - project dashboard

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_money, format_short_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::core::loader;
use crate::core::project::Project;
use crate::core::Config;
use crate::entities::category::Category;
use crate::entities::product::Product;
use crate::entities::purchase_order::PurchaseOrder;
use crate::entities::supplier::Supplier;

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Number of recent products to list
    #[arg(long, short = 'n', default_value_t = 5)]
    pub recent: usize,
}

pub fn run(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();

    let categories: Vec<Category> = loader::load_all(&project.entity_dir(EntityPrefix::Cat))?;
    let products: Vec<Product> = loader::load_all(&project.entity_dir(EntityPrefix::Prod))?;
    let suppliers: Vec<Supplier> = loader::load_all(&project.entity_dir(EntityPrefix::Sup))?;
    let orders: Vec<PurchaseOrder> = loader::load_all(&project.entity_dir(EntityPrefix::Po))?;

    let active_products: Vec<&Product> = products.iter().filter(|p| p.is_active).collect();
    let low_stock: Vec<&Product> = active_products
        .iter()
        .copied()
        .filter(|p| p.is_low_stock(config.low_stock_threshold))
        .collect();
    let open_orders: Vec<&PurchaseOrder> = orders.iter().filter(|po| po.is_open()).collect();
    let inventory_value: f64 = active_products.iter().map(|p| p.inventory_value()).sum();

    let mut recent: Vec<&Product> = active_products.clone();
    recent.sort_by(|a, b| b.created.cmp(&a.created));
    recent.truncate(args.recent);

    if global.format == OutputFormat::Json {
        let out = serde_json::json!({
            "project_root": project.root().display().to_string(),
            "categories": categories.iter().filter(|c| c.is_active).count(),
            "products": active_products.len(),
            "suppliers": suppliers.len(),
            "open_orders": open_orders.len(),
            "low_stock": low_stock
                .iter()
                .map(|p| serde_json::json!({
                    "id": p.id.to_string(),
                    "name": p.name,
                    "quantity": p.quantity_in_stock,
                    "threshold": p.low_stock_threshold.or(config.low_stock_threshold),
                }))
                .collect::<Vec<_>>(),
            "inventory_value": inventory_value,
        });
        println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
        return Ok(());
    }

    println!();
    println!(
        "{} {}",
        style("Stocktake project:").bold(),
        style(project.root().display()).cyan()
    );
    println!("{}", style("═".repeat(60)).dim());

    println!(
        "  {:<14} {}",
        "Categories:",
        style(categories.iter().filter(|c| c.is_active).count()).cyan()
    );
    println!(
        "  {:<14} {}",
        "Products:",
        style(active_products.len()).cyan()
    );
    println!("  {:<14} {}", "Suppliers:", style(suppliers.len()).cyan());
    println!(
        "  {:<14} {}",
        "Open orders:",
        style(open_orders.len()).cyan()
    );
    println!(
        "  {:<14} {}",
        "Stock value:",
        style(format_money(Some(inventory_value))).green()
    );

    if !low_stock.is_empty() {
        println!();
        println!(
            "{} {} product(s) need restocking:",
            style("⚠").yellow(),
            style(low_stock.len()).yellow().bold()
        );
        for prod in &low_stock {
            println!(
                "  {} {:<30} {} in stock (restock at {})",
                style("·").dim(),
                truncate_str(&prod.name, 28),
                style(prod.quantity_in_stock).red(),
                prod.low_stock_threshold
                    .or(config.low_stock_threshold)
                    .unwrap_or(0),
            );
        }
    }

    if !recent.is_empty() {
        println!();
        println!("{}", style("Recently added:").bold());
        for prod in &recent {
            println!(
                "  {} {:<30} {} {}",
                style("·").dim(),
                truncate_str(&prod.name, 28),
                style(format_short_id(&prod.id)).dim(),
                style(prod.created.format("%Y-%m-%d")).dim(),
            );
        }
    }

    println!();

    Ok(())
}
