//! `stocktake prod` command - Product management

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use std::fs;

use crate::cli::helpers::{escape_csv, format_money, format_short_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::core::loader;
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::Config;
use crate::entities::category::Category;
use crate::entities::product::Product;

#[derive(Subcommand, Debug)]
pub enum ProdCommands {
    /// List products with filtering
    List(ListArgs),

    /// Create a new product
    New(NewArgs),

    /// Show a product's details
    Show(ShowArgs),

    /// Edit a product in your editor
    Edit(EditArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Name,
    Reference,
    Category,
    Stock,
    Price,
    Location,
    Author,
    Created,
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListColumn::Id => write!(f, "id"),
            ListColumn::Name => write!(f, "name"),
            ListColumn::Reference => write!(f, "reference"),
            ListColumn::Category => write!(f, "category"),
            ListColumn::Stock => write!(f, "stock"),
            ListColumn::Price => write!(f, "price"),
            ListColumn::Location => write!(f, "location"),
            ListColumn::Author => write!(f, "author"),
            ListColumn::Created => write!(f, "created"),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Include inactive products
    #[arg(long)]
    pub include_inactive: bool,

    /// Filter by category (ID or @N)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Only products at or below their restock threshold
    #[arg(long)]
    pub low_stock: bool,

    /// Search in name, reference, SKU and barcode
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by author (substring match)
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Show products created in last N days
    #[arg(long)]
    pub recent: Option<u32>,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Id,
        ListColumn::Name,
        ListColumn::Reference,
        ListColumn::Category,
        ListColumn::Stock,
        ListColumn::Price
    ])]
    pub columns: Vec<ListColumn>,

    /// Sort by field
    #[arg(long, default_value = "name")]
    pub sort: ListColumn,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Product name (required)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Internal reference code
    #[arg(long)]
    pub reference: Option<String>,

    /// Category to file under (ID or @N)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Stock keeping unit
    #[arg(long)]
    pub sku: Option<String>,

    /// Unit purchase price
    #[arg(long)]
    pub purchase_price: Option<f64>,

    /// Unit selling price
    #[arg(long)]
    pub selling_price: Option<f64>,

    /// Initial stock quantity
    #[arg(long, default_value_t = 0)]
    pub quantity: i64,

    /// Restock warning threshold
    #[arg(long)]
    pub threshold: Option<i64>,

    /// Storage location (aisle, shelf, bin)
    #[arg(long)]
    pub location: Option<String>,

    /// Open in editor after creation
    #[arg(long, short = 'e')]
    pub edit: bool,

    /// Skip opening in editor
    #[arg(long)]
    pub no_edit: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Product ID or short ID (@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Product ID or short ID (@N)
    pub id: String,
}

/// Run a product subcommand
pub fn run(cmd: ProdCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProdCommands::List(args) => run_list(args, global),
        ProdCommands::New(args) => run_new(args),
        ProdCommands::Show(args) => run_show(args, global),
        ProdCommands::Edit(args) => run_edit(args),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();
    let products: Vec<Product> = loader::load_all(&project.entity_dir(EntityPrefix::Prod))?;
    let categories: Vec<Category> = loader::load_all(&project.entity_dir(EntityPrefix::Cat))?;

    // Resolve the category filter before applying it
    let category_id = match args.category {
        Some(ref reference) => {
            let short_ids = ShortIdIndex::load(&project);
            let resolved = short_ids
                .resolve(reference)
                .unwrap_or_else(|| reference.clone());
            let target = categories
                .iter()
                .find(|c| c.id.to_string().contains(&resolved))
                .ok_or_else(|| miette::miette!("No category found matching '{}'", reference))?;
            Some(target.id.clone())
        }
        None => None,
    };

    let mut products: Vec<Product> = products
        .into_iter()
        .filter(|p| args.include_inactive || p.is_active)
        .filter(|p| match category_id {
            Some(ref cid) => p.category.as_ref() == Some(cid),
            None => true,
        })
        .filter(|p| !args.low_stock || p.is_low_stock(config.low_stock_threshold))
        .filter(|p| {
            if let Some(ref search) = args.search {
                let search_lower = search.to_lowercase();
                p.name.to_lowercase().contains(&search_lower)
                    || p.reference.to_lowercase().contains(&search_lower)
                    || p.sku
                        .as_ref()
                        .map_or(false, |s| s.to_lowercase().contains(&search_lower))
                    || p.barcode
                        .as_ref()
                        .map_or(false, |b| b.contains(search.as_str()))
            } else {
                true
            }
        })
        .filter(|p| {
            args.author.as_ref().map_or(true, |author| {
                p.author.to_lowercase().contains(&author.to_lowercase())
            })
        })
        .filter(|p| {
            args.recent.map_or(true, |days| {
                let cutoff = chrono::Utc::now() - chrono::Duration::days(days as i64);
                p.created >= cutoff
            })
        })
        .collect();

    match args.sort {
        ListColumn::Id => products.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string())),
        ListColumn::Name => products.sort_by(|a, b| a.name.cmp(&b.name)),
        ListColumn::Reference => products.sort_by(|a, b| a.reference.cmp(&b.reference)),
        ListColumn::Category => products.sort_by(|a, b| {
            let ca = a.category.as_ref().map(|c| c.to_string());
            let cb = b.category.as_ref().map(|c| c.to_string());
            ca.cmp(&cb)
        }),
        ListColumn::Stock => products.sort_by_key(|p| p.quantity_in_stock),
        ListColumn::Price => products.sort_by(|a, b| {
            a.selling_price
                .unwrap_or(0.0)
                .partial_cmp(&b.selling_price.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        ListColumn::Location => products.sort_by(|a, b| a.storage_location.cmp(&b.storage_location)),
        ListColumn::Author => products.sort_by(|a, b| a.author.cmp(&b.author)),
        ListColumn::Created => products.sort_by(|a, b| a.created.cmp(&b.created)),
    }

    if args.reverse {
        products.reverse();
    }

    if let Some(limit) = args.limit {
        products.truncate(limit);
    }

    if args.count {
        println!("{}", products.len());
        return Ok(());
    }

    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    // Update short ID index
    let mut short_ids = ShortIdIndex::load(&project);
    short_ids.ensure_all(products.iter().map(|p| p.id.to_string()));
    let _ = short_ids.save(&project);

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    // Category names for display
    let cat_names: HashMap<String, String> = categories
        .iter()
        .map(|c| (c.id.to_string(), c.name.clone()))
        .collect();
    let category_name = |p: &Product| -> String {
        p.category
            .as_ref()
            .map(|c| {
                cat_names
                    .get(&c.to_string())
                    .cloned()
                    .unwrap_or_else(|| format_short_id(c))
            })
            .unwrap_or_else(|| "-".to_string())
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&products).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&products).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("short_id,id,name,reference,category,stock,purchase_price,selling_price");
            for prod in &products {
                let short_id = short_ids
                    .get_short_id(&prod.id.to_string())
                    .unwrap_or_default();
                println!(
                    "{},{},{},{},{},{},{},{}",
                    short_id,
                    prod.id,
                    escape_csv(&prod.name),
                    escape_csv(&prod.reference),
                    escape_csv(&category_name(prod)),
                    prod.quantity_in_stock,
                    prod.purchase_price.map_or(String::new(), |p| p.to_string()),
                    prod.selling_price.map_or(String::new(), |p| p.to_string()),
                );
            }
        }
        OutputFormat::Tsv => {
            let mut header_parts = vec![format!("{:<8}", style("SHORT").bold().dim())];
            for col in &args.columns {
                let header = match col {
                    ListColumn::Id => format!("{:<17}", style("ID").bold()),
                    ListColumn::Name => format!("{:<25}", style("NAME").bold()),
                    ListColumn::Reference => format!("{:<12}", style("REF").bold()),
                    ListColumn::Category => format!("{:<18}", style("CATEGORY").bold()),
                    ListColumn::Stock => format!("{:<7}", style("STOCK").bold()),
                    ListColumn::Price => format!("{:<10}", style("PRICE").bold()),
                    ListColumn::Location => format!("{:<14}", style("LOCATION").bold()),
                    ListColumn::Author => format!("{:<14}", style("AUTHOR").bold()),
                    ListColumn::Created => format!("{:<12}", style("CREATED").bold()),
                };
                header_parts.push(header);
            }
            println!("{}", header_parts.join(" "));
            println!("{}", "-".repeat(105));

            for prod in &products {
                let short_id = short_ids
                    .get_short_id(&prod.id.to_string())
                    .unwrap_or_default();
                let mut row_parts = vec![format!("{:<8}", style(format!("@{}", short_id)).cyan())];

                for col in &args.columns {
                    let value = match col {
                        ListColumn::Id => format!("{:<17}", format_short_id(&prod.id)),
                        ListColumn::Name => format!("{:<25}", truncate_str(&prod.name, 23)),
                        ListColumn::Reference => {
                            format!("{:<12}", truncate_str(&prod.reference, 10))
                        }
                        ListColumn::Category => {
                            format!("{:<18}", truncate_str(&category_name(prod), 16))
                        }
                        ListColumn::Stock => {
                            let qty = prod.quantity_in_stock.to_string();
                            if prod.is_low_stock(config.low_stock_threshold) {
                                format!("{:<7}", style(qty).red())
                            } else {
                                format!("{:<7}", qty)
                            }
                        }
                        ListColumn::Price => {
                            format!("{:<10}", format_money(prod.selling_price))
                        }
                        ListColumn::Location => format!(
                            "{:<14}",
                            truncate_str(prod.storage_location.as_deref().unwrap_or("-"), 12)
                        ),
                        ListColumn::Author => format!("{:<14}", truncate_str(&prod.author, 12)),
                        ListColumn::Created => {
                            format!("{:<12}", prod.created.format("%Y-%m-%d"))
                        }
                    };
                    row_parts.push(value);
                }
                println!("{}", row_parts.join(" "));
            }

            if !global.quiet {
                println!();
                println!(
                    "{} product(s) found. Use {} to reference by short ID.",
                    style(products.len()).cyan(),
                    style("@N").cyan()
                );
            }
        }
        OutputFormat::Id => {
            for prod in &products {
                println!("{}", prod.id);
            }
        }
        OutputFormat::Md => {
            println!("| Short | ID | Name | Ref | Category | Stock | Price |");
            println!("|---|---|---|---|---|---|---|");
            for prod in &products {
                let short_id = short_ids
                    .get_short_id(&prod.id.to_string())
                    .unwrap_or_default();
                println!(
                    "| {} | {} | {} | {} | {} | {} | {} |",
                    short_id,
                    format_short_id(&prod.id),
                    prod.name,
                    prod.reference,
                    category_name(prod),
                    prod.quantity_in_stock,
                    format_money(prod.selling_price),
                );
            }
        }
        OutputFormat::Auto => unreachable!(),
    }

    Ok(())
}

fn run_new(args: NewArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();

    let name = args.name.unwrap_or_else(|| "New Product".to_string());
    let reference = args.reference.unwrap_or_else(|| "REF-000".to_string());

    // Resolve the category, if given, to a real category id
    let category = match args.category {
        Some(ref reference) => {
            let short_ids = ShortIdIndex::load(&project);
            let resolved = short_ids
                .resolve(reference)
                .unwrap_or_else(|| reference.clone());
            let cat_dir = project.entity_dir(EntityPrefix::Cat);
            let (_, cat): (_, Category) = loader::load_entity(&cat_dir, &resolved)?
                .ok_or_else(|| miette::miette!("No category found matching '{}'", reference))?;
            Some(cat.id)
        }
        None => None,
    };

    let mut product = Product::new(name.clone(), reference, category, config.author());
    product.sku = args.sku;
    product.purchase_price = args.purchase_price;
    product.selling_price = args.selling_price;
    product.quantity_in_stock = args.quantity;
    product.low_stock_threshold = args.threshold;
    product.storage_location = args.location;

    let file_path = loader::save_entity(&project, EntityPrefix::Prod, &product)?;

    let mut short_ids = ShortIdIndex::load(&project);
    let short_id = short_ids.add(product.id.to_string());
    let _ = short_ids.save(&project);

    println!(
        "{} Created product {} (@{})",
        style("✓").green(),
        style(format_short_id(&product.id)).cyan(),
        short_id
    );
    println!("   {}", style(file_path.display()).dim());
    println!("   Name: {}", style(&name).yellow());

    if args.edit || !args.no_edit {
        println!();
        println!("Opening in {}...", style(config.editor()).yellow());
        config.run_editor(&file_path).into_diagnostic()?;
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();

    let short_ids = ShortIdIndex::load(&project);
    let resolved_id = short_ids
        .resolve(&args.id)
        .unwrap_or_else(|| args.id.clone());

    let prod_dir = project.entity_dir(EntityPrefix::Prod);
    let (path, prod): (_, Product) = loader::load_entity(&prod_dir, &resolved_id)?
        .ok_or_else(|| miette::miette!("No product found matching '{}'", args.id))?;

    match global.format {
        OutputFormat::Yaml => {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&prod).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => {
            println!("{}", prod.id);
        }
        _ => {
            let categories: Vec<Category> =
                loader::load_all(&project.entity_dir(EntityPrefix::Cat))?;
            let category_name = prod.category.as_ref().and_then(|cid| {
                categories
                    .iter()
                    .find(|c| &c.id == cid)
                    .map(|c| c.name.clone())
            });

            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("ID").bold(),
                style(&prod.id.to_string()).cyan()
            );
            println!("{}: {}", style("Name").bold(), style(&prod.name).yellow());
            println!("{}: {}", style("Reference").bold(), prod.reference);
            println!(
                "{}: {}",
                style("Category").bold(),
                category_name.as_deref().unwrap_or("(uncategorized)")
            );
            if let Some(ref sku) = prod.sku {
                println!("{}: {}", style("SKU").bold(), sku);
            }
            if let Some(ref barcode) = prod.barcode {
                println!("{}: {}", style("Barcode").bold(), barcode);
            }
            println!("{}", style("─".repeat(60)).dim());

            let stock = prod.quantity_in_stock.to_string();
            let stock_styled = if prod.is_low_stock(config.low_stock_threshold) {
                format!("{} {}", style(stock).red().bold(), style("(low)").red())
            } else {
                stock
            };
            println!(
                "{}: {} {}",
                style("In stock").bold(),
                stock_styled,
                prod.unit.as_deref().unwrap_or("")
            );
            if let Some(threshold) = prod.low_stock_threshold {
                println!("{}: {}", style("Restock at").bold(), threshold);
            }
            println!(
                "{}: {}",
                style("Purchase price").bold(),
                format_money(prod.purchase_price)
            );
            println!(
                "{}: {}",
                style("Selling price").bold(),
                format_money(prod.selling_price)
            );
            println!(
                "{}: {}",
                style("Inventory value").bold(),
                format_money(Some(prod.inventory_value()))
            );
            if let Some(ref location) = prod.storage_location {
                println!("{}: {}", style("Location").bold(), location);
            }

            if let Some(ref description) = prod.description {
                println!();
                println!("{}", style("Description:").bold());
                println!("{}", description);
            }

            if let Some(ref notes) = prod.notes {
                if !notes.is_empty() {
                    println!();
                    println!("{}", style("Notes:").bold());
                    println!("{}", notes);
                }
            }

            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {} | {}: {}",
                style("Author").dim(),
                prod.author,
                style("Created").dim(),
                prod.created.format("%Y-%m-%d %H:%M"),
            );
        }
    }

    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();

    let short_ids = ShortIdIndex::load(&project);
    let resolved_id = short_ids
        .resolve(&args.id)
        .unwrap_or_else(|| args.id.clone());

    let prod_dir = project.entity_dir(EntityPrefix::Prod);
    let path = loader::find_entity_file(&prod_dir, &resolved_id)
        .ok_or_else(|| miette::miette!("No product found matching '{}'", args.id))?;

    println!(
        "Opening {} in {}...",
        style(path.display()).cyan(),
        style(config.editor()).yellow()
    );

    config.run_editor(&path).into_diagnostic()?;

    Ok(())
}
