//! `stocktake po` command - Purchase order management

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
use crate::entities::product::Product;
use crate::entities::purchase_order::{PoStatus, PurchaseOrder};
use crate::entities::supplier::Supplier;

#[derive(Subcommand, Debug)]
pub enum PoCommands {
    /// List purchase orders with filtering
    List(ListArgs),

    /// Create a new purchase order
    New(NewArgs),

    /// Show a purchase order with its lines and total
    Show(ShowArgs),

    /// Edit a purchase order in your editor
    Edit(EditArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Number,
    Supplier,
    Status,
    Total,
    Ordered,
    Expected,
    Author,
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListColumn::Id => write!(f, "id"),
            ListColumn::Number => write!(f, "number"),
            ListColumn::Supplier => write!(f, "supplier"),
            ListColumn::Status => write!(f, "status"),
            ListColumn::Total => write!(f, "total"),
            ListColumn::Ordered => write!(f, "ordered"),
            ListColumn::Expected => write!(f, "expected"),
            ListColumn::Author => write!(f, "author"),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status (pending, ordered, received, cancelled)
    #[arg(long, short = 's')]
    pub status: Option<PoStatus>,

    /// Only orders still in flight (pending or ordered)
    #[arg(long)]
    pub open: bool,

    /// Filter by supplier (ID or @N)
    #[arg(long)]
    pub supplier: Option<String>,

    /// Search in PO numbers
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by author (substring match)
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Id,
        ListColumn::Number,
        ListColumn::Supplier,
        ListColumn::Status,
        ListColumn::Total
    ])]
    pub columns: Vec<ListColumn>,

    /// Sort by field
    #[arg(long, default_value = "number")]
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
    /// Human-facing order number (e.g., PO-2026-0042)
    #[arg(long)]
    pub number: Option<String>,

    /// Supplier the order is placed with (ID or @N, required)
    #[arg(long, short = 's')]
    pub supplier: String,

    /// Expected delivery date (YYYY-MM-DD)
    #[arg(long)]
    pub expected: Option<chrono::NaiveDate>,

    /// Delivery address
    #[arg(long)]
    pub address: Option<String>,

    /// Notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Open in editor after creation
    #[arg(long, short = 'e')]
    pub edit: bool,

    /// Skip opening in editor
    #[arg(long)]
    pub no_edit: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Purchase order ID or short ID (@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Purchase order ID or short ID (@N)
    pub id: String,
}

/// Run a purchase order subcommand
pub fn run(cmd: PoCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PoCommands::List(args) => run_list(args, global),
        PoCommands::New(args) => run_new(args),
        PoCommands::Show(args) => run_show(args, global),
        PoCommands::Edit(args) => run_edit(args),
    }
}

fn style_status(status: PoStatus) -> console::StyledObject<String> {
    let s = status.to_string();
    match status {
        PoStatus::Pending => style(s).yellow(),
        PoStatus::Ordered => style(s).cyan(),
        PoStatus::Received => style(s).green(),
        PoStatus::Cancelled => style(s).dim(),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let orders: Vec<PurchaseOrder> = loader::load_all(&project.entity_dir(EntityPrefix::Po))?;
    let suppliers: Vec<Supplier> = loader::load_all(&project.entity_dir(EntityPrefix::Sup))?;

    // Resolve the supplier filter before applying it
    let supplier_id = match args.supplier {
        Some(ref reference) => {
            let short_ids = ShortIdIndex::load(&project);
            let resolved = short_ids
                .resolve(reference)
                .unwrap_or_else(|| reference.clone());
            let target = suppliers
                .iter()
                .find(|s| s.id.to_string().contains(&resolved))
                .ok_or_else(|| miette::miette!("No supplier found matching '{}'", reference))?;
            Some(target.id.clone())
        }
        None => None,
    };

    let mut orders: Vec<PurchaseOrder> = orders
        .into_iter()
        .filter(|po| args.status.map_or(true, |s| po.status == s))
        .filter(|po| !args.open || po.is_open())
        .filter(|po| match supplier_id {
            Some(ref sid) => &po.supplier == sid,
            None => true,
        })
        .filter(|po| {
            args.search.as_ref().map_or(true, |search| {
                po.po_number.to_lowercase().contains(&search.to_lowercase())
            })
        })
        .filter(|po| {
            args.author.as_ref().map_or(true, |author| {
                po.author.to_lowercase().contains(&author.to_lowercase())
            })
        })
        .collect();

    match args.sort {
        ListColumn::Id => orders.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string())),
        ListColumn::Number => orders.sort_by(|a, b| a.po_number.cmp(&b.po_number)),
        ListColumn::Supplier => orders.sort_by(|a, b| {
            a.supplier.to_string().cmp(&b.supplier.to_string())
        }),
        ListColumn::Status => orders.sort_by_key(|po| po.status.to_string()),
        ListColumn::Total => orders.sort_by(|a, b| {
            a.total_amount()
                .partial_cmp(&b.total_amount())
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        ListColumn::Ordered => orders.sort_by(|a, b| a.order_date.cmp(&b.order_date)),
        ListColumn::Expected => orders.sort_by(|a, b| a.expected_delivery.cmp(&b.expected_delivery)),
        ListColumn::Author => orders.sort_by(|a, b| a.author.cmp(&b.author)),
    }

    if args.reverse {
        orders.reverse();
    }

    if let Some(limit) = args.limit {
        orders.truncate(limit);
    }

    if args.count {
        println!("{}", orders.len());
        return Ok(());
    }

    if orders.is_empty() {
        println!("No purchase orders found.");
        return Ok(());
    }

    // Update short ID index
    let mut short_ids = ShortIdIndex::load(&project);
    short_ids.ensure_all(orders.iter().map(|po| po.id.to_string()));
    let _ = short_ids.save(&project);

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    // Supplier names for display
    let sup_names: HashMap<String, String> = suppliers
        .iter()
        .map(|s| (s.id.to_string(), s.name.clone()))
        .collect();
    let supplier_name = |po: &PurchaseOrder| -> String {
        sup_names
            .get(&po.supplier.to_string())
            .cloned()
            .unwrap_or_else(|| format_short_id(&po.supplier))
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&orders).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&orders).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("short_id,id,number,supplier,status,total,ordered,expected");
            for po in &orders {
                let short_id = short_ids
                    .get_short_id(&po.id.to_string())
                    .unwrap_or_default();
                println!(
                    "{},{},{},{},{},{:.2},{},{}",
                    short_id,
                    po.id,
                    escape_csv(&po.po_number),
                    escape_csv(&supplier_name(po)),
                    po.status,
                    po.total_amount(),
                    po.order_date.format("%Y-%m-%d"),
                    po.expected_delivery
                        .map_or(String::new(), |d| d.to_string()),
                );
            }
        }
        OutputFormat::Tsv => {
            let mut header_parts = vec![format!("{:<8}", style("SHORT").bold().dim())];
            for col in &args.columns {
                let header = match col {
                    ListColumn::Id => format!("{:<17}", style("ID").bold()),
                    ListColumn::Number => format!("{:<16}", style("NUMBER").bold()),
                    ListColumn::Supplier => format!("{:<22}", style("SUPPLIER").bold()),
                    ListColumn::Status => format!("{:<11}", style("STATUS").bold()),
                    ListColumn::Total => format!("{:<11}", style("TOTAL").bold()),
                    ListColumn::Ordered => format!("{:<12}", style("ORDERED").bold()),
                    ListColumn::Expected => format!("{:<12}", style("EXPECTED").bold()),
                    ListColumn::Author => format!("{:<14}", style("AUTHOR").bold()),
                };
                header_parts.push(header);
            }
            println!("{}", header_parts.join(" "));
            println!("{}", "-".repeat(100));

            for po in &orders {
                let short_id = short_ids
                    .get_short_id(&po.id.to_string())
                    .unwrap_or_default();
                let mut row_parts = vec![format!("{:<8}", style(format!("@{}", short_id)).cyan())];

                for col in &args.columns {
                    let value = match col {
                        ListColumn::Id => format!("{:<17}", format_short_id(&po.id)),
                        ListColumn::Number => format!("{:<16}", truncate_str(&po.po_number, 14)),
                        ListColumn::Supplier => {
                            format!("{:<22}", truncate_str(&supplier_name(po), 20))
                        }
                        ListColumn::Status => format!("{:<11}", style_status(po.status)),
                        ListColumn::Total => {
                            format!("{:<11}", format_money(Some(po.total_amount())))
                        }
                        ListColumn::Ordered => {
                            format!("{:<12}", po.order_date.format("%Y-%m-%d"))
                        }
                        ListColumn::Expected => format!(
                            "{:<12}",
                            po.expected_delivery
                                .map_or("-".to_string(), |d| d.to_string())
                        ),
                        ListColumn::Author => format!("{:<14}", truncate_str(&po.author, 12)),
                    };
                    row_parts.push(value);
                }
                println!("{}", row_parts.join(" "));
            }

            if !global.quiet {
                println!();
                println!(
                    "{} order(s) found. Use {} to reference by short ID.",
                    style(orders.len()).cyan(),
                    style("@N").cyan()
                );
            }
        }
        OutputFormat::Id => {
            for po in &orders {
                println!("{}", po.id);
            }
        }
        OutputFormat::Md => {
            println!("| Short | ID | Number | Supplier | Status | Total |");
            println!("|---|---|---|---|---|---|");
            for po in &orders {
                let short_id = short_ids
                    .get_short_id(&po.id.to_string())
                    .unwrap_or_default();
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    short_id,
                    format_short_id(&po.id),
                    po.po_number,
                    supplier_name(po),
                    po.status,
                    format_money(Some(po.total_amount())),
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

    // Resolve the supplier reference to a real supplier id
    let short_ids = ShortIdIndex::load(&project);
    let resolved = short_ids
        .resolve(&args.supplier)
        .unwrap_or_else(|| args.supplier.clone());
    let sup_dir = project.entity_dir(EntityPrefix::Sup);
    let (_, supplier): (_, Supplier) = loader::load_entity(&sup_dir, &resolved)?
        .ok_or_else(|| miette::miette!("No supplier found matching '{}'", args.supplier))?;

    let po_number = args.number.unwrap_or_else(|| {
        format!("PO-{}", chrono::Utc::now().format("%Y%m%d-%H%M%S"))
    });

    let mut po = PurchaseOrder::new(po_number.clone(), supplier.id, config.author());
    po.expected_delivery = args.expected;
    po.delivery_address = args.address;
    po.notes = args.notes;

    let file_path = loader::save_entity(&project, EntityPrefix::Po, &po)?;

    let mut short_ids = ShortIdIndex::load(&project);
    let short_id = short_ids.add(po.id.to_string());
    let _ = short_ids.save(&project);

    println!(
        "{} Created purchase order {} (@{})",
        style("✓").green(),
        style(format_short_id(&po.id)).cyan(),
        short_id
    );
    println!("   {}", style(file_path.display()).dim());
    println!("   Number: {}", style(&po_number).yellow());
    println!("   Supplier: {}", style(&supplier.name).yellow());
    println!(
        "   {}",
        style("Add order lines by editing the file.").dim()
    );

    if args.edit || !args.no_edit {
        println!();
        println!("Opening in {}...", style(config.editor()).yellow());
        config.run_editor(&file_path).into_diagnostic()?;
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;

    let short_ids = ShortIdIndex::load(&project);
    let resolved_id = short_ids
        .resolve(&args.id)
        .unwrap_or_else(|| args.id.clone());

    let po_dir = project.entity_dir(EntityPrefix::Po);
    let (path, po): (_, PurchaseOrder) = loader::load_entity(&po_dir, &resolved_id)?
        .ok_or_else(|| miette::miette!("No purchase order found matching '{}'", args.id))?;

    match global.format {
        OutputFormat::Yaml => {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&po).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => {
            println!("{}", po.id);
        }
        _ => {
            let suppliers: Vec<Supplier> =
                loader::load_all(&project.entity_dir(EntityPrefix::Sup))?;
            let supplier_name = suppliers
                .iter()
                .find(|s| s.id == po.supplier)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| format_short_id(&po.supplier));
            let products: Vec<Product> =
                loader::load_all(&project.entity_dir(EntityPrefix::Prod))?;
            let prod_names: HashMap<String, String> = products
                .iter()
                .map(|p| (p.id.to_string(), p.name.clone()))
                .collect();

            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("ID").bold(),
                style(&po.id.to_string()).cyan()
            );
            println!(
                "{}: {}",
                style("Number").bold(),
                style(&po.po_number).yellow()
            );
            println!("{}: {}", style("Supplier").bold(), supplier_name);
            println!("{}: {}", style("Status").bold(), style_status(po.status));
            println!(
                "{}: {}",
                style("Ordered").bold(),
                po.order_date.format("%Y-%m-%d")
            );
            if let Some(expected) = po.expected_delivery {
                println!("{}: {}", style("Expected").bold(), expected);
            }
            if let Some(ref address) = po.delivery_address {
                println!("{}: {}", style("Deliver to").bold(), address);
            }
            println!("{}", style("─".repeat(60)).dim());

            if po.lines.is_empty() {
                println!("{}", style("No order lines.").dim());
            } else {
                println!(
                    "{:<30} {:>8} {:>10} {:>11}",
                    style("PRODUCT").bold(),
                    style("QTY").bold(),
                    style("UNIT").bold(),
                    style("TOTAL").bold()
                );
                for line in &po.lines {
                    let name = prod_names
                        .get(&line.product.to_string())
                        .cloned()
                        .unwrap_or_else(|| format_short_id(&line.product));
                    println!(
                        "{:<30} {:>8} {:>10} {:>11}",
                        truncate_str(&name, 28),
                        line.quantity,
                        format_money(Some(line.unit_price)),
                        format_money(Some(line.total())),
                    );
                }
                println!("{}", style("─".repeat(60)).dim());
                println!(
                    "{:<30} {:>31}",
                    style("TOTAL").bold(),
                    style(format_money(Some(po.total_amount()))).bold()
                );
            }

            if let Some(ref notes) = po.notes {
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
                po.author,
                style("Created").dim(),
                po.created.format("%Y-%m-%d %H:%M"),
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

    let po_dir = project.entity_dir(EntityPrefix::Po);
    let path = loader::find_entity_file(&po_dir, &resolved_id)
        .ok_or_else(|| miette::miette!("No purchase order found matching '{}'", args.id))?;

    println!(
        "Opening {} in {}...",
        style(path.display()).cyan(),
        style(config.editor()).yellow()
    );

    config.run_editor(&path).into_diagnostic()?;

    Ok(())
}
