//! `stocktake sup` command - Supplier management

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;

use crate::cli::helpers::{escape_csv, format_short_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::core::loader;
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::Config;
use crate::entities::supplier::Supplier;

#[derive(Subcommand, Debug)]
pub enum SupCommands {
    /// List suppliers with filtering
    List(ListArgs),

    /// Create a new supplier
    New(NewArgs),

    /// Show a supplier's details
    Show(ShowArgs),

    /// Edit a supplier in your editor
    Edit(EditArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Name,
    Contact,
    Email,
    Phone,
    Author,
    Created,
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListColumn::Id => write!(f, "id"),
            ListColumn::Name => write!(f, "name"),
            ListColumn::Contact => write!(f, "contact"),
            ListColumn::Email => write!(f, "email"),
            ListColumn::Phone => write!(f, "phone"),
            ListColumn::Author => write!(f, "author"),
            ListColumn::Created => write!(f, "created"),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in name, contact and email
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by author (substring match)
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Show suppliers created in last N days
    #[arg(long)]
    pub recent: Option<u32>,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Id,
        ListColumn::Name,
        ListColumn::Contact,
        ListColumn::Email,
        ListColumn::Phone
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
    /// Supplier name (required)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Contact person
    #[arg(long, short = 'c')]
    pub contact: Option<String>,

    /// Contact email
    #[arg(long)]
    pub email: Option<String>,

    /// Contact phone
    #[arg(long)]
    pub phone: Option<String>,

    /// Postal address
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
    /// Supplier ID or short ID (@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Supplier ID or short ID (@N)
    pub id: String,
}

/// Run a supplier subcommand
pub fn run(cmd: SupCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SupCommands::List(args) => run_list(args, global),
        SupCommands::New(args) => run_new(args),
        SupCommands::Show(args) => run_show(args, global),
        SupCommands::Edit(args) => run_edit(args),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let suppliers: Vec<Supplier> = loader::load_all(&project.entity_dir(EntityPrefix::Sup))?;

    let mut suppliers: Vec<Supplier> = suppliers
        .into_iter()
        .filter(|s| {
            if let Some(ref search) = args.search {
                let search_lower = search.to_lowercase();
                s.name.to_lowercase().contains(&search_lower)
                    || s.contact_person
                        .as_ref()
                        .map_or(false, |c| c.to_lowercase().contains(&search_lower))
                    || s.email
                        .as_ref()
                        .map_or(false, |e| e.to_lowercase().contains(&search_lower))
            } else {
                true
            }
        })
        .filter(|s| {
            args.author.as_ref().map_or(true, |author| {
                s.author.to_lowercase().contains(&author.to_lowercase())
            })
        })
        .filter(|s| {
            args.recent.map_or(true, |days| {
                let cutoff = chrono::Utc::now() - chrono::Duration::days(days as i64);
                s.created >= cutoff
            })
        })
        .collect();

    match args.sort {
        ListColumn::Id => suppliers.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string())),
        ListColumn::Name => suppliers.sort_by(|a, b| a.name.cmp(&b.name)),
        ListColumn::Contact => suppliers.sort_by(|a, b| a.contact_person.cmp(&b.contact_person)),
        ListColumn::Email => suppliers.sort_by(|a, b| a.email.cmp(&b.email)),
        ListColumn::Phone => suppliers.sort_by(|a, b| a.phone.cmp(&b.phone)),
        ListColumn::Author => suppliers.sort_by(|a, b| a.author.cmp(&b.author)),
        ListColumn::Created => suppliers.sort_by(|a, b| a.created.cmp(&b.created)),
    }

    if args.reverse {
        suppliers.reverse();
    }

    if let Some(limit) = args.limit {
        suppliers.truncate(limit);
    }

    if args.count {
        println!("{}", suppliers.len());
        return Ok(());
    }

    if suppliers.is_empty() {
        println!("No suppliers found.");
        return Ok(());
    }

    // Update short ID index
    let mut short_ids = ShortIdIndex::load(&project);
    short_ids.ensure_all(suppliers.iter().map(|s| s.id.to_string()));
    let _ = short_ids.save(&project);

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&suppliers).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&suppliers).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("short_id,id,name,contact,email,phone");
            for sup in &suppliers {
                let short_id = short_ids
                    .get_short_id(&sup.id.to_string())
                    .unwrap_or_default();
                println!(
                    "{},{},{},{},{},{}",
                    short_id,
                    sup.id,
                    escape_csv(&sup.name),
                    escape_csv(sup.contact_person.as_deref().unwrap_or("")),
                    escape_csv(sup.email.as_deref().unwrap_or("")),
                    escape_csv(sup.phone.as_deref().unwrap_or("")),
                );
            }
        }
        OutputFormat::Tsv => {
            let mut header_parts = vec![format!("{:<8}", style("SHORT").bold().dim())];
            for col in &args.columns {
                let header = match col {
                    ListColumn::Id => format!("{:<17}", style("ID").bold()),
                    ListColumn::Name => format!("{:<25}", style("NAME").bold()),
                    ListColumn::Contact => format!("{:<20}", style("CONTACT").bold()),
                    ListColumn::Email => format!("{:<25}", style("EMAIL").bold()),
                    ListColumn::Phone => format!("{:<15}", style("PHONE").bold()),
                    ListColumn::Author => format!("{:<14}", style("AUTHOR").bold()),
                    ListColumn::Created => format!("{:<12}", style("CREATED").bold()),
                };
                header_parts.push(header);
            }
            println!("{}", header_parts.join(" "));
            println!("{}", "-".repeat(100));

            for sup in &suppliers {
                let short_id = short_ids
                    .get_short_id(&sup.id.to_string())
                    .unwrap_or_default();
                let mut row_parts = vec![format!("{:<8}", style(format!("@{}", short_id)).cyan())];

                for col in &args.columns {
                    let value = match col {
                        ListColumn::Id => format!("{:<17}", format_short_id(&sup.id)),
                        ListColumn::Name => format!("{:<25}", truncate_str(&sup.name, 23)),
                        ListColumn::Contact => format!(
                            "{:<20}",
                            truncate_str(sup.contact_person.as_deref().unwrap_or("-"), 18)
                        ),
                        ListColumn::Email => format!(
                            "{:<25}",
                            truncate_str(sup.email.as_deref().unwrap_or("-"), 23)
                        ),
                        ListColumn::Phone => format!(
                            "{:<15}",
                            truncate_str(sup.phone.as_deref().unwrap_or("-"), 13)
                        ),
                        ListColumn::Author => format!("{:<14}", truncate_str(&sup.author, 12)),
                        ListColumn::Created => {
                            format!("{:<12}", sup.created.format("%Y-%m-%d"))
                        }
                    };
                    row_parts.push(value);
                }
                println!("{}", row_parts.join(" "));
            }

            if !global.quiet {
                println!();
                println!(
                    "{} supplier(s) found. Use {} to reference by short ID.",
                    style(suppliers.len()).cyan(),
                    style("@N").cyan()
                );
            }
        }
        OutputFormat::Id => {
            for sup in &suppliers {
                println!("{}", sup.id);
            }
        }
        OutputFormat::Md => {
            println!("| Short | ID | Name | Contact | Email | Phone |");
            println!("|---|---|---|---|---|---|");
            for sup in &suppliers {
                let short_id = short_ids
                    .get_short_id(&sup.id.to_string())
                    .unwrap_or_default();
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    short_id,
                    format_short_id(&sup.id),
                    sup.name,
                    sup.contact_person.as_deref().unwrap_or("-"),
                    sup.email.as_deref().unwrap_or("-"),
                    sup.phone.as_deref().unwrap_or("-"),
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

    let name = args.name.unwrap_or_else(|| "New Supplier".to_string());

    let mut supplier = Supplier::new(name.clone(), config.author());
    supplier.contact_person = args.contact;
    supplier.email = args.email;
    supplier.phone = args.phone;
    supplier.address = args.address;
    supplier.notes = args.notes;

    let file_path = loader::save_entity(&project, EntityPrefix::Sup, &supplier)?;

    let mut short_ids = ShortIdIndex::load(&project);
    let short_id = short_ids.add(supplier.id.to_string());
    let _ = short_ids.save(&project);

    println!(
        "{} Created supplier {} (@{})",
        style("✓").green(),
        style(format_short_id(&supplier.id)).cyan(),
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

    let short_ids = ShortIdIndex::load(&project);
    let resolved_id = short_ids
        .resolve(&args.id)
        .unwrap_or_else(|| args.id.clone());

    let sup_dir = project.entity_dir(EntityPrefix::Sup);
    let (path, sup): (_, Supplier) = loader::load_entity(&sup_dir, &resolved_id)?
        .ok_or_else(|| miette::miette!("No supplier found matching '{}'", args.id))?;

    match global.format {
        OutputFormat::Yaml => {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&sup).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => {
            println!("{}", sup.id);
        }
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("ID").bold(),
                style(&sup.id.to_string()).cyan()
            );
            println!("{}: {}", style("Name").bold(), style(&sup.name).yellow());
            if let Some(ref contact) = sup.contact_person {
                println!("{}: {}", style("Contact").bold(), contact);
            }
            if let Some(ref email) = sup.email {
                println!("{}: {}", style("Email").bold(), email);
            }
            if let Some(ref phone) = sup.phone {
                println!("{}: {}", style("Phone").bold(), phone);
            }
            println!("{}", style("─".repeat(60)).dim());

            if let Some(ref address) = sup.address {
                println!();
                println!("{}", style("Address:").bold());
                println!("{}", address);
            }

            if let Some(ref notes) = sup.notes {
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
                sup.author,
                style("Created").dim(),
                sup.created.format("%Y-%m-%d %H:%M"),
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

    let sup_dir = project.entity_dir(EntityPrefix::Sup);
    let path = loader::find_entity_file(&sup_dir, &resolved_id)
        .ok_or_else(|| miette::miette!("No supplier found matching '{}'", args.id))?;

    println!(
        "Opening {} in {}...",
        style(path.display()).cyan(),
        style(config.editor()).yellow()
    );

    config.run_editor(&path).into_diagnostic()?;

    Ok(())
}
