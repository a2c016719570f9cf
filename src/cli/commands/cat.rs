//! `stocktake cat` command - Category management

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use std::fs;

use crate::cli::helpers::{escape_csv, format_short_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::core::loader;
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::tree::{CategoryTree, ROOT};
use crate::core::Config;
use crate::entities::category::Category;
use crate::entities::product::Product;

#[derive(Subcommand, Debug)]
pub enum CatCommands {
    /// List categories with filtering
    List(ListArgs),

    /// Create a new category
    New(NewArgs),

    /// Show a category's details
    Show(ShowArgs),

    /// Edit a category in your editor
    Edit(EditArgs),

    /// Render the category hierarchy as a tree
    Tree(TreeArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Name,
    Slug,
    Parent,
    Order,
    Active,
    Author,
    Created,
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListColumn::Id => write!(f, "id"),
            ListColumn::Name => write!(f, "name"),
            ListColumn::Slug => write!(f, "slug"),
            ListColumn::Parent => write!(f, "parent"),
            ListColumn::Order => write!(f, "order"),
            ListColumn::Active => write!(f, "active"),
            ListColumn::Author => write!(f, "author"),
            ListColumn::Created => write!(f, "created"),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Include inactive categories
    #[arg(long)]
    pub include_inactive: bool,

    /// Only direct children of this category (ID or @N)
    #[arg(long, short = 'p')]
    pub parent: Option<String>,

    /// Search in name, slug and description
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by author (substring match)
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Show categories created in last N days
    #[arg(long)]
    pub recent: Option<u32>,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Id,
        ListColumn::Name,
        ListColumn::Slug,
        ListColumn::Parent,
        ListColumn::Active
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
    /// Category name (required)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Parent category (ID or @N); omit for a top-level category
    #[arg(long, short = 'p')]
    pub parent: Option<String>,

    /// Detailed description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Explicit ordering among siblings
    #[arg(long)]
    pub order: Option<i64>,

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
    /// Category ID or short ID (@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Category ID or short ID (@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct TreeArgs {
    /// Append the number of products filed under each category
    #[arg(long)]
    pub counts: bool,

    /// Include inactive categories
    #[arg(long)]
    pub include_inactive: bool,
}

/// Run a category subcommand
pub fn run(cmd: CatCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CatCommands::List(args) => run_list(args, global),
        CatCommands::New(args) => run_new(args),
        CatCommands::Show(args) => run_show(args, global),
        CatCommands::Edit(args) => run_edit(args),
        CatCommands::Tree(args) => run_tree(args, global),
    }
}

fn load_categories(project: &Project) -> Result<Vec<Category>> {
    loader::load_all(&project.entity_dir(EntityPrefix::Cat))
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let categories = load_categories(&project)?;

    // Resolve the parent filter before applying it
    let parent_id = match args.parent {
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

    let mut categories: Vec<Category> = categories
        .into_iter()
        .filter(|c| args.include_inactive || c.is_active)
        .filter(|c| match parent_id {
            Some(ref pid) => c.parent.as_ref() == Some(pid),
            None => true,
        })
        .filter(|c| {
            if let Some(ref search) = args.search {
                let search_lower = search.to_lowercase();
                c.name.to_lowercase().contains(&search_lower)
                    || c.slug.contains(&search_lower)
                    || c.description
                        .as_ref()
                        .map_or(false, |d| d.to_lowercase().contains(&search_lower))
            } else {
                true
            }
        })
        .filter(|c| {
            args.author.as_ref().map_or(true, |author| {
                c.author.to_lowercase().contains(&author.to_lowercase())
            })
        })
        .filter(|c| {
            args.recent.map_or(true, |days| {
                let cutoff = chrono::Utc::now() - chrono::Duration::days(days as i64);
                c.created >= cutoff
            })
        })
        .collect();

    match args.sort {
        ListColumn::Id => categories.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string())),
        ListColumn::Name => categories.sort_by(|a, b| a.name.cmp(&b.name)),
        ListColumn::Slug => categories.sort_by(|a, b| a.slug.cmp(&b.slug)),
        ListColumn::Parent => categories.sort_by(|a, b| {
            let pa = a.parent.as_ref().map(|p| p.to_string());
            let pb = b.parent.as_ref().map(|p| p.to_string());
            pa.cmp(&pb)
        }),
        ListColumn::Order => categories.sort_by_key(|c| (c.display_order.is_none(), c.display_order)),
        ListColumn::Active => categories.sort_by_key(|c| !c.is_active),
        ListColumn::Author => categories.sort_by(|a, b| a.author.cmp(&b.author)),
        ListColumn::Created => categories.sort_by(|a, b| a.created.cmp(&b.created)),
    }

    if args.reverse {
        categories.reverse();
    }

    if let Some(limit) = args.limit {
        categories.truncate(limit);
    }

    if args.count {
        println!("{}", categories.len());
        return Ok(());
    }

    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    // Update short ID index
    let mut short_ids = ShortIdIndex::load(&project);
    short_ids.ensure_all(categories.iter().map(|c| c.id.to_string()));
    let _ = short_ids.save(&project);

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    // Parent names for display
    let names_by_id: HashMap<String, String> = categories
        .iter()
        .map(|c| (c.id.to_string(), c.name.clone()))
        .collect();
    let parent_name = |c: &Category| -> String {
        c.parent
            .as_ref()
            .map(|p| {
                names_by_id
                    .get(&p.to_string())
                    .cloned()
                    .unwrap_or_else(|| format_short_id(p))
            })
            .unwrap_or_else(|| "-".to_string())
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&categories).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&categories).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("short_id,id,name,slug,parent,active,order");
            for cat in &categories {
                let short_id = short_ids
                    .get_short_id(&cat.id.to_string())
                    .unwrap_or_default();
                println!(
                    "{},{},{},{},{},{},{}",
                    short_id,
                    cat.id,
                    escape_csv(&cat.name),
                    cat.slug,
                    escape_csv(&parent_name(cat)),
                    cat.is_active,
                    cat.display_order.map_or(String::new(), |o| o.to_string()),
                );
            }
        }
        OutputFormat::Tsv => {
            let mut header_parts = vec![format!("{:<8}", style("SHORT").bold().dim())];
            for col in &args.columns {
                let header = match col {
                    ListColumn::Id => format!("{:<17}", style("ID").bold()),
                    ListColumn::Name => format!("{:<25}", style("NAME").bold()),
                    ListColumn::Slug => format!("{:<20}", style("SLUG").bold()),
                    ListColumn::Parent => format!("{:<20}", style("PARENT").bold()),
                    ListColumn::Order => format!("{:<7}", style("ORDER").bold()),
                    ListColumn::Active => format!("{:<8}", style("ACTIVE").bold()),
                    ListColumn::Author => format!("{:<14}", style("AUTHOR").bold()),
                    ListColumn::Created => format!("{:<12}", style("CREATED").bold()),
                };
                header_parts.push(header);
            }
            println!("{}", header_parts.join(" "));
            println!("{}", "-".repeat(95));

            for cat in &categories {
                let short_id = short_ids
                    .get_short_id(&cat.id.to_string())
                    .unwrap_or_default();
                let mut row_parts = vec![format!("{:<8}", style(format!("@{}", short_id)).cyan())];

                for col in &args.columns {
                    let value = match col {
                        ListColumn::Id => format!("{:<17}", format_short_id(&cat.id)),
                        ListColumn::Name => format!("{:<25}", truncate_str(&cat.name, 23)),
                        ListColumn::Slug => format!("{:<20}", truncate_str(&cat.slug, 18)),
                        ListColumn::Parent => {
                            format!("{:<20}", truncate_str(&parent_name(cat), 18))
                        }
                        ListColumn::Order => format!(
                            "{:<7}",
                            cat.display_order
                                .map_or("-".to_string(), |o| o.to_string())
                        ),
                        ListColumn::Active => {
                            format!("{:<8}", if cat.is_active { "yes" } else { "no" })
                        }
                        ListColumn::Author => format!("{:<14}", truncate_str(&cat.author, 12)),
                        ListColumn::Created => {
                            format!("{:<12}", cat.created.format("%Y-%m-%d"))
                        }
                    };
                    row_parts.push(value);
                }
                println!("{}", row_parts.join(" "));
            }

            if !global.quiet {
                println!();
                println!(
                    "{} categorie(s) found. Use {} to reference by short ID.",
                    style(categories.len()).cyan(),
                    style("@N").cyan()
                );
            }
        }
        OutputFormat::Id => {
            for cat in &categories {
                println!("{}", cat.id);
            }
        }
        OutputFormat::Md => {
            println!("| Short | ID | Name | Slug | Parent | Active |");
            println!("|---|---|---|---|---|---|");
            for cat in &categories {
                let short_id = short_ids
                    .get_short_id(&cat.id.to_string())
                    .unwrap_or_default();
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    short_id,
                    format_short_id(&cat.id),
                    cat.name,
                    cat.slug,
                    parent_name(cat),
                    if cat.is_active { "yes" } else { "no" },
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

    let name = args.name.unwrap_or_else(|| "New Category".to_string());

    // Resolve the parent, if given, to a real category id
    let parent = match args.parent {
        Some(ref reference) => {
            let short_ids = ShortIdIndex::load(&project);
            let resolved = short_ids
                .resolve(reference)
                .unwrap_or_else(|| reference.clone());
            let cat_dir = project.entity_dir(EntityPrefix::Cat);
            let (_, parent_cat): (_, Category) = loader::load_entity(&cat_dir, &resolved)?
                .ok_or_else(|| miette::miette!("No category found matching '{}'", reference))?;
            Some(parent_cat.id)
        }
        None => None,
    };

    let mut category = Category::new(name.clone(), parent, config.author());
    category.description = args.description;
    category.display_order = args.order;
    category.notes = args.notes;

    let file_path = loader::save_entity(&project, EntityPrefix::Cat, &category)?;

    let mut short_ids = ShortIdIndex::load(&project);
    let short_id = short_ids.add(category.id.to_string());
    let _ = short_ids.save(&project);

    println!(
        "{} Created category {} (@{})",
        style("✓").green(),
        style(format_short_id(&category.id)).cyan(),
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

    let cat_dir = project.entity_dir(EntityPrefix::Cat);
    let (path, cat): (_, Category) = loader::load_entity(&cat_dir, &resolved_id)?
        .ok_or_else(|| miette::miette!("No category found matching '{}'", args.id))?;

    match global.format {
        OutputFormat::Yaml => {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&cat).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => {
            println!("{}", cat.id);
        }
        _ => {
            // Pretty format (default)
            let categories = load_categories(&project)?;
            let parent_name = cat.parent.as_ref().and_then(|pid| {
                categories
                    .iter()
                    .find(|c| &c.id == pid)
                    .map(|c| c.name.clone())
            });
            let child_count = categories
                .iter()
                .filter(|c| c.parent.as_ref() == Some(&cat.id))
                .count();
            let products: Vec<Product> =
                loader::load_all(&project.entity_dir(EntityPrefix::Prod))?;
            let product_count = products
                .iter()
                .filter(|p| p.category.as_ref() == Some(&cat.id))
                .count();

            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("ID").bold(),
                style(&cat.id.to_string()).cyan()
            );
            println!("{}: {}", style("Name").bold(), style(&cat.name).yellow());
            println!("{}: {}", style("Slug").bold(), cat.slug);
            println!(
                "{}: {}",
                style("Parent").bold(),
                parent_name.as_deref().unwrap_or("(top-level)")
            );
            println!(
                "{}: {}",
                style("Active").bold(),
                if cat.is_active { "yes" } else { "no" }
            );
            if let Some(order) = cat.display_order {
                println!("{}: {}", style("Display order").bold(), order);
            }
            println!("{}", style("─".repeat(60)).dim());

            if let Some(ref description) = cat.description {
                println!();
                println!("{}", style("Description:").bold());
                println!("{}", description);
            }

            println!();
            println!(
                "{}: {} subcategorie(s), {} product(s)",
                style("Contains").bold(),
                child_count,
                product_count
            );

            if let Some(ref notes) = cat.notes {
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
                cat.author,
                style("Created").dim(),
                cat.created.format("%Y-%m-%d %H:%M"),
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

    let cat_dir = project.entity_dir(EntityPrefix::Cat);
    let path = loader::find_entity_file(&cat_dir, &resolved_id)
        .ok_or_else(|| miette::miette!("No category found matching '{}'", args.id))?;

    println!(
        "Opening {} in {}...",
        style(path.display()).cyan(),
        style(config.editor()).yellow()
    );

    config.run_editor(&path).into_diagnostic()?;

    Ok(())
}

fn run_tree(args: TreeArgs, _global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let categories = load_categories(&project)?;

    let records = categories
        .iter()
        .filter(|c| args.include_inactive || c.is_active)
        .map(|c| c.to_record());
    let tree = CategoryTree::build(records);

    let counts: HashMap<String, usize> = if args.counts {
        let products: Vec<Product> = loader::load_all(&project.entity_dir(EntityPrefix::Prod))?;
        let mut counts = HashMap::new();
        for product in &products {
            if let Some(ref cat_id) = product.category {
                *counts.entry(cat_id.to_string()).or_insert(0) += 1;
            }
        }
        counts
    } else {
        HashMap::new()
    };

    println!("{}", style(&tree.root().name).bold());
    print_subtree(&tree, ROOT, "", args.counts, &counts);

    if tree.is_empty() {
        println!("{}", style("  (no categories yet)").dim());
    }

    Ok(())
}

fn print_subtree(
    tree: &CategoryTree,
    idx: usize,
    prefix: &str,
    with_counts: bool,
    counts: &HashMap<String, usize>,
) {
    let children = tree.child_indices(idx);
    for (pos, &child) in children.iter().enumerate() {
        let last = pos == children.len() - 1;
        let connector = if last { "└── " } else { "├── " };
        let node = tree.node(child);

        let suffix = if with_counts {
            let n = counts.get(&node.id).copied().unwrap_or(0);
            format!(" {}", style(format!("({})", n)).dim())
        } else {
            String::new()
        };

        println!("{}{}{}{}", prefix, connector, node.name, suffix);

        let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
        print_subtree(tree, child, &child_prefix, with_counts, counts);
    }
}
