//! `stocktake explore` command - browse categories and products like a
//! file explorer
//!
//! Categories act as folders, products as files. With no subcommand this
//! runs an interactive browser; `ls` and `path` expose one-shot listing
//! and breadcrumb output for scripting.

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::format_short_id_str;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::explorer::Explorer;
use crate::core::identity::EntityPrefix;
use crate::core::loader;
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::tree::CategoryTree;
use crate::entities::category::Category;
use crate::entities::product::{Product, ProductLeaf};

#[derive(clap::Args, Debug)]
pub struct ExploreArgs {
    #[command(subcommand)]
    pub command: Option<ExploreCommands>,

    /// Start at this category (ID or @N) instead of the root
    #[arg(long, short = 'c')]
    pub category: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ExploreCommands {
    /// List subcategories and products at one level
    Ls(LsArgs),

    /// Print the breadcrumb path from the root to a category
    Path(PathArgs),
}

#[derive(clap::Args, Debug)]
pub struct LsArgs {
    /// Category to list (ID or @N); omit for the root level
    pub category: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Category ID or short ID (@N)
    pub category: String,
}

/// Run the explorer
pub fn run(args: ExploreArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (tree, leaves) = load_state(&project)?;

    match args.command {
        Some(ExploreCommands::Ls(ls)) => run_ls(&project, &tree, &leaves, ls.category, global),
        Some(ExploreCommands::Path(path)) => run_path(&project, &tree, &path.category),
        None => run_interactive(&project, &tree, &leaves, args.category),
    }
}

/// Build the category tree and product leaves from the on-disk entities.
/// Inactive categories and products are left out, so their subtrees and
/// files never show up while browsing.
fn load_state(project: &Project) -> Result<(CategoryTree, Vec<ProductLeaf>)> {
    let categories: Vec<Category> = loader::load_all(&project.entity_dir(EntityPrefix::Cat))?;
    let products: Vec<Product> = loader::load_all(&project.entity_dir(EntityPrefix::Prod))?;

    let tree = CategoryTree::build(
        categories
            .iter()
            .filter(|c| c.is_active)
            .map(|c| c.to_record()),
    );
    let leaves: Vec<ProductLeaf> = products
        .iter()
        .filter(|p| p.is_active)
        .map(Product::leaf)
        .collect();

    Ok((tree, leaves))
}

/// Resolve a user-supplied category reference (@N, full id, or id
/// fragment) to the full category id as known by the tree.
fn resolve_category(project: &Project, tree: &CategoryTree, reference: &str) -> Result<String> {
    let short_ids = ShortIdIndex::load(project);
    let resolved = short_ids
        .resolve(reference)
        .unwrap_or_else(|| reference.to_string());

    if let Some(node) = tree.find(&resolved) {
        return Ok(node.id.clone());
    }

    // Fragment match like the other commands; only reachable nodes count
    (1..tree.len())
        .map(|idx| tree.node(idx))
        .find(|node| node.id.contains(&resolved) && tree.find(&node.id).is_some())
        .map(|node| node.id.clone())
        .ok_or_else(|| miette::miette!("No category found matching '{}'", reference))
}

fn breadcrumb(explorer: &Explorer<'_>) -> String {
    explorer
        .path()
        .map(|node| node.name.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}

fn run_ls(
    project: &Project,
    tree: &CategoryTree,
    leaves: &[ProductLeaf],
    category: Option<String>,
    global: &GlobalOpts,
) -> Result<()> {
    let mut explorer = Explorer::new(tree);
    if let Some(ref reference) = category {
        let id = resolve_category(project, tree, reference)?;
        explorer.navigate_to(&id);
    }

    let listing = explorer.list_current(leaves);

    if global.format == OutputFormat::Json {
        let folders: Vec<serde_json::Value> = listing
            .folders
            .iter()
            .map(|f| serde_json::json!({ "kind": "folder", "id": f.id, "name": f.name }))
            .collect();
        let files: Vec<serde_json::Value> = listing
            .files
            .iter()
            .map(|p| {
                serde_json::json!({
                    "kind": "file",
                    "id": p.id,
                    "name": p.name,
                    "reference": p.reference,
                })
            })
            .collect();
        let out = serde_json::json!({
            "path": breadcrumb(&explorer),
            "entries": folders.into_iter().chain(files).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
        return Ok(());
    }

    println!("{}", style(breadcrumb(&explorer)).bold());
    println!();

    if listing.folders.is_empty() && listing.files.is_empty() {
        println!("{}", style("(empty)").dim());
        return Ok(());
    }

    for folder in &listing.folders {
        println!(
            "{}  {}",
            style(format!("{}/", folder.name)).cyan().bold(),
            style(format_short_id_str(&folder.id)).dim()
        );
    }
    for file in &listing.files {
        println!(
            "{}  {}  {}",
            file.name,
            style(&file.reference).yellow(),
            style(format_short_id_str(&file.id)).dim()
        );
    }

    println!();
    println!(
        "{} folder(s), {} file(s)",
        style(listing.folders.len()).cyan(),
        style(listing.files.len()).cyan()
    );

    Ok(())
}

fn run_path(project: &Project, tree: &CategoryTree, reference: &str) -> Result<()> {
    let id = resolve_category(project, tree, reference)?;

    let mut explorer = Explorer::new(tree);
    explorer.navigate_to(&id);

    println!("{}", breadcrumb(&explorer));
    Ok(())
}

/// Interactive browser: a select loop over the current level. Folders
/// descend, ".." goes up, Esc exits.
fn run_interactive(
    project: &Project,
    tree: &CategoryTree,
    leaves: &[ProductLeaf],
    start: Option<String>,
) -> Result<()> {
    let mut explorer = Explorer::new(tree);
    if let Some(ref reference) = start {
        let id = resolve_category(project, tree, reference)?;
        explorer.navigate_to(&id);
    }

    let theme = ColorfulTheme::default();

    loop {
        let listing = explorer.list_current(leaves);

        let mut items: Vec<String> = Vec::new();
        if !explorer.at_root() {
            items.push("..".to_string());
        }
        let up_offset = items.len();
        for folder in &listing.folders {
            items.push(format!("{}/", folder.name));
        }
        for file in &listing.files {
            items.push(format!("{} ({})", file.name, file.reference));
        }

        if items.is_empty() {
            println!("{}", style("(empty project, nothing to browse)").dim());
            return Ok(());
        }

        let selection = Select::with_theme(&theme)
            .with_prompt(breadcrumb(&explorer))
            .items(&items)
            .default(0)
            .interact_opt()
            .into_diagnostic()?;

        let Some(selection) = selection else {
            // Esc pressed
            return Ok(());
        };

        if !explorer.at_root() && selection == 0 {
            explorer.navigate_up();
            continue;
        }

        let pos = selection - up_offset;
        if pos < listing.folders.len() {
            let target = listing.folders[pos].id.clone();
            explorer.navigate_to(&target);
        } else {
            let file = listing.files[pos - listing.folders.len()];
            println!(
                "{} {}  {}",
                style("→").dim(),
                style(&file.name).yellow(),
                style(format_short_id_str(&file.id)).dim()
            );
            println!(
                "  {}",
                style(format!("stocktake prod show {}", file.id)).dim()
            );
        }
    }
}
