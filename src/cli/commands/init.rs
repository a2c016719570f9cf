//! `stocktake init` command - Initialize a new stocktake project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::core::project::{Project, ProjectError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Also initialize a git repository
    #[arg(long)]
    pub git: bool,

    /// Force initialization even if .stocktake/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    if args.git {
        init_git(&path)?;
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            println!(
                "{} Initialized stocktake project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created project structure:");
            print_structure();
            println!();
            println!("Next steps:");
            println!(
                "  {} Create your first category",
                style("stocktake cat new --name Electronics").yellow()
            );
            println!(
                "  {} Create a product under it",
                style("stocktake prod new --name 'USB Cable' --reference CBL-001").yellow()
            );
            println!(
                "  {} Browse the catalog",
                style("stocktake explore").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} stocktake project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("stocktake init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn init_git(path: &Path) -> Result<()> {
    let git_dir = path.join(".git");
    if git_dir.exists() {
        println!("{} Git repository already exists", style("!").yellow());
        return Ok(());
    }

    let output = std::process::Command::new("git")
        .arg("init")
        .current_dir(path)
        .output()
        .into_diagnostic()?;

    if output.status.success() {
        println!("{} Initialized git repository", style("✓").green());
    } else {
        println!(
            "{} Failed to initialize git: {}",
            style("✗").red(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(())
}

fn print_structure() {
    let entries = [
        (".stocktake/", "project marker and configuration"),
        ("catalog/categories/", "category records"),
        ("catalog/products/", "product records"),
        ("purchasing/suppliers/", "supplier records"),
        ("purchasing/orders/", "purchase orders"),
    ];

    for (dir, desc) in entries {
        println!(
            "  {:<24} {}",
            style(dir).cyan(),
            style(desc).dim()
        );
    }
}
