//! Integration tests for the stocktake CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a stocktake command
fn stocktake() -> Command {
    Command::cargo_bin("stocktake").unwrap()
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    stocktake()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp
}

/// Helper to create a test category, returning nothing; reference it by @N
fn create_test_category(tmp: &TempDir, name: &str, parent: Option<&str>) {
    let mut args = vec!["cat", "new", "--name", name, "--no-edit"];
    if let Some(parent) = parent {
        args.push("--parent");
        args.push(parent);
    }
    stocktake()
        .current_dir(tmp.path())
        .args(&args)
        .assert()
        .success();
}

/// Helper to create a test product filed under a category reference
fn create_test_product(tmp: &TempDir, name: &str, reference: &str, category: Option<&str>) {
    let mut args = vec![
        "prod",
        "new",
        "--name",
        name,
        "--reference",
        reference,
        "--no-edit",
    ];
    if let Some(category) = category {
        args.push("--category");
        args.push(category);
    }
    stocktake()
        .current_dir(tmp.path())
        .args(&args)
        .assert()
        .success();
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    stocktake()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("inventory"));
}

#[test]
fn test_version_displays() {
    stocktake()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stocktake"));
}

#[test]
fn test_unknown_command_fails() {
    stocktake()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    stocktake()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".stocktake").exists());
    assert!(tmp.path().join(".stocktake/config.yaml").exists());
    assert!(tmp.path().join("catalog/categories").is_dir());
    assert!(tmp.path().join("catalog/products").is_dir());
    assert!(tmp.path().join("purchasing/suppliers").is_dir());
    assert!(tmp.path().join("purchasing/orders").is_dir());
}

#[test]
fn test_init_warns_if_project_exists() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

// ============================================================================
// Category Command Tests
// ============================================================================

#[test]
fn test_cat_new_creates_file() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .args(["cat", "new", "--name", "Electronics", "--no-edit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created category"));

    let files: Vec<_> = fs::read_dir(tmp.path().join("catalog/categories"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().to_string_lossy().ends_with(".stk.yaml"))
        .collect();
    assert_eq!(files.len(), 1, "Expected exactly one category file");

    let content = fs::read_to_string(files[0].path()).unwrap();
    assert!(content.contains("Electronics"));
    assert!(content.contains("slug: electronics"));
}

#[test]
fn test_cat_new_with_parent() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);
    create_test_category(&tmp, "Cables", Some("@1"));

    stocktake()
        .current_dir(tmp.path())
        .args(["cat", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cables"))
        .stdout(predicate::str::contains("Electronics"));
}

#[test]
fn test_cat_list_empty_project() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .args(["cat", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No categories found"));
}

#[test]
fn test_cat_list_shows_short_ids() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Office Supplies", None);

    stocktake()
        .current_dir(tmp.path())
        .args(["cat", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("@1"))
        .stdout(predicate::str::contains("1 categorie(s) found"));
}

#[test]
fn test_cat_list_count() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "A", None);
    create_test_category(&tmp, "B", None);

    stocktake()
        .current_dir(tmp.path())
        .args(["cat", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
}

#[test]
fn test_cat_show_by_short_id() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);

    stocktake()
        .current_dir(tmp.path())
        .args(["cat", "show", "@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Electronics"));
}

#[test]
fn test_cat_show_json_format() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);

    stocktake()
        .current_dir(tmp.path())
        .args(["cat", "show", "@1", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Electronics\""));
}

#[test]
fn test_cat_tree_renders_hierarchy() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);
    create_test_category(&tmp, "Cables", Some("@1"));

    stocktake()
        .current_dir(tmp.path())
        .args(["cat", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All Categories"))
        .stdout(predicate::str::contains("└── Electronics"))
        .stdout(predicate::str::contains("    └── Cables"));
}

// ============================================================================
// Product Command Tests
// ============================================================================

#[test]
fn test_prod_new_creates_file() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .args([
            "prod",
            "new",
            "--name",
            "USB Cable",
            "--reference",
            "CBL-001",
            "--no-edit",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created product"));

    let files: Vec<_> = fs::read_dir(tmp.path().join("catalog/products"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().to_string_lossy().ends_with(".stk.yaml"))
        .collect();
    assert_eq!(files.len(), 1);

    let content = fs::read_to_string(files[0].path()).unwrap();
    assert!(content.contains("USB Cable"));
    assert!(content.contains("CBL-001"));
}

#[test]
fn test_prod_list_filters_by_category() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);
    create_test_product(&tmp, "USB Cable", "CBL-001", Some("@1"));
    create_test_product(&tmp, "Stapler", "STP-001", None);

    stocktake()
        .current_dir(tmp.path())
        .args(["prod", "list", "--category", "@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("USB Cable"))
        .stdout(predicate::str::contains("Stapler").not());
}

#[test]
fn test_prod_list_low_stock() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .args([
            "prod", "new", "--name", "Low Pen", "--reference", "PEN-1", "--quantity", "2",
            "--threshold", "5", "--no-edit",
        ])
        .assert()
        .success();
    stocktake()
        .current_dir(tmp.path())
        .args([
            "prod", "new", "--name", "Plenty Pen", "--reference", "PEN-2", "--quantity", "50",
            "--threshold", "5", "--no-edit",
        ])
        .assert()
        .success();

    stocktake()
        .current_dir(tmp.path())
        .args(["prod", "list", "--low-stock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Low Pen"))
        .stdout(predicate::str::contains("Plenty Pen").not());
}

#[test]
fn test_prod_show_displays_stock() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .args([
            "prod",
            "new",
            "--name",
            "Desk Lamp",
            "--reference",
            "LMP-001",
            "--quantity",
            "12",
            "--no-edit",
        ])
        .assert()
        .success();

    stocktake()
        .current_dir(tmp.path())
        .args(["prod", "show", "@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Desk Lamp"))
        .stdout(predicate::str::contains("12"));
}

// ============================================================================
// Supplier Command Tests
// ============================================================================

#[test]
fn test_sup_new_and_list() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .args([
            "sup",
            "new",
            "--name",
            "Acme Wholesale",
            "--email",
            "orders@acme.example",
            "--no-edit",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created supplier"));

    stocktake()
        .current_dir(tmp.path())
        .args(["sup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Wholesale"))
        .stdout(predicate::str::contains("orders@acme.example"))
        .stdout(predicate::str::contains("1 supplier(s) found"));
}

// ============================================================================
// Purchase Order Command Tests
// ============================================================================

#[test]
fn test_po_new_requires_supplier() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .args([
            "sup",
            "new",
            "--name",
            "Acme Wholesale",
            "--no-edit",
        ])
        .assert()
        .success();

    stocktake()
        .current_dir(tmp.path())
        .args([
            "po",
            "new",
            "--supplier",
            "@1",
            "--number",
            "PO-2026-0001",
            "--no-edit",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created purchase order"));

    let files: Vec<_> = fs::read_dir(tmp.path().join("purchasing/orders"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().to_string_lossy().ends_with(".stk.yaml"))
        .collect();
    assert_eq!(files.len(), 1);

    let content = fs::read_to_string(files[0].path()).unwrap();
    assert!(content.contains("PO-2026-0001"));
    assert!(content.contains("status: pending"));
}

#[test]
fn test_po_list_filters_by_status() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .args(["sup", "new", "--name", "Acme", "--no-edit"])
        .assert()
        .success();
    stocktake()
        .current_dir(tmp.path())
        .args([
            "po", "new", "--supplier", "@1", "--number", "PO-0001", "--no-edit",
        ])
        .assert()
        .success();

    stocktake()
        .current_dir(tmp.path())
        .args(["po", "list", "--status", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PO-0001"));

    stocktake()
        .current_dir(tmp.path())
        .args(["po", "list", "--status", "received"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No purchase orders found"));
}

// ============================================================================
// Explorer Tests
// ============================================================================

#[test]
fn test_explore_ls_root_shows_folders() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);
    create_test_category(&tmp, "Office", None);

    stocktake()
        .current_dir(tmp.path())
        .args(["explore", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All Categories"))
        .stdout(predicate::str::contains("Electronics/"))
        .stdout(predicate::str::contains("Office/"))
        .stdout(predicate::str::contains("2 folder(s)"));
}

#[test]
fn test_explore_ls_level_shows_files() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);
    create_test_category(&tmp, "Cables", Some("@1"));
    create_test_product(&tmp, "USB Cable", "CBL-001", Some("@1"));

    // Level listing: the Cables subfolder, then the product filed here
    stocktake()
        .current_dir(tmp.path())
        .args(["explore", "ls", "@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cables/"))
        .stdout(predicate::str::contains("USB Cable"))
        .stdout(predicate::str::contains("1 folder(s), 1 file(s)"));
}

#[test]
fn test_explore_ls_empty_level() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);

    stocktake()
        .current_dir(tmp.path())
        .args(["explore", "ls", "@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(empty)"));
}

#[test]
fn test_explore_path_breadcrumb() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);
    create_test_category(&tmp, "Cables", Some("@1"));

    stocktake()
        .current_dir(tmp.path())
        .args(["explore", "path", "@2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "All Categories > Electronics > Cables",
        ));
}

#[test]
fn test_explore_ls_partial_id() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);

    let output = stocktake()
        .current_dir(tmp.path())
        .args(["cat", "list", "--format", "id"])
        .output()
        .unwrap();
    let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
    // A leading fragment resolves like it does for cat/prod show
    let fragment = &id[..12];

    stocktake()
        .current_dir(tmp.path())
        .args(["explore", "ls", fragment])
        .assert()
        .success()
        .stdout(predicate::str::contains("All Categories > Electronics"));
}

#[test]
fn test_explore_path_unknown_category_fails() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .args(["explore", "path", "CAT-DOESNOTEXIST"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No category found"));
}

#[test]
fn test_explore_ls_json_format() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);

    stocktake()
        .current_dir(tmp.path())
        .args(["explore", "ls", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"folder\""))
        .stdout(predicate::str::contains("\"name\": \"Electronics\""));
}

// ============================================================================
// Status Dashboard Tests
// ============================================================================

#[test]
fn test_status_shows_counts() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);
    create_test_product(&tmp, "USB Cable", "CBL-001", Some("@1"));

    stocktake()
        .current_dir(tmp.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stocktake project"))
        .stdout(predicate::str::contains("Categories:"))
        .stdout(predicate::str::contains("Products:"));
}

#[test]
fn test_status_flags_low_stock() {
    let tmp = setup_test_project();

    stocktake()
        .current_dir(tmp.path())
        .args([
            "prod", "new", "--name", "Low Pen", "--reference", "PEN-1", "--quantity", "1",
            "--threshold", "10", "--no-edit",
        ])
        .assert()
        .success();

    stocktake()
        .current_dir(tmp.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("need restocking"))
        .stdout(predicate::str::contains("Low Pen"));
}

#[test]
fn test_status_json_format() {
    let tmp = setup_test_project();
    create_test_category(&tmp, "Electronics", None);

    stocktake()
        .current_dir(tmp.path())
        .args(["status", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"categories\": 1"));
}

// ============================================================================
// Completions Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    stocktake()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stocktake"));
}
