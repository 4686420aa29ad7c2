use cmms_migrate::report::IssueKind;
use cmms_migrate::rules::FieldRules;
use cmms_migrate::run_migration;
use cmms_migrate::session::Session;
use cmms_migrate::table::Table;
use std::fs;
use std::path::Path;

fn write_rules_json(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("rules.json");
    fs::write(
        &path,
        r#"{
            "fields": [
                { "name": "asset_name", "type": "text", "required": true,
                  "aliases": ["asset name", "equipment name"] },
                { "name": "install_date", "type": "date", "required": true,
                  "aliases": ["install dt", "installed on"] },
                { "name": "cost", "type": "number",
                  "aliases": ["purchase cost"] }
            ]
        }"#,
    )
    .unwrap();
    path
}

#[test]
fn test_file_to_file_migration() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rules_path = write_rules_json(dir.path());

    let input_path = dir.path().join("legacy_assets.csv");
    fs::write(
        &input_path,
        "Asset Name,Install Dt,Purchase Cost,Warranty Vendor\n\
         Pump 1,03/04/2024,\"1,200\",Acme\n\
         Pump 2,,850,Acme\n\
         Chiller A,15-Jan-2023,not-a-price,Initech\n",
    )?;

    let rules = FieldRules::from_json(&rules_path)?;
    let table = Table::read_csv(&input_path)?;
    let session = Session::local();
    let (cleaned, report) = run_migration(&session, &table, &rules)?;

    // Cleaned file round-trips through disk in the same shape.
    let output_path = dir.path().join("cleaned.csv");
    cleaned.write_csv(&output_path)?;
    let reread = Table::read_csv(&output_path)?;

    assert_eq!(reread.headers, vec!["asset_name", "install_date", "cost"]);
    assert_eq!(reread.height(), 3);
    assert_eq!(reread.rows[0], vec!["Pump 1", "2024-03-04", "1200"]);
    assert_eq!(reread.rows[1], vec!["Pump 2", "", "850"]);
    assert_eq!(reread.rows[2], vec!["Chiller A", "2023-01-15", "not-a-price"]);

    assert_eq!(report.count(IssueKind::UnmappedColumn), 1);
    assert_eq!(report.count(IssueKind::MissingRequired), 1);
    assert_eq!(report.count(IssueKind::UnparsableNumber), 1);
    assert_eq!(report.count(IssueKind::UnparsableDate), 0);

    let summary = report.summary();
    println!("Validation report:\n{}", summary);
    assert!(summary.contains("Unmapped columns (dropped): Warranty Vendor"));
    assert!(summary.contains("install_date: 1 missing required values"));

    Ok(())
}

#[test]
fn test_migration_with_legacy_rules_sheet() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    let rules_path = dir.path().join("cmms_field_rules.csv");
    fs::write(
        &rules_path,
        "Field Name,Type,Required,Synonyms\n\
         asset_name,Text,TRUE,asset name;equipment name\n\
         install_date,Date,TRUE,install dt\n",
    )?;

    let input_path = dir.path().join("upload.csv");
    fs::write(
        &input_path,
        "Equipment Name,Install Dt\n\
         Boiler 7,2022-11-30\n",
    )?;

    let rules = FieldRules::from_sheet(&rules_path)?;
    let table = Table::read_csv(&input_path)?;
    let (cleaned, report) = run_migration(&Session::local(), &table, &rules)?;

    assert_eq!(cleaned.headers, vec!["asset_name", "install_date"]);
    assert_eq!(cleaned.rows[0], vec!["Boiler 7", "2022-11-30"]);
    assert!(report.is_clean());

    Ok(())
}

#[test]
fn test_already_canonical_upload_keeps_column_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rules = FieldRules::from_json(&write_rules_json(dir.path()))?;

    // Canonical headers in an order that differs from the rule declaration.
    let input = Table::from_csv_str(
        "install_date,asset_name\n\
         2024-03-04,Pump 1\n",
    )?;
    let (cleaned, report) = run_migration(&Session::local(), &input, &rules)?;

    assert_eq!(cleaned.headers, vec!["install_date", "asset_name"]);
    assert_eq!(cleaned.rows, input.rows);
    assert!(report.is_clean());

    Ok(())
}

#[test]
fn test_rerun_on_cleaned_output_reports_nothing_new() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rules = FieldRules::from_json(&write_rules_json(dir.path()))?;

    let input = Table::from_csv_str(
        "Asset Name,Install Dt,Purchase Cost\n\
         Pump 1,03/04/2024,\"1,200\"\n",
    )?;
    let session = Session::local();

    let (cleaned, _) = run_migration(&session, &input, &rules)?;
    let (again, report) = run_migration(&session, &cleaned, &rules)?;

    assert_eq!(again, cleaned);
    assert!(report.is_clean());

    Ok(())
}

#[test]
fn test_malformed_input_fails_before_processing() {
    let dir = tempfile::tempdir().unwrap();

    let empty = dir.path().join("empty.csv");
    fs::write(&empty, "").unwrap();
    assert!(Table::read_csv(&empty).is_err());

    let missing = dir.path().join("does_not_exist.csv");
    assert!(Table::read_csv(&missing).is_err());
}
