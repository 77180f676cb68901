//! Input loading for costroll
//!
//! Reads expense-object records, line items and saved selections from JSON
//! or YAML files. The format is chosen by file extension.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CostrollError, CostrollResult};
use crate::models::{ExpenseObject, LineItem, SelectionState};
use crate::services::ExpenseObjectTree;

/// Supported input file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> CostrollResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => Err(CostrollError::Input(format!(
                "Unsupported input file {}: expected a .json, .yaml or .yml extension",
                path.display()
            ))),
        }
    }
}

/// Read and deserialize a JSON or YAML file
pub fn read_records<T, P>(path: P) -> CostrollResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let format = InputFormat::from_path(path)?;

    if !path.exists() {
        return Err(CostrollError::Input(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)
        .map_err(|e| CostrollError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let reader = BufReader::new(file);

    match format {
        InputFormat::Json => serde_json::from_reader(reader)
            .map_err(|e| CostrollError::Input(format!("Failed to parse {}: {}", path.display(), e))),
        InputFormat::Yaml => serde_yaml::from_reader(reader)
            .map_err(|e| CostrollError::Input(format!("Failed to parse {}: {}", path.display(), e))),
    }
}

/// Load the flat list of expense-object records
pub fn load_expense_objects<P: AsRef<Path>>(path: P) -> CostrollResult<Vec<ExpenseObject>> {
    let records: Vec<ExpenseObject> = read_records(&path)?;
    debug!(path = %path.as_ref().display(), count = records.len(), "loaded expense objects");
    Ok(records)
}

/// Load expense-object records and build the validated tree
pub fn load_tree<P: AsRef<Path>>(path: P) -> CostrollResult<ExpenseObjectTree> {
    let records = load_expense_objects(path)?;
    Ok(ExpenseObjectTree::build(records)?)
}

/// Load line items; malformed numeric fields read as zero
pub fn load_line_items<P: AsRef<Path>>(path: P) -> CostrollResult<Vec<LineItem>> {
    let items: Vec<LineItem> = read_records(&path)?;
    debug!(path = %path.as_ref().display(), count = items.len(), "loaded line items");
    Ok(items)
}

/// Load a saved selection (a list of expense-object ids)
pub fn load_selection<P: AsRef<Path>>(path: P) -> CostrollResult<SelectionState> {
    read_records(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseObjectId, Money};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(InputFormat::from_path(Path::new("a.json")).unwrap(), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("a.YML")).unwrap(), InputFormat::Yaml);
        assert!(InputFormat::from_path(Path::new("a.csv")).is_err());
        assert!(InputFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_load_tree_from_json() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "objects.json",
            r#"[
                {"id": 1, "name": "Supplier-root", "level": 1},
                {"id": 2, "name": "Aluminum", "parentId": 1, "level": 2},
                {"id": 9, "name": "A", "parent_id": 2, "level": 3, "role": "supplier"}
            ]"#,
        );

        let tree = load_tree(&path).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.parent_of(ExpenseObjectId::new(9)), Some(ExpenseObjectId::new(2)));
    }

    #[test]
    fn test_malformed_tree_is_tree_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "objects.json",
            r#"[{"id": 2, "name": "Orphan", "parent_id": 7, "level": 2}]"#,
        );

        let err = load_tree(&path).unwrap_err();
        assert!(err.is_tree_error());
    }

    #[test]
    fn test_load_line_items_from_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "items.yaml",
            r#"
- productName: Facade panel
  unitPrice: "1,000"
  quantity: 3
  unit: pcs
  lineTotal: 3000
  allocations:
    9:
      percentage: "30%"
    10:
      quantity: 1
      unitPrice: garbage
      amount: 250.5
"#,
        );

        let items = load_line_items(&path).unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.unit_price, Money::from_major(1_000));
        assert_eq!(item.line_total, Money::from_major(3_000));
        assert_eq!(item.allocations[&ExpenseObjectId::new(9)].percentage, 30.0);
        let second = &item.allocations[&ExpenseObjectId::new(10)];
        assert!(second.unit_price.is_zero());
        assert_eq!(second.amount, Money::from_minor(25_050));
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let dir = TempDir::new().unwrap();
        let err = load_line_items(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CostrollError::Input(_)));
    }

    #[test]
    fn test_load_selection() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "selection.json", "[10, 9]");
        assert_eq!(load_selection(&path).unwrap(), SelectionState::from([9, 10]));
    }
}
