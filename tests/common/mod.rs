use std::path::PathBuf;

use tempfile::TempDir;

pub const OBJECTS_JSON: &str = r#"[
    {"id": 1, "name": "Suppliers", "level": 1, "is_active": true},
    {"id": 2, "name": "Aluminum", "parentId": 1, "level": 2},
    {"id": 9, "name": "Alu Works", "parent_id": 2, "level": 3, "role": "supplier"},
    {"id": 10, "name": "Metal Co", "parent_id": 2, "level": 3, "role": "supplier"},
    {"id": 20, "name": "Labor", "level": 1},
    {"id": 21, "name": "Crew", "parent_id": 20, "level": 2}
]"#;

pub const ITEMS_JSON: &str = r#"[
    {
        "productName": "Facade",
        "unitPrice": "1,000,000",
        "quantity": 1,
        "unit": "lot",
        "lineTotal": 1000000,
        "allocations": {
            "9": {"percentage": 30},
            "10": {"quantity": 2, "unitPrice": 100000}
        }
    },
    {
        "productName": "Installation",
        "lineTotal": "200000",
        "allocations": {
            "21": {"percentage": "50%", "amount": 150000},
            "2": {"percentage": 10}
        }
    }
]"#;

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("objects.json"), OBJECTS_JSON).unwrap();
        std::fs::write(dir.path().join("items.json"), ITEMS_JSON).unwrap();
        Self { dir }
    }

    pub fn objects(&self) -> PathBuf {
        self.dir.path().join("objects.json")
    }

    pub fn items(&self) -> PathBuf {
        self.dir.path().join("items.json")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}
