use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed key/value storage. Each key is one JSON file under `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        // 鍵名可能含有 ':' 等檔名不允許的字元
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Path::new(&self.base_path).join(format!("{}.json", file_name))
    }
}

impl Storage for LocalStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let full_path = self.path_for(key);
        match fs::read_to_string(&full_path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let full_path = self.path_for(key);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_key_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        assert_eq!(storage.get_item("@RocketShoes:cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("store");
        let storage = LocalStorage::new(base.to_str().unwrap().to_string());

        storage.set_item("@RocketShoes:cart", "[]").await.unwrap();

        assert_eq!(
            storage.get_item("@RocketShoes:cart").await.unwrap(),
            Some("[]".to_string())
        );
        assert!(base.join("_RocketShoes_cart.json").exists());
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage.set_item("cart", "[1]").await.unwrap();
        storage.set_item("cart", "[2]").await.unwrap();

        assert_eq!(storage.get_item("cart").await.unwrap(), Some("[2]".to_string()));
    }
}
