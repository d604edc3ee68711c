use crate::error::{PlaygateError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 저장소의 inventories/ 아래 인벤토리 디렉토리 이름 목록 (정렬됨)
pub fn list_inventories(repo: &Path) -> Result<Vec<String>> {
    let dir = repo.join("inventories");
    if !dir.is_dir() {
        return Err(PlaygateError::InventoriesDirMissing(dir.display().to_string()));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    Ok(names)
}

/// inventories/<name>/hosts
pub fn inventory_path(repo: &Path, name: &str) -> PathBuf {
    repo.join("inventories").join(name).join("hosts")
}
