//! Clean generated output

use anyhow::Result;
use std::fs;

use crate::Quill;

/// Remove the public directory and the build cache
pub fn run(app: &Quill) -> Result<()> {
    if app.public_dir.exists() {
        fs::remove_dir_all(&app.public_dir)?;
        tracing::info!("Deleted: {:?}", app.public_dir);
    }

    let cache_dir = app.base_dir.join(".quill-cache");
    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)?;
        tracing::info!("Deleted: {:?}", cache_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_output_and_cache() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::create_dir_all(dir.path().join(".quill-cache")).unwrap();
        fs::write(dir.path().join(".quill-cache/db.json"), "{}").unwrap();

        let app = Quill::new(dir.path()).unwrap();
        run(&app).unwrap();

        assert!(!dir.path().join("public").exists());
        assert!(!dir.path().join(".quill-cache").exists());
    }

    #[test]
    fn test_clean_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let app = Quill::new(dir.path()).unwrap();
        run(&app).unwrap();
        run(&app).unwrap();
    }
}
