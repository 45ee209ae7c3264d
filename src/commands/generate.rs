//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::cache::CacheDb;
use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::Quill;

/// Generate the static site, skipping the build when nothing changed
pub fn run(app: &Quill) -> Result<()> {
    run_with_options(app, false)
}

/// Generate with force option
pub fn run_with_options(app: &Quill, force: bool) -> Result<()> {
    let start = std::time::Instant::now();

    let cache = CacheDb::load(&app.base_dir);
    let snapshot = CacheDb::snapshot(app)?;

    if !force && app.public_dir.join("index.html").exists() && cache.is_current(&snapshot) {
        tracing::info!("No changes detected, skipping generation");
        return Ok(());
    }

    let loader = ContentLoader::new(app);
    let posts = loader.load_posts()?;
    let pages = loader.load_pages()?;

    tracing::info!("Loaded {} posts and {} pages", posts.len(), pages.len());

    let generator = Generator::new(app)?;
    generator.generate(&posts, &pages)?;

    snapshot.save(&app.base_dir)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(app: &Quill) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(app.source_dir.as_ref(), notify::RecursiveMode::Recursive)?;

    let config_path = app.base_dir.join("config.yml");
    if config_path.exists() {
        watcher.watch(
            Path::new(&config_path),
            notify::RecursiveMode::NonRecursive,
        )?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Debounce events
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = run(app) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, Quill) {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("source/_posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("a.md"), "---\ntitle: A\ndate: 2026-02-01\n---\nbody\n").unwrap();
        let app = Quill::new(dir.path()).unwrap();
        (dir, app)
    }

    #[test]
    fn test_run_generates_and_caches() {
        let (_dir, app) = site();
        run(&app).unwrap();

        assert!(app.public_dir.join("index.html").exists());
        assert!(app.base_dir.join(".quill-cache/db.json").exists());
    }

    #[test]
    fn test_unchanged_rerun_skips_rewrite() {
        let (_dir, app) = site();
        run(&app).unwrap();

        let index = app.public_dir.join("index.html");
        let before = fs::metadata(&index).unwrap().modified().unwrap();
        run(&app).unwrap();
        let after = fs::metadata(&index).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_force_rebuilds() {
        let (_dir, app) = site();
        run(&app).unwrap();

        fs::remove_file(app.public_dir.join("atom.xml")).unwrap();
        run_with_options(&app, true).unwrap();
        assert!(app.public_dir.join("atom.xml").exists());
    }

    #[test]
    fn test_edit_triggers_rebuild() {
        let (dir, app) = site();
        run(&app).unwrap();

        fs::write(
            dir.path().join("source/_posts/a.md"),
            "---\ntitle: Renamed\ndate: 2026-02-01\n---\nbody\n",
        )
        .unwrap();
        run(&app).unwrap();

        let index = fs::read_to_string(app.public_dir.join("index.html")).unwrap();
        assert!(index.contains("Renamed"));
    }
}
