//! Create a new post or page

use anyhow::Result;
use std::fs;

use crate::Quill;

/// Create a new note under the source directory
///
/// Posts land in `source/_posts/<slug>.md`; pages get their own directory
/// with an `index.md` so they render at `/<slug>/`.
pub fn create_note(app: &Quill, title: &str, layout: &str) -> Result<()> {
    let now = chrono::Local::now();
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} produces an empty slug", title);
    }

    let file_path = match layout {
        "page" => {
            let dir = app.source_dir.join(&slug);
            fs::create_dir_all(&dir)?;
            dir.join("index.md")
        }
        "post" => {
            let dir = app.source_dir.join("_posts");
            fs::create_dir_all(&dir)?;
            dir.join(format!("{}.md", slug))
        }
        other => anyhow::bail!("Unknown layout: {}. Available: post, page", other),
    };

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: {}\ndate: {}\ntags:\n---\n",
        title,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app() -> (TempDir, Quill) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("source")).unwrap();
        let app = Quill::new(dir.path()).unwrap();
        (dir, app)
    }

    #[test]
    fn test_create_post() {
        let (dir, app) = app();
        create_note(&app, "My First Note", "post").unwrap();

        let path = dir.path().join("source/_posts/my-first-note.md");
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("title: My First Note"));
    }

    #[test]
    fn test_create_page_gets_own_directory() {
        let (dir, app) = app();
        create_note(&app, "Projects", "page").unwrap();
        assert!(dir.path().join("source/projects/index.md").exists());
    }

    #[test]
    fn test_duplicate_rejected() {
        let (_dir, app) = app();
        create_note(&app, "Twice", "post").unwrap();
        assert!(create_note(&app, "Twice", "post").is_err());
    }

    #[test]
    fn test_unknown_layout_rejected() {
        let (_dir, app) = app();
        assert!(create_note(&app, "X", "draft").is_err());
    }
}
