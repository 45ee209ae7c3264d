//! Initialize a new quill site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("source/_posts"))?;
    fs::create_dir_all(target_dir.join("source/about"))?;

    let config_content = r#"# quill configuration

blog:
  title: My Notes
  description: Notes on things I build and learn.
  # light, dark or system
  scheme: system

profile:
  name: Jane Doe
  role: Software Engineer
  bio: I write about software and the occasional side project.
  image: ''
  email: jane@example.com
  # usernames, not full URLs
  github: janedoe
  linkedin: ''
  instagram: ''

projects: []
#  - name: quill
#    href: https://github.com/janedoe/quill

# URL
url: https://example.com
root: /
since: 2024

# Directory
source_dir: source
public_dir: public
tag_dir: tags

# Writing
render_drafts: false

# Code highlighting
highlight:
  theme: base16-ocean.dark
  line_number: false

# Pagination
per_page: 12
"#;

    fs::write(target_dir.join("config.yml"), config_content)?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
tags: [meta]
---

Welcome to your new site. This file lives in `source/_posts`; every
markdown file there becomes a post in the feed.

## Writing

Create another post with:

```bash
$ quill new "My New Post"
```

Front matter controls how a post appears. `tags` feed the tag filter,
`summary` overrides the derived excerpt, and `status: PublicOnDetail`
keeps a post reachable by URL but out of the feed.

## Previewing

```bash
$ quill server
```

The server rebuilds on save and reloads your browser.
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("source/_posts/hello-world.md"), sample_post)?;

    let about_page = r#"---
title: About
layout: about
---

A few words about who you are and what you work on.
"#;

    fs::write(target_dir.join("source/about/index.md"), about_page)?;

    Ok(())
}
