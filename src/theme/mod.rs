//! Embedded theme assets
//!
//! The stylesheet and client scripts ship inside the binary and are written
//! into `public/assets/` on every generation, so a site directory needs no
//! theme checkout.

use anyhow::Result;
use std::fs;
use std::path::Path;

/// An embedded static asset
struct Asset {
    path: &'static str,
    content: &'static str,
}

const ASSETS: &[Asset] = &[
    Asset {
        path: "assets/style.css",
        content: include_str!("assets/style.css"),
    },
    Asset {
        path: "assets/scheme.js",
        content: include_str!("assets/scheme.js"),
    },
    Asset {
        path: "assets/background.js",
        content: include_str!("assets/background.js"),
    },
    Asset {
        path: "assets/feed.js",
        content: include_str!("assets/feed.js"),
    },
];

/// Write all embedded assets under the public directory
pub fn write_assets(public_dir: &Path) -> Result<()> {
    for asset in ASSETS {
        let dest = public_dir.join(asset.path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, asset.content)?;
        tracing::debug!("Wrote asset: {:?}", dest);
    }
    Ok(())
}
