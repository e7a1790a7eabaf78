#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Create a `docseek` command isolated from the caller's environment.
pub fn docseek_cmd(site: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docseek"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.current_dir(site);
    for key in [
        "DOCSEEK_CONFIG",
        "DOCSEEK_CONTENT_ROOT",
        "DOCSEEK_OUTPUT_DIR",
        "DOCSEEK_INDEX",
        "DOCSEEK_OUTPUT_FORMAT",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small site with a `docseek.toml` at its root.
#[allow(dead_code)]
pub fn sample_site() -> TempDir {
    let tmp = tempfile::tempdir().expect("failed to create site dir");
    let root = tmp.path();

    write(
        root,
        "docseek.toml",
        "[build]\ncontent_root = \"content\"\noutput_dir = \"out/search\"\n\n[search]\nindex_location = \"out/search/index.json\"\n\n[catalog]\nblog_dir = \"content/blog\"\noutput = \"out/data/blogs.json\"\n",
    );
    write(
        root,
        "content/guide/quantum-routing.mdx",
        "---\ntitle: Quantum Routing\ndescription: Entanglement-based packet forwarding\n---\n# Getting Started\n## Topology\n",
    );
    write(
        root,
        "content/guide/installation.mdx",
        "---\ntitle: Installation\ndescription: Install the toolkit\n---\n# Requirements\n",
    );
    write(
        root,
        "content/blog/scaling.mdx",
        "---\ntitle: Scaling Notes\ncategory: infra\ndate: 2024-04-01\n---\n# Results\n",
    );
    write(
        root,
        "content/blog/hello.mdx",
        "---\ntitle: Hello World\ndescription: First post\ndate: 2023-12-24\n---\n",
    );
    write(root, "content/blog/-draft.mdx", "---\ntitle: Draft\n---\n");
    tmp
}
