#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::{docseek_cmd, sample_site};
use predicates::prelude::*;
use serde_json::Value;
use std::fs;

#[test]
fn catalog_writes_posts_newest_first() {
    let site = sample_site();

    docseek_cmd(site.path())
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 posts"))
        .stdout(predicate::str::contains("infra: 1"));

    let text = fs::read_to_string(site.path().join("out/data/blogs.json")).unwrap();
    let posts: Value = serde_json::from_str(&text).unwrap();
    let posts = posts.as_array().unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["title"], "Scaling Notes");
    assert_eq!(posts[0]["link"], "/docs/blog/scaling");
    assert_eq!(posts[1]["title"], "Hello World");
    assert_eq!(posts[1]["abstract"], "First post");
}

#[test]
fn catalog_output_flag_overrides_config() {
    let site = sample_site();
    let output = site.path().join("elsewhere/posts.json");

    docseek_cmd(site.path())
        .args(["catalog", "--output"])
        .arg(&output)
        .assert()
        .success();

    assert!(output.exists());
}

#[test]
fn catalog_missing_blog_dir_fails() {
    let site = sample_site();

    docseek_cmd(site.path())
        .args(["catalog", "--blog-dir", "no/such/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read posts"));
}
