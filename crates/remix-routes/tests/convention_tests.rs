//! End-to-end tests for file-system route discovery.

use remix_routes::{RouteResolutionError, flatten, resolve};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates an app directory containing the given (empty) files.
fn app_with(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in files {
        let path = dir.path().join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export default function Route() {}\n").unwrap();
    }
    dir
}

#[test]
fn gists_app_produces_nested_manifest() {
    let app = app_with(&[
        "root.tsx",
        "routes/index.tsx",
        "routes/gists.tsx",
        "routes/gists/$username.tsx",
    ]);

    let tree = resolve(app.path(), &app.path().join("data")).unwrap();
    let manifest = flatten(&tree).unwrap();

    assert_eq!(manifest.len(), 4);

    let username = manifest.get("routes/gists/$username").unwrap();
    assert_eq!(username.path, "gists/:username");
    assert_eq!(username.parent_id.as_deref(), Some("routes/gists"));

    let gists = manifest.get("routes/gists").unwrap();
    assert_eq!(gists.path, "gists");
    assert_eq!(gists.parent_id.as_deref(), Some("root"));

    let index = manifest.get("routes/index").unwrap();
    assert_eq!(index.path, "");
    assert_eq!(index.module_file, Some(PathBuf::from("routes/index.tsx")));

    let root = manifest.root().unwrap();
    assert!(root.parent_id.is_none());
    assert_eq!(root.module_file.as_deref(), Some(Path::new("root.tsx")));
}

#[test]
fn styles_are_attached_to_their_module() {
    let app = app_with(&["root.tsx", "routes/gists.tsx", "routes/gists.css"]);

    let tree = resolve(app.path(), app.path()).unwrap();
    let gists = tree.find("routes/gists").unwrap();
    assert_eq!(gists.styles_file.as_deref(), Some(Path::new("routes/gists.css")));
}

#[test]
fn styles_without_module_fail() {
    let app = app_with(&["root.tsx", "routes/gists.css"]);

    let err = resolve(app.path(), app.path()).unwrap_err();
    match err {
        RouteResolutionError::StylesWithoutModule { id, styles_file } => {
            assert_eq!(id, "routes/gists");
            assert_eq!(styles_file, PathBuf::from("routes/gists.css"));
        }
        other => panic!("expected StylesWithoutModule, got {other:?}"),
    }
}

#[test]
fn unknown_file_type_fails() {
    let app = app_with(&["root.tsx", "routes/index.tsx", "routes/logo.png"]);

    let err = resolve(app.path(), app.path()).unwrap_err();
    assert!(matches!(
        err,
        RouteResolutionError::UnrecognizedFile { ref path } if path == Path::new("routes/logo.png")
    ));
    assert!(err.to_string().contains("routes/logo.png"));
}

#[test]
fn missing_root_module_fails() {
    let app = app_with(&["routes/index.tsx"]);

    let err = resolve(app.path(), app.path()).unwrap_err();
    assert!(matches!(err, RouteResolutionError::MissingRootModule { .. }));
}

#[test]
fn dotted_file_names_nest_in_the_url_only() {
    let app = app_with(&["root.tsx", "routes/about.us.tsx", "routes/docs.index.mdx"]);

    let tree = resolve(app.path(), app.path()).unwrap();
    let about = tree.find("routes/about.us").unwrap();
    assert_eq!(about.path, "about/us");
    assert_eq!(about.parent_id.as_deref(), Some("root"));

    assert_eq!(tree.find("routes/docs.index").unwrap().path, "docs");
}

#[test]
fn loader_files_come_from_the_data_directory() {
    let app = app_with(&["root.tsx", "routes/gists.tsx", "routes/index.tsx"]);
    let data = TempDir::new().unwrap();
    fs::create_dir_all(data.path().join("routes")).unwrap();
    fs::write(data.path().join("global.ts"), "").unwrap();
    fs::write(data.path().join("routes/gists.js"), "").unwrap();

    let tree = resolve(app.path(), data.path()).unwrap();
    assert_eq!(tree.root().loader_file.as_deref(), Some(Path::new("global.ts")));
    assert_eq!(
        tree.find("routes/gists").unwrap().loader_file.as_deref(),
        Some(Path::new("routes/gists.js"))
    );
    assert!(tree.find("routes/index").unwrap().loader_file.is_none());
}

#[test]
fn deep_nesting_follows_longest_prefix() {
    let app = app_with(&[
        "root.tsx",
        "routes/a.tsx",
        "routes/a/b.tsx",
        "routes/a/b/c.tsx",
        "routes/a/x/y.tsx",
    ]);

    let manifest = flatten(&resolve(app.path(), app.path()).unwrap()).unwrap();
    assert_eq!(
        manifest.get("routes/a/b/c").unwrap().parent_id.as_deref(),
        Some("routes/a/b")
    );
    // No `routes/a/x` module, so `y` attaches to the closest existing ancestor.
    assert_eq!(
        manifest.get("routes/a/x/y").unwrap().parent_id.as_deref(),
        Some("routes/a")
    );
    assert_eq!(manifest.get("routes/a/x/y").unwrap().path, "a/x/y");
}

#[test]
fn sibling_sharing_text_prefix_stays_top_level() {
    let app = app_with(&["root.tsx", "routes/foo.tsx", "routes/foo-bar.tsx"]);

    let tree = resolve(app.path(), app.path()).unwrap();
    assert_eq!(tree.top_level().len(), 2);
}

#[test]
fn manifest_round_trips_through_parent_ids() {
    let app = app_with(&[
        "root.tsx",
        "routes/index.tsx",
        "routes/gists.tsx",
        "routes/gists/index.tsx",
        "routes/gists/$username.tsx",
        "routes/about.mdx",
    ]);

    let tree = resolve(app.path(), app.path()).unwrap();
    let rebuilt = flatten(&tree).unwrap().to_tree().unwrap();
    assert_eq!(rebuilt, tree);
}
