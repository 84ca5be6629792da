//! Integration tests for one-shot browser and server builds.

mod helpers;

use std::fs;

use helpers::{FakeEngine, config, project, write};
use remix_compiler::policy::{EMPTY_BUNDLE, ModuleFormat};
use remix_compiler::{
    AssetManifest, BuildMode, BuildOptions, BuildTarget, BundleRequest, BundleWarning, Compiler,
    Error, Pipeline, PipelineError, StageKind,
};
use remix_config::ConfigError;
use remix_routes::RouteResolutionError;

#[tokio::test]
async fn browser_request_carries_browser_policies() {
    let dir = project();
    let config = config(&dir).await;
    let engine = FakeEngine::new();
    let compiler = Compiler::new(engine.clone());

    compiler
        .build(&config, BuildOptions::browser(BuildMode::Production))
        .await
        .unwrap();

    let requests = engine.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    let names: Vec<_> = request.input.keys().map(String::as_str).collect();
    assert_eq!(names[0], "entry.client");
    assert!(names.contains(&"root"));
    assert!(names.contains(&"routes/index"));
    assert!(names.contains(&"routes/gists"));

    assert!(request.policy.external.is_external("@remix-run/node"));
    assert!(!request.policy.external.is_external("react"));
    assert_eq!(request.policy.naming.format, ModuleFormat::Esm);
    assert!(request.policy.naming.is_hashed());
    assert_eq!(
        request.aliases.rewrite("@remix-run/react"),
        Some("@remix-run/react/browser")
    );
    assert!(request.pipeline.contains(StageKind::Minify));
    assert!(request.minify());
}

#[tokio::test]
async fn server_request_externalizes_packages() {
    let dir = project();
    let config = config(&dir).await;
    let engine = FakeEngine::new();
    let compiler = Compiler::new(engine.clone());

    compiler
        .build(&config, BuildOptions::server(BuildMode::Development))
        .await
        .unwrap();

    let request = &engine.requests()[0];
    assert_eq!(request.input.keys().next().map(String::as_str), Some("entry.server"));
    assert!(request.policy.external.is_external("react"));
    assert!(request.policy.external.is_external("@remix-run/node"));
    assert!(!request.policy.external.is_external("./routes/index"));
    assert_eq!(request.policy.naming.format, ModuleFormat::Cjs);
    assert!(request.aliases.is_empty());
    assert!(!request.pipeline.contains(StageKind::BrowserAlias));
    assert!(!request.minify());
}

#[tokio::test]
async fn missing_entry_fails_before_bundling() {
    let dir = project();
    fs::remove_file(dir.path().join("app/entry.client.tsx")).unwrap();
    let config = config(&dir).await;
    let engine = FakeEngine::new();
    let compiler = Compiler::new(engine.clone());

    let err = compiler
        .build(&config, BuildOptions::browser(BuildMode::Development))
        .await
        .unwrap_err();

    match err {
        Error::EntryMissing { target, searched } => {
            assert_eq!(target, BuildTarget::Browser);
            assert!(!searched.is_empty());
        }
        other => panic!("expected EntryMissing, got {other:?}"),
    }
    assert_eq!(engine.bundle_count(), 0);

    // The server entry is still present.
    compiler
        .build(&config, BuildOptions::server(BuildMode::Development))
        .await
        .unwrap();
    assert_eq!(engine.bundle_count(), 1);
}

#[tokio::test]
async fn bundle_errors_reject_the_build() {
    let dir = project();
    let config = config(&dir).await;
    let compiler = Compiler::new(FakeEngine::failing("Could not resolve './missing'"));

    let err = compiler
        .build(&config, BuildOptions::server(BuildMode::Production))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Bundle(_)));
    assert!(err.to_string().contains("./missing"));
}

#[tokio::test]
async fn writes_browser_and_server_builds_with_manifests() {
    let dir = project();
    let config = config(&dir).await;
    let compiler = Compiler::new(FakeEngine::new());

    let mut browser = compiler
        .build(&config, BuildOptions::browser(BuildMode::Production))
        .await
        .unwrap();
    let mut server = compiler
        .build(&config, BuildOptions::server(BuildMode::Production))
        .await
        .unwrap();

    let browser_report = browser.write_to_output_dir().await.unwrap();
    let server_report = server.write_to_output_dir().await.unwrap();

    let public_build = dir.path().join("public/build");
    let server_build = dir.path().join("build");
    assert!(public_build.join("entry.client-abc123.js").is_file());
    assert!(public_build.join("routes/gists-abc123.js").is_file());
    assert!(server_build.join("entry.server.js").is_file());
    assert!(server_build.join("routes/index.js").is_file());
    assert_eq!(browser_report.files.len(), 4);
    assert_eq!(server_report.files.len(), 4);

    // Both manifests land in the server build directory.
    let asset_manifest = server_build.join("asset-manifest.json");
    let server_manifest = server_build.join("server-manifest.json");
    assert_eq!(browser_report.manifest.as_deref(), Some(asset_manifest.as_path()));
    assert_eq!(server_report.manifest.as_deref(), Some(server_manifest.as_path()));

    let manifest = AssetManifest::read_from(&asset_manifest).unwrap();
    assert_eq!(manifest.len(), 4);
    assert_eq!(manifest.get("routes/gists").unwrap().file, "routes/gists-abc123.js");
    assert_eq!(manifest.get("entry.client").unwrap().file, "entry.client-abc123.js");

    let manifest = AssetManifest::read_from(&server_manifest).unwrap();
    assert_eq!(manifest.get("root").unwrap().file, "root.js");
}

#[tokio::test]
async fn generate_does_not_touch_the_disk() {
    let dir = project();
    let config = config(&dir).await;
    let compiler = Compiler::new(FakeEngine::new());

    let mut build = compiler
        .build(&config, BuildOptions::server(BuildMode::Development))
        .await
        .unwrap();
    let first = build.generate().await.unwrap();
    let second = build.generate().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.entry_chunks().count(), 4);
    assert!(!dir.path().join("build").exists());
}

#[tokio::test]
async fn empty_chunk_warnings_are_dropped_for_the_browser_only() {
    let dir = project();
    let config = config(&dir).await;
    let warnings = vec![
        BundleWarning::new(EMPTY_BUNDLE, "Generated an empty chunk: routes/index"),
        BundleWarning::new("CIRCULAR_DEPENDENCY", "root -> routes/gists -> root"),
    ];
    let compiler = Compiler::new(FakeEngine::new().with_warnings(warnings));

    let mut browser = compiler
        .build(&config, BuildOptions::browser(BuildMode::Development))
        .await
        .unwrap();
    let output = browser.generate().await.unwrap();
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].code, "CIRCULAR_DEPENDENCY");

    let mut server = compiler
        .build(&config, BuildOptions::server(BuildMode::Development))
        .await
        .unwrap();
    assert_eq!(server.generate().await.unwrap().warnings.len(), 2);
}

#[tokio::test]
async fn browser_and_server_builds_run_concurrently() {
    let dir = project();
    let config = config(&dir).await;
    let engine = FakeEngine::new();
    let compiler = Compiler::new(engine.clone());

    let (browser, server) = tokio::join!(
        compiler.build(&config, BuildOptions::browser(BuildMode::Production)),
        compiler.build(&config, BuildOptions::server(BuildMode::Production)),
    );

    assert_eq!(browser.unwrap().target(), BuildTarget::Browser);
    assert_eq!(server.unwrap().target(), BuildTarget::Server);
    assert_eq!(engine.bundle_count(), 2);
}

#[tokio::test]
async fn route_named_like_the_entry_is_rejected() {
    let dir = project();
    write(
        dir.path(),
        "remix.config.toml",
        "[[routes]]\npath = \"client\"\nfile = \"entry.client.tsx\"\n",
    );
    let config = config(&dir).await;
    let engine = FakeEngine::new();
    let compiler = Compiler::new(engine.clone());

    let err = compiler
        .build(&config, BuildOptions::browser(BuildMode::Development))
        .await
        .unwrap_err();
    match err {
        Error::Config(ConfigError::Routes(RouteResolutionError::DuplicateRouteId(id))) => {
            assert_eq!(id, "entry.client");
        }
        other => panic!("expected a duplicate route id, got {other:?}"),
    }
    assert_eq!(engine.bundle_count(), 0);
}

#[tokio::test]
async fn requests_with_a_foreign_pipeline_fail_validation() {
    let dir = project();
    let config = config(&dir).await;
    let options = BuildOptions::browser(BuildMode::Production);

    let request = BundleRequest::assemble(&config, options, None).unwrap();
    request.validate().unwrap();

    // A server pipeline has no browser-alias stage.
    let mut request = request;
    request.pipeline = Pipeline::for_options(BuildOptions::server(BuildMode::Production));
    match request.validate().unwrap_err() {
        Error::InvalidPipeline(PipelineError::Missing { stage, .. }) => {
            assert_eq!(stage, StageKind::BrowserAlias);
        }
        other => panic!("expected an invalid pipeline, got {other:?}"),
    }
}
