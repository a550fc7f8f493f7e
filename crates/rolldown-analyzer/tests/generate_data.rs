//! End-to-end tests: JSONL log + meta.json on disk in, analysis document out.

use insta::assert_json_snapshot;
use rolldown_analyzer::{
    Error, GenerateDataOptions, PackageType, PluginCall, StaticManifests, generate_data,
    generate_data_with,
};
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

const FOO: &str = "/proj/node_modules/foo/index.js";

fn write_session(dir: &Path, meta: &Value, events: &[Value], trailer: &str) -> GenerateDataOptions {
    let meta_path = dir.join("meta.json");
    let logs_path = dir.join("logs.json");
    std::fs::write(&meta_path, meta.to_string()).unwrap();

    let mut log = String::new();
    for event in events {
        log.push_str(&event.to_string());
        log.push('\n');
    }
    log.push_str(trailer);
    std::fs::write(&logs_path, log).unwrap();

    GenerateDataOptions::new(logs_path, meta_path)
}

fn hook(action: &str, call_id: u64, ts: u64, payload: Value) -> Value {
    let mut event = json!({
        "action": action,
        "call_id": call_id,
        "plugin_id": 0,
        "plugin_name": "builtin:test",
        "timestamp": ts.to_string(),
    });
    let fields = event.as_object_mut().unwrap();
    for (key, value) in payload.as_object().unwrap() {
        fields.insert(key.clone(), value.clone());
    }
    event
}

/// One entry chunk holding one node_modules module, with a full hook trace.
fn single_package_build(importers: &[&str]) -> Vec<Value> {
    vec![
        json!({"action": "BuildStart", "timestamp": "0"}),
        hook(
            "HookResolveIdCallStart",
            1,
            1,
            json!({"module_request": "foo", "importer": "/proj/src/main.js", "import_kind": "import-statement"}),
        ),
        hook("HookResolveIdCallEnd", 1, 3, json!({"resolved_id": FOO})),
        hook("HookLoadCallStart", 2, 4, json!({"module_id": FOO})),
        hook("HookLoadCallEnd", 2, 6, json!({"module_id": FOO, "content": "export default 1\n"})),
        json!({"action": "StringRef", "id": "src-1", "content": "export default 1\n"}),
        hook("HookTransformCallStart", 3, 7, json!({"module_id": FOO, "content": "$ref:src-1"})),
        hook(
            "HookTransformCallEnd",
            3,
            10,
            json!({"module_id": FOO, "content": "export default 1;\nexport const x = 2;\n"}),
        ),
        json!({"action": "ModuleGraphReady", "modules": [
            {"id": FOO, "is_external": false, "imports": [], "importers": importers}
        ]}),
        json!({"action": "ChunkGraphReady", "chunks": [
            {"chunk_id": 0, "name": null, "modules": [FOO], "is_user_defined_entry": true, "imports": []}
        ]}),
        json!({"action": "AssetsReady", "assets": [
            {"filename": "main.js", "chunk_id": 0, "size": 40}
        ]}),
        json!({"action": "BuildEnd", "timestamp": "100"}),
    ]
}

fn project_meta() -> Value {
    json!({
        "cwd": "/proj",
        "plugins": [
            {"plugin_id": 0, "name": "builtin:test"},
            {"plugin_id": 1, "name": "vite:unused"}
        ],
        "platform": "browser"
    })
}

#[test]
fn test_single_module_build_end_to_end() {
    let temp = TempDir::new().unwrap();
    let options = write_session(temp.path(), &project_meta(), &single_package_build(&[]), "");
    let manifests = StaticManifests::new().with_version("/proj/node_modules/foo", "1.2.3");

    let data = generate_data_with(&options, &manifests).unwrap();

    assert_eq!(data.build_duration, 100);
    assert_eq!(data.modules.len(), 1);
    assert_eq!(data.chunks.len(), 1);
    assert!(data.chunks[0].is_initial);
    assert_eq!(data.chunks[0].name, "[foo]");

    let metrics = &data.modules[0].build_metrics;
    assert_eq!(metrics.resolve_ids.len(), 1);
    assert_eq!(metrics.loads.len(), 1);
    assert_eq!(metrics.transforms.len(), 1);
    assert_eq!(metrics.resolve_ids[0].call.duration, 2);

    let transform = &metrics.transforms[0];
    assert_eq!(transform.content_from.as_deref(), Some("export default 1\n"));
    assert_eq!((transform.diff_added, transform.diff_removed), (2, 1));
    assert_eq!(transform.transformed_code_size, 38);

    assert_eq!(data.packages.len(), 1);
    assert_eq!(data.packages[0].name, "foo");
    assert_eq!(data.packages[0].kind, PackageType::Transitive);

    assert_eq!(data.meta.get("platform"), Some(&json!("browser")));
    assert_eq!(data.plugin_build_metrics.len(), 2);
    assert!(data.plugin_build_metrics[&1].calls.is_empty());
    assert!(matches!(
        data.plugin_build_metrics[&0].calls[2],
        PluginCall::Transform { unchanged: false, .. }
    ));

    assert_json_snapshot!(data.packages, @r#"
    [
      {
        "name": "foo",
        "version": "1.2.3",
        "dir": "/proj/node_modules/foo",
        "type": "transitive",
        "transformedCodeSize": 38,
        "files": [
          {
            "path": "/proj/node_modules/foo/index.js",
            "transformedCodeSize": 38,
            "importers": []
          }
        ],
        "duplicated": false
      }
    ]
    "#);
}

#[test]
fn test_importer_inside_project_makes_package_direct() {
    let temp = TempDir::new().unwrap();
    let events = single_package_build(&["/proj/src/main.js"]);
    let options = write_session(temp.path(), &project_meta(), &events, "");

    let data = generate_data_with(&options, &StaticManifests::new()).unwrap();
    assert_eq!(data.packages[0].kind, PackageType::Direct);
    assert_eq!(data.packages[0].version, "");
}

#[test]
fn test_truncated_trailing_line_is_ignored() {
    let temp = TempDir::new().unwrap();
    let options = write_session(
        temp.path(),
        &project_meta(),
        &single_package_build(&[]),
        "\n\n{\"action\":\"HookTransformCallEnd\",\"call_",
    );

    let data = generate_data_with(&options, &StaticManifests::new()).unwrap();
    assert_eq!(data.build_duration, 100);
    assert_eq!(data.modules.len(), 1);
}

#[test]
fn test_strict_mode_reports_integrity_problems() {
    let temp = TempDir::new().unwrap();
    let events = vec![
        json!({"action": "BuildStart", "timestamp": 0}),
        hook("HookLoadCallEnd", 42, 5, json!({"module_id": "/proj/src/a.js", "content": "x"})),
        json!({"action": "BuildEnd", "timestamp": 9}),
    ];
    let options = write_session(temp.path(), &project_meta(), &events, "not json\n");

    // Tolerant by default.
    assert!(generate_data_with(&options, &StaticManifests::new()).is_ok());

    let err = generate_data_with(&options.clone().strict(true), &StaticManifests::new()).unwrap_err();
    let Error::Integrity(message) = err else {
        panic!("expected an integrity error, got {err:?}");
    };
    assert!(message.contains("1 malformed lines"));
    assert!(message.contains("1 hook end events without a start"));
}

#[test]
fn test_missing_meta_is_fatal() {
    let temp = TempDir::new().unwrap();
    let logs_path = temp.path().join("logs.json");
    std::fs::write(&logs_path, "").unwrap();

    let options = GenerateDataOptions::new(&logs_path, temp.path().join("meta.json"));
    let err = generate_data(&options).unwrap_err();
    assert!(matches!(err, Error::MetaNotFound(_)));
    assert!(err.to_string().contains("meta.json"));
}

#[test]
fn test_missing_log_is_fatal() {
    let temp = TempDir::new().unwrap();
    let meta_path = temp.path().join("meta.json");
    std::fs::write(&meta_path, "{}").unwrap();

    let options = GenerateDataOptions::new(temp.path().join("logs.json"), &meta_path);
    let err = generate_data(&options).unwrap_err();
    assert!(matches!(err, Error::LogUnreadable { .. }));
}

#[test]
fn test_versions_are_read_from_package_json() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().to_string_lossy().into_owned();
    let package_dir = temp.path().join("node_modules").join("bar");
    std::fs::create_dir_all(&package_dir).unwrap();
    std::fs::write(
        package_dir.join("package.json"),
        r#"{"name":"bar","version":"4.5.6"}"#,
    )
    .unwrap();

    let module = format!("{root}/node_modules/bar/lib.js");
    let events = vec![
        hook("HookTransformCallStart", 1, 1, json!({"module_id": module, "content": "a"})),
        hook("HookTransformCallEnd", 1, 2, json!({"module_id": module, "content": "ab"})),
        json!({"action": "ChunkGraphReady", "chunks": [
            {"chunk_id": "main", "modules": [module], "is_user_defined_entry": true}
        ]}),
    ];
    let options = write_session(temp.path(), &json!({"cwd": root}), &events, "");

    let data = generate_data(&options).unwrap();
    assert_eq!(data.packages.len(), 1);
    assert_eq!(data.packages[0].version, "4.5.6");
    assert_eq!(data.packages[0].transformed_code_size, 2);
}

#[test]
fn test_document_top_level_fields() {
    let temp = TempDir::new().unwrap();
    let options = write_session(temp.path(), &project_meta(), &single_package_build(&[]), "");
    let data = generate_data_with(&options, &StaticManifests::new()).unwrap();

    let value: Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["meta", "modules", "build_duration", "assets", "chunks", "packages", "plugin_build_metrics"]
    );

    assert_eq!(value["assets"][0]["filename"], "main.js");
    assert_eq!(value["assets"][0]["chunk"]["name"], "[foo]");
    assert_eq!(value["chunks"][0]["asset"]["filename"], "main.js");
    assert_eq!(value["modules"][0]["build_metrics"]["transforms"][0]["type"], "transform");
    assert_eq!(value["plugin_build_metrics"]["0"]["transformMetrics"][0]["module"], FOO);
}

#[test]
fn test_unexpected_meta_shapes_do_not_abort() {
    for meta in [
        json!({"plugins": null}),
        json!({"plugins": [{"name": "x"}]}),
        json!({"cwd": 1}),
    ] {
        let temp = TempDir::new().unwrap();
        let options = write_session(temp.path(), &meta, &single_package_build(&["/proj/src/a.js"]), "");

        let data = generate_data_with(&options, &StaticManifests::new())
            .unwrap_or_else(|err| panic!("{meta}: {err}"));
        assert_eq!(data.build_duration, 100);
        assert_eq!(data.packages[0].kind, PackageType::Transitive);
        assert_eq!(data.plugin_build_metrics.len(), 1);
        assert_eq!(serde_json::to_value(&data.meta).unwrap(), meta);
    }
}
