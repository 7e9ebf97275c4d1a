//! End-to-end workflows: core services over the real adapters.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pioneer_adapters::{
    FsPackageManager, FsPlatformFactory, IniConfigLoader, LocalFilesystem, LogNotifier,
    MemoryFilesystem,
};
use pioneer_core::{
    domain::{ExampleFile, ExampleRequest},
    prelude::*,
};
use serde_json::json;
use tempfile::TempDir;

/// Stand-in for the build tool: records calls and writes a minimal
/// `platformio.ini` the way `pio project init` would.
#[derive(Default)]
struct FakePio {
    calls: Mutex<Vec<(Vec<String>, SpawnOptions)>>,
}

impl FakePio {
    fn calls(&self) -> Vec<(Vec<String>, SpawnOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CoreRunner for FakePio {
    async fn exec(&self, args: Vec<String>, options: SpawnOptions) -> PioneerResult<ExecOutput> {
        let ini = options.working_dir.join("platformio.ini");
        if !ini.exists() {
            std::fs::write(&ini, "[env:uno]\nplatform = atmelavr\nboard = uno\n").unwrap();
        }
        std::fs::create_dir_all(options.working_dir.join("src")).unwrap();
        std::fs::write(options.working_dir.join("src/main.cpp"), "// sample").unwrap();
        self.calls.lock().unwrap().push((args, options));
        Ok(ExecOutput {
            exit_code: 0,
            stdout: "Project has been successfully initialized!".into(),
            stderr: String::new(),
        })
    }
}

/// Build tool that succeeds without touching the disk.
struct QuietPio;

#[async_trait]
impl CoreRunner for QuietPio {
    async fn exec(&self, _args: Vec<String>, _options: SpawnOptions) -> PioneerResult<ExecOutput> {
        Ok(ExecOutput::default())
    }
}

struct NoFetch;

#[async_trait]
impl ContentFetcher for NoFetch {
    async fn request_content(&self, url: &str) -> PioneerResult<String> {
        Ok(format!("// from {url}"))
    }
}

fn config_service(fallback: &Path) -> ConfigService {
    ConfigService::new(
        Arc::new(IniConfigLoader::new()),
        Arc::new(LocalFilesystem::new()),
        fallback.to_path_buf(),
    )
}

fn scaffold_service(runner: Arc<FakePio>, projects_dir: &Path) -> ScaffoldService {
    scaffold_service_for(runner, projects_dir, None)
}

fn scaffold_service_for(
    runner: Arc<FakePio>,
    projects_dir: &Path,
    caller_id: Option<&str>,
) -> ScaffoldService {
    ScaffoldService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(IniConfigLoader::new()),
        runner,
        Arc::new(NoFetch),
        Arc::new(LogNotifier),
        CallerContext {
            caller_id: caller_id.map(String::from),
            projects_dir: projects_dir.to_path_buf(),
        },
    )
}

fn write(path: &Path, text: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

/// A core dir with `espressif32` 6.1.0, its arduino framework package and
/// one example project.
fn core_dir(root: &Path) -> PathBuf {
    let core = root.join("core");
    let platform = core.join("platforms/espressif32");
    write(
        &platform.join(".piopm"),
        &json!({"type": "platform", "name": "espressif32", "version": "6.1.0",
                "spec": {"owner": "platformio"}})
        .to_string(),
    );
    write(
        &platform.join("platform.json"),
        &json!({"name": "espressif32", "title": "Espressif 32", "version": "6.1.0",
                "frameworks": {
                    "arduino": {"package": "framework-arduinoespressif32"},
                    "espidf": {"package": "framework-espidf"}
                }})
        .to_string(),
    );
    write(
        &platform.join("boards/esp32dev.json"),
        &json!({"name": "Espressif ESP32 Dev Module", "vendor": "Espressif",
                "frameworks": ["arduino", "espidf"],
                "build": {"mcu": "esp32", "f_cpu": "240000000L"},
                "upload": {"maximum_ram_size": 327680, "maximum_size": 4194304}})
        .to_string(),
    );
    write(
        &platform.join("examples/arduino-blink/platformio.ini"),
        "[platformio]\ndescription = Blink the LED\n\n[env:esp32dev]\nboard = esp32dev\n",
    );
    std::fs::create_dir_all(platform.join("examples/not-a-project")).unwrap();

    let framework = core.join("packages/framework-arduinoespressif32");
    write(
        &framework.join(".piopm"),
        &json!({"type": "tool", "name": "framework-arduinoespressif32", "version": "3.20007.0"})
            .to_string(),
    );
    write(
        &framework.join("package.json"),
        &json!({"name": "framework-arduinoespressif32", "title": "Arduino"}).to_string(),
    );
    core
}

// ============================================================================
// Configuration store
// ============================================================================

#[test]
fn dump_then_load_round_trips() {
    let tmp = TempDir::new().unwrap();
    let service = config_service(tmp.path());
    let path = tmp.path().join("platformio.ini");

    let data: ConfigTuple = vec![
        ConfigSection("platformio".into(), vec![("default_envs".into(), "uno".into())]),
        ConfigSection(
            "env:uno".into(),
            vec![
                ("board".into(), "uno".into()),
                (
                    "lib_deps".into(),
                    ConfigValue::Multi(vec!["Servo".into(), "Wire".into()]),
                ),
            ],
        ),
    ];
    service.dump(&path, data.clone()).unwrap();
    assert_eq!(service.load(&path).unwrap(), data);
}

#[test]
fn clearing_description_removes_section() {
    let tmp = TempDir::new().unwrap();
    let service = config_service(tmp.path());
    let path = tmp.path().join("platformio.ini");
    write(&path, "[env:uno]\nboard = uno\n");

    service.set_description(&path, "hello").unwrap();
    assert_eq!(
        service.call(tmp.path(), "get", &[json!("platformio"), json!("description")]).unwrap(),
        json!("hello")
    );

    service.set_description(&path, "").unwrap();
    assert_eq!(
        service.call(tmp.path(), "has_section", &[json!("platformio")]).unwrap(),
        json!(false)
    );
}

#[test]
fn queries_resolve_relative_to_project_dir() {
    let tmp = TempDir::new().unwrap();
    write(
        &tmp.path().join("blink/platformio.ini"),
        "[env]\nframework = arduino\n[env:uno]\nboard = uno\n",
    );
    let service = config_service(tmp.path());

    assert_eq!(service.call(Path::new("blink"), "envs", &[]).unwrap(), json!(["uno"]));
    assert_eq!(
        service
            .call(Path::new("blink"), "get", &[json!("env:uno"), json!("framework")])
            .unwrap(),
        json!("arduino")
    );
    assert!(service.call(Path::new("blink"), "save", &[]).is_err());
}

// ============================================================================
// Project directory aggregator
// ============================================================================

#[test]
fn recent_projects_skip_missing_and_broken() {
    let tmp = TempDir::new().unwrap();
    let core = core_dir(tmp.path());
    let good = tmp.path().join("Projects/blink");
    write(
        &good.join("platformio.ini"),
        "[platformio]\ndescription = Blinky\n\n[env:esp32dev]\nboard = esp32dev\n\n[env:other]\nboard = mystery\n",
    );
    std::fs::create_dir_all(good.join(".pio/libdeps/esp32dev")).unwrap();
    let broken = tmp.path().join("Projects/broken");
    std::fs::create_dir_all(&broken).unwrap();

    let catalog = ProjectCatalog::new(
        Arc::new(IniConfigLoader::new()),
        Arc::new(LocalFilesystem::new()),
        Arc::new(FsPackageManager::new(core)),
    );
    let summaries =
        catalog.recent_projects(&[tmp.path().join("gone"), broken, good.clone()]);

    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.path, good);
    assert_eq!(summary.name, "Projects/blink");
    assert_eq!(summary.description.as_deref(), Some("Blinky"));
    assert_eq!(summary.envs, ["esp32dev", "other"]);
    assert_eq!(summary.boards[0].name, "Espressif ESP32 Dev Module");
    assert_eq!(summary.boards[1].name, "mystery");
    assert_eq!(summary.env_lib_storages.len(), 1);
}

#[test]
fn recent_projects_resolve_builtin_directory_references() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("Projects/weather");
    write(
        &project.join("platformio.ini"),
        "[platformio]\nlibdeps_dir = ${platformio.workspace_dir}/deps\n\n[env:esp32dev]\nboard = esp32dev\n",
    );
    std::fs::create_dir_all(project.join(".pio/deps/esp32dev")).unwrap();

    let catalog = ProjectCatalog::new(
        Arc::new(IniConfigLoader::new()),
        Arc::new(LocalFilesystem::new()),
        Arc::new(FsPackageManager::new(core_dir(tmp.path()))),
    );
    let summaries = catalog.recent_projects(std::slice::from_ref(&project));

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].env_lib_storages.len(), 1);
    assert_eq!(
        summaries[0].env_lib_storages[0].path,
        project.join(".pio/deps/esp32dev")
    );
}

#[test]
fn examples_are_named_below_examples_dir() {
    let tmp = TempDir::new().unwrap();
    let catalog = ProjectCatalog::new(
        Arc::new(IniConfigLoader::new()),
        Arc::new(LocalFilesystem::new()),
        Arc::new(FsPackageManager::new(core_dir(tmp.path()))),
    );

    let groups = catalog.examples().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].platform.title, "Espressif 32");
    let names: Vec<&str> = groups[0].items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["arduino-blink"]);
    assert_eq!(groups[0].items[0].description.as_deref(), Some("Blink the LED"));
}

// ============================================================================
// Scaffolding orchestrator
// ============================================================================

#[tokio::test]
async fn import_arduino_copies_sketch_into_src() {
    let tmp = TempDir::new().unwrap();
    let sketch = tmp.path().join("Blink");
    write(&sketch.join("Blink.ino"), "void setup() {}\nvoid loop() {}\n");
    write(&sketch.join("util.h"), "#pragma once\n");

    let runner = Arc::new(FakePio::default());
    let service = scaffold_service(runner.clone(), &tmp.path().join("Projects"));
    let project_dir = service.import_arduino("uno", true, &sketch).await.unwrap();

    assert!(project_dir.join("src/Blink.ino").is_file());
    assert!(project_dir.join("src/util.h").is_file());
    assert!(!project_dir.join("src/main.cpp").exists());
    assert!(
        project_dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("-uno"))
    );

    let (args, options) = runner.calls().remove(0);
    assert!(args.contains(&"lib_extra_dirs = ~/Documents/Arduino/libraries".to_string()));
    assert!(options.force_subprocess);
}

#[tokio::test]
async fn import_arduino_rejects_non_sketch_without_side_effects() {
    let tmp = TempDir::new().unwrap();
    let folder = tmp.path().join("notes");
    write(&folder.join("readme.txt"), "hi");
    let projects = tmp.path().join("Projects");

    let runner = Arc::new(FakePio::default());
    let err = scaffold_service(runner.clone(), &projects)
        .import_arduino("uno", false, &folder)
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(4000));
    assert!(!projects.exists());
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn import_pio_copies_project_and_announces_ide() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("src_proj");
    write(
        &source.join("platformio.ini"),
        "[env:uno]\nplatform = atmelavr\nboard = uno\n",
    );
    write(&source.join("include/pins.h"), "#define LED 13\n");
    let projects = tmp.path().join("Projects");

    let runner = Arc::new(FakePio::default());
    let project_dir = scaffold_service_for(runner.clone(), &projects, Some("vscode"))
        .import_pio(&source)
        .await
        .unwrap();

    assert_eq!(project_dir.parent(), Some(projects.as_path()));
    assert!(
        project_dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("-src_proj"))
    );
    assert_eq!(
        std::fs::read_to_string(project_dir.join("include/pins.h")).unwrap(),
        "#define LED 13\n"
    );
    assert!(source.join("platformio.ini").is_file());

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    let (args, options) = &calls[0];
    assert_eq!(args, &["init", "--ide", "vscode"]);
    assert_eq!(options.working_dir, project_dir);
    assert!(options.force_subprocess);
}

#[tokio::test]
async fn init_v2_builds_env_from_request() {
    let tmp = TempDir::new().unwrap();
    let runner = Arc::new(FakePio::default());
    let service = scaffold_service(runner.clone(), tmp.path());

    let request = ProjectRequest::builder()
        .location(tmp.path())
        .name("blink")
        .platform("espressif32", "6.1.0")
        .board("esp32dev")
        .framework("arduino")
        .build()
        .unwrap();
    let outcome = service
        .init_v2(&request, &Default::default())
        .await
        .unwrap();

    assert_eq!(outcome.project_dir, tmp.path().join("blink"));
    let (args, options) = runner.calls().remove(0);
    assert_eq!(
        args,
        [
            "project",
            "init",
            "-e",
            "esp32dev",
            "--sample-code",
            "-O",
            "platform=espressif32 @ ^6.1.0",
            "-O",
            "board=esp32dev",
            "-O",
            "framework=arduino",
        ]
    );
    assert_eq!(options.color, ColorMode::Off);
    assert!(!options.force_subprocess);
}

// ============================================================================
// Environment descriptor builder
// ============================================================================

#[test]
fn describe_resolves_installed_packages() {
    let tmp = TempDir::new().unwrap();
    let core = core_dir(tmp.path());
    let project = tmp.path().join("blink");
    write(
        &project.join("platformio.ini"),
        "[env:esp32dev]\nplatform = platformio/espressif32 @ ^6.0.0\nboard = esp32dev\nframework = arduino, espidf, zephyr\n",
    );

    let loader: Arc<dyn ConfigLoader> = Arc::new(IniConfigLoader::new());
    let packages = FsPackageManager::new(core);
    let service = EnvironmentService::new(
        loader.clone(),
        Arc::new(LocalFilesystem::new()),
        Arc::new(FsPlatformFactory::new(loader, packages.clone())),
        Arc::new(packages),
    );

    let descriptor = service.describe(&project, "esp32dev").unwrap();
    assert_eq!(descriptor.platform.name, "espressif32");
    assert_eq!(descriptor.platform.version, "6.1.0");
    assert_eq!(descriptor.platform.ownername.as_deref(), Some("platformio"));

    let board = descriptor.board.unwrap();
    assert_eq!(board.mcu.as_deref(), Some("ESP32"));
    assert_eq!(board.fcpu, Some(240_000_000));

    let frameworks = descriptor.frameworks.unwrap();
    assert_eq!(frameworks.len(), 1);
    assert_eq!(frameworks[0].name, "arduino");
    assert_eq!(frameworks[0].title.as_deref(), Some("Arduino"));
    assert_eq!(frameworks[0].version, "3.20007.0");
}

#[test]
fn describe_outside_project_is_coded() {
    let tmp = TempDir::new().unwrap();
    let loader: Arc<dyn ConfigLoader> = Arc::new(IniConfigLoader::new());
    let packages = FsPackageManager::new(tmp.path());
    let service = EnvironmentService::new(
        loader.clone(),
        Arc::new(LocalFilesystem::new()),
        Arc::new(FsPlatformFactory::new(loader, packages.clone())),
        Arc::new(packages),
    );

    let err = service.describe(tmp.path(), "uno").unwrap_err();
    assert_eq!(err.code(), Some(4002));
}

#[tokio::test]
async fn init_v2_materializes_example_files() {
    let fs = MemoryFilesystem::new();
    let service = ScaffoldService::new(
        Arc::new(fs.clone()),
        Arc::new(IniConfigLoader::new()),
        Arc::new(QuietPio),
        Arc::new(NoFetch),
        Arc::new(LogNotifier),
        CallerContext {
            caller_id: None,
            projects_dir: "/projects".into(),
        },
    );
    let request = ProjectRequest::builder()
        .location("/work")
        .name("blink")
        .platform("atmelavr", "4.2.0")
        .example(ExampleRequest {
            name: "Blink".into(),
            files: vec![ExampleFile {
                path: "src/main.cpp".into(),
                url: "https://example.invalid/main.cpp".into(),
            }],
        })
        .build()
        .unwrap();

    let outcome = service
        .init_v2(&request, &InitOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.project_dir, PathBuf::from("/work/blink"));
    assert_eq!(fs.list_files(), [PathBuf::from("/work/blink/src/main.cpp")]);
    assert_eq!(
        fs.read_file(Path::new("/work/blink/src/main.cpp")).as_deref(),
        Some("// from https://example.invalid/main.cpp")
    );
}
