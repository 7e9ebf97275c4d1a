//! Scaffold Service - creates and imports projects.
//!
//! Every operation follows the same sequence:
//! 1. Create the target directory
//! 2. Build the build tool's argument list
//! 3. Delegate generation to the build tool
//! 4. Post-process (imports only)
//!
//! A build tool failure leaves whatever was created on disk in place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{
            ConfigLoader, ContentFetcher, CoreRunner, ExecOutput, Filesystem, Notification,
            Notifier, SpawnOptions,
        },
    },
    domain::{
        DomainValidator as validator, ExampleRequest, LoadMode, ProjectRequest, SourceKind,
        base_name,
        capabilities::ide_args,
        value_objects::{
            ARDUINO_LIBRARIES_DIR, CONFIG_FILE_NAME, DEFAULT_SRC_DIR, ROOT_SECTION,
            SKETCH_EXTENSIONS,
        },
    },
    error::PioneerResult,
};

/// Message pushed to the front end before example files are downloaded.
pub const COPYING_EXAMPLE_MESSAGE: &str = "Copying example files...\n";

/// Who is calling, and where imported projects go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    /// Identifier the front end announced, e.g. `vscode`.
    pub caller_id: Option<String>,
    /// Parent directory for imported projects.
    pub projects_dir: PathBuf,
}

/// Per-call options of [`ScaffoldService::init_v2`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions {
    /// Notification method the front end listens on for tool output.
    pub stdout_notification_method: Option<String>,
}

/// Result of [`ScaffoldService::init_v2`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldOutcome {
    pub project_dir: PathBuf,
    pub output: ExecOutput,
}

/// Project creation and import orchestrator.
pub struct ScaffoldService {
    filesystem: Arc<dyn Filesystem>,
    loader: Arc<dyn ConfigLoader>,
    runner: Arc<dyn CoreRunner>,
    fetcher: Arc<dyn ContentFetcher>,
    notifier: Arc<dyn Notifier>,
    caller: CallerContext,
}

impl ScaffoldService {
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        loader: Arc<dyn ConfigLoader>,
        runner: Arc<dyn CoreRunner>,
        fetcher: Arc<dyn ContentFetcher>,
        notifier: Arc<dyn Notifier>,
        caller: CallerContext,
    ) -> Self {
        Self {
            filesystem,
            loader,
            runner,
            fetcher,
            notifier,
            caller,
        }
    }

    /// Initialise a project for `board` in `project_dir`.
    #[instrument(skip(self), fields(project_dir = %project_dir.display()))]
    pub async fn init(
        &self,
        board: &str,
        framework: Option<&str>,
        project_dir: &Path,
    ) -> PioneerResult<PathBuf> {
        self.ensure_dir(project_dir)?;

        let mut args = strings(&["init", "--board", board, "--sample-code"]);
        if let Some(framework) = framework.filter(|f| !f.is_empty()) {
            args.push("--project-option".into());
            args.push(format!("framework = {framework}"));
        }
        args.extend(self.ide_args());

        self.runner
            .exec(args, SpawnOptions::subprocess(project_dir))
            .await?;
        info!("Project initialised");
        Ok(project_dir.to_path_buf())
    }

    /// Import an Arduino sketch folder as a new project under the projects
    /// directory.
    ///
    /// A folder that already is a project is returned untouched.
    #[instrument(skip(self), fields(sketch_dir = %sketch_dir.display()))]
    pub async fn import_arduino(
        &self,
        board: &str,
        use_arduino_libs: bool,
        sketch_dir: &Path,
    ) -> PioneerResult<PathBuf> {
        if self.is_project(sketch_dir) {
            info!("Already a project, nothing to import");
            return Ok(sketch_dir.to_path_buf());
        }
        if !self.is_sketch(sketch_dir) {
            return Err(ApplicationError::InvalidSourceProject {
                kind: SourceKind::Arduino,
                path: sketch_dir.to_path_buf(),
            }
            .into());
        }

        let project_dir = self
            .caller
            .projects_dir
            .join(format!("{}{board}", timestamp_prefix()));
        self.ensure_dir(&project_dir)?;

        let mut args = strings(&[
            "init",
            "--board",
            board,
            "--project-option",
            "framework = arduino",
        ]);
        if use_arduino_libs {
            args.push("--project-option".into());
            args.push(format!("lib_extra_dirs = {ARDUINO_LIBRARIES_DIR}"));
        }
        args.extend(self.ide_args());

        self.runner
            .exec(args, SpawnOptions::subprocess(&project_dir))
            .await?;

        let src_dir = self.src_dir(&project_dir)?;
        if self.filesystem.is_dir(&src_dir) {
            self.filesystem.remove_dir_all(&src_dir)?;
        }
        self.filesystem.copy_tree(sketch_dir, &src_dir)?;

        info!(project_dir = %project_dir.display(), "Arduino sketch imported");
        Ok(project_dir)
    }

    /// Copy an existing project into the projects directory and re-initialise
    /// the copy.
    #[instrument(skip(self), fields(source = %source_dir.display()))]
    pub async fn import_pio(&self, source_dir: &Path) -> PioneerResult<PathBuf> {
        if source_dir.as_os_str().is_empty() || !self.is_project(source_dir) {
            return Err(ApplicationError::InvalidSourceProject {
                kind: SourceKind::PlatformIO,
                path: source_dir.to_path_buf(),
            }
            .into());
        }

        let project_dir = self.caller.projects_dir.join(format!(
            "{}{}",
            timestamp_prefix(),
            base_name(source_dir)
        ));
        self.filesystem.copy_tree(source_dir, &project_dir)?;

        let mut args = strings(&["init"]);
        args.extend(self.ide_args());
        self.runner
            .exec(args, SpawnOptions::subprocess(&project_dir))
            .await?;

        info!(project_dir = %project_dir.display(), "Project imported");
        Ok(project_dir)
    }

    /// Create `location/name` from a structured request.
    ///
    /// With an example the files are downloaded and the tool runs a bare
    /// `project init`. Otherwise one environment is generated from the
    /// request's platform, board and framework.
    #[instrument(skip_all, fields(location = %request.location.display(), name = %request.name))]
    pub async fn init_v2(
        &self,
        request: &ProjectRequest,
        options: &InitOptions,
    ) -> PioneerResult<ScaffoldOutcome> {
        validator::validate_request(request)?;

        let project_dir = request.project_dir();
        self.ensure_dir(&project_dir)?;

        let mut args = strings(&["project", "init"]);
        args.extend(self.ide_args());

        match &request.example {
            Some(example) => {
                self.notifier.notify(&Notification {
                    method: options.stdout_notification_method.clone(),
                    message: COPYING_EXAMPLE_MESSAGE.to_string(),
                });
                self.materialize_example(example, &project_dir).await?;
            }
            None => args.extend(empty_project_args(request)),
        }

        let spawn = SpawnOptions::dispatched(&project_dir, process_env());
        let output = self.runner.exec(args, spawn).await?;

        info!(project_dir = %project_dir.display(), "Project created");
        Ok(ScaffoldOutcome {
            project_dir,
            output,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn ide_args(&self) -> Vec<String> {
        ide_args(self.caller.caller_id.as_deref())
    }

    fn ensure_dir(&self, dir: &Path) -> PioneerResult<()> {
        if !self.filesystem.is_dir(dir) {
            debug!(dir = %dir.display(), "Creating directory");
            self.filesystem.create_dir_all(dir)?;
        }
        Ok(())
    }

    fn is_project(&self, dir: &Path) -> bool {
        self.filesystem.is_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// A sketch folder holds `<folder>.ino` or `<folder>.pde`.
    fn is_sketch(&self, dir: &Path) -> bool {
        let base = base_name(dir);
        SKETCH_EXTENSIONS
            .iter()
            .any(|ext| self.filesystem.is_file(&dir.join(format!("{base}.{ext}"))))
    }

    /// The project's `src_dir`, anchored at `project_dir`.
    fn src_dir(&self, project_dir: &Path) -> PioneerResult<PathBuf> {
        let config = self
            .loader
            .open(&project_dir.join(CONFIG_FILE_NAME), LoadMode::Full)?;
        let src_dir = config
            .get_string(ROOT_SECTION, "src_dir")?
            .unwrap_or_else(|| DEFAULT_SRC_DIR.to_string());
        Ok(project_dir.join(src_dir))
    }

    async fn materialize_example(
        &self,
        example: &ExampleRequest,
        project_dir: &Path,
    ) -> PioneerResult<()> {
        for file in &example.files {
            let target = file.relative_path()?.under(project_dir);
            if let Some(parent) = target.parent() {
                self.ensure_dir(parent)?;
            }
            let content = self.fetcher.request_content(&file.url).await?;
            self.filesystem.write_file(&target, &content)?;
            debug!(file = %target.display(), "Example file written");
        }
        Ok(())
    }
}

/// `-e <env> --sample-code -O name=value...` for a project without example.
fn empty_project_args(request: &ProjectRequest) -> Vec<String> {
    let mut args = strings(&["-e", request.env_name(), "--sample-code"]);
    for (name, value) in request.project_options() {
        args.push("-O".into());
        args.push(format!("{name}={value}"));
    }
    args
}

/// `yymmdd-HHMMSS-` in local time.
fn timestamp_prefix() -> String {
    chrono::Local::now().format("%y%m%d-%H%M%S-").to_string()
}

/// The current process environment, skipping entries that are not UTF-8.
fn process_env() -> BTreeMap<String, String> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ColorMode;
    use crate::application::ports::output::{
        MockConfigLoader, MockContentFetcher, MockCoreRunner, MockFilesystem, MockNotifier,
        MockProjectConfig,
    };
    use crate::domain::ExampleFile;
    use crate::error::PioneerError;
    use mockall::predicate::eq;

    struct Mocks {
        fs: MockFilesystem,
        loader: MockConfigLoader,
        runner: MockCoreRunner,
        fetcher: MockContentFetcher,
        notifier: MockNotifier,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                fs: MockFilesystem::new(),
                loader: MockConfigLoader::new(),
                runner: MockCoreRunner::new(),
                fetcher: MockContentFetcher::new(),
                notifier: MockNotifier::new(),
            }
        }

        fn service(self, caller_id: Option<&str>) -> ScaffoldService {
            ScaffoldService::new(
                Arc::new(self.fs),
                Arc::new(self.loader),
                Arc::new(self.runner),
                Arc::new(self.fetcher),
                Arc::new(self.notifier),
                CallerContext {
                    caller_id: caller_id.map(String::from),
                    projects_dir: "/home/dev/Projects".into(),
                },
            )
        }
    }

    fn request() -> ProjectRequest {
        ProjectRequest::builder()
            .location("/work")
            .name("blink")
            .platform("atmelavr", "4.2.0")
            .board("uno")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn init_v2_generates_one_environment() {
        let mut m = Mocks::new();
        m.fs.expect_is_dir().return_const(true);
        m.notifier.expect_notify().never();
        m.runner
            .expect_exec()
            .withf(|args, opts| {
                args == &[
                    "project",
                    "init",
                    "-e",
                    "uno",
                    "--sample-code",
                    "-O",
                    "platform=atmelavr @ ^4.2.0",
                    "-O",
                    "board=uno",
                ] && opts.working_dir == Path::new("/work/blink")
                    && opts.color == ColorMode::Off
                    && !opts.force_subprocess
            })
            .times(1)
            .returning(|_, _| {
                Ok(ExecOutput {
                    stdout: "done".into(),
                    ..ExecOutput::default()
                })
            });

        let outcome = m
            .service(None)
            .init_v2(&request(), &InitOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.project_dir, PathBuf::from("/work/blink"));
        assert_eq!(outcome.output.stdout, "done");
    }

    #[tokio::test]
    async fn init_v2_pins_prerelease_exactly() {
        let mut m = Mocks::new();
        m.fs.expect_is_dir().return_const(false);
        m.fs.expect_create_dir_all()
            .with(eq(PathBuf::from("/work/native")))
            .times(1)
            .returning(|_| Ok(()));
        m.runner
            .expect_exec()
            .withf(|args, _| args.contains(&"platform=native @ 6.1.0-rc1".to_string()))
            .times(1)
            .returning(|_, _| Ok(ExecOutput::default()));

        let request = ProjectRequest::builder()
            .location("/work")
            .name("native")
            .platform("native", "6.1.0-rc1")
            .build()
            .unwrap();
        m.service(None)
            .init_v2(&request, &InitOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn init_v2_with_example_downloads_files_and_runs_bare_init() {
        let mut m = Mocks::new();
        m.fs.expect_is_dir().return_const(true);
        m.notifier
            .expect_notify()
            .withf(|n| {
                n.method.as_deref() == Some("pioneer.stdout") && n.message == COPYING_EXAMPLE_MESSAGE
            })
            .times(1)
            .return_const(());
        m.fetcher
            .expect_request_content()
            .with(eq("https://example.com/main.cpp"))
            .returning(|_| Ok("int main() {}".into()));
        m.fs.expect_write_file()
            .with(
                eq(PathBuf::from("/work/blink/src/main.cpp")),
                eq("int main() {}"),
            )
            .times(1)
            .returning(|_, _| Ok(()));
        m.runner
            .expect_exec()
            .withf(|args, _| args == &["project", "init", "--ide", "vscode"])
            .times(1)
            .returning(|_, _| Ok(ExecOutput::default()));

        let mut request = request();
        request.example = Some(ExampleRequest {
            name: "blink".into(),
            files: vec![ExampleFile {
                path: "src/main.cpp".into(),
                url: "https://example.com/main.cpp".into(),
            }],
        });
        let options = InitOptions {
            stdout_notification_method: Some("pioneer.stdout".into()),
        };
        m.service(Some("vscode"))
            .init_v2(&request, &options)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn init_appends_framework_and_ide() {
        let mut m = Mocks::new();
        m.fs.expect_is_dir().return_const(true);
        m.runner
            .expect_exec()
            .withf(|args, opts| {
                args == &[
                    "init",
                    "--board",
                    "uno",
                    "--sample-code",
                    "--project-option",
                    "framework = arduino",
                    "--ide",
                    "clion",
                ] && opts.force_subprocess
            })
            .times(1)
            .returning(|_, _| Ok(ExecOutput::default()));

        let dir = m
            .service(Some("clion"))
            .init("uno", Some("arduino"), Path::new("/work/p"))
            .await
            .unwrap();
        assert_eq!(dir, PathBuf::from("/work/p"));
    }

    #[tokio::test]
    async fn import_arduino_on_a_project_is_a_no_op() {
        let mut m = Mocks::new();
        m.fs.expect_is_file()
            .with(eq(PathBuf::from("/src/blink/platformio.ini")))
            .return_const(true);
        m.fs.expect_create_dir_all().never();
        m.runner.expect_exec().never();

        let dir = m
            .service(None)
            .import_arduino("uno", false, Path::new("/src/blink"))
            .await
            .unwrap();
        assert_eq!(dir, PathBuf::from("/src/blink"));
    }

    #[tokio::test]
    async fn import_arduino_rejects_non_sketch_and_creates_nothing() {
        let mut m = Mocks::new();
        m.fs.expect_is_file().return_const(false);
        m.fs.expect_create_dir_all().never();
        m.runner.expect_exec().never();

        let err = m
            .service(None)
            .import_arduino("uno", false, Path::new("/src/notes"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(4000));
    }

    #[tokio::test]
    async fn import_arduino_replaces_src_with_sketch() {
        let mut m = Mocks::new();
        m.fs.expect_is_file()
            .returning(|p| p == Path::new("/src/blink/blink.ino"));
        m.fs.expect_is_dir().returning(|p| p.ends_with("src"));
        m.fs.expect_create_dir_all().times(1).returning(|_| Ok(()));
        m.runner
            .expect_exec()
            .withf(|args, _| {
                args.ends_with(&[
                    "--project-option".to_string(),
                    "lib_extra_dirs = ~/Documents/Arduino/libraries".to_string(),
                ])
            })
            .times(1)
            .returning(|_, _| Ok(ExecOutput::default()));
        m.loader.expect_open().returning(|_, _| {
            let mut config = MockProjectConfig::new();
            config.expect_get_string().returning(|_, _| Ok(None));
            Ok(Box::new(config) as Box<dyn crate::application::ports::ProjectConfig>)
        });
        m.fs.expect_remove_dir_all().times(1).returning(|_| Ok(()));
        m.fs.expect_copy_tree()
            .withf(|from, to| from == Path::new("/src/blink") && to.ends_with("src"))
            .times(1)
            .returning(|_, _| Ok(()));

        let dir = m
            .service(None)
            .import_arduino("uno", true, Path::new("/src/blink"))
            .await
            .unwrap();
        assert!(dir.starts_with("/home/dev/Projects"));
        assert!(base_name(&dir).ends_with("-uno"));
    }

    #[tokio::test]
    async fn tool_failure_leaves_directory_in_place() {
        let mut m = Mocks::new();
        m.fs.expect_is_dir().return_const(false);
        m.fs.expect_create_dir_all().times(1).returning(|_| Ok(()));
        m.fs.expect_remove_dir_all().never();
        m.runner.expect_exec().returning(|_, _| {
            Err(ApplicationError::ExternalTool {
                command: "pio project init".into(),
                reason: "exit code 1".into(),
            }
            .into())
        });

        let err: PioneerError = m
            .service(None)
            .init_v2(&request(), &InitOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exit code 1"));
    }

    #[tokio::test]
    async fn import_pio_requires_a_project() {
        let mut m = Mocks::new();
        m.fs.expect_is_file().return_const(false);
        m.fs.expect_copy_tree().never();

        let err = m
            .service(None)
            .import_pio(Path::new("/src/blink"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(4001));
    }

    #[tokio::test]
    async fn import_pio_copies_then_reinitialises_copy() {
        let mut m = Mocks::new();
        m.fs.expect_is_file()
            .with(eq(PathBuf::from("/src/weather/platformio.ini")))
            .return_const(true);
        m.fs.expect_copy_tree()
            .withf(|from, to| {
                from == Path::new("/src/weather")
                    && to.starts_with("/home/dev/Projects")
                    && base_name(to).ends_with("-weather")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        m.runner
            .expect_exec()
            .withf(|args, opts| {
                args == &["init", "--ide", "vscode"]
                    && opts.force_subprocess
                    && opts.working_dir.starts_with("/home/dev/Projects")
                    && base_name(&opts.working_dir).ends_with("-weather")
            })
            .times(1)
            .returning(|_, _| Ok(ExecOutput::default()));

        let dir = m
            .service(Some("vscode"))
            .import_pio(Path::new("/src/weather"))
            .await
            .unwrap();
        assert_eq!(dir.parent(), Some(Path::new("/home/dev/Projects")));
        let name = base_name(&dir);
        assert_eq!(name.len(), "yymmdd-HHMMSS-weather".len());
        assert!(name.ends_with("-weather"));
    }
}
