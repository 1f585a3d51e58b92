//! End-to-end library pipeline tests: resolve -> materialize -> invoke ->
//! schedule -> cleanup, against a mock process runner so no external tool is
//! required.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value as JsonValue;
use tempfile::TempDir;

use toolbelt::cleanup;
use toolbelt::config::{parse, ProjectConfig};
use toolbelt::configure;
use toolbelt::context::RunContext;
use toolbelt::driver::{DriverAdapter, DriverMetadata, DriverRef};
use toolbelt::error::Result;
use toolbelt::events::EventBus;
use toolbelt::invocation::Invocation;
use toolbelt::process::{ProcessOutput, ProcessRunner};
use toolbelt::registry::DriverRegistry;
use toolbelt::resolver;
use toolbelt::scheduler::{ExecutionScheduler, Task};
use toolbelt::workspace::{self, WorkspacePackage};

struct FakeDriver {
    metadata: DriverMetadata,
}

impl FakeDriver {
    fn new(name: &str, dependencies: &[&str]) -> DriverRef {
        Arc::new(Self {
            metadata: DriverMetadata::new(name, name, name, &format!(".{}rc.json", name))
                .with_dependencies(dependencies),
        })
    }
}

impl DriverAdapter for FakeDriver {
    fn metadata(&self) -> &DriverMetadata {
        &self.metadata
    }
}

/// Records every spawn; fails any binary listed in `failing`.
struct RecordingRunner {
    calls: Mutex<Vec<(String, PathBuf)>>,
    failing: Vec<String>,
}

impl RecordingRunner {
    fn new(failing: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failing: failing.iter().map(|bin| bin.to_string()).collect(),
        })
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, bin: &str, _args: &[String], cwd: &Path) -> Result<ProcessOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((bin.to_string(), cwd.to_path_buf()));
        let failed = self.failing.contains(&bin.to_string());
        Ok(ProcessOutput {
            exit_code: if failed { 1 } else { 0 },
            success: !failed,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

fn registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    registry.register(FakeDriver::new("lint", &["transpile"]));
    registry.register(FakeDriver::new("transpile", &[]));
    registry
}

fn project() -> ProjectConfig {
    parse("drivers:\n  - lint\n  - transpile\n").unwrap()
}

#[test]
fn full_run_materializes_invokes_and_cleans_up() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    let bus = Arc::new(EventBus::new());
    let registry = registry();
    let project = project();

    let mut context = RunContext::new(root.clone(), root.clone());
    context.argv = vec!["--check".to_string()];

    let resolved = resolver::resolve("lint", &registry, &bus).unwrap();
    assert_eq!(resolved.len(), 2);

    let paths = configure::materialize_all(&resolved, &project, &context, &bus).unwrap();
    assert_eq!(paths.len(), 2);
    for path in &paths {
        assert!(path.exists(), "{} was not materialized", path.display());
    }

    let runner = RecordingRunner::new(&[]);
    let task: Box<dyn Task> = Box::new(Invocation::new(
        resolved[0].clone(),
        context.clone(),
        "lint".to_string(),
        &[],
        runner.clone(),
        bus.clone(),
    ));

    let aggregate = ExecutionScheduler::new(2).schedule(vec![task], &[]).unwrap();
    assert!(!aggregate.failed());
    assert_eq!(aggregate.results[0].key, "lint");

    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "lint");
    assert_eq!(calls[0].1, root);
    drop(calls);

    cleanup::run(&context, &project.settings, &bus).unwrap();
    for path in &paths {
        assert!(!path.exists(), "{} survived cleanup", path.display());
    }
}

#[test]
fn workspace_fan_out_runs_once_per_package_in_its_own_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();

    for name in ["alpha", "beta"] {
        let pkg = root.join("packages").join(name);
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(
            pkg.join("package.json"),
            format!("{{\"name\": \"{}\"}}", name),
        )
        .unwrap();
    }

    let bus = Arc::new(EventBus::new());
    let registry = registry();

    let mut context = RunContext::new(root.clone(), root.clone());
    context.workspaces = vec!["packages/*".to_string()];

    let discovered = workspace::discover(&root, &context.workspaces).unwrap();
    let packages: Vec<WorkspacePackage> = workspace::expand("*", &discovered);
    assert_eq!(packages.len(), 2);

    let resolved = resolver::resolve("lint", &registry, &bus).unwrap();
    let runner = RecordingRunner::new(&[]);

    let tasks: Vec<Box<dyn Task>> = packages
        .iter()
        .map(|package| -> Box<dyn Task> {
            Box::new(Invocation::new(
                resolved[0].clone(),
                context.for_workspace(&package.path),
                package.name.clone(),
                &[],
                runner.clone(),
                bus.clone(),
            ))
        })
        .collect();

    let aggregate = ExecutionScheduler::new(4).schedule(tasks, &[]).unwrap();
    assert_eq!(aggregate.results.len(), 2);
    assert!(!aggregate.failed());

    let mut roots: Vec<PathBuf> = runner
        .calls
        .lock()
        .unwrap()
        .iter()
        .map(|(_, cwd)| cwd.clone())
        .collect();
    roots.sort();
    assert_eq!(
        roots,
        vec![
            root.join("packages").join("alpha"),
            root.join("packages").join("beta"),
        ]
    );
}

#[test]
fn one_package_failure_does_not_hide_sibling_successes() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    let bus = Arc::new(EventBus::new());
    let registry = registry();

    let context = RunContext::new(root.clone(), root.clone());
    let resolved = resolver::resolve("lint", &registry, &bus).unwrap();

    // "lint" fails everywhere; build two fan-out tasks plus a passing
    // transpile task to check isolation across drivers too.
    let runner = RecordingRunner::new(&["lint"]);
    let tasks: Vec<Box<dyn Task>> = vec![
        Box::new(Invocation::new(
            resolved[0].clone(),
            context.clone(),
            "alpha".to_string(),
            &[],
            runner.clone(),
            bus.clone(),
        )),
        Box::new(Invocation::new(
            resolved[1].clone(),
            context.clone(),
            "beta".to_string(),
            &[],
            runner.clone(),
            bus.clone(),
        )),
    ];

    let aggregate = ExecutionScheduler::new(2).schedule(tasks, &[]).unwrap();

    assert!(aggregate.failed());
    assert_eq!(aggregate.results.len(), 2);
    let alpha = aggregate
        .results
        .iter()
        .find(|result| result.key == "alpha")
        .unwrap();
    let beta = aggregate
        .results
        .iter()
        .find(|result| result.key == "beta")
        .unwrap();
    assert!(!alpha.success);
    assert!(beta.success);
    assert!(aggregate.ensure_success().is_err());
}

#[test]
fn materialized_config_merges_template_and_project_fragment() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    std::fs::create_dir_all(root.join("configs")).unwrap();
    std::fs::write(
        root.join("configs/lint.yaml"),
        "rules:\n  semi: error\nenv: node\n",
    )
    .unwrap();

    let bus = Arc::new(EventBus::new());
    let registry = registry();
    let context = RunContext::new(root.clone(), root.clone());

    let project = parse(
        r#"
drivers:
  - name: lint
    config:
      rules:
        semi: warn
"#,
    )
    .unwrap();

    let resolved = resolver::resolve("lint", &registry, &bus).unwrap();
    configure::materialize_all(&resolved, &project, &context, &bus).unwrap();

    let written: JsonValue =
        serde_json::from_str(&std::fs::read_to_string(root.join(".lintrc.json")).unwrap())
            .unwrap();
    assert_eq!(written["rules"]["semi"], "warn");
    assert_eq!(written["env"], "node");
}
