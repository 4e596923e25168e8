use super::*;
use crate::compile::OutputStyle;
use crate::config::test_parse_config;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Records every phase call; fails the phase named in `fail_on`.
#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl Recorder {
    fn failing(phase: &'static str) -> Self {
        Self {
            fail_on: Some(phase),
            ..Self::default()
        }
    }

    fn record(&self, call: String) -> Result<()> {
        let failed = self.fail_on.is_some_and(|phase| call.starts_with(phase));
        self.calls.borrow_mut().push(call);
        if failed {
            anyhow::bail!("collaborator exited with status 1");
        }
        Ok(())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn count(&self, phase: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(phase))
            .count()
    }
}

impl PipelineSteps for Recorder {
    fn preprocess(&self, system: &System) -> Result<()> {
        self.record(format!("preprocess {}", system.dir))
    }

    fn process_modules(&self) -> Result<()> {
        self.record("modules".into())
    }

    fn compile_scripts(&self) -> Result<()> {
        self.record("scripts".into())
    }

    fn compile_styles(&self, options: CompileOptions) -> Result<()> {
        self.record(format!("styles {}", options.mode_name()))
    }

    fn collect(&self, system: &System) -> Result<()> {
        self.record(format!("collect {}", system.dir))
    }

    fn watch(&self, options: CompileOptions, background: bool) -> Result<()> {
        self.record(format!("watch {} background={background}", options.mode_name()))
    }
}

fn system(name: &str, dir: &str) -> System {
    System {
        name: name.into(),
        dir: dir.into(),
    }
}

fn request() -> UpdateRequest {
    UpdateRequest {
        systems: vec![system("lms", "lms"), system("studio", "cms")],
        debug: false,
        skip_collect: false,
        watch: false,
        background: false,
    }
}

#[test]
fn test_phases_run_in_order() {
    let steps = Recorder::default();
    run_update(&steps, &request()).unwrap();

    assert_eq!(
        steps.calls(),
        vec![
            "preprocess lms",
            "preprocess cms",
            "modules",
            "scripts",
            "styles release",
            "collect lms",
            "collect cms",
        ]
    );
}

#[test]
fn test_skip_collect_never_collects() {
    let steps = Recorder::default();
    let request = UpdateRequest {
        skip_collect: true,
        ..request()
    };
    run_update(&steps, &request).unwrap();

    assert_eq!(steps.count("collect"), 0);
    assert_eq!(steps.count("styles"), 1);
}

#[test]
fn test_preprocess_failure_aborts_run() {
    let steps = Recorder::failing("preprocess");
    let err = run_update(&steps, &request()).unwrap_err();

    assert!(format!("{err:#}").contains("Preprocessing failed for lms"));
    assert_eq!(steps.calls(), vec!["preprocess lms"]);
}

#[test]
fn test_style_failure_skips_collect_and_watch() {
    let steps = Recorder::failing("styles");
    let request = UpdateRequest {
        watch: true,
        ..request()
    };
    assert!(run_update(&steps, &request).is_err());

    assert_eq!(steps.count("collect"), 0);
    assert_eq!(steps.count("watch"), 0);
}

#[test]
fn test_watch_runs_last_with_request_mode() {
    let steps = Recorder::default();
    let request = UpdateRequest {
        debug: true,
        skip_collect: true,
        watch: true,
        background: true,
        ..request()
    };
    run_update(&steps, &request).unwrap();

    let calls = steps.calls();
    assert_eq!(calls.last().unwrap(), "watch debug background=true");
    assert!(calls.contains(&"styles debug".to_string()));
}

// ============================================================================
// ExternalSteps
// ============================================================================

/// Writes the source text unchanged.
struct CopyEngine;

impl StyleEngine for CopyEngine {
    fn compile(&self, source: &Path, _: &[PathBuf], _: OutputStyle) -> Result<String> {
        Ok(fs::read_to_string(source)?)
    }
}

const PROJECT: &str = r#"
[systems]
default = ["lms"]

[styles]
trees = ["lms/static/sass"]
targets = []
load_paths = []

[scripts]
roots = ["lms"]
command = ["sh", "-c", "for f in \"$@\"; do cp \"$f\" \"${f%.coffee}.js\"; done", "coffee"]

[modules]
command = ["sh", "-c", "mkdir -p \"$0\" && touch \"$0/done\"", "$ASSETS_MODULE_OUTPUT"]

[preprocess]
command = ["true"]

[collect]
command = ["sh", "-c", "touch collected-$ASSETS_SYSTEM"]
"#;

#[test]
fn test_external_steps_full_update() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    for (rel, content) in [
        ("lms/static/sass/main.scss", ".nav { color: red; }\n"),
        ("lms/static/js/app.coffee", "x = 1\n"),
    ] {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    let config = Arc::new(test_parse_config(root, PROJECT));
    let paths = Arc::new(crate::resolve::PathResolver::new(&config).resolve().unwrap());
    let steps = ExternalSteps::new(
        Arc::clone(&config),
        paths,
        Arc::new(CopyEngine),
        "devstack".into(),
        true,
    );
    let request = UpdateRequest {
        systems: config.systems.resolve_all(&[]),
        debug: true,
        skip_collect: false,
        watch: false,
        background: false,
    };

    run_update(&steps, &request).unwrap();

    assert!(root.join("lms/static/css/main.css").is_file());
    assert!(root.join("lms/static/js/app.js").is_file());
    assert!(root.join("common/static/xmodule/done").is_file());
    assert!(root.join("collected-lms").is_file());
}
