//! Test doubles for the composer executable and the terminal.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use serde_json::json;
use crate::composer::{CommandOutput, Composer, Runner};
use crate::report::{Level, Reporter};

#[derive(Default)]
struct FakeState {
    calls: Vec<Vec<String>>,
    versions: HashMap<String, String>,
    failures: HashMap<String, String>,
    failing_fragments: Vec<(String, String)>,
    outputs: HashMap<String, String>,
    skip_lock: bool,
    hook: Option<Rc<dyn Fn(&[String])>>,
}

/// Pretends to be composer: records every call and writes a `composer.lock` on `require`.
#[derive(Clone, Default)]
pub(crate) struct FakeComposer {
    state: Rc<RefCell<FakeState>>,
}

impl FakeComposer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Version written to the lock file when `composer_name` is required.
    pub(crate) fn resolves(&self, composer_name: &str, version: &str) -> &Self {
        self.state
            .borrow_mut()
            .versions
            .insert(composer_name.to_string(), version.to_string());
        self
    }

    pub(crate) fn fail_on(&self, command: &str, stderr: &str) -> &Self {
        self.state
            .borrow_mut()
            .failures
            .insert(command.to_string(), stderr.to_string());
        self
    }

    /// Fails every call with an argument containing `fragment`, e.g. a package or a directory.
    pub(crate) fn fail_when(&self, fragment: &str, stderr: &str) -> &Self {
        self.state
            .borrow_mut()
            .failing_fragments
            .push((fragment.to_string(), stderr.to_string()));
        self
    }

    pub(crate) fn prints(&self, command: &str, stdout: &str) -> &Self {
        self.state
            .borrow_mut()
            .outputs
            .insert(command.to_string(), stdout.to_string());
        self
    }

    pub(crate) fn without_lock(&self) -> &Self {
        self.state.borrow_mut().skip_lock = true;
        self
    }

    /// Runs `hook` after every successful call, to change the project behind the installer's back.
    pub(crate) fn on_call(&self, hook: impl Fn(&[String]) + 'static) -> &Self {
        self.state.borrow_mut().hook = Some(Rc::new(hook));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn composer(&self) -> Composer {
        Composer::new("composer", Box::new(self.clone()))
    }
}

impl Runner for FakeComposer {
    fn run(&self, _program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let mut state = self.state.borrow_mut();
        state.calls.push(args.to_vec());
        let command = args.first().cloned().unwrap_or_default();
        let failure = state.failures.get(&command).cloned().or_else(|| {
            state
                .failing_fragments
                .iter()
                .find(|(fragment, _)| args.iter().any(|arg| arg.contains(fragment.as_str())))
                .map(|(_, stderr)| stderr.clone())
        });
        if let Some(stderr) = failure {
            return Ok(CommandOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr,
            });
        }

        if command == "require" && !state.skip_lock {
            let dir = args
                .iter()
                .find_map(|arg| arg.strip_prefix("--working-dir="))
                .map(PathBuf::from)
                .unwrap_or_default();
            let lock_path = dir.join("composer.lock");
            let mut packages: Vec<serde_json::Value> = std::fs::read_to_string(&lock_path)
                .ok()
                .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
                .and_then(|lock| lock["packages"].as_array().cloned())
                .unwrap_or_default();
            for argument in args.iter().skip(2) {
                let name = argument.split(':').next().unwrap_or_default();
                let version = state
                    .versions
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| "1.0.0".to_string());
                packages.push(json!({ "name": name, "version": version }));
            }
            std::fs::write(&lock_path, json!({ "packages": packages }).to_string())?;
        }

        let stdout = state.outputs.get(&command).cloned().unwrap_or_default();
        let hook = state.hook.clone();
        drop(state);
        if let Some(hook) = hook {
            hook(args);
        }
        Ok(CommandOutput {
            exit_code: 0,
            stdout,
            stderr: String::new(),
        })
    }
}

/// Collects reported messages instead of printing them.
#[derive(Clone, Default)]
pub(crate) struct RecordingReporter {
    messages: Rc<RefCell<Vec<(Level, String)>>>,
}

impl RecordingReporter {
    pub(crate) fn messages(&self) -> Vec<(Level, String)> {
        self.messages.borrow().clone()
    }

    pub(crate) fn has(&self, level: Level, fragment: &str) -> bool {
        self.messages
            .borrow()
            .iter()
            .any(|(l, message)| *l == level && message.contains(fragment))
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, level: Level, message: &str) {
        self.messages.borrow_mut().push((level, message.to_string()));
    }
}
