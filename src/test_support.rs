use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::{AppConfig, StoredConfig};
use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::change::WorkingTreeStatus;
use crate::domain::preferences::Preferences;
use crate::domain::ticket::{Ticket, TicketDraft};
use crate::error::{AppError, AppResult};
use crate::services::issue_tracker::TrackerSnapshot;
use crate::services::prompt::Validator;
use crate::services::{
    IssueTrackerService, PreferencesService, PreferencesStore, Prompter, VersionControlService,
};

pub fn ticket(number: &str, priority: i64) -> Ticket {
    Ticket {
        id: format!("id-{number}"),
        number: number.to_string(),
        summary: format!("Ticket {number}"),
        description: None,
        status: "New".to_string(),
        priority,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    SetWorkingDir(PathBuf),
    Status,
    CurrentBranch,
    VerifyRef(String),
    ListBranches,
    Checkout(String),
    CheckoutNewBranch(String),
    AddAll,
    Commit(String),
    Push(String, String),
    Pull,
    Merge(String),
}

struct FakeGitState {
    calls: Vec<GitCall>,
    current_branch: String,
    refs: Vec<String>,
    branch_output: String,
    dirty_files: Vec<String>,
    fail_on: Option<&'static str>,
}

/// Records every call and answers from a small in-memory model of a repo.
pub struct FakeGit {
    state: Mutex<FakeGitState>,
}

impl Default for FakeGit {
    fn default() -> Self {
        Self {
            state: Mutex::new(FakeGitState {
                calls: Vec::new(),
                current_branch: "develop".to_string(),
                refs: vec!["develop".to_string()],
                branch_output: "* develop\n".to_string(),
                dirty_files: Vec::new(),
                fail_on: None,
            }),
        }
    }
}

impl FakeGit {
    pub fn with_refs(self, refs: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .refs
            .extend(refs.iter().map(|r| r.to_string()));
        self
    }

    pub fn with_branch_output(self, output: &str) -> Self {
        self.state.lock().unwrap().branch_output = output.to_string();
        self
    }

    pub fn with_current_branch(self, branch: &str) -> Self {
        self.state.lock().unwrap().current_branch = branch.to_string();
        self
    }

    pub fn with_dirty_files(self, files: &[&str]) -> Self {
        self.state.lock().unwrap().dirty_files = files.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Makes the named operation fail, e.g. `"push"`.
    pub fn failing_on(self, operation: &'static str) -> Self {
        self.state.lock().unwrap().fail_on = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn created_branches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GitCall::CheckoutNewBranch(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GitCall, operation: &str) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.fail_on == Some(operation) {
            return Err(AppError::VersionControl(format!("{operation} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl VersionControlService for FakeGit {
    fn set_working_dir(&self, path: &Path) {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(GitCall::SetWorkingDir(path.to_path_buf()));
    }

    async fn status(&self) -> AppResult<WorkingTreeStatus> {
        self.record(GitCall::Status, "status")?;
        Ok(WorkingTreeStatus {
            files: self.state.lock().unwrap().dirty_files.clone(),
        })
    }

    async fn current_branch(&self) -> AppResult<String> {
        self.record(GitCall::CurrentBranch, "current_branch")?;
        Ok(self.state.lock().unwrap().current_branch.clone())
    }

    async fn verify_ref(&self, name: &str) -> AppResult<String> {
        self.record(GitCall::VerifyRef(name.to_string()), "verify_ref")?;
        let state = self.state.lock().unwrap();
        if state.refs.iter().any(|r| r == name) {
            Ok(format!("sha-of-{name}"))
        } else {
            Err(AppError::VersionControl(format!("unknown ref {name}")))
        }
    }

    async fn list_branches(&self) -> AppResult<String> {
        self.record(GitCall::ListBranches, "list_branches")?;
        Ok(self.state.lock().unwrap().branch_output.clone())
    }

    async fn checkout(&self, branch: &str) -> AppResult<()> {
        self.record(GitCall::Checkout(branch.to_string()), "checkout")?;
        self.state.lock().unwrap().current_branch = branch.to_string();
        Ok(())
    }

    async fn checkout_new_branch(&self, branch: &BranchName) -> AppResult<()> {
        self.record(
            GitCall::CheckoutNewBranch(branch.as_str().to_string()),
            "checkout_new_branch",
        )?;
        let mut state = self.state.lock().unwrap();
        state.current_branch = branch.as_str().to_string();
        state.refs.push(branch.as_str().to_string());
        Ok(())
    }

    async fn add_all(&self) -> AppResult<()> {
        self.record(GitCall::AddAll, "add_all")
    }

    async fn commit(&self, message: &str) -> AppResult<()> {
        self.record(GitCall::Commit(message.to_string()), "commit")?;
        self.state.lock().unwrap().dirty_files.clear();
        Ok(())
    }

    async fn push(&self, remote: &str, branch: &str) -> AppResult<()> {
        self.record(
            GitCall::Push(remote.to_string(), branch.to_string()),
            "push",
        )
    }

    async fn pull(&self) -> AppResult<()> {
        self.record(GitCall::Pull, "pull")
    }

    async fn merge(&self, source: &str) -> AppResult<()> {
        self.record(GitCall::Merge(source.to_string()), "merge")
    }
}

#[derive(Default)]
pub struct FakeTracker {
    tickets: Vec<Ticket>,
    snapshot: Mutex<Option<TrackerSnapshot>>,
    created: Mutex<Vec<TicketDraft>>,
}

impl FakeTracker {
    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets,
            ..Self::default()
        }
    }

    pub fn created(&self) -> Vec<TicketDraft> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTrackerService for FakeTracker {
    async fn refresh(&self) -> AppResult<TrackerSnapshot> {
        let snapshot = TrackerSnapshot {
            tickets: self.tickets.clone(),
            ..TrackerSnapshot::default()
        };
        *self.snapshot.lock().unwrap() = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn cached(&self) -> Option<TrackerSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    async fn create_ticket(&self, draft: &TicketDraft) -> AppResult<String> {
        self.created.lock().unwrap().push(draft.clone());
        Ok(format!("{{\"summary\":\"{}\"}}", draft.summary))
    }
}

#[derive(Debug, Clone)]
pub enum Answer {
    Select(usize),
    Input(&'static str),
    Confirm(bool),
}

/// Replays canned answers. Inputs run through the validator; rejected
/// answers are recorded and the next scripted answer is tried.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Answer>>,
    menus: Mutex<Vec<Vec<String>>>,
    rejections: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            ..Self::default()
        }
    }

    pub fn menus(&self) -> Vec<Vec<String>> {
        self.menus.lock().unwrap().clone()
    }

    pub fn rejections(&self) -> Vec<String> {
        self.rejections.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }

    fn next(&self, prompt: &str) -> AppResult<Answer> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::Prompt(format!("no scripted answer for '{prompt}'")))
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, prompt: &str, items: &[String], _default: usize) -> AppResult<usize> {
        self.menus.lock().unwrap().push(items.to_vec());
        match self.next(prompt)? {
            Answer::Select(index) if index < items.len() => Ok(index),
            other => panic!("unexpected answer {other:?} for select '{prompt}'"),
        }
    }

    fn input(
        &self,
        prompt: &str,
        default: Option<&str>,
        validate: Validator<'_>,
    ) -> AppResult<String> {
        loop {
            let value = match self.next(prompt)? {
                Answer::Input("") => default.unwrap_or_default().to_string(),
                Answer::Input(value) => value.to_string(),
                other => panic!("unexpected answer {other:?} for input '{prompt}'"),
            };
            match validate(&value) {
                Ok(()) => return Ok(value),
                Err(message) => self.rejections.lock().unwrap().push(message),
            }
        }
    }

    fn confirm(&self, prompt: &str) -> AppResult<bool> {
        match self.next(prompt)? {
            Answer::Confirm(value) => Ok(value),
            other => panic!("unexpected answer {other:?} for confirm '{prompt}'"),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryPreferencesStore {
    saved: Arc<Mutex<Option<Preferences>>>,
}

impl MemoryPreferencesStore {
    pub fn saved(&self) -> Option<Preferences> {
        self.saved.lock().unwrap().clone()
    }
}

impl PreferencesStore for MemoryPreferencesStore {
    fn load(&self) -> AppResult<Option<Preferences>> {
        Ok(self.saved())
    }

    fn save(&self, preferences: &Preferences) -> AppResult<()> {
        *self.saved.lock().unwrap() = Some(preferences.clone());
        Ok(())
    }
}

pub fn preferences_with_initials(initials: &str) -> PreferencesService {
    let mut service =
        PreferencesService::load(Box::new(MemoryPreferencesStore::default())).unwrap();
    service.set_initials(initials).unwrap();
    service
}

pub fn test_config() -> AppConfig {
    AppConfig::resolve(StoredConfig::default(), Path::new("/work"), |_| None).unwrap()
}

pub fn context(
    config: AppConfig,
    git: Arc<FakeGit>,
    tracker: Arc<FakeTracker>,
    prompter: Arc<ScriptedPrompter>,
) -> AppContext {
    AppContext::new(config, git, tracker, prompter)
}
