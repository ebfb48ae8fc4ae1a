//! Knowledge base handle
//!
//! A knowledge base is a root directory holding a `.dewey/` configuration
//! directory, two optional manifests and a knowledge directory (default `docs/`)
//! whose immediate subdirectories are areas.

pub mod paths;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{KbConfig, Policy};
use crate::error::{DeweyError, Result};
use paths::{
    file_name, is_private_name, rel_string, AGENTS_MANIFEST, CLAUDE_MANIFEST, CONFIG_FILE,
    CURATION_PLAN_FILE, DEWEY_DIR, HISTORY_DIR, HISTORY_FILE, INDEX_FILE, OVERVIEW_FILE,
    PROPOSALS_DIR, UTILIZATION_DIR, UTILIZATION_FILE,
};

/// An area directory and the topic documents directly inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    /// Directory name
    pub name: String,
    /// Absolute directory path
    pub path: PathBuf,
    /// Working-depth topic documents, excluding `overview.md` and `*.ref.md`
    pub topics: Vec<PathBuf>,
}

impl Area {
    pub fn overview(&self) -> PathBuf {
        self.path.join(OVERVIEW_FILE)
    }

    pub fn has_overview(&self) -> bool {
        self.overview().is_file()
    }
}

/// An opened knowledge base
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    root: PathBuf,
    config: KbConfig,
}

impl KnowledgeBase {
    /// Open the knowledge base rooted at `root`, loading `.dewey/config.json`
    #[tracing::instrument(skip(root), fields(root = %root.display()))]
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(DeweyError::RootNotFound {
                root: root.to_path_buf(),
            });
        }

        let config = KbConfig::load(&root.join(DEWEY_DIR).join(CONFIG_FILE))?;
        tracing::debug!(knowledge_dir = %config.knowledge_dir, "opened knowledge base");

        Ok(KnowledgeBase {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &KbConfig {
        &self.config
    }

    pub fn policy(&self) -> &Policy {
        &self.config.policy
    }

    /// Name of the knowledge directory as configured
    pub fn knowledge_dir_name(&self) -> &str {
        &self.config.knowledge_dir
    }

    pub fn knowledge_dir(&self) -> PathBuf {
        self.root.join(&self.config.knowledge_dir)
    }

    pub fn dewey_dir(&self) -> PathBuf {
        self.root.join(DEWEY_DIR)
    }

    pub fn history_path(&self) -> PathBuf {
        self.dewey_dir().join(HISTORY_DIR).join(HISTORY_FILE)
    }

    pub fn utilization_path(&self) -> PathBuf {
        self.dewey_dir().join(UTILIZATION_DIR).join(UTILIZATION_FILE)
    }

    pub fn plan_path(&self) -> PathBuf {
        self.dewey_dir().join(CURATION_PLAN_FILE)
    }

    pub fn index_path(&self) -> PathBuf {
        self.knowledge_dir().join(INDEX_FILE)
    }

    pub fn proposals_dir(&self) -> PathBuf {
        self.knowledge_dir().join(PROPOSALS_DIR)
    }

    pub fn agents_manifest(&self) -> PathBuf {
        self.root.join(AGENTS_MANIFEST)
    }

    pub fn claude_manifest(&self) -> PathBuf {
        self.root.join(CLAUDE_MANIFEST)
    }

    /// Path relative to the knowledge directory, forward slashes
    pub fn rel(&self, path: &Path) -> String {
        rel_string(path, &self.knowledge_dir())
    }

    /// Path relative to the root, forward slashes (`docs/area/topic.md`)
    pub fn root_rel(&self, path: &Path) -> String {
        rel_string(path, &self.root)
    }

    /// Every validatable document, sorted.
    ///
    /// Skips paths with a private (`_`) or hidden component below the
    /// knowledge directory, and every `index.md`.
    pub fn discover_documents(&self) -> Vec<PathBuf> {
        let base = self.knowledge_dir();
        if !base.is_dir() {
            tracing::debug!(dir = %base.display(), "knowledge directory missing");
            return Vec::new();
        }

        let mut docs: Vec<PathBuf> = WalkDir::new(&base)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !is_private_name(&entry.file_name().to_string_lossy())
            })
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
            .filter(|p| file_name(p) != INDEX_FILE)
            .collect();
        docs.sort();
        docs
    }

    /// Every `*.md` directly inside the proposals area, sorted
    pub fn discover_proposals(&self) -> Vec<PathBuf> {
        let mut proposals: Vec<PathBuf> = match std::fs::read_dir(self.proposals_dir()) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
                .collect(),
            Err(_) => Vec::new(),
        };
        proposals.sort();
        proposals
    }

    /// Non-private area directories directly under the knowledge directory, sorted by name
    pub fn areas(&self) -> Vec<Area> {
        let entries = match std::fs::read_dir(self.knowledge_dir()) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut areas: Vec<Area> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir() && !is_private_name(file_name(p)))
            .map(|path| Area {
                name: file_name(&path).to_string(),
                topics: topics_in(&path),
                path,
            })
            .collect();
        areas.sort_by(|a, b| a.name.cmp(&b.name));
        areas
    }

    /// Area directory name of a document, if it lives inside one
    pub fn area_of(&self, path: &Path) -> Option<String> {
        let rel = self.rel(path);
        let mut parts = rel.split('/');
        let first = parts.next()?;
        parts.next().map(|_| first.to_string())
    }
}

fn topics_in(dir: &Path) -> Vec<PathBuf> {
    let mut topics: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
            .filter(|p| {
                let name = file_name(p);
                name != OVERVIEW_FILE && name != INDEX_FILE && !paths::is_reference(p)
            })
            .collect(),
        Err(_) => Vec::new(),
    };
    topics.sort();
    topics
}
