//! Corpus loading: enumerate page files and resolve registry files under the root.
//!
//! Every regular file of the tree is recorded by its site path (`/data/terms.json`)
//! so references can be checked against what is actually published. Reading
//! never aborts the run: a file that cannot be read becomes a `corpus` error.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use thiserror::Error;

use crate::config::{CorpusConfig, RegistryConfig};
use crate::finding::{Finding, RuleId};
use crate::registry::RegistryKind;
use crate::utils::path::rel_slash_path;
use crate::{debug, log};

/// Directories never walked, whatever the configuration says.
const ALWAYS_SKIPPED: &[&str] = &[".git"];

/// Fatal loader errors. Everything else is reported as a finding.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("site root not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("site root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Outcome of locating and reading one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// No file at the expected path.
    Missing { path: String },
    /// The file exists but could not be read (a `corpus` finding was raised).
    Unreadable { path: String },
    Read { path: String, text: String },
}

impl Source {
    /// Site path the source was (or would have been) read from.
    pub fn path(&self) -> &str {
        match self {
            Self::Missing { path } | Self::Unreadable { path } | Self::Read { path, .. } => path,
        }
    }
}

/// A logical registry file and where it was found.
#[derive(Debug, Clone)]
pub struct RegistrySource {
    pub kind: RegistryKind,
    /// Site path of the primary file.
    pub primary: String,
    /// Site path of the discovery mirror.
    pub mirror: String,
    pub source: Source,
}

/// Site paths of every regular file under the root.
///
/// Lookups through [`SiteFiles::contains`] treat a registry's primary and
/// mirror as one file.
#[derive(Debug, Clone, Default)]
pub struct SiteFiles {
    paths: BTreeSet<String>,
    /// `(kind, primary, mirror)` site paths of the logical registries.
    aliases: Vec<(RegistryKind, String, String)>,
}

impl SiteFiles {
    pub fn new(paths: impl IntoIterator<Item = String>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            aliases: Vec::new(),
        }
    }

    pub fn add_alias(&mut self, kind: RegistryKind, primary: &str, mirror: &str) {
        self.aliases
            .push((kind, primary.to_string(), mirror.to_string()));
    }

    /// Exact lookup.
    pub fn exists(&self, site_path: &str) -> bool {
        self.paths.contains(site_path)
    }

    /// Mirror-aware lookup.
    pub fn contains(&self, site_path: &str) -> bool {
        if self.exists(site_path) {
            return true;
        }
        self.aliases.iter().any(|(_, primary, mirror)| {
            (primary == site_path || mirror == site_path)
                && (self.exists(primary) || self.exists(mirror))
        })
    }

    /// Logical registry a site path names, if any.
    pub fn registry_kind(&self, site_path: &str) -> Option<RegistryKind> {
        self.aliases
            .iter()
            .find(|(_, primary, mirror)| primary == site_path || mirror == site_path)
            .map(|(kind, _, _)| *kind)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

/// Files of one site tree.
#[derive(Debug)]
pub struct Corpus {
    root: PathBuf,
    /// Root-relative page file paths, sorted.
    pub page_paths: Vec<String>,
    pub files: SiteFiles,
    /// Manifest, terms and documents, in that order.
    pub registries: Vec<RegistrySource>,
    pub sitemap: Source,
    /// Read failures and mirror divergence.
    pub findings: Vec<Finding>,
}

impl Corpus {
    /// Enumerate and resolve the files of the tree at `root`.
    pub fn load(
        root: &Path,
        corpus: &CorpusConfig,
        registry: &RegistryConfig,
    ) -> Result<Self, CorpusError> {
        if !root.exists() {
            return Err(CorpusError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(CorpusError::NotADirectory(root.to_path_buf()));
        }

        let (rel_files, walk_findings) = collect_files(root, &corpus.skip_dirs);
        let files = SiteFiles::new(rel_files.iter().map(|rel| format!("/{rel}")));

        let page_paths: Vec<String> = rel_files
            .iter()
            .filter(|rel| is_page_file(rel, corpus))
            .cloned()
            .collect();

        let mut loaded = Self {
            root: root.to_path_buf(),
            page_paths,
            files,
            registries: Vec::new(),
            sitemap: Source::Missing {
                path: String::new(),
            },
            findings: walk_findings,
        };

        for kind in RegistryKind::ALL {
            let (primary, mirror) = match kind {
                RegistryKind::Manifest => (&registry.manifest, &registry.manifest_mirror),
                RegistryKind::Terms => (&registry.terms, &registry.terms_mirror),
                RegistryKind::Documents => (&registry.documents, &registry.documents_mirror),
            };
            let source = RegistrySource {
                kind,
                primary: as_site_path(primary),
                mirror: as_site_path(&registry.mirror_path(mirror)),
                source: Source::Missing {
                    path: String::new(),
                },
            };
            loaded
                .files
                .add_alias(kind, &source.primary, &source.mirror);
            let resolved = loaded.resolve_registry(source);
            loaded.registries.push(resolved);
        }

        loaded.sitemap = loaded.read_source(&as_site_path(&registry.sitemap));

        log!(
            "corpus";
            "{} files, {} pages under {}",
            loaded.files.len(),
            loaded.page_paths.len(),
            root.display()
        );

        Ok(loaded)
    }

    pub fn registry(&self, kind: RegistryKind) -> Option<&RegistrySource> {
        self.registries.iter().find(|r| r.kind == kind)
    }

    /// Read a page file by its root-relative path.
    pub fn read_page(&self, rel_path: &str) -> Result<String, Finding> {
        let site_path = format!("/{rel_path}");
        read_text(&self.root.join(rel_path)).map_err(|message| {
            Finding::error(RuleId::Corpus, site_path, message)
        })
    }

    /// Primary wins; the mirror is read only when the primary is absent.
    fn resolve_registry(&mut self, mut registry: RegistrySource) -> RegistrySource {
        let has_primary = self.files.exists(&registry.primary);
        let has_mirror = self.files.exists(&registry.mirror);

        registry.source = if has_primary {
            let source = self.read_source(&registry.primary);
            if has_mirror && let Source::Read { text, .. } = &source {
                self.compare_mirror(&registry, text);
            }
            source
        } else if has_mirror {
            debug!("corpus"; "{} registry: using mirror {}", registry.kind, registry.mirror);
            self.read_source(&registry.mirror)
        } else {
            Source::Missing {
                path: registry.primary.clone(),
            }
        };

        registry
    }

    /// Warn when a mirror exists but no longer matches its primary.
    fn compare_mirror(&mut self, registry: &RegistrySource, primary_text: &str) {
        let mirror_path = self.absolute(&registry.mirror);
        match fs::read(&mirror_path) {
            Ok(bytes) if bytes != primary_text.as_bytes() => {
                self.findings.push(Finding::warning(
                    RuleId::Registry,
                    registry.mirror.clone(),
                    format!("mirror differs from {}; the primary is used", registry.primary),
                ));
            }
            Ok(_) => {}
            Err(e) => {
                self.findings.push(Finding::error(
                    RuleId::Corpus,
                    registry.mirror.clone(),
                    format!("cannot read file: {e}"),
                ));
            }
        }
    }

    /// Read a file by site path, recording a `corpus` finding on failure.
    fn read_source(&mut self, site_path: &str) -> Source {
        if !self.files.exists(site_path) {
            return Source::Missing {
                path: site_path.to_string(),
            };
        }
        match read_text(&self.absolute(site_path)) {
            Ok(text) => Source::Read {
                path: site_path.to_string(),
                text,
            },
            Err(message) => {
                self.findings
                    .push(Finding::error(RuleId::Corpus, site_path, message));
                Source::Unreadable {
                    path: site_path.to_string(),
                }
            }
        }
    }

    fn absolute(&self, site_path: &str) -> PathBuf {
        self.root.join(site_path.trim_start_matches('/'))
    }
}

/// Root-relative paths of every regular file, sorted, outside skipped directories.
///
/// Symbolic links are followed. Entries the walk cannot read and links that
/// point nowhere become `corpus` errors.
fn collect_files(root: &Path, skip_dirs: &[String]) -> (Vec<String>, Vec<Finding>) {
    let skip_dirs = skip_dirs.to_vec();
    let walker = WalkDir::new(root)
        .skip_hidden(false)
        .sort(true)
        .follow_links(true)
        .process_read_dir(move |_depth, _path, _state, children| {
            for entry in children.iter_mut().flatten() {
                if entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| is_skipped_dir(name, &skip_dirs))
                {
                    entry.read_children_path = None;
                }
            }
        });

    let mut files = Vec::new();
    let mut findings = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                files.push(rel_slash_path(&entry.path(), root));
            }
            Ok(entry) if entry.file_type().is_symlink() => {
                findings.push(Finding::error(
                    RuleId::Corpus,
                    format!("/{}", rel_slash_path(&entry.path(), root)),
                    "broken symbolic link",
                ));
            }
            Ok(_) => {}
            Err(e) => {
                let subject = e
                    .path()
                    .map_or_else(|| "/".to_string(), |p| format!("/{}", rel_slash_path(p, root)));
                findings.push(Finding::error(
                    RuleId::Corpus,
                    subject,
                    format!("cannot read directory entry: {e}"),
                ));
            }
        }
    }
    files.sort();
    (files, findings)
}

fn is_skipped_dir(name: &str, skip_dirs: &[String]) -> bool {
    ALWAYS_SKIPPED.contains(&name) || skip_dirs.iter().any(|s| s == name)
}

/// Markup file outside hidden directories and not excluded.
fn is_page_file(rel_path: &str, corpus: &CorpusConfig) -> bool {
    let lower = rel_path.to_ascii_lowercase();
    let has_suffix = corpus
        .markup_suffixes
        .iter()
        .any(|suffix| lower.ends_with(&suffix.to_ascii_lowercase()));
    let in_hidden_dir = rel_path
        .split('/')
        .rev()
        .skip(1)
        .any(|dir| dir.starts_with('.'));

    has_suffix && !in_hidden_dir && !corpus.is_excluded(rel_path)
}

/// `data/terms.json` and `/data/terms.json` both become `/data/terms.json`.
fn as_site_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Read a file as UTF-8 text.
fn read_text(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|e| format!("cannot read file: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("file is not valid UTF-8: {e}"))
}
