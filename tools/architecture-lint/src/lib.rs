//! Layering lint for the `client` crate.
//!
//! `client/src` is split into `domain` (synchronisation engine, entities,
//! ports), `inbound` (the `career-sync` command line), and `outbound` (the
//! GraphQL gateway and the credential file store). `config.rs` sits beside
//! them and may be read by every layer. The lint parses `config.rs` and every
//! source file under the layer directories and reports:
//!
//! - references to a sibling layer the file may not see
//! - imports of crates that belong to another layer
//! - filesystem, socket, or process access from `domain` through `std`
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Name the client crate is imported as from its own tests and binary.
const CRATE_NAME: &str = "client";

/// A single boundary violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `client/src`.
    pub file: PathBuf,
    /// Which rule was broken.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Reading the source tree failed.
    Io(io::Error),
    /// A file could not be parsed or placed in a layer.
    Parse {
        /// Offending file.
        file: PathBuf,
        /// Parser or layout message.
        message: String,
    },
    /// At least one boundary was crossed.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error while linting architecture: {err}"),
            Self::Parse { file, message } => {
                write!(f, "cannot lint {}: {message}", file.display())
            }
            Self::Violations(violations) => {
                writeln!(f, "{} architecture boundary violation(s):", violations.len())?;
                violations
                    .iter()
                    .try_for_each(|violation| writeln!(f, "- {violation}"))
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse { .. } | Self::Violations(_) => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `client/src`.
    pub file: PathBuf,
    /// Rust source text.
    pub contents: String,
}

struct LayerRule {
    name: &'static str,
    hidden_layers: &'static [&'static str],
    forbidden_crates: &'static [&'static str],
    forbidden_std: &'static [&'static str],
}

const RULES: [LayerRule; 4] = [
    LayerRule {
        name: "domain",
        hidden_layers: &["inbound", "outbound"],
        forbidden_crates: &[
            "cap_std",
            "clap",
            "color_eyre",
            "ortho_config",
            "reqwest",
            "tracing_subscriber",
        ],
        forbidden_std: &["fs", "net", "process"],
    },
    LayerRule {
        name: "inbound",
        hidden_layers: &["outbound"],
        forbidden_crates: &["cap_std", "reqwest"],
        forbidden_std: &[],
    },
    LayerRule {
        name: "outbound",
        hidden_layers: &["inbound"],
        forbidden_crates: &["clap"],
        forbidden_std: &[],
    },
    LayerRule {
        name: "config",
        hidden_layers: &["inbound", "outbound"],
        forbidden_crates: &["cap_std", "clap", "reqwest"],
        forbidden_std: &[],
    },
];

const CONFIG_FILE: &str = "config.rs";

const LAYER_DIRS: [&str; 3] = ["domain", "inbound", "outbound"];

fn rule_for(file: &Path) -> Option<&'static LayerRule> {
    let name = if file == Path::new(CONFIG_FILE) {
        "config"
    } else {
        let first = file.components().next()?.as_os_str().to_str()?;
        LAYER_DIRS.iter().copied().find(|layer| *layer == first)?
    };
    RULES.iter().find(|rule| rule.name == name)
}

/// Lint the client crate sources on disk.
///
/// `client_dir` must be the `client/` directory at the repository root.
///
/// # Errors
///
/// Returns [`ArchitectureLintError`] when sources cannot be read or parsed,
/// or when any boundary is crossed.
pub fn lint_client_sources(client_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = client_dir.join("src");
    let mut sources = Vec::new();
    for layer in LAYER_DIRS {
        let dir = src_dir.join(layer);
        if dir.is_dir() {
            collect_sources(&src_dir, &dir, &mut sources)?;
        }
    }
    let config = src_dir.join(CONFIG_FILE);
    if config.is_file() {
        sources.push(LintSource {
            file: PathBuf::from(CONFIG_FILE),
            contents: fs::read_to_string(&config)?,
        });
    }
    lint_sources(&sources)
}

/// Lint in-memory sources. Paths are relative to `client/src`.
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Parse`] for files other than
/// `config.rs` outside the three layers or with invalid syntax, and [`ArchitectureLintError::Violations`]
/// listing every crossed boundary.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let rule = rule_for(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is not config.rs or under domain/, inbound/, or outbound/"
                .to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(check_file(&source.file, rule, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

fn check_file(file: &Path, rule: &LayerRule, parsed: &syn::File) -> Vec<Violation> {
    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        match classify(segments) {
            Some(Reference::Layer(root)) if rule.hidden_layers.contains(&root) => {
                messages.insert(format!(
                    "{} module must not depend on crate::{root}",
                    rule.name
                ));
            }
            Some(Reference::Std(module)) if rule.forbidden_std.contains(&module) => {
                messages.insert(format!(
                    "{} module must not use std::{module}",
                    rule.name
                ));
            }
            Some(Reference::External(root)) if rule.forbidden_crates.contains(&root) => {
                messages.insert(format!(
                    "{} module must not depend on external crate `{root}`",
                    rule.name
                ));
            }
            _ => {}
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

enum Reference<'a> {
    Layer(&'a str),
    Std(&'a str),
    External(&'a str),
}

/// Work out what a path refers to from its leading segments.
///
/// `crate::`, `self::`, and `super::` prefixes and the crate's own name all
/// resolve to a module of this crate; a bare layer name covers paths
/// written relative to an imported layer.
fn classify(segments: &[String]) -> Option<Reference<'_>> {
    let first = segments.first()?.as_str();
    match first {
        "crate" | "self" | "super" | CRATE_NAME => segments
            .iter()
            .skip(1)
            .map(String::as_str)
            .find(|segment| !matches!(*segment, "self" | "super"))
            .map(Reference::Layer),
        "std" => segments.get(1).map(|module| Reference::Std(module.as_str())),
        layer if LAYER_DIRS.contains(&layer) => Some(Reference::Layer(layer)),
        other => Some(Reference::External(other)),
    }
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, prefix: &mut Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
                prefix.pop();
            }
            syn::UseTree::Name(syn::UseName { ident })
            | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                let mut segments = prefix.clone();
                segments.push(ident.to_string());
                self.paths.insert(segments);
            }
            syn::UseTree::Glob(_) => {
                let mut segments = prefix.clone();
                segments.push("*".to_owned());
                self.paths.insert(segments);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix);
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, &mut Vec::new());
    }
}

fn collect_sources(
    src_root: &Path,
    dir: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_sources(src_root, &path, sources)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            let file = path
                .strip_prefix(src_root)
                .map_err(|err| ArchitectureLintError::Parse {
                    file: path.clone(),
                    message: err.to_string(),
                })?
                .to_path_buf();
            let contents = fs::read_to_string(&path)?;
            sources.push(LintSource { file, contents });
        }
    }
    Ok(())
}
