//! Package classification for modules installed under `node_modules`.
//!
//! Files are grouped by package name *and* install directory, so a package
//! hoisted in one place and nested in another shows up twice and is flagged
//! as duplicated.

use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::data::{ChunkInfo, ModuleInfo, PackageFile, PackageImporter, PackageInfo, PackageType};

/// Maximum allowed size for package.json files (10MB)
const MAX_PACKAGE_JSON_SIZE: u64 = 10 * 1024 * 1024;

/// Path segment marking an installed dependency.
const INSTALL_MARKER: &str = "/node_modules/";

static NODE_MODULES_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\\]node_modules[/\\]").expect("valid regex"));

/// The subset of package.json the classifier reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    pub version: Option<String>,
}

/// Source of package versions.
///
/// The default implementation reads `package.json` from disk; tests swap in
/// an in-memory table.
pub trait ManifestReader {
    /// Version of the package installed at `package_dir`, if readable.
    fn read_version(&self, package_dir: &Path) -> Option<String>;
}

/// Reads `<package_dir>/package.json` from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsManifestReader;

impl FsManifestReader {
    fn load(path: &Path) -> Option<PackageManifest> {
        let metadata = std::fs::metadata(path).ok()?;
        if !metadata.is_file() || metadata.len() > MAX_PACKAGE_JSON_SIZE {
            return None;
        }
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }
}

impl ManifestReader for FsManifestReader {
    fn read_version(&self, package_dir: &Path) -> Option<String> {
        let manifest_path = package_dir.join("package.json");
        let manifest = Self::load(&manifest_path);
        if manifest.is_none() {
            tracing::trace!(path = %manifest_path.display(), "package manifest unreadable");
        }
        manifest?.version
    }
}

/// In-memory manifest table keyed by package directory.
#[derive(Debug, Default, Clone)]
pub struct StaticManifests {
    versions: HashMap<PathBuf, String>,
}

impl StaticManifests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, dir: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        self.versions.insert(dir.into(), version.into());
        self
    }
}

impl ManifestReader for StaticManifests {
    fn read_version(&self, package_dir: &Path) -> Option<String> {
        self.versions.get(package_dir).cloned()
    }
}

/// Whether the module path lives inside a `node_modules` directory.
pub fn is_node_module_path(path: &str) -> bool {
    NODE_MODULES_SEGMENT.is_match(path)
}

fn normalize(path: &str) -> String {
    path.replace("%2F", "/").replace('\\', "/")
}

/// Package name of a path under the last `node_modules` segment.
///
/// Scoped packages keep their scope: `.../node_modules/@vue/shared/x.js`
/// yields `@vue/shared`.
pub fn package_name_from_path(path: &str) -> Option<String> {
    let normalized = normalize(path);
    let (_, rest) = normalized.rsplit_once(INSTALL_MARKER)?;
    if rest.is_empty() {
        return None;
    }
    let take = if rest.starts_with('@') { 2 } else { 1 };
    let name = rest.split('/').take(take).collect::<Vec<_>>().join("/");
    (!name.is_empty()).then_some(name)
}

/// Install directory of the package owning `path`.
pub fn package_dir_from_path(path: &str) -> Option<String> {
    let name = package_name_from_path(path)?;
    let normalized = normalize(path);
    let (prefix, _) = normalized.rsplit_once(INSTALL_MARKER)?;
    Some(format!("{prefix}{INSTALL_MARKER}{name}"))
}

struct PackageGroup<'a> {
    info: PackageInfo,
    seen: HashSet<&'a str>,
}

/// Build the package view from finalized chunks and modules.
///
/// `project_root` decides direct vs transitive: a package is direct when any
/// of its files is imported from a path containing the root.
pub fn classify_packages(
    chunks: &[ChunkInfo],
    modules: &[ModuleInfo],
    project_root: Option<&str>,
    manifests: &dyn ManifestReader,
) -> Vec<PackageInfo> {
    let modules_by_id: HashMap<&str, &ModuleInfo> =
        modules.iter().map(|m| (m.id.as_str(), m)).collect();
    let mut groups: IndexMap<(String, String), PackageGroup> = IndexMap::new();

    for module_id in chunks.iter().flat_map(|c| &c.modules) {
        if !is_node_module_path(module_id) {
            continue;
        }
        let (Some(name), Some(dir)) = (
            package_name_from_path(module_id),
            package_dir_from_path(module_id),
        ) else {
            continue;
        };

        let module = modules_by_id.get(module_id.as_str()).copied();
        let transformed_code_size = module.map_or(0, |m| m.build_metrics.last_transformed_size());

        let group = groups
            .entry((name.clone(), dir.clone()))
            .or_insert_with(|| {
                let version = manifests.read_version(Path::new(&dir)).unwrap_or_default();
                PackageGroup {
                    info: PackageInfo {
                        name,
                        version,
                        dir,
                        kind: PackageType::Transitive,
                        transformed_code_size: 0,
                        files: Vec::new(),
                        duplicated: false,
                    },
                    seen: HashSet::default(),
                }
            });

        if !group.seen.insert(module_id.as_str()) {
            continue;
        }
        group.info.transformed_code_size += transformed_code_size;
        group.info.files.push(PackageFile {
            path: module_id.clone(),
            transformed_code_size,
            importers: module
                .map(|m| {
                    m.importers
                        .iter()
                        .map(|path| PackageImporter {
                            path: path.clone(),
                            version: String::new(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        });
    }

    let mut name_counts: HashMap<String, usize> = HashMap::default();
    for (name, _) in groups.keys() {
        *name_counts.entry(name.clone()).or_default() += 1;
    }

    groups
        .into_values()
        .filter_map(|group| {
            let mut info = group.info;
            let is_direct = project_root.is_some_and(|root| {
                info.files.iter().any(|file| {
                    modules_by_id
                        .get(file.path.as_str())
                        .is_some_and(|m| m.importers.iter().any(|i| i.contains(root)))
                })
            });
            info.kind = if is_direct {
                PackageType::Direct
            } else {
                PackageType::Transitive
            };
            info.duplicated = name_counts.get(&info.name).copied().unwrap_or(0) > 1;
            (info.transformed_code_size > 0).then_some(info)
        })
        .collect()
}
