//! Loading a schema source file and its transitive imports into a
//! resolved bundle.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use rengbis_parser::{parse_document, Definition, Document};
use rengbis_schema::Schema;
use tracing::debug;

/// The loader's output: the table of named definitions plus the
/// optional root schema. Every entry is fully resolved (its
/// `dependencies` are empty), so a bundle can be handed straight to the
/// validator.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaBundle {
    pub definitions: IndexMap<String, Schema>,
    pub root: Option<Schema>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Syntax(#[from] rengbis_parser::SyntaxError),
    #[error("could not read `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("import `{namespace}` not found: {path}")]
    ImportNotFound { namespace: String, path: String },
    #[error("definition `{name}` is declared more than once")]
    DuplicateDefinition { name: String },
    #[error("unresolved references: {}", .names.join(", "))]
    UnresolvedReferences { names: Vec<String> },
    #[error("cyclic definitions: {}", .names.join(", "))]
    CycleDetected { names: Vec<String> },
}

impl SchemaBundle {
    /// Load a schema file, resolving its imports relative to the file's
    /// directory. A pure function of the file system at the moment of
    /// the call; nothing is cached across calls.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Loader::default().load_file(path.as_ref())
    }

    /// Resolve a single document given as text. Imports are rejected
    /// because there is no directory to resolve them against; use
    /// [`SchemaBundle::from_source_in`] to provide one.
    pub fn from_source(source: &str) -> Result<Self, LoadError> {
        let document = parse_document(source)?;
        Loader::default().resolve_document(document, None)
    }

    /// Resolve a document given as text, with imports resolved relative
    /// to `base`.
    pub fn from_source_in(source: &str, base: impl AsRef<Path>) -> Result<Self, LoadError> {
        let document = parse_document(source)?;
        Loader::default().resolve_document(document, Some(base.as_ref()))
    }
}

/// State for one top-level load call: resolved files cached by
/// canonical path so diamond imports load once, and the in-flight stack
/// for import-cycle detection.
#[derive(Default)]
struct Loader {
    cache: HashMap<PathBuf, SchemaBundle>,
    in_flight: Vec<PathBuf>,
}

impl Loader {
    fn load_file(&mut self, path: &Path) -> Result<SchemaBundle, LoadError> {
        let canonical = path.canonicalize().map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(bundle) = self.cache.get(&canonical) {
            debug!(path = %canonical.display(), "import cache hit");
            return Ok(bundle.clone());
        }
        if self.in_flight.contains(&canonical) {
            let names = self
                .in_flight
                .iter()
                .chain([&canonical])
                .map(|path| file_label(path))
                .collect();
            return Err(LoadError::CycleDetected { names });
        }

        debug!(path = %canonical.display(), "loading schema file");
        let source = fs::read_to_string(&canonical).map_err(|source| LoadError::Io {
            path: canonical.clone(),
            source,
        })?;
        self.in_flight.push(canonical.clone());
        let resolved = match parse_document(&source) {
            Ok(document) => self.resolve_document(document, canonical.parent()),
            Err(error) => Err(error.into()),
        };
        self.in_flight.pop();

        let bundle = resolved?;
        self.cache.insert(canonical, bundle.clone());
        Ok(bundle)
    }

    fn resolve_document(
        &mut self,
        document: Document,
        base: Option<&Path>,
    ) -> Result<SchemaBundle, LoadError> {
        let mut table: IndexMap<String, Schema> = IndexMap::new();
        let insert = |table: &mut IndexMap<String, Schema>, name: String, schema: Schema| {
            if table.insert(name.clone(), schema).is_some() {
                return Err(LoadError::DuplicateDefinition { name });
            }
            Ok(())
        };

        for definition in document.definitions {
            match definition {
                Definition::Named { name, schema } => insert(&mut table, name, schema)?,
                Definition::Import { namespace, path } => {
                    let Some(base) = base else {
                        return Err(LoadError::ImportNotFound { namespace, path });
                    };
                    let imported =
                        self.load_file(&base.join(&path))
                            .map_err(|error| match error {
                                LoadError::Io { .. } => LoadError::ImportNotFound {
                                    namespace: namespace.clone(),
                                    path: path.clone(),
                                },
                                other => other,
                            })?;
                    if let Some(root) = imported.root {
                        insert(&mut table, namespace.clone(), root)?;
                    }
                    for (name, schema) in imported.definitions {
                        insert(&mut table, format!("{namespace}.{name}"), schema)?;
                    }
                }
            }
        }

        let definitions = resolve_table(table)?;
        let root = match document.root {
            Some(schema) => {
                let resolved =
                    schema
                        .substitute(&definitions)
                        .map_err(|error| LoadError::CycleDetected {
                            names: error.names,
                        })?;
                let leftover: Vec<String> = resolved
                    .dependencies()
                    .iter()
                    .map(|reference| reference.key())
                    .collect();
                if !leftover.is_empty() {
                    return Err(LoadError::UnresolvedReferences { names: leftover });
                }
                Some(resolved)
            }
            None => None,
        };
        Ok(SchemaBundle { definitions, root })
    }
}

/// Iterative fixpoint resolution: substitute the dependency-free
/// definitions into the pending ones until everything is free, then
/// classify whatever is left as unresolved names or a cycle.
fn resolve_table(table: IndexMap<String, Schema>) -> Result<IndexMap<String, Schema>, LoadError> {
    let known: IndexSet<String> = table.keys().cloned().collect();
    let mut resolved: IndexMap<String, Schema> = IndexMap::new();
    let mut pending: Vec<(String, Schema)> = table.into_iter().collect();

    while !pending.is_empty() {
        let mut made_progress = false;
        let mut still_pending = Vec::new();
        for (name, schema) in pending {
            let ready = schema
                .dependencies()
                .iter()
                .all(|reference| resolved.contains_key(&reference.key()));
            if ready {
                let expanded =
                    schema
                        .substitute(&resolved)
                        .map_err(|error| LoadError::CycleDetected {
                            names: error.names,
                        })?;
                resolved.insert(name, expanded);
                made_progress = true;
            } else {
                still_pending.push((name, schema));
            }
        }
        pending = still_pending;
        debug!(
            resolved = resolved.len(),
            pending = pending.len(),
            "resolution round"
        );

        if !pending.is_empty() && !made_progress {
            let unknown: IndexSet<String> = pending
                .iter()
                .flat_map(|(_, schema)| schema.dependencies())
                .map(|reference| reference.key())
                .filter(|key| !known.contains(key))
                .collect();
            if !unknown.is_empty() {
                return Err(LoadError::UnresolvedReferences {
                    names: unknown.into_iter().collect(),
                });
            }
            return Err(LoadError::CycleDetected {
                names: pending.into_iter().map(|(name, _)| name).collect(),
            });
        }
    }
    Ok(resolved)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
