use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lineage_classfile::ClassStub;
use walkdir::WalkDir;

use crate::error::{LoadError, Result};

/// Source of parsed classfiles, keyed by binary name (`com.example.Foo`).
pub trait ClassProvider {
    fn lookup(&self, binary_name: &str) -> Result<Option<ClassStub>>;
}

impl<T: ClassProvider + ?Sized> ClassProvider for &T {
    fn lookup(&self, binary_name: &str) -> Result<Option<ClassStub>> {
        (**self).lookup(binary_name)
    }
}

/// Stubs held in memory.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    stubs: HashMap<String, ClassStub>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stub: ClassStub) {
        self.stubs.insert(stub.binary_name(), stub);
    }

    /// Parses `bytes` and stores the result; returns the binary name it was stored under.
    pub fn insert_bytes(&mut self, bytes: &[u8]) -> Result<String> {
        let stub = ClassStub::parse(bytes).map_err(|source| LoadError::Classfile {
            name: "<memory>".to_string(),
            source,
        })?;
        let name = stub.binary_name();
        self.stubs.insert(name.clone(), stub);
        Ok(name)
    }

    pub fn binary_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stubs.keys().map(String::as_str)
    }
}

impl ClassProvider for MemoryProvider {
    fn lookup(&self, binary_name: &str) -> Result<Option<ClassStub>> {
        Ok(self.stubs.get(binary_name).cloned())
    }
}

/// An exploded class directory (`<root>/com/example/Foo.class`).
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Binary names of every `.class` file under the root, sorted.
    pub fn binary_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|err| {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone());
                LoadError::Io {
                    path,
                    source: io::Error::other(err),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let Some(internal) = relative
                .to_str()
                .and_then(|path| path.strip_suffix(".class"))
            else {
                continue;
            };
            // `module-info.class` and `package-info.class` are not types.
            if internal.ends_with("module-info") || internal.ends_with("package-info") {
                continue;
            }
            names.push(internal.replace(['/', '\\'], "."));
        }
        names.sort();
        Ok(names)
    }

    fn path_for(&self, binary_name: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in binary_name.split('.') {
            path.push(segment);
        }
        path.set_extension("class");
        path
    }
}

impl ClassProvider for DirectoryProvider {
    fn lookup(&self, binary_name: &str) -> Result<Option<ClassStub>> {
        let path = self.path_for(binary_name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(LoadError::Io { path, source }),
        };
        let stub = ClassStub::parse(&bytes).map_err(|source| LoadError::Classfile {
            name: binary_name.to_string(),
            source,
        })?;
        if stub.binary_name() != binary_name {
            return Err(LoadError::NameMismatch {
                expected: binary_name.to_string(),
                found: stub.binary_name(),
            });
        }
        Ok(Some(stub))
    }
}

/// Consults providers in order; the first hit wins.
pub struct ChainProvider<'a> {
    providers: Vec<&'a dyn ClassProvider>,
}

impl<'a> ChainProvider<'a> {
    pub fn new(providers: Vec<&'a dyn ClassProvider>) -> Self {
        Self { providers }
    }
}

impl ClassProvider for ChainProvider<'_> {
    fn lookup(&self, binary_name: &str) -> Result<Option<ClassStub>> {
        for provider in &self.providers {
            if let Some(stub) = provider.lookup(binary_name)? {
                return Ok(Some(stub));
            }
        }
        Ok(None)
    }
}
