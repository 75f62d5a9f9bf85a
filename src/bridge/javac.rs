//! Build bridge backed by the `javac` tool
//!
//! Each request is compiled in its own scratch directory; the produced class
//! images are defined in a shared [`InMemoryClassLoader`]. Constructing an
//! object from a defined class is left to the host VM, so units hand out
//! [`DefinedClass`] handles.

use super::{BuildBridge, CompileRequest, CompiledUnit};
use crate::common::classpath::ClasspathResolver;
use crate::common::config::Config;
use crate::consts::CLASS_FILE_MAGIC;
use anyhow::{anyhow, bail, Context};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use walkdir::WalkDir;

/// Bytes of one class file together with its binary name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassImage {
    pub binary_name: String,
    pub bytes: Vec<u8>,
}

/// Class definitions shared by every unit compiled through one bridge.
///
/// A binary name can be defined once; a second definition is rejected the
/// way a JVM class loader rejects a duplicate class.
#[derive(Debug, Default)]
pub struct InMemoryClassLoader {
    classes: Mutex<HashMap<String, Arc<ClassImage>>>,
}

impl InMemoryClassLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define all `images` or none of them
    pub fn define_all(&self, images: Vec<ClassImage>) -> anyhow::Result<Vec<Arc<ClassImage>>> {
        let mut classes = self.classes.lock().map_err(|_| anyhow!("class loader lock poisoned"))?;
        if let Some(dup) = images.iter().find(|image| classes.contains_key(&image.binary_name)) {
            bail!("duplicate class definition: {}", dup.binary_name);
        }
        let mut defined = Vec::with_capacity(images.len());
        for image in images {
            let image = Arc::new(image);
            classes.insert(image.binary_name.clone(), Arc::clone(&image));
            defined.push(image);
        }
        Ok(defined)
    }

    pub fn find(&self, binary_name: &str) -> Option<Arc<ClassImage>> {
        let classes = self.classes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        classes.get(binary_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.classes.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle to a class defined in an [`InMemoryClassLoader`]
#[derive(Debug, Clone)]
pub struct DefinedClass {
    pub image: Arc<ClassImage>,
    pub loader: Arc<InMemoryClassLoader>,
}

impl DefinedClass {
    pub fn binary_name(&self) -> &str {
        &self.image.binary_name
    }
}

/// Output of one `javac` run: the primary class and everything compiled with it
#[derive(Debug)]
pub struct CompiledClasses {
    name: String,
    images: Vec<Arc<ClassImage>>,
    loader: Arc<InMemoryClassLoader>,
}

impl CompiledClasses {
    pub fn images(&self) -> &[Arc<ClassImage>] {
        &self.images
    }
}

impl CompiledUnit for CompiledClasses {
    type Instance = DefinedClass;

    fn name(&self) -> &str {
        &self.name
    }

    fn new_instance(&self) -> anyhow::Result<DefinedClass> {
        let image = self
            .loader
            .find(&self.name)
            .ok_or_else(|| anyhow!("class {} is not defined", self.name))?;
        Ok(DefinedClass { image, loader: Arc::clone(&self.loader) })
    }
}

pub struct JavacBridge {
    javac: PathBuf,
    classpath: Option<String>,
    loader: Arc<InMemoryClassLoader>,
}

impl JavacBridge {
    pub fn new(config: &Config) -> Self {
        Self {
            javac: config.javac.clone(),
            classpath: config.classpath.clone(),
            loader: Arc::new(InMemoryClassLoader::new()),
        }
    }

    /// Share an existing loader instead of starting with an empty one
    pub fn with_loader(mut self, loader: Arc<InMemoryClassLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn loader(&self) -> &Arc<InMemoryClassLoader> {
        &self.loader
    }

    fn run_javac(&self, request: &CompileRequest<'_>, source_file: &Path, out_dir: &Path) -> anyhow::Result<()> {
        let classpath = ClasspathResolver::for_parent(request.parent, self.classpath.as_deref());
        log::debug!(
            "javac: compiling {} against classpath {}",
            request.unit_name,
            classpath
        );
        let output = Command::new(&self.javac)
            .arg("-d")
            .arg(out_dir)
            .arg("-classpath")
            .arg(classpath.to_string())
            .args(request.options)
            .arg(source_file)
            .output()
            .with_context(|| format!("failed to run {}", self.javac.display()))?;

        let mut diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();
        diagnostics.push_str(&String::from_utf8_lossy(&output.stdout));
        if !output.status.success() {
            bail!("{}", diagnostics.trim());
        }
        for line in diagnostics.lines().filter(|l| !l.trim().is_empty()) {
            if request.ignore_warnings {
                log::debug!("javac: {}", line);
            } else {
                log::warn!("javac: {}", line);
            }
        }
        Ok(())
    }
}

impl BuildBridge for JavacBridge {
    type Unit = CompiledClasses;

    fn compile(&self, request: &CompileRequest<'_>) -> anyhow::Result<CompiledClasses> {
        let scratch = tempfile::Builder::new()
            .prefix("stubsynth-")
            .tempdir()
            .context("cannot create scratch directory")?;
        let src_dir = scratch.path().join("src");
        let out_dir = scratch.path().join("classes");

        let (package, simple) = match request.unit_name.rsplit_once('.') {
            Some((package, simple)) => (Some(package), simple),
            None => (None, request.unit_name),
        };
        let mut package_dir = src_dir.clone();
        if let Some(package) = package {
            package_dir.extend(package.split('.'));
        }
        fs::create_dir_all(&package_dir)?;
        fs::create_dir_all(&out_dir)?;
        let source_file = package_dir.join(format!("{}.java", simple));
        fs::write(&source_file, request.source)?;

        self.run_javac(request, &source_file, &out_dir)?;

        let images = collect_class_images(&out_dir)?;
        if !images.iter().any(|image| image.binary_name == request.unit_name) {
            bail!("javac produced no class file for {}", request.unit_name);
        }
        let images = self.loader.define_all(images)?;
        log::debug!("javac: defined {} class(es) for {}", images.len(), request.unit_name);

        Ok(CompiledClasses {
            name: request.unit_name.to_string(),
            images,
            loader: Arc::clone(&self.loader),
        })
    }
}

/// Read every `.class` file under `root`, named by its path relative to `root`
fn collect_class_images(root: &Path) -> anyhow::Result<Vec<ClassImage>> {
    let mut images = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("class") {
            continue;
        }
        let relative = path.strip_prefix(root)?.with_extension("");
        let binary_name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join(".");
        let bytes = fs::read(path)?;
        if !bytes.starts_with(&CLASS_FILE_MAGIC) {
            bail!("{} is not a class file", path.display());
        }
        images.push(ClassImage { binary_name, bytes });
    }
    images.sort_by(|a, b| a.binary_name.cmp(&b.binary_name));
    Ok(images)
}
