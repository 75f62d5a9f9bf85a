//! Stub factory: synthesize, build and instantiate in one step
//!
//! Compiled units are memoized per target binary name so that concurrent
//! or repeated requests for the same target share one generated type.

use crate::bridge::{BuildBridge, CompileRequest, CompiledUnit};
use crate::common::config::Config;
use crate::common::error::{Error, Result};
use crate::synth::{GeneratedUnit, SignatureSynthesizer};
use crate::types::TypeDescriptor;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Instance type produced by a bridge's compiled units
pub type InstanceOf<B> = <<B as BuildBridge>::Unit as CompiledUnit>::Instance;

type UnitCell<U> = Arc<OnceCell<Arc<U>>>;

pub struct StubFactory<B: BuildBridge> {
    bridge: B,
    config: Config,
    synthesizer: SignatureSynthesizer,
    units: Mutex<HashMap<String, UnitCell<B::Unit>>>,
}

impl<B: BuildBridge> StubFactory<B> {
    pub fn new(bridge: B, config: Config) -> Result<Self> {
        config.validate()?;
        let synthesizer = SignatureSynthesizer::new(&config);
        Ok(Self {
            bridge,
            config,
            synthesizer,
            units: Mutex::new(HashMap::new()),
        })
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Source text that would be built for `target`
    pub fn generate(&self, target: &TypeDescriptor) -> GeneratedUnit {
        self.synthesizer.synthesize(target)
    }

    /// Build a subtype of `target` and return a fresh instance of it.
    ///
    /// Any compile, load or construction failure aborts the whole operation
    /// with [`Error::InstantiationFailure`].
    pub fn synthesize_and_instantiate(&self, target: &TypeDescriptor) -> Result<InstanceOf<B>> {
        let unit = self.compiled_unit(target)?;
        unit.new_instance()
            .map_err(|e| Error::instantiation_failure(target.binary_name(), format!("{:#}", e)))
    }

    /// Compiled unit for `target`, built on first use when memoizing
    pub fn compiled_unit(&self, target: &TypeDescriptor) -> Result<Arc<B::Unit>> {
        if !self.config.memoize {
            return self.build(target).map(Arc::new);
        }
        let cell = {
            let mut units = self.units.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(units.entry(target.binary_name().to_string()).or_default())
        };
        if let Some(unit) = cell.get() {
            log::debug!("reusing compiled subtype {} for {}", unit.name(), target.binary_name());
        }
        // Concurrent callers block here until the first build finishes; a
        // failed build leaves the cell empty for the next request.
        cell.get_or_try_init(|| self.build(target).map(Arc::new)).map(Arc::clone)
    }

    /// Forget memoized units
    pub fn clear(&self) {
        self.units.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
    }

    fn build(&self, target: &TypeDescriptor) -> Result<B::Unit> {
        build_unit(&self.bridge, &self.synthesizer.synthesize(target), target, &self.config)
    }
}

fn build_unit<B: BuildBridge>(bridge: &B, unit: &GeneratedUnit, target: &TypeDescriptor, config: &Config) -> Result<B::Unit> {
    let unit_name = unit.qualified_name();
    let request = CompileRequest {
        unit_name: &unit_name,
        source: &unit.source,
        parent: target.loader(),
        options: &config.compiler_options,
        ignore_warnings: config.ignore_warnings,
    };
    log::debug!("building {} for {}", unit_name, target.binary_name());
    bridge
        .compile(&request)
        .map_err(|e| Error::instantiation_failure(target.binary_name(), format!("{:#}", e)))
}

/// One-shot synthesis without memoization
pub fn synthesize_and_instantiate<B: BuildBridge>(bridge: &B, target: &TypeDescriptor, config: &Config) -> Result<InstanceOf<B>> {
    let unit = SignatureSynthesizer::new(config).synthesize(target);
    build_unit(bridge, &unit, target, config)?
        .new_instance()
        .map_err(|e| Error::instantiation_failure(target.binary_name(), format!("{:#}", e)))
}
