//! Late-bound processor selection.
//!
//! Configuration names processors by string identifier; the registry maps
//! identifiers to factory closures so a concrete mutation strategy can be
//! selected at run time without any reflection. The embedding application
//! populates the registry at startup (the CLI registers the built-ins).

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{ProcessorError, RegistryError};
use crate::post::PostProcessor;
use crate::processor::Processor;
use crate::processors::{BasicProcessor, ExplainProcessor, HeaderInjectProcessor};

/// Opaque named-argument mapping passed through to a processor factory.
pub type ProcessorArgs = Map<String, Value>;

type ProcessorFactory = Box<dyn Fn(&ProcessorArgs) -> Result<Box<dyn Processor>, ProcessorError>>;
type PostProcessorFactory =
    Box<dyn Fn(&ProcessorArgs) -> Result<Box<dyn PostProcessor>, ProcessorError>>;

/// Registry mapping string identifiers to processor factories.
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: BTreeMap<String, ProcessorFactory>,
    post_processors: BTreeMap<String, PostProcessorFactory>,
}

impl ProcessorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in processors registered under
    /// their canonical names (`basic`, `explain`, `header-inject`).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("basic", |args| {
            Ok(Box::new(BasicProcessor::from_args(args)?) as Box<dyn Processor>)
        });
        registry.register("explain", |args| {
            Ok(Box::new(ExplainProcessor::from_args(args)?) as Box<dyn Processor>)
        });
        registry.register_post("header-inject", |args| {
            Ok(Box::new(HeaderInjectProcessor::from_args(args)?) as Box<dyn PostProcessor>)
        });
        registry
    }

    /// Register a processor factory under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ProcessorArgs) -> Result<Box<dyn Processor>, ProcessorError> + 'static,
    {
        self.processors.insert(name.into(), Box::new(factory));
    }

    /// Register a post-processor factory under `name`.
    pub fn register_post<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ProcessorArgs) -> Result<Box<dyn PostProcessor>, ProcessorError> + 'static,
    {
        self.post_processors.insert(name.into(), Box::new(factory));
    }

    /// Construct processors for the configured `names`, in order.
    ///
    /// `args` supplies the per-processor argument mapping; names without
    /// an entry get empty arguments.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unknown`] listing every unregistered name
    /// before constructing anything, or [`RegistryError::Construct`] when
    /// a factory rejects its arguments.
    pub fn resolve(
        &self,
        names: &[String],
        args: &BTreeMap<String, ProcessorArgs>,
    ) -> Result<Vec<Box<dyn Processor>>, RegistryError> {
        let unknown = self.unknown_names(names, &self.processors);
        if !unknown.is_empty() {
            return Err(RegistryError::Unknown(unknown));
        }

        let empty = ProcessorArgs::new();
        names
            .iter()
            .map(|name| {
                let factory = &self.processors[name];
                factory(args.get(name).unwrap_or(&empty)).map_err(|source| {
                    RegistryError::Construct {
                        name: name.clone(),
                        source,
                    }
                })
            })
            .collect()
    }

    /// Construct post-processors for the configured `names`, in order.
    ///
    /// Call once per output file: post-processor instances must not be
    /// shared across files.
    ///
    /// # Errors
    ///
    /// Same policy as [`resolve`](Self::resolve).
    pub fn resolve_post(
        &self,
        names: &[String],
        args: &BTreeMap<String, ProcessorArgs>,
    ) -> Result<Vec<Box<dyn PostProcessor>>, RegistryError> {
        let unknown = self.unknown_names(names, &self.post_processors);
        if !unknown.is_empty() {
            return Err(RegistryError::Unknown(unknown));
        }

        let empty = ProcessorArgs::new();
        names
            .iter()
            .map(|name| {
                let factory = &self.post_processors[name];
                factory(args.get(name).unwrap_or(&empty)).map_err(|source| {
                    RegistryError::Construct {
                        name: name.clone(),
                        source,
                    }
                })
            })
            .collect()
    }

    fn unknown_names<V>(&self, names: &[String], table: &BTreeMap<String, V>) -> Vec<String> {
        names
            .iter()
            .filter(|name| !table.contains_key(*name))
            .cloned()
            .collect()
    }
}
