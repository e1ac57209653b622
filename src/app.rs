//! Entry point for interface layers.
//!
//! [`App::run`] takes a [`CompileRequest`] through compile, placement and
//! the optional "open result" step, refusing to start while another run
//! holds the [`RunGate`].

use std::sync::atomic::{AtomicBool, Ordering};

use crate::compiler::Compiler;
use crate::config::{CompileRequest, Config};
use crate::error::{CompileError, Result};
use crate::io::PdfReader;
use crate::opener;
use crate::placement::{Placed, Placement};

/// Single "is running" flag guarding the compile action.
#[derive(Debug, Default)]
pub struct RunGate {
    running: AtomicBool,
}

/// Holds the gate closed; reopens it on drop.
#[derive(Debug)]
pub struct RunGuard<'a> {
    gate: &'a RunGate,
}

impl RunGate {
    /// Create an open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the gate for the lifetime of the returned guard.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::AlreadyRunning`] if the gate is closed.
    pub fn try_acquire(&self) -> Result<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CompileError::AlreadyRunning)?;
        Ok(RunGuard { gate: self })
    }

    /// Whether a run currently holds the gate.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.gate.running.store(false, Ordering::Release);
    }
}

/// The compile pipeline wired to its configuration.
#[derive(Debug)]
pub struct App {
    config: Config,
    compiler: Compiler,
    placement: Placement,
    gate: RunGate,
}

impl App {
    /// Validate `config` and build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Other`] carrying the validation message.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            compiler: Compiler::new(&config),
            placement: Placement::new(config.destination.clone()),
            gate: RunGate::new(),
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run gate; closed while [`Self::run`] is in progress.
    pub fn gate(&self) -> &RunGate {
        &self.gate
    }

    /// Compile and place the result of `request`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::AlreadyRunning`] if another run is in
    /// progress, plus any error from compilation or placement.
    pub async fn run(&self, request: &CompileRequest) -> Result<Placed> {
        let _guard = self.gate.try_acquire()?;
        log::info!("Compiling {}", request.describe());

        let compiled = self.compiler.compile(request).await?;
        let placed = self.placement.place(compiled, request).await?;

        if self.config.open_result {
            opener::open(&placed.destination).await;
        }

        Ok(placed)
    }

    /// Open the bundled help document.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::FileNotFound`] if the document is missing.
    pub async fn open_help(&self) -> Result<bool> {
        let path = &self.config.help_document;
        PdfReader::check_path_exists(path)?;
        Ok(opener::open(path).await)
    }
}
