//! Engine instance registry.
//!
//! The engine owns the live processors and fans the periodic tick out to
//! them. It deliberately is not a process-wide singleton: ownership is
//! explicit, several independent engines can coexist in one process, and
//! whatever drives the tick (a timer owned by the surrounding controller)
//! just holds the engine and calls [`Engine::tick_all`] at its interval.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::host::{HostLink, NullHostLink};
use crate::processor::{
    MatrixInputProcessor, MatrixOutputProcessor, Processor, SoundobjectProcessor,
};
use crate::types::{MatrixInputId, MatrixOutputId, ProcessorId, SoundobjectId};

/// Owns the live processors of one plugin/engine instance.
pub struct Engine {
    config: EngineConfig,
    host: Arc<dyn HostLink>,
    next_id: AtomicU32,
    soundobjects: RwLock<Vec<Arc<SoundobjectProcessor>>>,
    matrix_inputs: RwLock<Vec<Arc<MatrixInputProcessor>>>,
    matrix_outputs: RwLock<Vec<Arc<MatrixOutputProcessor>>>,
}

impl Engine {
    /// Create an engine that talks to the given host boundary.
    ///
    /// Fails only if `config` is invalid.
    pub fn new(config: EngineConfig, host: Arc<dyn HostLink>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            host,
            next_id: AtomicU32::new(0),
            soundobjects: RwLock::new(Vec::new()),
            matrix_inputs: RwLock::new(Vec::new()),
            matrix_outputs: RwLock::new(Vec::new()),
        })
    }

    /// Create an engine with default configuration and no host attached.
    pub fn detached() -> Self {
        // The default configuration is valid by construction.
        Self::new(EngineConfig::default(), Arc::new(NullHostLink))
            .expect("default configuration is valid")
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn mint_id(&self) -> ProcessorId {
        ProcessorId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Create and register a sound-object processor mapped to `object`.
    pub fn add_soundobject(&self, object: SoundobjectId) -> Arc<SoundobjectProcessor> {
        let processor = Arc::new(SoundobjectProcessor::new(
            self.mint_id(),
            object,
            &self.config,
            Arc::clone(&self.host),
        ));
        log::debug!(
            "added soundobject processor {} for object {object}",
            processor.processor_id()
        );
        write_locked(&self.soundobjects).push(Arc::clone(&processor));
        processor
    }

    /// Create and register a matrix-input processor mapped to `channel`.
    pub fn add_matrix_input(&self, channel: MatrixInputId) -> Arc<MatrixInputProcessor> {
        let processor = Arc::new(MatrixInputProcessor::new(
            self.mint_id(),
            channel,
            &self.config,
            Arc::clone(&self.host),
        ));
        log::debug!(
            "added matrix input processor {} for channel {channel}",
            processor.processor_id()
        );
        write_locked(&self.matrix_inputs).push(Arc::clone(&processor));
        processor
    }

    /// Create and register a matrix-output processor mapped to `channel`.
    pub fn add_matrix_output(&self, channel: MatrixOutputId) -> Arc<MatrixOutputProcessor> {
        let processor = Arc::new(MatrixOutputProcessor::new(
            self.mint_id(),
            channel,
            &self.config,
            Arc::clone(&self.host),
        ));
        log::debug!(
            "added matrix output processor {} for channel {channel}",
            processor.processor_id()
        );
        write_locked(&self.matrix_outputs).push(Arc::clone(&processor));
        processor
    }

    /// Unregister a sound-object processor. Returns it if it was registered.
    pub fn remove_soundobject(&self, id: ProcessorId) -> Option<Arc<SoundobjectProcessor>> {
        remove_by_id(&self.soundobjects, id)
    }

    /// Unregister a matrix-input processor. Returns it if it was registered.
    pub fn remove_matrix_input(&self, id: ProcessorId) -> Option<Arc<MatrixInputProcessor>> {
        remove_by_id(&self.matrix_inputs, id)
    }

    /// Unregister a matrix-output processor. Returns it if it was registered.
    pub fn remove_matrix_output(&self, id: ProcessorId) -> Option<Arc<MatrixOutputProcessor>> {
        remove_by_id(&self.matrix_outputs, id)
    }

    /// Snapshot of the registered sound-object processors.
    pub fn soundobjects(&self) -> Vec<Arc<SoundobjectProcessor>> {
        read_locked(&self.soundobjects).clone()
    }

    /// Snapshot of the registered matrix-input processors.
    pub fn matrix_inputs(&self) -> Vec<Arc<MatrixInputProcessor>> {
        read_locked(&self.matrix_inputs).clone()
    }

    /// Snapshot of the registered matrix-output processors.
    pub fn matrix_outputs(&self) -> Vec<Arc<MatrixOutputProcessor>> {
        read_locked(&self.matrix_outputs).clone()
    }

    /// Number of registered processors across all kinds.
    pub fn processor_count(&self) -> usize {
        read_locked(&self.soundobjects).len()
            + read_locked(&self.matrix_inputs).len()
            + read_locked(&self.matrix_outputs).len()
    }

    /// Advance one periodic tick on every registered processor.
    ///
    /// Called by the external driver at roughly
    /// [`EngineConfig::tick_interval_ms`]. Completes in bounded, lock-only
    /// time; it never blocks on I/O.
    pub fn tick_all(&self) {
        for processor in read_locked(&self.soundobjects).iter() {
            processor.tick();
        }
        for processor in read_locked(&self.matrix_inputs).iter() {
            processor.tick();
        }
        for processor in read_locked(&self.matrix_outputs).iter() {
            processor.tick();
        }
    }
}

fn read_locked<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_locked<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn remove_by_id<P: Processor>(lock: &RwLock<Vec<Arc<P>>>, id: ProcessorId) -> Option<Arc<P>> {
    let mut processors = write_locked(lock);
    let index = processors.iter().position(|p| p.processor_id() == id)?;
    Some(processors.remove(index))
}
