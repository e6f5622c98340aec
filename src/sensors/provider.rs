//! State providers: where snapshots come from.
//!
//! [`SysfsProvider`] reads one file per field below a sysfs directory exposed
//! by the EC kernel module. [`ScriptedProvider`] replays canned snapshots for
//! tests and demos.

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::core::errors::{FanError, Result};
use crate::sensors::registry::FieldId;
use crate::sensors::snapshot::{Snapshot, Value};

/// Source of sensor snapshots. A provider returns every field or an error,
/// never a partial record.
pub trait StateProvider {
    fn snapshot(&self) -> Result<Snapshot>;
}

impl<P: StateProvider + ?Sized> StateProvider for &P {
    fn snapshot(&self) -> Result<Snapshot> {
        (**self).snapshot()
    }
}

/// Reads `<root>/<field file>` for every field.
#[derive(Debug, Clone)]
pub struct SysfsProvider {
    root: PathBuf,
    module_name: String,
}

impl SysfsProvider {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, module_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            module_name: module_name.into(),
        }
    }

    /// Fail early when the sensor directory is absent, which almost always
    /// means the kernel module is not loaded.
    pub fn check_present(&self) -> Result<()> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(FanError::ModuleNotLoaded {
                module: self.module_name.clone(),
                path: self.root.clone(),
            })
        }
    }

    fn read_field(&self, id: FieldId) -> Result<Value> {
        let path = self.root.join(id.sysfs_name());
        let raw = fs::read_to_string(&path).map_err(|err| FanError::SensorRead {
            path: path.clone(),
            details: err.to_string(),
        })?;
        Ok(Value::parse(&raw))
    }
}

impl StateProvider for SysfsProvider {
    fn snapshot(&self) -> Result<Snapshot> {
        FieldId::ALL
            .into_iter()
            .map(|id| self.read_field(id).map(|value| (id, value)))
            .collect()
    }
}

/// Replays a queue of results; the last successful snapshot repeats once
/// the queue is exhausted.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<Result<Snapshot>>>,
    last: Mutex<Option<Snapshot>>,
    calls: Mutex<usize>,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that always returns `snapshot`.
    #[must_use]
    pub fn constant(snapshot: Snapshot) -> Self {
        let provider = Self::new();
        provider.push(Ok(snapshot));
        provider
    }

    pub fn push(&self, result: Result<Snapshot>) {
        self.queue.lock().push_back(result);
    }

    /// Number of `snapshot()` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

impl StateProvider for ScriptedProvider {
    fn snapshot(&self) -> Result<Snapshot> {
        *self.calls.lock() += 1;
        let next = self.queue.lock().pop_front();
        match next {
            Some(Ok(snapshot)) => {
                *self.last.lock() = Some(snapshot.clone());
                Ok(snapshot)
            }
            Some(Err(err)) => Err(err),
            None => self.last.lock().clone().ok_or_else(|| FanError::Runtime {
                details: "scripted provider has no snapshot to replay".to_string(),
            }),
        }
    }
}
