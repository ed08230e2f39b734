//! The ordered, gap-free catalog of steps known to this binary.

use crate::error::{SchemaError, SchemaResult};
use crate::step::Step;

/// Immutable catalog of steps `1..=latest`.
///
/// Built once at startup and handed to the executor; never mutated.
#[derive(Debug, Clone)]
pub struct Registry {
    steps: Vec<Step>,
}

impl Registry {
    /// Build a registry, panicking on a malformed catalog.
    ///
    /// A duplicate, out-of-order or missing version is a programming error
    /// that must stop the process before it touches any database. Prefer
    /// [`try_new`](Self::try_new) when the steps come from test code.
    pub fn new(steps: Vec<Step>) -> Self {
        match Self::try_new(steps) {
            Ok(registry) => registry,
            Err(e) => panic!("{e}"),
        }
    }

    /// Build a registry, returning [`SchemaError::Registry`] on a malformed
    /// catalog.
    pub fn try_new(steps: Vec<Step>) -> SchemaResult<Self> {
        let mut expected = 1;
        for step in &steps {
            if step.version == expected {
                expected += 1;
                continue;
            }
            let reason = if step.version == 0 {
                format!("step '{}' declares version 0", step.name)
            } else if step.version < expected {
                format!(
                    "step '{}' declares version {} after version {} was already registered",
                    step.name,
                    step.version,
                    expected - 1
                )
            } else {
                format!(
                    "step '{}' declares version {} but version {} is missing",
                    step.name, step.version, expected
                )
            };
            return Err(SchemaError::Registry(reason));
        }
        Ok(Self { steps })
    }

    /// The catalog shipped with this binary.
    pub fn cluster() -> Self {
        Self::new(crate::updates::UPDATES.to_vec())
    }

    /// Highest version known to this binary, 0 for an empty registry.
    pub fn latest(&self) -> u32 {
        self.steps.last().map_or(0, |s| s.version)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step producing `version`.
    pub fn step(&self, version: u32) -> SchemaResult<&Step> {
        // Versions are contiguous from 1, so the index is version - 1.
        version
            .checked_sub(1)
            .and_then(|idx| self.steps.get(idx as usize))
            .ok_or(SchemaError::UnknownVersion(version))
    }

    /// Steps with version > `version`, ascending.
    pub fn steps_from(&self, version: u32) -> &[Step] {
        let start = (version as usize).min(self.steps.len());
        &self.steps[start..]
    }

    /// Steps with version in `(from, to]`, ascending.
    pub fn steps_between(&self, from: u32, to: u32) -> SchemaResult<&[Step]> {
        if to > self.latest() {
            return Err(SchemaError::UnknownVersion(to));
        }
        if from >= to {
            return Ok(&[]);
        }
        Ok(&self.steps[from as usize..to as usize])
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
