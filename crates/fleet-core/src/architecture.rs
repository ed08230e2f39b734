//! CPU architecture identifiers stored in the cluster database.
//!
//! The numeric ids are persisted (e.g. `nodes.arch`) and must never be
//! renumbered.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A CPU architecture a cluster member can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    I686,
    X86_64,
    Armv7l,
    Aarch64,
    Ppc,
    Ppc64,
    Ppc64le,
    S390x,
    Mips,
    Mips64,
    Riscv32,
    Riscv64,
    Loongarch64,
}

const ALL: [Architecture; 13] = [
    Architecture::I686,
    Architecture::X86_64,
    Architecture::Armv7l,
    Architecture::Aarch64,
    Architecture::Ppc,
    Architecture::Ppc64,
    Architecture::Ppc64le,
    Architecture::S390x,
    Architecture::Mips,
    Architecture::Mips64,
    Architecture::Riscv32,
    Architecture::Riscv64,
    Architecture::Loongarch64,
];

impl Architecture {
    /// Persisted numeric id.
    pub fn id(self) -> i64 {
        match self {
            Architecture::I686 => 1,
            Architecture::X86_64 => 2,
            Architecture::Armv7l => 3,
            Architecture::Aarch64 => 4,
            Architecture::Ppc => 5,
            Architecture::Ppc64 => 6,
            Architecture::Ppc64le => 7,
            Architecture::S390x => 8,
            Architecture::Mips => 9,
            Architecture::Mips64 => 10,
            Architecture::Riscv32 => 11,
            Architecture::Riscv64 => 12,
            Architecture::Loongarch64 => 13,
        }
    }

    /// Kernel-style name (`uname -m`).
    pub fn name(self) -> &'static str {
        match self {
            Architecture::I686 => "i686",
            Architecture::X86_64 => "x86_64",
            Architecture::Armv7l => "armv7l",
            Architecture::Aarch64 => "aarch64",
            Architecture::Ppc => "ppc",
            Architecture::Ppc64 => "ppc64",
            Architecture::Ppc64le => "ppc64le",
            Architecture::S390x => "s390x",
            Architecture::Mips => "mips",
            Architecture::Mips64 => "mips64",
            Architecture::Riscv32 => "riscv32",
            Architecture::Riscv64 => "riscv64",
            Architecture::Loongarch64 => "loongarch64",
        }
    }

    /// Look up an architecture by its persisted id.
    pub fn from_id(id: i64) -> CoreResult<Self> {
        ALL.into_iter()
            .find(|arch| arch.id() == id)
            .ok_or_else(|| CoreError::UnknownArchitecture(id.to_string()))
    }

    /// Look up an architecture by kernel name, accepting common aliases.
    pub fn from_name(name: &str) -> CoreResult<Self> {
        let canonical = match name {
            "x86" | "i386" | "i586" => "i686",
            "amd64" => "x86_64",
            "arm" | "armhf" | "armv7" => "armv7l",
            "arm64" => "aarch64",
            "powerpc" => "ppc",
            "powerpc64" => "ppc64",
            "ppc64el" | "powerpc64le" => "ppc64le",
            "loong64" => "loongarch64",
            other => other,
        };
        ALL.into_iter()
            .find(|arch| arch.name() == canonical)
            .ok_or_else(|| CoreError::UnknownArchitecture(name.to_string()))
    }

    /// Architecture of the running binary.
    pub fn local() -> CoreResult<Self> {
        let name = std::env::consts::ARCH;
        if name == "powerpc64" && cfg!(target_endian = "little") {
            return Ok(Architecture::Ppc64le);
        }
        Self::from_name(name)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "architecture_test.rs"]
mod tests;
