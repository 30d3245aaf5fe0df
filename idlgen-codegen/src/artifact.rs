//! Generated artifacts and their file names.

use std::fmt;
use std::path::{Path, PathBuf};

use idlgen_schema::to_snake_case;

use crate::error::Result;

/// Kind of a generated source artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Typedefs, enums and struct layouts of a program.
    Types,
    /// Reader and writer implementations of a program's structs.
    TypesImpl,
    /// Declaration of the constants holder.
    Constants,
    /// Initialization of the constants holder and its global instance.
    ConstantsImpl,
    /// Handler trait, argument structs and action types of a service.
    Service,
    /// Action implementations and client calls of a service.
    ServiceImpl,
    /// Example handler implementation of a service.
    ServerSkeleton,
}

impl ArtifactKind {
    /// Module name of this artifact for a program or service named `owner`.
    #[must_use]
    pub fn module_name(self, owner: &str) -> String {
        let owner = to_snake_case(owner);
        let suffix = match self {
            Self::Types => "types",
            Self::TypesImpl => "types_impl",
            Self::Constants => "constants",
            Self::ConstantsImpl => "constants_impl",
            Self::Service => "service",
            Self::ServiceImpl => "service_impl",
            Self::ServerSkeleton => "server_skeleton",
        };
        format!("{owner}_{suffix}")
    }

    /// Returns true for artifacts emitted once per service.
    #[must_use]
    pub const fn is_per_service(self) -> bool {
        matches!(self, Self::Service | Self::ServiceImpl | Self::ServerSkeleton)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Types => "types",
            Self::TypesImpl => "types impl",
            Self::Constants => "constants",
            Self::ConstantsImpl => "constants impl",
            Self::Service => "service",
            Self::ServiceImpl => "service impl",
            Self::ServerSkeleton => "server skeleton",
        };
        f.write_str(name)
    }
}

/// One generated source file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// What the file contains.
    pub kind: ArtifactKind,
    /// Module name, also the file stem.
    pub module: String,
    /// Rust source text.
    pub contents: String,
}

impl GeneratedFile {
    /// Creates a file for the artifact `kind` owned by `owner`.
    #[must_use]
    pub fn new(kind: ArtifactKind, owner: &str, contents: String) -> Self {
        Self {
            kind,
            module: kind.module_name(owner),
            contents,
        }
    }

    /// File name, `<module>.rs`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.rs", self.module)
    }

    /// Writes the file into `dir` and returns its path.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if the file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        std::fs::write(&path, &self.contents)?;
        tracing::info!(path = %path.display(), kind = %self.kind, "wrote artifact");
        Ok(path)
    }
}
