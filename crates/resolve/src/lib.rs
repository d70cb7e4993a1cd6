//! Deploy file resolution: turns a repository checkout plus include/exclude
//! rules into the concrete, ordered list of files to ship.
//!
//! # Pipeline
//!
//! 1. **Match**: compile rule lists into [`Matcher`]s
//! 2. **Walk**: expand accepted top-level entries into files
//! 3. **Resolve**: apply precedence and produce a [`ResolutionSet`]
//! 4. **Map**: translate each local file into its remote path

pub mod error;
pub mod mapper;
pub mod pattern;
pub mod resolver;
pub mod walker;

pub use error::ResolveError;
pub use mapper::RemotePathMapper;
pub use pattern::Matcher;
pub use resolver::{Resolution, ResolutionSet, VCS_METADATA_DIR, resolve};
pub use walker::{Walk, WalkDiagnostic, walk};
