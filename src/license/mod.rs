//! License collaborators consumed by the summarizers.
//!
//! - [`spdx`]: free-text / ScanCode-key normalization into SPDX expressions.
//! - [`classifier`]: license-file naming conventions and license root
//!   locations derived from package coordinates.
//!
//! Both sit behind traits so callers can inject their own implementations;
//! summarizers never reach for global state.

use crate::models::Coordinates;

pub mod classifier;
pub mod spdx;

pub use classifier::NameClassifier;
pub use spdx::SpdxNormalizer;

/// Placeholder meaning "the tool could not tell".
pub const NOASSERTION: &str = "NOASSERTION";
/// Placeholder meaning "explicitly no license".
pub const NONE: &str = "NONE";

/// Turns raw license text into a canonical SPDX expression.
pub trait LicenseNormalizer: Send + Sync {
    /// Normalize `raw`, returning `None` when nothing in it is recognizable.
    fn normalize(&self, raw: &str) -> Option<String>;

    /// Whether `expression` is a real declared license rather than a placeholder.
    fn is_valid_declared(&self, expression: &str) -> bool {
        let trimmed = expression.trim();
        !trimmed.is_empty() && trimmed != NOASSERTION && trimmed != NONE
    }
}

/// Knows where licenses conventionally live inside a package.
pub trait LicenseFileClassifier: Send + Sync {
    /// Whether `path` is conventionally a license file (`LICENSE`, `COPYING.md`, ...).
    fn is_license_file(&self, path: &str, coordinates: &Coordinates) -> bool;

    /// Directory prefixes (with trailing `/`) that hold the package's license files.
    fn license_root_locations(&self, coordinates: &Coordinates) -> Vec<String>;
}
