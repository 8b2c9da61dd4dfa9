//! Suite declarations
//!
//! Each suite module exposes a pure `descriptors()` function returning its
//! test-case table; `register_all` is the explicit top-level assembly step.
//! There is no ambient global registry and no directory scanning: adding a
//! suite means adding a module and listing it here.

pub mod obj;
pub mod pmem;

use crate::runtime::TestRegistry;
use shared::SharedResult;

/// Register every declared suite into the given registry
pub fn register_all(registry: &mut TestRegistry) -> SharedResult<()> {
    for descriptor in obj::descriptors().into_iter().chain(pmem::descriptors()) {
        registry.register(descriptor)?;
    }
    Ok(())
}
