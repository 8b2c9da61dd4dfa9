//! Test Registry
//!
//! Collects test-case descriptors from suite modules. Registration is the
//! only mutation; iteration yields descriptors in registration order and is
//! restartable. Duplicate ids are rejected so every outcome maps back to
//! exactly one declaration.

use shared::{SharedError, SharedResult, SizeClass, TestCaseDescriptor};
use std::collections::HashSet;

/// Ordered collection of registered test descriptors with unique ids
#[derive(Debug, Default)]
pub struct TestRegistry {
    descriptors: Vec<TestCaseDescriptor>,
    ids: HashSet<String>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor, rejecting duplicate ids
    pub fn register(&mut self, descriptor: TestCaseDescriptor) -> SharedResult<()> {
        if descriptor.command.is_empty() {
            return Err(SharedError::InvalidDescriptor {
                id: descriptor.id.clone(),
                reason: "empty command".to_string(),
            });
        }
        if !self.ids.insert(descriptor.id.clone()) {
            return Err(SharedError::DuplicateTestId { id: descriptor.id });
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Iterate descriptors in registration order; restartable
    pub fn all(&self) -> impl Iterator<Item = &TestCaseDescriptor> + '_ {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Build a new registry holding only descriptors matching the filter,
    /// preserving registration order
    pub fn filtered(&self, filter: &RunFilter) -> TestRegistry {
        let mut selected = TestRegistry::new();
        for descriptor in self.all() {
            if filter.matches(descriptor) {
                // Ids are already unique in the source registry
                let _ = selected.register(descriptor.clone());
            }
        }
        selected
    }
}

/// Selection criteria for a subset of registered tests
#[derive(Debug, Clone, Default)]
pub struct RunFilter {
    /// Substring match against the full test id
    pub test: Option<String>,
    /// Exact match against the suite portion of the id
    pub suite: Option<String>,
    /// Exact match against the size class
    pub size_class: Option<SizeClass>,
}

impl RunFilter {
    pub fn matches(&self, descriptor: &TestCaseDescriptor) -> bool {
        if let Some(ref needle) = self.test {
            if !descriptor.id.contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(ref suite) = self.suite {
            if descriptor.suite() != suite {
                return false;
            }
        }
        if let Some(size_class) = self.size_class {
            if descriptor.size_class != size_class {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn descriptor(id: &str, size_class: SizeClass) -> TestCaseDescriptor {
        TestCaseDescriptor::new(id, size_class, "noop").arg(shared::SCRATCH_DIR_TOKEN)
    }

    #[test]
    fn registration_preserves_insertion_order() {
        let mut registry = TestRegistry::new();
        registry.register(descriptor("obj_basic/TEST0", SizeClass::Short)).unwrap();
        registry.register(descriptor("obj_ctl/TEST0", SizeClass::Short)).unwrap();
        registry.register(descriptor("obj_many_pools/TEST0", SizeClass::Medium)).unwrap();

        let ids: Vec<_> = registry.all().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["obj_basic/TEST0", "obj_ctl/TEST0", "obj_many_pools/TEST0"]);

        // Restartable iteration yields the same sequence again
        let ids_again: Vec<_> = registry.all().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ids_again);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut registry = TestRegistry::new();
        registry.register(descriptor("obj_basic/TEST0", SizeClass::Short)).unwrap();
        let err = registry
            .register(descriptor("obj_basic/TEST0", SizeClass::Medium))
            .unwrap_err();
        assert_matches!(err, SharedError::DuplicateTestId { .. });
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_command_is_rejected() {
        let mut registry = TestRegistry::new();
        let mut desc = descriptor("obj_basic/TEST0", SizeClass::Short);
        desc.command.clear();
        let err = registry.register(desc).unwrap_err();
        assert_matches!(err, SharedError::InvalidDescriptor { .. });
    }

    #[test]
    fn filter_by_suite_and_size_class() {
        let mut registry = TestRegistry::new();
        registry.register(descriptor("obj_basic/TEST0", SizeClass::Short)).unwrap();
        registry.register(descriptor("obj_many_pools/TEST0", SizeClass::Medium)).unwrap();
        registry.register(descriptor("pmem_poison/TEST0", SizeClass::Medium)).unwrap();

        let by_suite = registry.filtered(&RunFilter {
            suite: Some("obj_many_pools".to_string()),
            ..RunFilter::default()
        });
        assert_eq!(by_suite.len(), 1);

        let by_size = registry.filtered(&RunFilter {
            size_class: Some(SizeClass::Medium),
            ..RunFilter::default()
        });
        assert_eq!(by_size.len(), 2);

        let by_substring = registry.filtered(&RunFilter {
            test: Some("pools".to_string()),
            ..RunFilter::default()
        });
        assert_eq!(by_substring.len(), 1);
    }
}
