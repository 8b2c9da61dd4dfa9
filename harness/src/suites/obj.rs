//! Object-store test suite
//!
//! Tests for the pool/object layer binaries. Each binary receives the
//! scratch directory path as its only argument and exits 0 on success.

use shared::{SCRATCH_DIR_TOKEN, SizeClass, TestCaseDescriptor};

fn case(suite: &str, variant: u32, size_class: SizeClass) -> TestCaseDescriptor {
    TestCaseDescriptor::new(format!("{suite}/TEST{variant}"), size_class, suite).arg(SCRATCH_DIR_TOKEN)
}

pub fn descriptors() -> Vec<TestCaseDescriptor> {
    vec![
        case("obj_basic", 0, SizeClass::Short),
        case("obj_ctl", 0, SizeClass::Short),
        case("obj_ctl_alloc_class", 0, SizeClass::Short),
        // many pools test
        case("obj_many_pools", 0, SizeClass::Medium),
        case("obj_pmalloc_backend", 0, SizeClass::Medium),
        case("obj_pmalloc_container", 0, SizeClass::Medium),
        case("obj_pmalloc_integration", 0, SizeClass::Long),
    ]
}
