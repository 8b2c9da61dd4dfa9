//! Persistent-memory fault-injection suite
//!
//! Poison and bad-block tests. `pmem_uncorrectables` deliberately probes
//! failure paths and accepts any exit, the rest follow the exit-0 contract.

use shared::{ExpectedExit, SCRATCH_DIR_TOKEN, SizeClass, TestCaseDescriptor};

fn case(suite: &str, variant: u32, size_class: SizeClass) -> TestCaseDescriptor {
    TestCaseDescriptor::new(format!("{suite}/TEST{variant}"), size_class, suite).arg(SCRATCH_DIR_TOKEN)
}

pub fn descriptors() -> Vec<TestCaseDescriptor> {
    vec![
        case("blk_poison", 0, SizeClass::Medium),
        case("pmem_poison", 0, SizeClass::Medium),
        case("pmem_uncorrectables", 0, SizeClass::Long).expected_exit(ExpectedExit::Any),
        case("pmem2_source_numa", 0, SizeClass::Short),
    ]
}
