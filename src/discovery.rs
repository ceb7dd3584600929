//! Discovery: from suite names to loaded, validated suites.
//!
//! Runs once, before any test executes, and is all-or-nothing: the first
//! missing resource, script error or malformed suite aborts it.

pub mod resolver;
pub mod suite;
pub mod utilities;

pub use resolver::{discover_suite_names, DirectoryResolver, MemoryResolver, ResourceResolver};
pub use suite::{coerce_test_cases, load_suite, load_suites, ShapeError, Suite, TestCase};
pub use utilities::{bundled_utilities, load_utilities};
