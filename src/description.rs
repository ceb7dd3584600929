//! The root → suite → test description tree.

use std::fmt;

use serde::Serialize;

use crate::discovery::Suite;

/// Stable identity of one test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TestId {
    pub suite: String,
    pub test: String,
}

impl TestId {
    pub fn new(suite: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            test: test.into(),
        }
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.test, self.suite)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DescriptionKind {
    Root,
    Suite,
    Test { id: TestId },
}

/// One node of the tree. Built once by [`build_description`], then read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Description {
    name: String,
    #[serde(flatten)]
    kind: DescriptionKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Description>,
}

impl Description {
    fn node(name: impl Into<String>, kind: DescriptionKind, children: Vec<Description>) -> Self {
        Self {
            name: name.into(),
            kind,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &DescriptionKind {
        &self.kind
    }

    /// `test(suite)` for tests, the plain name otherwise.
    pub fn display_name(&self) -> String {
        match &self.kind {
            DescriptionKind::Test { id } => id.to_string(),
            _ => self.name.clone(),
        }
    }

    pub fn children(&self) -> &[Description] {
        &self.children
    }

    /// The test identity, for test nodes.
    pub fn id(&self) -> Option<&TestId> {
        match &self.kind {
            DescriptionKind::Test { id } => Some(id),
            _ => None,
        }
    }

    pub fn is_suite(&self) -> bool {
        !self.is_test()
    }

    pub fn is_test(&self) -> bool {
        matches!(self.kind, DescriptionKind::Test { .. })
    }

    /// Number of test nodes at or below this one.
    pub fn test_count(&self) -> usize {
        if self.is_test() {
            1
        } else {
            self.children.iter().map(Description::test_count).sum()
        }
    }

    /// Every test node at or below this one, depth first.
    pub fn tests(&self) -> Vec<&Description> {
        if self.is_test() {
            return vec![self];
        }
        self.children.iter().flat_map(Description::tests).collect()
    }
}

/// Builds the tree for `suites`, preserving their order and their tests' order.
pub fn build_description(root_name: &str, suites: &[Suite]) -> Description {
    let children = suites
        .iter()
        .map(|suite| {
            let tests = suite
                .test_cases
                .iter()
                .map(|case| {
                    Description::node(
                        case.name.clone(),
                        DescriptionKind::Test {
                            id: TestId::new(&suite.name, &case.name),
                        },
                        Vec::new(),
                    )
                })
                .collect();
            Description::node(suite.name.clone(), DescriptionKind::Suite, tests)
        })
        .collect();
    Description::node(root_name, DescriptionKind::Root, children)
}
