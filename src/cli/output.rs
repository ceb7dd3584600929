//! Console reporting for the CLI.
//!
//! Colours go through termcolor; comparison failures get a line diff of
//! expected against actual.

use std::io::Write;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::description::Description;
use crate::failure::Failure;
use crate::test::{RunNotifier, RunSummary, TestFailure};

/// Colour only when stdout is a terminal.
pub fn color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Prints one line per test plus a summary.
pub struct ConsoleNotifier<W: WriteColor> {
    out: W,
    current_suite: Option<String>,
}

impl ConsoleNotifier<StandardStream> {
    pub fn stdout() -> Self {
        Self::new(StandardStream::stdout(color_choice()))
    }
}

impl<W: WriteColor> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current_suite: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn suite_header(&mut self, description: &Description) {
        let Some(id) = description.id() else {
            return;
        };
        if self.current_suite.as_deref() == Some(id.suite.as_str()) {
            return;
        }
        self.current_suite = Some(id.suite.clone());
        let _ = self.out.set_color(ColorSpec::new().set_bold(true));
        let _ = writeln!(self.out, "{}", id.suite);
        let _ = self.out.reset();
    }

    fn mark(&mut self, color: Color, mark: &str, name: &str) {
        let _ = self.out.set_color(ColorSpec::new().set_fg(Some(color)));
        let _ = write!(self.out, "  {}", mark);
        let _ = self.out.reset();
        let _ = writeln!(self.out, " {}", name);
    }
}

impl<W: WriteColor> RunNotifier for ConsoleNotifier<W> {
    fn run_started(&mut self, description: &Description) {
        let _ = writeln!(
            self.out,
            "running {} tests from {}",
            description.test_count(),
            description.name()
        );
    }

    fn test_started(&mut self, description: &Description) {
        self.suite_header(description);
    }

    fn test_finished(&mut self, description: &Description) {
        self.mark(Color::Green, "✓", description.name());
    }

    fn test_failure(&mut self, failure: &TestFailure) {
        self.mark(Color::Red, "✗", failure.description.name());
        let _ = writeln!(self.out, "      {}: {}", failure.cause.kind(), failure.cause);
        if let Failure::Comparison {
            expected, actual, ..
        } = &*failure.cause
        {
            let changeset = Changeset::new(expected, actual, "\n");
            print_diff(&mut self.out, &changeset.diffs);
        }
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        let _ = writeln!(self.out);
        let color = if summary.is_success() {
            Color::Green
        } else {
            Color::Red
        };
        let _ = self.out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(
            self.out,
            "{} passed, {} failed",
            summary.passed, summary.failed
        );
        let _ = self.out.reset();
        let _ = writeln!(self.out, " ({} run in {:.2?})", summary.run, summary.elapsed);
    }
}

/// Prints the description tree, one node per line.
pub fn print_description<W: WriteColor>(out: &mut W, description: &Description) {
    print_node(out, description, 0);
}

fn print_node<W: WriteColor>(out: &mut W, node: &Description, depth: usize) {
    let indent = "  ".repeat(depth);
    if node.is_test() {
        let _ = writeln!(out, "{}{}", indent, node.name());
    } else {
        let _ = out.set_color(ColorSpec::new().set_bold(true));
        let _ = write!(out, "{}{}", indent, node.name());
        let _ = out.reset();
        let _ = writeln!(out, " ({} tests)", node.test_count());
    }
    for child in node.children() {
        print_node(out, child, depth + 1);
    }
}

fn print_diff<W: WriteColor>(out: &mut W, diffs: &[Difference]) {
    for diff in diffs {
        match diff {
            Difference::Same(x) => {
                let _ = out.reset();
                let _ = writeln!(out, "       {}", x);
            }
            Difference::Rem(x) => {
                let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                let _ = writeln!(out, "      -{}", x);
            }
            Difference::Add(x) => {
                let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                let _ = writeln!(out, "      +{}", x);
            }
        }
    }
    let _ = out.reset();
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use termcolor::Buffer;

    use super::*;
    use crate::description::build_description;
    use crate::discovery::{Suite, TestCase};
    use crate::engine::CallableId;

    fn tree() -> Description {
        build_description(
            "scripts",
            &[Suite {
                name: "Math".into(),
                test_cases: vec![
                    TestCase {
                        name: "adds".into(),
                        body: CallableId(0),
                    },
                    TestCase {
                        name: "breaks".into(),
                        body: CallableId(1),
                    },
                ],
            }],
        )
    }

    fn text(buffer: Buffer) -> String {
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn reports_passes_failures_and_diffs() {
        let root = tree();
        let suite = &root.children()[0];
        let mut console = ConsoleNotifier::new(Buffer::no_color());

        console.run_started(&root);
        console.test_started(&suite.children()[0]);
        console.test_finished(&suite.children()[0]);
        console.test_started(&suite.children()[1]);
        console.test_failure(&TestFailure {
            description: suite.children()[1].clone(),
            cause: Arc::new(Failure::comparison("Expected <2> but was <3>", "2", "3")),
        });

        let out = text(console.into_inner());
        assert!(out.starts_with("running 2 tests from scripts\nMath\n"));
        assert!(out.contains("✓ adds"));
        assert!(out.contains("✗ breaks"));
        assert!(out.contains("ComparisonFailure: Expected <2> but was <3>"));
        assert!(out.contains("-2\n"));
        assert!(out.contains("+3\n"));
    }

    #[test]
    fn prints_the_tree() {
        let mut buffer = Buffer::no_color();
        print_description(&mut buffer, &tree());
        assert_eq!(
            text(buffer),
            "scripts (2 tests)\n  Math (2 tests)\n    adds\n    breaks\n"
        );
    }
}
