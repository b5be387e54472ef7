// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Human-readable [`Formatter`] implementation.

use std::{
    cmp, io,
    path::Path,
    time::{Duration, Instant},
};

use itertools::Itertools as _;

use crate::{
    event, step,
    writer::{
        out::{Coloring, Styles, WriteStrExt as _},
        OutputFormatter,
    },
    Formatter,
};

/// Outcome of a [`Step`] or a [`Scenario`], ordered by severity.
///
/// [`Scenario`]: gherkin::Scenario
/// [`Step`]: gherkin::Step
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Status {
    /// Everything passed.
    Passed,

    /// Skipped, as some previous [`Step`] didn't pass.
    ///
    /// [`Step`]: gherkin::Step
    Skipped,

    /// Marked as not implemented yet.
    Pending,

    /// No function matches.
    Undefined,

    /// Failed.
    Failed,
}

/// Counters of [`Status`]es.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of [`Status::Passed`].
    pub passed: usize,

    /// Number of [`Status::Skipped`].
    pub skipped: usize,

    /// Number of [`Status::Pending`].
    pub pending: usize,

    /// Number of [`Status::Undefined`].
    pub undefined: usize,

    /// Number of [`Status::Failed`].
    pub failed: usize,
}

impl Stats {
    /// Counts one more `status`.
    pub fn record(&mut self, status: Status) {
        let counter = match status {
            Status::Passed => &mut self.passed,
            Status::Skipped => &mut self.skipped,
            Status::Pending => &mut self.pending,
            Status::Undefined => &mut self.undefined,
            Status::Failed => &mut self.failed,
        };
        *counter += 1;
    }

    /// Returns the total number of counted [`Status`]es.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.skipped + self.pending + self.undefined + self.failed
    }
}

/// Human-readable [`Formatter`] outputting to an [`io::Write`] implementor
/// ([`io::Stdout`] by default).
///
/// Pretty-prints with colors if terminal was successfully detected (or
/// [`Coloring::Always`] is set), otherwise has simple output.
#[derive(Debug)]
pub struct Pretty<Out: io::Write = io::Stdout> {
    /// [`io::Write`] implementor to write the output into.
    output: Out,

    /// [`Styles`] for terminal output.
    styles: Styles,

    /// [`Stats`] of the finished [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    scenarios: Stats,

    /// [`Stats`] of the finished [`Step`]s.
    ///
    /// [`Step`]: gherkin::Step
    steps: Stats,

    /// Worst [`Status`] of the [`Scenario`] being currently outputted.
    ///
    /// [`Scenario`]: gherkin::Scenario
    scenario: Option<Status>,

    /// Time the first [`Feature`] has started at.
    ///
    /// [`Feature`]: gherkin::Feature
    started_at: Option<Instant>,
}

impl Pretty {
    /// Creates a new [`Pretty`] [`Formatter`] outputting to [`io::Stdout`].
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout(), Coloring::Auto)
    }
}

impl<Out: io::Write> Pretty<Out> {
    /// Creates a new [`Pretty`] [`Formatter`] outputting to the given
    /// `output`.
    #[must_use]
    pub fn new(output: Out, color: Coloring) -> Self {
        let mut styles = Styles::new();
        styles.apply_coloring(color);
        Self {
            output,
            styles,
            scenarios: Stats::default(),
            steps: Stats::default(),
            scenario: None,
            started_at: None,
        }
    }

    /// Returns [`Stats`] of the finished [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub const fn scenarios(&self) -> Stats {
        self.scenarios
    }

    /// Returns [`Stats`] of the finished [`Step`]s.
    ///
    /// [`Step`]: gherkin::Step
    #[must_use]
    pub const fn steps(&self) -> Stats {
        self.steps
    }

    /// Unwraps this [`Pretty`] [`Formatter`] into its output.
    #[must_use]
    pub fn into_inner(self) -> Out {
        self.output
    }

    /// Counts the [`Scenario`] being outputted, if any.
    ///
    /// [`Scenario`]: gherkin::Scenario
    fn finish_scenario(&mut self) {
        if let Some(status) = self.scenario.take() {
            self.scenarios.record(status);
        }
    }

    /// Counts the `status` of a [`Step`].
    ///
    /// [`Step`]: gherkin::Step
    fn record_step(&mut self, status: Status) {
        self.steps.record(status);
        if let Some(sc) = self.scenario.as_mut() {
            *sc = cmp::max(*sc, status);
        }
    }

    /// Outputs the started [`Feature`].
    ///
    /// [`Feature`]: gherkin::Feature
    fn write_feature(&mut self, feature: &gherkin::Feature) -> io::Result<()> {
        let out = format!("{}: {}", feature.keyword, feature.name);
        self.output.write_line(self.styles.bold(out))?;
        if let Some(desc) = feature.description.as_deref() {
            self.output.write_line(format_str_with_indent(desc, 2))?;
        }
        Ok(())
    }

    /// Outputs the entered [`Node`].
    ///
    /// [`Node`]: event::Node
    fn write_node(&mut self, node: event::Node<'_>) -> io::Result<()> {
        use event::Node;

        let out = match node {
            Node::Background(bg) => format!("  {}:", bg.keyword),
            Node::Rule(rule) => format!("\n  {}: {}", rule.keyword, rule.name),
            Node::Scenario(sc) => format!("\n  {}: {}", sc.keyword, sc.name),
            Node::Examples(_) => return Ok(()),
        };
        self.output.write_line(self.styles.bold(out))
    }

    /// Outputs a finished [`Step`] with the given `status`.
    ///
    /// [`Step`]: gherkin::Step
    fn write_step(
        &mut self,
        step: &gherkin::Step,
        status: Status,
    ) -> io::Result<()> {
        let mark = match status {
            Status::Passed => "✔",
            Status::Skipped => "-",
            Status::Pending => "~",
            Status::Undefined => "?",
            Status::Failed => "✘",
        };
        let out = format!("    {mark}  {}{}", step.keyword, step.value);
        let out = match status {
            Status::Passed => self.styles.ok(out),
            Status::Skipped => self.styles.skipped(out),
            Status::Pending | Status::Undefined => self.styles.pending(out),
            Status::Failed => self.styles.err(out),
        };
        self.output.write_line(out)
    }

    /// Outputs the failed [`Step`] along with its error.
    ///
    /// [`Step`]: gherkin::Step
    fn write_failed_step(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
        err: &event::StepError,
    ) -> io::Result<()> {
        self.write_step(step, Status::Failed)?;
        let mut details = format_str_with_indent(err.to_string(), 7);
        if let Some(loc) = def.and_then(|d| d.location) {
            details.push_str(&format!("\n       Step defined at {loc}"));
        }
        self.output.write_line(self.styles.err(details))
    }

    /// Outputs the not passed [`Step`] along with a `hint` why.
    ///
    /// [`Step`]: gherkin::Step
    fn write_step_with_hint(
        &mut self,
        step: &gherkin::Step,
        status: Status,
        hint: &str,
    ) -> io::Result<()> {
        self.write_step(step, status)?;
        self.output
            .write_line(self.styles.pending(format!("       {hint}")))
    }

    /// Outputs the summary of the whole run.
    fn write_summary(&mut self) -> io::Result<()> {
        self.output.write_line("")?;
        let scenarios = self.format_stats("scenario", self.scenarios);
        self.output.write_line(scenarios)?;
        let steps = self.format_stats("step", self.steps);
        self.output.write_line(steps)?;

        let elapsed = self.started_at.map(|t| t.elapsed()).unwrap_or_default();
        let elapsed = Duration::from_millis(
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        );
        self.output.write_line(format!(
            "Finished in {}",
            humantime::format_duration(elapsed),
        ))
    }

    /// Formats the given [`Stats`] as `<n> <what>s (<k> <status>, ...)`.
    fn format_stats(&self, what: &str, stats: Stats) -> String {
        let total = stats.total();
        let plural = if total == 1 { "" } else { "s" };
        let details = [
            (stats.passed, self.styles.ok(format!("{} passed", stats.passed))),
            (
                stats.failed,
                self.styles.err(format!("{} failed", stats.failed)),
            ),
            (
                stats.undefined,
                self.styles.pending(format!("{} undefined", stats.undefined)),
            ),
            (
                stats.pending,
                self.styles.pending(format!("{} pending", stats.pending)),
            ),
            (
                stats.skipped,
                self.styles.skipped(format!("{} skipped", stats.skipped)),
            ),
        ]
        .into_iter()
        .filter_map(|(n, s)| (n > 0).then_some(s))
        .join(", ");

        if details.is_empty() {
            format!("{total} {what}{plural}")
        } else {
            format!("{total} {what}{plural} ({details})")
        }
    }

    /// Logs the `result` of writing the output, if it failed.
    fn log_err(result: io::Result<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write pretty output");
        }
    }
}

impl<Out: io::Write> OutputFormatter for Pretty<Out> {
    type Output = Out;

    fn output_mut(&mut self) -> &mut Self::Output {
        &mut self.output
    }
}

impl<Out: io::Write> Formatter for Pretty<Out> {
    fn feature_started(
        &mut self,
        feature: &gherkin::Feature,
        _: &Path,
        _: &str,
    ) {
        self.finish_scenario();
        _ = self.started_at.get_or_insert_with(Instant::now);
        Self::log_err(self.write_feature(feature));
    }

    fn node(&mut self, node: event::Node<'_>) {
        if node.as_scenario().is_some() {
            self.finish_scenario();
            self.scenario = Some(Status::Passed);
        }
        Self::log_err(self.write_node(node));
    }

    fn step_defined(
        &mut self,
        _: &gherkin::Step,
        _: Option<&step::Definition>,
    ) {
    }

    fn step_passed(
        &mut self,
        step: &gherkin::Step,
        _: Option<&step::Definition>,
    ) {
        self.record_step(Status::Passed);
        Self::log_err(self.write_step(step, Status::Passed));
    }

    fn step_skipped(
        &mut self,
        step: &gherkin::Step,
        _: Option<&step::Definition>,
    ) {
        self.record_step(Status::Skipped);
        Self::log_err(self.write_step(step, Status::Skipped));
    }

    fn step_failed(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
        err: &event::StepError,
    ) {
        self.record_step(Status::Failed);
        Self::log_err(self.write_failed_step(step, def, err));
    }

    fn step_undefined(
        &mut self,
        step: &gherkin::Step,
        _: Option<&step::Definition>,
    ) {
        self.record_step(Status::Undefined);
        Self::log_err(self.write_step_with_hint(
            step,
            Status::Undefined,
            "Step is not defined",
        ));
    }

    fn step_pending(
        &mut self,
        step: &gherkin::Step,
        _: Option<&step::Definition>,
    ) {
        self.record_step(Status::Pending);
        Self::log_err(self.write_step_with_hint(
            step,
            Status::Pending,
            "Step is pending",
        ));
    }

    fn summary(&mut self) {
        self.finish_scenario();
        Self::log_err(self.write_summary().and_then(|()| self.output.flush()));
    }
}

/// Formats the given [`str`] by adding `indent`s to each line to prettify the
/// output.
fn format_str_with_indent(str: impl AsRef<str>, indent: usize) -> String {
    str.as_ref()
        .lines()
        .map(|line| format!("{}{line}", " ".repeat(indent)))
        .join("\n")
}
