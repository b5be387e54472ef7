// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [TeamCity service messages][1] [`Formatter`] implementation.
//!
//! [1]: https://www.jetbrains.com/help/teamcity/service-messages.html

use std::{borrow::Cow, io, path::Path, time::Instant};

use derive_more::with_trait::Display;

use crate::{
    event, step,
    writer::{
        escape, out::WriteStrExt as _, Capture, Coloring, OutputFormatter,
        Pretty,
    },
    Formatter,
};

/// Single [TeamCity service message][1].
///
/// All the values are already [`escape`]d. Use the constructor methods to
/// build the messages out of raw values.
///
/// [1]: https://www.jetbrains.com/help/teamcity/service-messages.html
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum ServiceMessage<'a> {
    /// [`Feature`] started.
    ///
    /// [`Feature`]: gherkin::Feature
    #[display("##teamcity[testSuiteStarted name='Feature: {name}']")]
    SuiteStarted {
        /// Name of the [`Feature`].
        ///
        /// [`Feature`]: gherkin::Feature
        name: Cow<'a, str>,
    },

    /// [`Scenario`] started.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[display(
        "##teamcity[testStarted name='Scenario {name}' \
         captureStandardOutput='false']"
    )]
    TestStarted {
        /// Name of the [`Scenario`].
        ///
        /// [`Scenario`]: gherkin::Scenario
        name: Cow<'a, str>,
    },

    /// [`Scenario`] failed.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[display(
        "##teamcity[testFailed name='Scenario {name}' details='{details}']"
    )]
    TestFailed {
        /// Name of the [`Scenario`].
        ///
        /// [`Scenario`]: gherkin::Scenario
        name: Cow<'a, str>,

        /// Output captured while the [`Scenario`] was running.
        ///
        /// [`Scenario`]: gherkin::Scenario
        details: Cow<'a, str>,
    },

    /// [`Scenario`] finished.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[display(
        "##teamcity[testFinished name='Scenario {name}' \
         duration='{duration}']"
    )]
    TestFinished {
        /// Name of the [`Scenario`].
        ///
        /// [`Scenario`]: gherkin::Scenario
        name: Cow<'a, str>,

        /// Milliseconds the [`Scenario`] took.
        ///
        /// [`Scenario`]: gherkin::Scenario
        duration: u128,
    },

    /// [`Feature`] finished.
    ///
    /// [`Feature`]: gherkin::Feature
    #[display("##teamcity[testSuiteFinished name='Feature: {name}']")]
    SuiteFinished {
        /// Name of the [`Feature`].
        ///
        /// [`Feature`]: gherkin::Feature
        name: Cow<'a, str>,
    },
}

impl<'a> ServiceMessage<'a> {
    /// Creates a new [`ServiceMessage::SuiteStarted`].
    #[must_use]
    pub fn suite_started(feature: &'a str) -> Self {
        Self::SuiteStarted { name: escape(feature) }
    }

    /// Creates a new [`ServiceMessage::TestStarted`].
    #[must_use]
    pub fn test_started(scenario: &'a str) -> Self {
        Self::TestStarted { name: escape(scenario) }
    }

    /// Creates a new [`ServiceMessage::TestFailed`].
    #[must_use]
    pub fn test_failed(scenario: &'a str, details: &'a str) -> Self {
        Self::TestFailed {
            name: escape(scenario),
            details: escape(details),
        }
    }

    /// Creates a new [`ServiceMessage::TestFinished`].
    #[must_use]
    pub fn test_finished(scenario: &'a str, duration: u128) -> Self {
        Self::TestFinished { name: escape(scenario), duration }
    }

    /// Creates a new [`ServiceMessage::SuiteFinished`].
    #[must_use]
    pub fn suite_finished(feature: &'a str) -> Self {
        Self::SuiteFinished { name: escape(feature) }
    }
}

/// [`Scenario`] being reported as a running test.
///
/// [`Scenario`]: gherkin::Scenario
#[derive(Clone, Debug)]
struct OpenScenario {
    /// Name of the [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    name: String,

    /// Time the [`Scenario`] has started at.
    ///
    /// [`Scenario`]: gherkin::Scenario
    started_at: Instant,

    /// Indicates whether any [`Step`] of the [`Scenario`] hasn't succeeded.
    ///
    /// [`Scenario`]: gherkin::Scenario
    /// [`Step`]: gherkin::Step
    failed: bool,
}

/// [`Formatter`] reporting [`Feature`]s as test suites and [`Scenario`]s as
/// tests via [TeamCity service messages][1].
///
/// Every notification is passed further to the delegate [`Formatter`]
/// (a [`Pretty`] one by default), writing into a [`Capture`] of the same
/// output. Whatever the delegate prints while a [`Scenario`] is running is
/// reported as the failure details of that [`Scenario`]. Service messages
/// themselves bypass the [`Capture`].
///
/// Blocks are closed eagerly: a [`Scenario`] is reported as finished once the
/// next one starts, its [`Feature`] finishes, or the [`Formatter::summary()`]
/// is requested.
///
/// # Concurrency
///
/// Notifications must arrive sequentially, so scenarios running concurrently
/// should be funneled into a single [`Teamcity`] one by one.
///
/// [`Feature`]: gherkin::Feature
/// [`Scenario`]: gherkin::Scenario
/// [1]: https://www.jetbrains.com/help/teamcity/service-messages.html
#[derive(Debug)]
pub struct Teamcity<D = Pretty<Capture>> {
    /// Delegate [`Formatter`] writing into a [`Capture`].
    delegate: D,

    /// Name of the [`Feature`] being currently reported.
    ///
    /// [`Feature`]: gherkin::Feature
    feature: Option<String>,

    /// [`Scenario`] being currently reported.
    ///
    /// [`Scenario`]: gherkin::Scenario
    scenario: Option<OpenScenario>,
}

impl Teamcity {
    /// Creates a new [`Teamcity`] [`Formatter`] outputting to [`io::Stdout`]
    /// along with a [`Pretty`] one.
    #[must_use]
    pub fn stdout() -> Self {
        Self::pretty(io::stdout(), Coloring::Auto)
    }
}

impl<Out: io::Write> Teamcity<Pretty<Capture<Out>>> {
    /// Creates a new [`Teamcity`] [`Formatter`] outputting to the given
    /// `output` along with a [`Pretty`] one.
    #[must_use]
    pub fn pretty(output: Out, color: Coloring) -> Self {
        Self::wrap(output, |capture| Pretty::new(capture, color))
    }

    /// Unwraps this [`Teamcity`] [`Formatter`] into its output.
    #[must_use]
    pub fn into_output(self) -> Out {
        self.delegate.into_inner().into_inner()
    }
}

impl<D> Teamcity<D> {
    /// Creates a new [`Teamcity`] [`Formatter`] outputting to the given
    /// `output` along with the delegate [`Formatter`] built by the provided
    /// function out of a [`Capture`] of the same `output`.
    #[must_use]
    pub fn wrap<Out>(
        output: Out,
        delegate: impl FnOnce(Capture<Out>) -> D,
    ) -> Self
    where
        D: OutputFormatter<Output = Capture<Out>>,
    {
        Self::new(delegate(Capture::new(output)))
    }

    /// Creates a new [`Teamcity`] [`Formatter`] around the given `delegate`
    /// already writing into a [`Capture`].
    #[must_use]
    pub const fn new(delegate: D) -> Self {
        Self { delegate, feature: None, scenario: None }
    }

    /// Unwraps this [`Teamcity`] [`Formatter`] into its delegate.
    #[must_use]
    pub fn into_delegate(self) -> D {
        self.delegate
    }
}

impl<D, Out> Teamcity<D>
where
    D: OutputFormatter<Output = Capture<Out>>,
    Out: io::Write,
{
    /// Writes the given [`ServiceMessage`] directly into the output, bypassing
    /// the [`Capture`].
    fn emit(&mut self, msg: &ServiceMessage<'_>) {
        tracing::trace!(msg = %msg, "emitting TeamCity service message");
        let out = self.delegate.output_mut().get_mut();
        if let Err(e) = out.write_line(msg.to_string()) {
            tracing::warn!(
                error = %e,
                "failed to write TeamCity service message",
            );
        }
    }

    /// Reports the currently running [`Scenario`] as finished (and failed, if
    /// so), if any.
    ///
    /// The [`Capture`] is drained even if there is no running [`Scenario`],
    /// so nothing printed outside a [`Scenario`] gets attributed to it.
    ///
    /// [`Scenario`]: gherkin::Scenario
    fn close_scenario(&mut self) {
        let output = self.delegate.output_mut().drain();
        let Some(sc) = self.scenario.take() else {
            return;
        };
        let duration = sc.started_at.elapsed().as_millis();

        if sc.failed {
            self.emit(&ServiceMessage::test_failed(&sc.name, &output));
        }
        self.emit(&ServiceMessage::test_finished(&sc.name, duration));
    }

    /// Reports the currently running [`Feature`] as finished, if any.
    ///
    /// [`Feature`]: gherkin::Feature
    fn close_feature(&mut self) {
        if let Some(name) = self.feature.take() {
            self.emit(&ServiceMessage::suite_finished(&name));
        }
    }

    /// Marks the currently running [`Scenario`] as failed.
    ///
    /// [`Scenario`]: gherkin::Scenario
    fn fail_scenario(&mut self) {
        if let Some(sc) = self.scenario.as_mut() {
            sc.failed = true;
        }
    }
}

impl<D, Out> Formatter for Teamcity<D>
where
    D: Formatter + OutputFormatter<Output = Capture<Out>>,
    Out: io::Write,
{
    fn feature_started(
        &mut self,
        feature: &gherkin::Feature,
        path: &Path,
        content: &str,
    ) {
        self.close_scenario();
        self.close_feature();

        self.emit(&ServiceMessage::suite_started(&feature.name));
        self.feature = Some(feature.name.clone());

        self.delegate.feature_started(feature, path, content);
    }

    fn node(&mut self, node: event::Node<'_>) {
        if let Some(sc) = node.as_scenario() {
            self.close_scenario();

            self.emit(&ServiceMessage::test_started(&sc.name));
            self.scenario = Some(OpenScenario {
                name: sc.name.clone(),
                started_at: Instant::now(),
                failed: false,
            });
        }

        self.delegate.node(node);
    }

    fn step_defined(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    ) {
        self.delegate.step_defined(step, def);
    }

    fn step_passed(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    ) {
        self.delegate.step_passed(step, def);
    }

    fn step_skipped(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    ) {
        self.delegate.step_skipped(step, def);
    }

    fn step_failed(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
        err: &event::StepError,
    ) {
        self.fail_scenario();
        self.delegate.step_failed(step, def, err);
    }

    fn step_undefined(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    ) {
        self.fail_scenario();
        self.delegate.step_undefined(step, def);
    }

    fn step_pending(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    ) {
        self.fail_scenario();
        self.delegate.step_pending(step, def);
    }

    fn summary(&mut self) {
        self.close_scenario();
        self.close_feature();

        self.delegate.summary();
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    /// Delegate recording notifications into its output as single words.
    #[derive(Debug)]
    struct Recorder(Capture<Vec<u8>>);

    impl OutputFormatter for Recorder {
        type Output = Capture<Vec<u8>>;

        fn output_mut(&mut self) -> &mut Self::Output {
            &mut self.0
        }
    }

    impl Formatter for Recorder {
        fn feature_started(&mut self, f: &gherkin::Feature, _: &Path, _: &str) {
            self.0.write_line(format!("feature {}", f.name)).unwrap();
        }

        fn node(&mut self, node: event::Node<'_>) {
            if let Some(sc) = node.as_scenario() {
                self.0.write_line(format!("scenario {}", sc.name)).unwrap();
            }
        }

        fn step_defined(
            &mut self,
            _: &gherkin::Step,
            _: Option<&step::Definition>,
        ) {
        }

        fn step_passed(
            &mut self,
            s: &gherkin::Step,
            _: Option<&step::Definition>,
        ) {
            self.0.write_line(format!("passed {}", s.value)).unwrap();
        }

        fn step_skipped(
            &mut self,
            s: &gherkin::Step,
            _: Option<&step::Definition>,
        ) {
            self.0.write_line(format!("skipped {}", s.value)).unwrap();
        }

        fn step_failed(
            &mut self,
            s: &gherkin::Step,
            _: Option<&step::Definition>,
            err: &event::StepError,
        ) {
            self.0.write_line(format!("failed {}: {err}", s.value)).unwrap();
        }

        fn step_undefined(
            &mut self,
            s: &gherkin::Step,
            _: Option<&step::Definition>,
        ) {
            self.0.write_line(format!("undefined {}", s.value)).unwrap();
        }

        fn step_pending(
            &mut self,
            s: &gherkin::Step,
            _: Option<&step::Definition>,
        ) {
            self.0.write_line(format!("pending {}", s.value)).unwrap();
        }

        fn summary(&mut self) {
            self.0.write_line("summary").unwrap();
        }
    }

    fn recorder() -> Teamcity<Recorder> {
        Teamcity::wrap(Vec::new(), Recorder)
    }

    /// Returns the output lines with all the durations zeroed.
    fn output(tc: Teamcity<Recorder>) -> Vec<String> {
        let duration = Regex::new(r"duration='\d+'").unwrap();
        String::from_utf8(tc.into_delegate().0.into_inner())
            .unwrap()
            .lines()
            .map(|l| duration.replace(l, "duration='0'").into_owned())
            .collect()
    }

    fn feature(src: &str) -> gherkin::Feature {
        gherkin::Feature::parse(src, gherkin::GherkinEnv::default()).unwrap()
    }

    #[test]
    fn message_formats() {
        assert_eq!(
            ServiceMessage::suite_started("it's").to_string(),
            "##teamcity[testSuiteStarted name='Feature: it|'s']",
        );
        assert_eq!(
            ServiceMessage::test_started("[a]").to_string(),
            "##teamcity[testStarted name='Scenario |[a|]' \
             captureStandardOutput='false']",
        );
        assert_eq!(
            ServiceMessage::test_failed("a|b", "x\ny").to_string(),
            "##teamcity[testFailed name='Scenario a||b' details='x|ny']",
        );
        assert_eq!(
            ServiceMessage::test_finished("a", 42).to_string(),
            "##teamcity[testFinished name='Scenario a' duration='42']",
        );
        assert_eq!(
            ServiceMessage::suite_finished("f").to_string(),
            "##teamcity[testSuiteFinished name='Feature: f']",
        );
    }

    #[test]
    fn reports_passed_scenario() {
        let f = feature("Feature: F\n  Scenario: S\n    Given passing\n");
        let sc = &f.scenarios[0];
        let mut tc = recorder();

        tc.feature_started(&f, Path::new("f.feature"), "");
        tc.node(event::Node::Scenario(sc));
        tc.step_defined(&sc.steps[0], None);
        tc.step_passed(&sc.steps[0], None);
        tc.summary();

        assert_eq!(
            output(tc),
            [
                "##teamcity[testSuiteStarted name='Feature: F']",
                "feature F",
                "##teamcity[testStarted name='Scenario S' \
                 captureStandardOutput='false']",
                "scenario S",
                "passed passing",
                "##teamcity[testFinished name='Scenario S' duration='0']",
                "##teamcity[testSuiteFinished name='Feature: F']",
                "summary",
            ],
        );
    }

    #[test]
    fn attaches_captured_output_to_failure() {
        let f = feature(
            "Feature: F\n  Scenario: S\n    Given passing\n    When failing\n",
        );
        let sc = &f.scenarios[0];
        let mut tc = recorder();

        tc.feature_started(&f, Path::new("f.feature"), "");
        tc.node(event::Node::Scenario(sc));
        tc.step_passed(&sc.steps[0], None);
        tc.step_failed(
            &sc.steps[1],
            None,
            &event::StepError::failed("errored"),
        );
        tc.summary();

        let out = output(tc);
        assert_eq!(out[5], "failed failing: errored");
        assert_eq!(
            out[6],
            "##teamcity[testFailed name='Scenario S' \
             details='scenario S|npassed passing|nfailed failing: errored|n']",
        );
        assert_eq!(
            out[7],
            "##teamcity[testFinished name='Scenario S' duration='0']",
        );
    }

    #[test]
    fn undefined_and_pending_fail_scenario() {
        let f = feature(
            "Feature: F\n  Scenario: U\n    Given undefined\n  \
             Scenario: P\n    Given pending\n",
        );
        let (u, p) = (&f.scenarios[0], &f.scenarios[1]);
        let mut tc = recorder();

        tc.feature_started(&f, Path::new("f.feature"), "");
        tc.node(event::Node::Scenario(u));
        tc.step_undefined(&u.steps[0], None);
        tc.node(event::Node::Scenario(p));
        tc.step_pending(&p.steps[0], None);
        tc.summary();

        let failed = output(tc)
            .into_iter()
            .filter(|l| l.starts_with("##teamcity[testFailed"))
            .collect::<Vec<_>>();
        assert_eq!(
            failed,
            [
                "##teamcity[testFailed name='Scenario U' \
                 details='scenario U|nundefined undefined|n']",
                "##teamcity[testFailed name='Scenario P' \
                 details='scenario P|npending pending|n']",
            ],
        );
    }

    #[test]
    fn failure_flag_resets_on_next_scenario() {
        let f = feature(
            "Feature: F\n  Scenario: A\n    Given failing\n  \
             Scenario: B\n    Given skipped\n",
        );
        let (a, b) = (&f.scenarios[0], &f.scenarios[1]);
        let mut tc = recorder();

        tc.feature_started(&f, Path::new("f.feature"), "");
        tc.node(event::Node::Scenario(a));
        tc.step_failed(&a.steps[0], None, &event::StepError::NotFound);
        tc.node(event::Node::Scenario(b));
        tc.step_skipped(&b.steps[0], None);
        tc.summary();

        let out = output(tc);
        assert_eq!(
            out.iter()
                .filter(|l| l.starts_with("##teamcity[testFailed"))
                .count(),
            1,
        );
        assert!(out.iter().any(|l| l.contains("testFailed name='Scenario A'")));
    }

    #[test]
    fn new_feature_closes_previous_blocks() {
        let f1 = feature("Feature: One\n  Scenario: A\n    Given passing\n");
        let f2 = feature("Feature: Two\n  Scenario: B\n    Given passing\n");
        let mut tc = recorder();

        tc.feature_started(&f1, Path::new("one.feature"), "");
        tc.node(event::Node::Scenario(&f1.scenarios[0]));
        tc.feature_started(&f2, Path::new("two.feature"), "");
        tc.node(event::Node::Scenario(&f2.scenarios[0]));
        tc.summary();

        let messages = output(tc)
            .into_iter()
            .filter(|l| l.starts_with("##teamcity"))
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            [
                "##teamcity[testSuiteStarted name='Feature: One']",
                "##teamcity[testStarted name='Scenario A' \
                 captureStandardOutput='false']",
                "##teamcity[testFinished name='Scenario A' duration='0']",
                "##teamcity[testSuiteFinished name='Feature: One']",
                "##teamcity[testSuiteStarted name='Feature: Two']",
                "##teamcity[testStarted name='Scenario B' \
                 captureStandardOutput='false']",
                "##teamcity[testFinished name='Scenario B' duration='0']",
                "##teamcity[testSuiteFinished name='Feature: Two']",
            ],
        );
    }

    #[test]
    fn failed_scenario_is_closed_before_next_feature() {
        let one = feature("Feature: One\n  Scenario: A\n    Given failing\n");
        let two = feature("Feature: Two\n");
        let a = &one.scenarios[0];
        let mut tc = recorder();

        tc.feature_started(&one, Path::new("one.feature"), "");
        tc.node(event::Node::Scenario(a));
        tc.step_failed(
            &a.steps[0],
            None,
            &event::StepError::failed("it's [bad]"),
        );
        tc.feature_started(&two, Path::new("two.feature"), "");
        tc.summary();

        let messages = output(tc)
            .into_iter()
            .filter(|l| l.starts_with("##teamcity"))
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            [
                "##teamcity[testSuiteStarted name='Feature: One']",
                "##teamcity[testStarted name='Scenario A' \
                 captureStandardOutput='false']",
                "##teamcity[testFailed name='Scenario A' \
                 details='scenario A|nfailed failing: it|'s |[bad|]|n']",
                "##teamcity[testFinished name='Scenario A' duration='0']",
                "##teamcity[testSuiteFinished name='Feature: One']",
                "##teamcity[testSuiteStarted name='Feature: Two']",
                "##teamcity[testSuiteFinished name='Feature: Two']",
            ],
        );
    }

    #[test]
    fn other_nodes_are_only_forwarded() {
        let f = feature("Feature: F\n  Background:\n    Given setup\n");
        let mut tc = recorder();

        tc.node(event::Node::Background(f.background.as_ref().unwrap()));

        assert!(tc.scenario.is_none());
        assert!(output(tc).is_empty());
    }

    #[test]
    fn summary_without_features_emits_nothing() {
        let mut tc = recorder();
        tc.summary();
        tc.summary();

        assert_eq!(output(tc), ["summary", "summary"]);
    }

    #[test]
    fn output_between_scenarios_is_not_attributed() {
        let f = feature("Feature: F\n  Scenario: S\n    Given failing\n");
        let sc = &f.scenarios[0];
        let mut tc = recorder();

        tc.feature_started(&f, Path::new("f.feature"), "");
        tc.node(event::Node::Scenario(sc));
        tc.step_failed(&sc.steps[0], None, &event::StepError::NotFound);
        tc.summary();

        let out = output(tc);
        let failed = out
            .iter()
            .find(|l| l.starts_with("##teamcity[testFailed"))
            .unwrap();
        assert!(!failed.contains("feature F"), "{failed}");
    }
}
