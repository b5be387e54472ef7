// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Core trait for consumers of test run lifecycle notifications.

use std::path::Path;

use crate::{event, step};

/// Consumer of a test run lifecycle notifications.
///
/// # Order guarantees
///
/// A runner calls methods one at a time, each to completion, in the following
/// order:
/// 1. [`Formatter::feature_started()`];
/// 2. for each [`Scenario`]: [`Formatter::node()`] with the [`Node::Scenario`],
///    followed by zero or more [`Step`] outcomes;
/// 3. repeating from 1 for every other [`Feature`];
/// 4. [`Formatter::summary()`] once, in the very end.
///
/// Other [`Node`]s may be reported at any point between those.
///
/// Methods don't return anything: a [`Formatter`] is a best-effort output
/// channel, and must never abort a test run.
///
/// [`Feature`]: gherkin::Feature
/// [`Node`]: event::Node
/// [`Node::Scenario`]: event::Node::Scenario
/// [`Scenario`]: gherkin::Scenario
/// [`Step`]: gherkin::Step
pub trait Formatter {
    /// Handles the started [`Feature`].
    ///
    /// `path` is the location the [`Feature`] was parsed from, and `content`
    /// is its raw source.
    ///
    /// [`Feature`]: gherkin::Feature
    fn feature_started(
        &mut self,
        feature: &gherkin::Feature,
        path: &Path,
        content: &str,
    );

    /// Handles the entered [`gherkin`] [`Node`].
    ///
    /// [`Node`]: event::Node
    fn node(&mut self, node: event::Node<'_>);

    /// Handles the [`Step`] being matched with its [`Definition`].
    ///
    /// [`Definition`]: step::Definition
    /// [`Step`]: gherkin::Step
    fn step_defined(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    );

    /// Handles the passed [`Step`].
    ///
    /// [`Step`]: gherkin::Step
    fn step_passed(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    );

    /// Handles the skipped [`Step`].
    ///
    /// [`Step`]: gherkin::Step
    fn step_skipped(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    );

    /// Handles the failed [`Step`].
    ///
    /// [`Step`]: gherkin::Step
    fn step_failed(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
        err: &event::StepError,
    );

    /// Handles the [`Step`] no function has been found for.
    ///
    /// [`Step`]: gherkin::Step
    fn step_undefined(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    );

    /// Handles the [`Step`] marked as pending by its function.
    ///
    /// [`Step`]: gherkin::Step
    fn step_pending(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    );

    /// Handles the end of the whole test run.
    fn summary(&mut self);
}

impl<F: Formatter + ?Sized> Formatter for Box<F> {
    fn feature_started(
        &mut self,
        feature: &gherkin::Feature,
        path: &Path,
        content: &str,
    ) {
        (**self).feature_started(feature, path, content);
    }

    fn node(&mut self, node: event::Node<'_>) {
        (**self).node(node);
    }

    fn step_defined(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    ) {
        (**self).step_defined(step, def);
    }

    fn step_passed(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    ) {
        (**self).step_passed(step, def);
    }

    fn step_skipped(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    ) {
        (**self).step_skipped(step, def);
    }

    fn step_failed(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
        err: &event::StepError,
    ) {
        (**self).step_failed(step, def, err);
    }

    fn step_undefined(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    ) {
        (**self).step_undefined(step, def);
    }

    fn step_pending(
        &mut self,
        step: &gherkin::Step,
        def: Option<&step::Definition>,
    ) {
        (**self).step_pending(step, def);
    }

    fn summary(&mut self) {
        (**self).summary();
    }
}
