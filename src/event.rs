// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Payloads of the lifecycle notifications a [`Formatter`] receives.
//!
//! [`Formatter`]: crate::Formatter

use std::{any::Any, borrow::Cow, sync::Arc};

use derive_more::with_trait::{Display, Error};

/// Alias for a [`catch_unwind()`] error.
///
/// [`catch_unwind()`]: std::panic::catch_unwind()
pub type Info = Arc<dyn Any + Send + 'static>;

/// [`gherkin`] node the runner enters.
///
/// Only [`Node::Scenario`] starts a new test, the rest are reported for
/// rendering purposes only.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    /// [Background] of a [`Feature`] or a [`Rule`].
    ///
    /// [Background]: https://cucumber.io/docs/gherkin/reference#background
    /// [`Feature`]: gherkin::Feature
    /// [`Rule`]: gherkin::Rule
    Background(&'a gherkin::Background),

    /// [Rule] grouping [`Scenario`]s.
    ///
    /// [Rule]: https://cucumber.io/docs/gherkin/reference#rule
    /// [`Scenario`]: gherkin::Scenario
    Rule(&'a gherkin::Rule),

    /// [Scenario] about to be executed.
    ///
    /// [Scenario]: https://cucumber.io/docs/gherkin/reference#example
    Scenario(&'a gherkin::Scenario),

    /// [Examples] of a [Scenario Outline].
    ///
    /// [Examples]: https://cucumber.io/docs/gherkin/reference#examples
    /// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
    Examples(&'a gherkin::Examples),
}

impl<'a> Node<'a> {
    /// Returns the [`Scenario`] if this [`Node`] is one.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub const fn as_scenario(&self) -> Option<&'a gherkin::Scenario> {
        match *self {
            Self::Scenario(sc) => Some(sc),
            Self::Background(_) | Self::Rule(_) | Self::Examples(_) => None,
        }
    }
}

/// Error of executing a [`Step`].
///
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug, Display, Error)]
pub enum StepError {
    /// [`Step`] doesn't match any function.
    ///
    /// [`Step`]: gherkin::Step
    #[display("Step doesn't match any function")]
    NotFound,

    /// [`Step`] matches multiple functions.
    ///
    /// [`Step`]: gherkin::Step
    #[display("Step match is ambiguous: {_0}")]
    AmbiguousMatch(#[error(not(source))] String),

    /// [`Step`] panicked.
    ///
    /// [`Step`]: gherkin::Step
    #[display("Step panicked. Captured output: {}", coerce_error(_0))]
    Panic(#[error(not(source))] Info),

    /// [`Step`] returned an error.
    ///
    /// [`Step`]: gherkin::Step
    #[display("{_0}")]
    Failed(#[error(not(source))] String),
}

impl StepError {
    /// Creates a new [`StepError::Failed`] out of the given `err`.
    #[must_use]
    pub fn failed(err: impl ToString) -> Self {
        Self::Failed(err.to_string())
    }
}

/// Coerces the given panic payload into a readable string.
#[must_use]
pub fn coerce_error(err: &Info) -> Cow<'static, str> {
    (**err)
        .downcast_ref::<String>()
        .map(|s| s.clone().into())
        .or_else(|| (**err).downcast_ref::<&str>().map(|s| s.to_owned().into()))
        .unwrap_or_else(|| "(Could not resolve panic payload)".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payload_is_coerced() {
        let owned = StepError::Panic(Arc::new("boom".to_owned()));
        let borrowed = StepError::Panic(Arc::new("bang"));
        let opaque = StepError::Panic(Arc::new(42_u8));

        assert_eq!(owned.to_string(), "Step panicked. Captured output: boom");
        assert_eq!(
            borrowed.to_string(),
            "Step panicked. Captured output: bang",
        );
        assert_eq!(
            opaque.to_string(),
            "Step panicked. Captured output: (Could not resolve panic payload)",
        );
    }

    #[test]
    fn failed_displays_message_as_is() {
        assert_eq!(StepError::failed("errored").to_string(), "errored");
    }

    #[test]
    fn only_scenario_node_is_scenario() {
        let feature = gherkin::Feature::parse(
            "Feature: F\n  Background:\n    Given a\n  \
             Scenario: S\n    Given b\n",
            gherkin::GherkinEnv::default(),
        )
        .unwrap();

        let bg = feature.background.as_ref().unwrap();
        assert!(Node::Background(bg).as_scenario().is_none());
        assert_eq!(
            Node::Scenario(&feature.scenarios[0])
                .as_scenario()
                .map(|s| &*s.name),
            Some("S"),
        );
    }
}
