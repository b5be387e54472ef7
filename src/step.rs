// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Definitions of [`Step`] functions, as reported by a runner.
//!
//! [`Step`]: gherkin::Step

use derive_more::with_trait::Display;
use regex::Regex;

/// Location of a [`Step`] [`fn`].
///
/// [`Step`]: gherkin::Step
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{path}:{line}:{column}")]
pub struct Location {
    /// Path to the file where [`Step`] [`fn`] is located.
    ///
    /// [`Step`]: gherkin::Step
    pub path: &'static str,

    /// Line of the file where [`Step`] [`fn`] is located.
    ///
    /// [`Step`]: gherkin::Step
    pub line: u32,

    /// Column of the file where [`Step`] [`fn`] is located.
    ///
    /// [`Step`]: gherkin::Step
    pub column: u32,
}

impl Location {
    /// Creates a new [`Location`].
    #[must_use]
    pub const fn new(path: &'static str, line: u32, column: u32) -> Self {
        Self { path, line, column }
    }
}

/// [`Step`] definition a [`Step`] has been matched with.
///
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug)]
pub struct Definition {
    /// [`Regex`] the [`Step`] has been matched with.
    ///
    /// [`Step`]: gherkin::Step
    pub pattern: Regex,

    /// [`Location`] of the [`Step`] [`fn`], if known.
    ///
    /// [`Step`]: gherkin::Step
    pub location: Option<Location>,
}

impl Definition {
    /// Creates a new [`Definition`] without a known [`Location`].
    #[must_use]
    pub fn new(pattern: Regex) -> Self {
        Self { pattern, location: None }
    }

    /// Sets the [`Location`] of this [`Definition`].
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}
