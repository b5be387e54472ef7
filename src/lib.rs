// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [TeamCity service messages][1] output for [Cucumber] test runs.
//!
//! The [`writer::Teamcity`] [`Formatter`] reports every [`Feature`] as a test
//! suite and every [`Scenario`] as a test, while delegating to a
//! human-readable [`Formatter`] (a [`writer::Pretty`] one by default). All the
//! text the delegate prints is captured and attached to the failed tests as
//! their details.
//!
//! ```rust
//! # use std::path::Path;
//! #
//! # use cucumber_teamcity::{event, gherkin, writer, Formatter as _};
//! #
//! let feature = gherkin::Feature::parse(
//!     "Feature: Basic\n  Scenario: Foo\n    Given passing\n",
//!     gherkin::GherkinEnv::default(),
//! )
//! .unwrap();
//!
//! let mut teamcity =
//!     writer::Teamcity::pretty(Vec::new(), writer::Coloring::Never);
//! teamcity.feature_started(&feature, Path::new("basic.feature"), "");
//! teamcity.node(event::Node::Scenario(&feature.scenarios[0]));
//! teamcity.step_passed(&feature.scenarios[0].steps[0], None);
//! teamcity.summary();
//!
//! let out = String::from_utf8(teamcity.into_output()).unwrap();
//! assert!(out.contains("##teamcity[testFinished name='Scenario Foo'"));
//! ```
//!
//! [1]: https://www.jetbrains.com/help/teamcity/service-messages.html
//! [Cucumber]: https://cucumber.io
//! [`Feature`]: gherkin::Feature
//! [`Scenario`]: gherkin::Scenario

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(
    clippy::as_conversions,
    clippy::dbg_macro,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_results
)]

pub mod cli;
pub mod error;
pub mod event;
pub mod formatter;
pub mod registry;
pub mod step;
pub mod writer;

pub use gherkin;

#[doc(inline)]
pub use self::{
    error::{Error, Result},
    event::Node,
    formatter::Formatter,
    registry::Registry,
    writer::{Capture, Pretty, Teamcity},
};
