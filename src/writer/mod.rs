// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for outputting test run lifecycle notifications.

pub mod capture;
pub mod escape;
pub mod out;
pub mod pretty;
pub mod teamcity;

#[doc(inline)]
pub use self::{
    capture::Capture,
    escape::escape,
    out::{Coloring, Styles, WriteStrExt},
    pretty::{Pretty, Stats, Status},
    teamcity::{ServiceMessage, Teamcity},
};

/// [`Formatter`] exposing the output it writes into.
///
/// [`Formatter`]: crate::Formatter
pub trait OutputFormatter {
    /// Output this [`Formatter`] writes into.
    ///
    /// [`Formatter`]: crate::Formatter
    type Output;

    /// Returns a mutable reference to the output.
    fn output_mut(&mut self) -> &mut Self::Output;
}
