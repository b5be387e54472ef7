// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of this crate.
//!
//! Note, that [`Formatter`]s never fail: a reporting channel must not abort a
//! running test suite, so write errors are only logged. These errors are
//! produced by the configuration side (selecting and building formatters).
//!
//! [`Formatter`]: crate::Formatter

use derive_more::with_trait::{Display, Error as StdError};

/// Error of configuring a [`Formatter`].
///
/// [`Formatter`]: crate::Formatter
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// Requested format isn't registered in a [`Registry`].
    ///
    /// [`Registry`]: crate::Registry
    #[display("Unknown format `{name}`, available formats: {available}")]
    UnknownFormat {
        /// Name of the requested format.
        name: String,

        /// Comma-separated names of the registered formats.
        available: String,
    },
}

/// Shortcut of a [`Result`] with an [`Error`].
///
/// [`Result`]: std::result::Result
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new [`Error::UnknownFormat`].
    #[must_use]
    pub fn unknown_format<'a>(
        name: impl Into<String>,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::UnknownFormat {
            name: name.into(),
            available: itertools::join(available, ", "),
        }
    }

    /// Indicates whether this is an [`Error::UnknownFormat`].
    #[must_use]
    pub const fn is_unknown_format(&self) -> bool {
        matches!(self, Self::UnknownFormat { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_lists_available() {
        let err = Error::unknown_format("junit", ["pretty", "teamcity"]);

        assert!(err.is_unknown_format());
        assert_eq!(
            err.to_string(),
            "Unknown format `junit`, available formats: pretty, teamcity",
        );
    }

    #[test]
    fn is_std_error_without_source() {
        let err = Error::unknown_format("junit", ["pretty"]);
        let dyn_err: &(dyn std::error::Error + 'static) = &err;

        assert!(std::error::Error::source(dyn_err).is_none());
        assert!(dyn_err.downcast_ref::<Error>().is_some());
    }
}
