// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Named [`Formatter`]s selectable by a CLI.

use std::io;

use linked_hash_map::LinkedHashMap;

use crate::{
    writer::{Coloring, Pretty, Teamcity},
    Error, Formatter, Result,
};

/// Output a [`Constructor`] builds a [`Formatter`] upon.
pub type Output = Box<dyn io::Write>;

/// Function building a [`Formatter`] writing into the given [`Output`].
pub type Constructor = fn(Output, Coloring) -> Box<dyn Formatter>;

/// [`Formatter`] registered under a name.
#[derive(Clone, Copy, Debug)]
pub struct Format {
    /// Name to select this [`Format`] with.
    pub name: &'static str,

    /// Human-readable description of this [`Format`].
    pub description: &'static str,

    /// [`Constructor`] of the [`Formatter`].
    constructor: Constructor,
}

impl Format {
    /// Builds a new [`Formatter`] of this [`Format`].
    #[must_use]
    pub fn build(&self, output: Output, color: Coloring) -> Box<dyn Formatter> {
        (self.constructor)(output, color)
    }
}

/// Collection of [`Format`]s, preserving the registration order.
#[derive(Clone, Debug)]
pub struct Registry {
    /// Registered [`Format`]s by their names.
    formats: LinkedHashMap<&'static str, Format>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        _ = registry
            .register(
                "pretty",
                "Prints every feature with runtime statuses.",
                |out, color| Box::new(Pretty::new(out, color)),
            )
            .register(
                "teamcity",
                "Prints teamcity compatible output to stdout.",
                |out, color| Box::new(Teamcity::pretty(out, color)),
            );
        registry
    }
}

impl Registry {
    /// Creates a new [`Registry`] with the `pretty` and `teamcity` [`Format`]s
    /// registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [`Registry`] without any [`Format`]s.
    #[must_use]
    pub fn empty() -> Self {
        Self { formats: LinkedHashMap::new() }
    }

    /// Registers a new [`Format`], replacing the one with the same `name`, if
    /// any.
    pub fn register(
        &mut self,
        name: &'static str,
        description: &'static str,
        constructor: Constructor,
    ) -> &mut Self {
        let format = Format { name, description, constructor };
        if self.formats.insert(name, format).is_some() {
            tracing::debug!(name, "replaced registered format");
        }
        self
    }

    /// Indicates whether a [`Format`] with the given `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Returns the [`Format`] registered under the given `name`.
    ///
    /// # Errors
    ///
    /// If no [`Format`] is registered under the given `name`.
    pub fn get(&self, name: &str) -> Result<&Format> {
        self.formats.get(name).ok_or_else(|| {
            Error::unknown_format(name, self.formats.keys().copied())
        })
    }

    /// Iterates over the registered [`Format`]s in their registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Format> {
        self.formats.values()
    }

    /// Builds a new [`Formatter`] of the [`Format`] registered under the given
    /// `name`.
    ///
    /// # Errors
    ///
    /// If no [`Format`] is registered under the given `name`.
    pub fn build(
        &self,
        name: &str,
        output: Output,
        color: Coloring,
    ) -> Result<Box<dyn Formatter>> {
        self.get(name).map(|f| f.build(output, color))
    }
}
