// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI (command line interface) options of the output.
//!
//! Meant to be [flattened][1] into a CLI of a runner.
//!
//! ```rust
//! # use clap::Parser as _;
//! # use cucumber_teamcity::cli;
//! #
//! #[derive(clap::Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     output: cli::Opts,
//! }
//!
//! let cli = Cli::parse_from(["runner", "--format", "teamcity"]);
//! assert_eq!(cli.output.format, "teamcity");
//! ```
//!
//! [1]: https://docs.rs/clap/latest/clap/_derive/index.html#flattening

use smart_default::SmartDefault;

use crate::{registry, writer::Coloring, Formatter, Registry, Result};

/// CLI options selecting and configuring a [`Formatter`].
#[derive(Clone, Debug, SmartDefault, clap::Args)]
#[group(skip)]
pub struct Opts {
    /// Output format of the test run.
    ///
    /// `pretty` and `teamcity` are available out of the box.
    #[arg(
        long,
        short = 'f',
        value_name = "name",
        default_value = "pretty",
        global = true
    )]
    #[default(String::from("pretty"))]
    pub format: String,

    /// Coloring policy for a console output.
    #[arg(
        long,
        value_name = "auto|always|never",
        default_value = "auto",
        global = true
    )]
    #[default(Coloring::Auto)]
    pub color: Coloring,
}

impl Opts {
    /// Builds the selected [`Formatter`] writing into the given `output`.
    ///
    /// # Errors
    ///
    /// If the selected format isn't registered in the given [`Registry`].
    pub fn formatter(
        &self,
        registry: &Registry,
        output: registry::Output,
    ) -> Result<Box<dyn Formatter>> {
        tracing::debug!(
            format = %self.format,
            color = ?self.color,
            "building formatter",
        );
        registry.build(&self.format, output, self.color)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use clap::Parser as _;

    use super::*;

    #[derive(Debug, clap::Parser)]
    struct Cli {
        #[command(flatten)]
        opts: Opts,
    }

    #[test]
    fn defaults_to_auto_colored_pretty() {
        let cli = Cli::try_parse_from(["runner"]).unwrap();

        assert_eq!(cli.opts.format, "pretty");
        assert_eq!(cli.opts.color, Coloring::Auto);

        let opts = Opts::default();
        assert_eq!(opts.format, "pretty");
        assert_eq!(opts.color, Coloring::Auto);
    }

    #[test]
    fn parses_format_and_color() {
        let cli = Cli::try_parse_from([
            "runner", "-f", "teamcity", "--color", "never",
        ])
        .unwrap();

        assert_eq!(cli.opts.format, "teamcity");
        assert_eq!(cli.opts.color, Coloring::Never);
    }

    #[test]
    fn rejects_unknown_coloring() {
        assert!(Cli::try_parse_from(["runner", "--color", "rainbow"]).is_err());
    }

    #[test]
    fn unknown_format_fails_to_build() {
        let opts = Opts { format: "junit".into(), color: Coloring::Never };

        let err = opts
            .formatter(&Registry::new(), Box::new(io::sink()))
            .err()
            .unwrap();

        assert!(err.is_unknown_format());
    }
}
