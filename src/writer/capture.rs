// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Passing bytes to an output while capturing them simultaneously.

use std::{io, mem};

/// [`io::Write`] wrapper passing everything to the wrapped output "as is",
/// while keeping a copy of it until [`Capture::drain()`]ed.
///
/// Only the bytes accepted by the wrapped output are captured, so the captured
/// text is exactly what has been printed.
#[derive(Clone, Debug, Default)]
pub struct Capture<Out = io::Stdout> {
    /// Wrapped output.
    output: Out,

    /// Bytes written since the last [`Capture::drain()`].
    buffer: Vec<u8>,
}

impl<Out> Capture<Out> {
    /// Wraps the given `output` into a new [`Capture`].
    #[must_use]
    pub const fn new(output: Out) -> Self {
        Self { output, buffer: Vec::new() }
    }

    /// Returns everything written since the last call, resetting the capture.
    ///
    /// Invalid UTF-8 sequences are replaced with [`U+FFFD`].
    ///
    /// [`U+FFFD`]: char::REPLACEMENT_CHARACTER
    pub fn drain(&mut self) -> String {
        String::from_utf8(mem::take(&mut self.buffer)).unwrap_or_else(|e| {
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        })
    }

    /// Returns a mutable reference to the wrapped output.
    ///
    /// Anything written through it bypasses the capture.
    pub fn get_mut(&mut self) -> &mut Out {
        &mut self.output
    }

    /// Unwraps this [`Capture`], discarding the captured bytes.
    #[must_use]
    pub fn into_inner(self) -> Out {
        self.output
    }
}

impl<Out: io::Write> io::Write for Capture<Out> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.output.write(buf)?;
        self.buffer.extend_from_slice(buf.get(..written).unwrap_or(buf));
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
