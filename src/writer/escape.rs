// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Escaping of values embedded into [TeamCity service messages][1].
//!
//! [1]: https://www.jetbrains.com/help/teamcity/service-messages.html#Escaped+Values

use std::borrow::Cow;

/// Characters having a special meaning inside a service message value.
const RESERVED: [char; 6] = ['\'', '\n', '\r', '|', '[', ']'];

/// Escapes the given `value` to be embedded into a service message.
///
/// Strips any ANSI escape sequences first, and then prefixes each of `'`,
/// `|`, `[`, `]` with a `|`, while replacing line feeds and carriage returns
/// with `|n` and `|r` respectively. Everything else is left "as is".
#[must_use]
pub fn escape(value: &str) -> Cow<'_, str> {
    let stripped = console::strip_ansi_codes(value);
    if !stripped.contains(&RESERVED[..]) {
        return stripped;
    }

    let mut out = String::with_capacity(stripped.len() + 8);
    for c in stripped.chars() {
        match c {
            '\n' => out.push_str("|n"),
            '\r' => out.push_str("|r"),
            '\'' | '|' | '[' | ']' => {
                out.push('|');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
