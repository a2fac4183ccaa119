//! ANSI tinting for terminal output. Disabled when `NO_COLOR` is set.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tint {
    Cyan,
    Green,
    Yellow,
    Red,
}

impl Tint {
    fn code(self) -> &'static str {
        match self {
            Tint::Cyan => "\x1b[96m",
            Tint::Green => "\x1b[92m",
            Tint::Yellow => "\x1b[93m",
            Tint::Red => "\x1b[91m",
        }
    }
}

const RESET: &str = "\x1b[0m";

pub struct Painted<T> {
    tint: Tint,
    value: T,
}

impl<T: fmt::Display> fmt::Display for Painted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if colors_enabled() {
            write!(f, "{}{}{}", self.tint.code(), self.value, RESET)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

pub fn paint<T: fmt::Display>(tint: Tint, value: T) -> Painted<T> {
    Painted { tint, value }
}

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}
