//! The built-in examples: small programs about the scripting language's
//! arrays, objects, strings and numbers, each checked by assertions.

use crate::harness::Runner;

mod arrays;
mod objects;
mod primitives;
mod typing;

/// Registers every built-in suite on `runner`, in catalogue order.
///
/// Refused registrations are recorded on the runner and show up in its
/// report, so the individual results are not inspected here.
pub fn register_all(runner: &mut Runner) {
    arrays::register(runner);
    typing::register(runner);
    objects::register(runner);
    primitives::register(runner);
}

/// A runner holding the whole catalogue.
pub fn runner() -> Runner {
    let mut runner = Runner::new();
    register_all(&mut runner);
    runner
}
