//! Process termination used by the crash and exit helpers
//!
//! The dispatcher never ends the process itself; it hands that step to a
//! [`Terminator`] so tests can observe a crash without losing the test
//! process.

/// What happens after a crash or exit helper has logged its message
pub trait Terminator: Send + Sync {
    /// Raise an unrecoverable failure carrying `message`
    fn crash(&self, message: String) -> !;

    /// End the process with `code`
    fn exit(&self, code: i32) -> !;
}

/// Default terminator: panics on crash, calls `std::process::exit` on exit
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessTerminator;

impl Terminator for ProcessTerminator {
    fn crash(&self, message: String) -> ! {
        panic!("{}", message)
    }

    fn exit(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}
