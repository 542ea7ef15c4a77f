//! User-facing output macros.
//!
//! Command handlers print progress and results through these instead of
//! bare `println!`, keeping user output distinct from tracing logs.

#[macro_export]
macro_rules! inframan_println {
    () => {
        println!();
    };
    ($($arg:tt)*) => {
        println!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! inframan_error {
    ($($arg:tt)*) => {
        eprintln!("{}", format!($($arg)*));
    }
}
