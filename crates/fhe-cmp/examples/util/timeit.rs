//! Timing macros.

#![allow(unused_macros, unused_imports)]

/// Time `$code` evaluated `$loops` times and print the average duration.
macro_rules! timeit_n {
    ($name:expr, $loops:expr, $code:expr) => {{
        use crate::util::DisplayDuration;
        let start = std::time::Instant::now();
        let r = $code;
        for _ in 1..$loops {
            let _ = $code;
        }
        println!(
            "⏱  {}: {}",
            $name,
            DisplayDuration(start.elapsed() / $loops)
        );
        r
    }};
}

/// Time `$code` and print the duration.
macro_rules! timeit {
    ($name:expr, $code:expr) => {{
        timeit_n!($name, 1, $code)
    }};
}

pub(crate) use timeit;
pub(crate) use timeit_n;
