// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `oplog find-prime <n>` - nested progress bars and spinners
//!
//! `find_prime` tracks primes found, each `is_prime` tracks divisors tried,
//! and every trial division runs in a spinning `modulo` operation.

use clap::Args;
use oplog_core::{Oplog, OplogError};
use std::time::Duration;
use thiserror::Error;

#[derive(Args)]
pub struct FindPrimeArgs {
    /// Which prime to find
    #[arg(default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub n: u64,

    /// Fail the primality check of this candidate
    #[arg(long)]
    pub fail_on: Option<u64>,

    /// Swallow the injected failure instead of aborting
    #[arg(long)]
    pub suppress: bool,
}

#[derive(Debug, Error)]
pub enum PrimeError {
    #[error("injected failure while checking {0}")]
    Injected(u64),

    #[error("division by zero")]
    DivisionByZero,

    #[error(transparent)]
    Oplog(#[from] OplogError),
}

/// Returns `None` when the run ended without a result
pub fn find_prime(
    oplog: &Oplog,
    args: &FindPrimeArgs,
    pace: Duration,
) -> anyhow::Result<Option<u64>> {
    oplog.globals().add("command", "find-prime")?;

    let n = args.n;
    let found = oplog
        .operation("find_prime")
        .progressable(Some(n))?
        .run(|op| {
            op.add("n", n)?;
            let mut count = 0;
            let mut candidate = 1;
            while count < n {
                candidate += 1;
                if is_prime(oplog, candidate, args, pace)? {
                    count += 1;
                    op.progress(1)?;
                }
            }
            op.add("prime", candidate)?;
            Ok::<_, PrimeError>(candidate)
        })?;
    Ok(found)
}

/// A suppressed failure counts as "not prime"
fn is_prime(
    oplog: &Oplog,
    num: u64,
    args: &FindPrimeArgs,
    pace: Duration,
) -> Result<bool, PrimeError> {
    let outcome = oplog
        .operation("is_prime")
        .suppress(args.suppress)
        .progressable(Some(num))?
        .run(|op| {
            op.add("candidate", num)?;
            if args.fail_on == Some(num) {
                return Err(PrimeError::Injected(num));
            }
            if num <= 1 {
                return Ok(false);
            }
            for divisor in 2..num {
                pace_step(pace);
                op.progress(1)?;
                if modulo(oplog, num, divisor, pace)? == 0 {
                    return Ok(false);
                }
            }
            Ok(true)
        })?;
    Ok(outcome.unwrap_or(false))
}

/// Remainder by repeated subtraction
fn modulo(oplog: &Oplog, dividend: u64, divisor: u64, pace: Duration) -> Result<u64, PrimeError> {
    let remainder = oplog.operation("modulo").spinnable()?.run(|_| {
        if divisor == 0 {
            return Err(PrimeError::DivisionByZero);
        }
        let mut remainder = dividend;
        while remainder >= divisor {
            pace_step(pace);
            remainder -= divisor;
        }
        Ok(remainder)
    })?;
    Ok(remainder.unwrap_or(dividend))
}

fn pace_step(pace: Duration) {
    if !pace.is_zero() {
        std::thread::sleep(pace);
    }
}

#[cfg(test)]
#[path = "find_prime_tests.rs"]
mod tests;
