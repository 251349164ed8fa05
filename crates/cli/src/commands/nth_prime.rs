// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `oplog nth-prime <n>` - a single async operation

use super::find_prime::PrimeError;
use clap::Args;
use oplog_core::Oplog;
use std::time::Duration;

#[derive(Args)]
pub struct NthPrimeArgs {
    /// Which prime to find
    #[arg(default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub n: u64,

    /// Show a spinner instead of a progress bar
    #[arg(long)]
    pub spinner: bool,
}

pub async fn nth_prime(
    oplog: &Oplog,
    args: &NthPrimeArgs,
    pace: Duration,
) -> anyhow::Result<Option<u64>> {
    oplog.globals().add("command", "nth-prime")?;

    let n = args.n;
    let builder = oplog.operation("nth_prime");
    let builder = if args.spinner {
        builder.spinnable()?
    } else {
        builder.progressable(Some(n))?
    };
    let spinner = args.spinner;

    let found = builder
        .run_async(|op| async move {
            op.add("n", n)?;
            let mut count = 0;
            let mut candidate = 1;
            while count < n {
                candidate += 1;
                if is_prime(candidate) {
                    count += 1;
                    if !spinner {
                        op.progress(1)?;
                    }
                    if !pace.is_zero() {
                        tokio::time::sleep(pace).await;
                    }
                }
            }
            op.add("prime", candidate)?;
            Ok::<_, PrimeError>(candidate)
        })
        .await?;
    Ok(found)
}

/// Trial division up to the square root
fn is_prime(num: u64) -> bool {
    if num < 2 {
        return false;
    }
    let mut divisor = 2;
    while divisor * divisor <= num {
        if num % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}

#[cfg(test)]
#[path = "nth_prime_tests.rs"]
mod tests;
