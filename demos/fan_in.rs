use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::{thread, time::Duration};
use vow::{any_first, join_all, race_first, settle_all, Error, Promise, SettledResult};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Combinator {
    All,
    Race,
    Any,
    AllSettled,
}

/// A vow fan-in example.
///
/// This example starts a number of producer threads, each of which sleeps for
/// a while before settling its promise, and gathers them with one of the
/// combinators.
#[derive(Parser, Debug)]
struct Args {
    /// Which combinator to gather the producers with.
    #[arg(short, long, value_enum, default_value_t = Combinator::All)]
    combinator: Combinator,

    /// The number of producer threads to start.
    #[arg(short = 'n', long, default_value_t = 5)]
    producers: u64,

    /// Producer `i` sleeps for `(producers - i) * delay` milliseconds, so the
    /// last producer started is the first to finish.
    #[arg(short, long, default_value_t = 100)]
    delay: u64,

    /// Make every producer whose index is a multiple of this value reject
    /// instead of fulfilling.
    #[arg(short, long)]
    fail_every: Option<u64>,
}

/// How long producer `i` sleeps before settling.
fn sleep_for(i: u64, args: &Args) -> Duration {
    Duration::from_millis(args.delay.saturating_mul(args.producers - i))
}

fn producer(i: u64, args: &Args) -> Promise<u64> {
    let sleep = sleep_for(i, args);
    let fails = args.fail_every.is_some_and(|n| n != 0 && i % n == 0);

    Promise::new(move |resolve, reject| {
        thread::spawn(move || {
            thread::sleep(sleep);
            if fails {
                debug!("Producer {i} rejecting after {sleep:?}");
                reject(Error::msg(format!("producer {i} failed")));
            } else {
                debug!("Producer {i} fulfilling after {sleep:?}");
                resolve(i.saturating_mul(i));
            }
        });
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let inputs: Vec<_> = (0..args.producers).map(|i| producer(i, &args)).collect();

    info!("Gathering {} producers with {:?}", args.producers, args.combinator);

    let summary = match args.combinator {
        Combinator::All => join_all(inputs).then(|v| Ok(format!("all: {v:?}"))),
        Combinator::Race => race_first(inputs).then(|v| Ok(format!("race: {v}"))),
        Combinator::Any => any_first(inputs).then(|v| Ok(format!("any: {v}"))),
        Combinator::AllSettled => settle_all(inputs).then(|results| {
            let lines: Vec<_> = results
                .iter()
                .enumerate()
                .map(|(i, r)| match r {
                    SettledResult::Fulfilled(v) => format!("  {i}: fulfilled with {v}"),
                    SettledResult::Rejected(e) => format!("  {i}: rejected with {e}"),
                })
                .collect();

            Ok(format!("all settled:\n{}", lines.join("\n")))
        }),
    };

    let summary = summary
        .catch(|e| Ok(format!("rejected: {e}")))
        .ensure(|| debug!("Gather finished"));

    println!("{}", summary.wait().map_err(|e| anyhow::anyhow!("{e}"))?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{sleep_for, Args};
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn last_producer_finishes_first() {
        let args = Args::parse_from(["fan_in"]);

        assert_eq!(sleep_for(0, &args), Duration::from_millis(500));
        assert_eq!(sleep_for(4, &args), Duration::from_millis(100));
    }

    #[test]
    fn huge_delay_saturates() {
        let delay = u64::MAX.to_string();
        let args = Args::parse_from(["fan_in", "-n", "3", "--delay", delay.as_str()]);

        assert_eq!(sleep_for(0, &args), Duration::from_millis(u64::MAX));
        assert_eq!(sleep_for(2, &args), Duration::from_millis(u64::MAX));
    }
}
