use std::{fs, path::PathBuf, process::ExitCode};

use cachesim::{
    error::Result, format_address, CacheReport, Config, Error, NamedEngine, Radix, Trace,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: cachesim (--config <json> | -p <path>) (-t <trace> | --random <count>) [options]

Options:
  --hex                 read trace addresses as hexadecimal
  --span <n>            address range for --random (default 64)
  --seed <n>            seed for --random (default 0)
  --json <path>         write per-cache reports as JSON
  --show                print stats and contents after every access
  -h <n>                print progress every n accesses
  --buffer-size <n>     addresses per trace block (default 16384)
  --queue-size <n>      trace blocks buffered ahead (default 32)
";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cachesim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains("--help") {
        print!("{USAGE}");
        return Ok(());
    }
    let heartbeat_int: u64 = args.opt_value_from_str("-h")?.unwrap_or(0);
    let show = args.contains("--show");
    let hex = args.contains("--hex");

    let config = if let Some(config_str) = args.opt_value_from_str::<_, String>("--config")? {
        Config::from_json(&config_str)?
    } else {
        let config_path: PathBuf = args.opt_value_from_str("-p")?.ok_or_else(|| {
            Error::Usage("Must provide a config with --config <json> or -p <path>".to_string())
        })?;
        Config::read(&config_path)?
    };
    let radix = if hex { Radix::Hex } else { config.radix };

    let stats_path: Option<PathBuf> = args.opt_value_from_str("--json")?;
    let addrs_per_block: usize = args
        .opt_value_from_str("--buffer-size")?
        .unwrap_or(1024 * 16);
    let blocks_per_queue: usize = args.opt_value_from_str("--queue-size")?.unwrap_or(32);

    let trace = if let Some(count) = args.opt_value_from_str::<_, u64>("--random")? {
        let span: u64 = args.opt_value_from_str("--span")?.unwrap_or(64);
        let seed: u64 = args.opt_value_from_str("--seed")?.unwrap_or(0);
        info!(count, span, seed, "generating random trace");
        Trace::random(count, span, seed, addrs_per_block, blocks_per_queue)
    } else {
        let trace_path: PathBuf = args.opt_value_from_str("-t")?.ok_or_else(|| {
            Error::Usage("Must provide a trace with -t <path> or --random <count>".to_string())
        })?;
        Trace::read(&trace_path, radix, addrs_per_block, blocks_per_queue)?
    };

    let unused = args.finish();
    if !unused.is_empty() {
        warn!("ignoring unused arguments: {unused:?}");
    }

    let mut caches = config.to_engines();
    let mut heartbeat = Heartbeat::new(heartbeat_int);

    for block in trace.rec.iter() {
        operate(&mut caches, &block?, &mut heartbeat, show, radix);
    }
    info!("Ran {} accesses", heartbeat.n_accesses);

    for cache in &caches {
        println!(
            "{} ({}, {}, capacity {}): {}",
            cache.name,
            cache.engine.organization(),
            cache.engine.policy(),
            cache.engine.capacity(),
            cache.engine.stats()
        );
        println!("{}", cache.engine.snapshot().render(radix));
    }

    if let Some(stats_path) = stats_path {
        let reports = caches.iter().map(CacheReport::new).collect::<Vec<_>>();
        let stats_file = fs::File::create(&stats_path)?;
        serde_json::to_writer_pretty(stats_file, &reports)?;
        info!(path = %stats_path.display(), "wrote report");
    }
    Ok(())
}

/// Counts accesses and reports every `interval` of them. Zero disables it.
struct Heartbeat {
    interval: u64,
    n_accesses: u64,
}

impl Heartbeat {
    fn new(interval: u64) -> Self {
        Heartbeat {
            interval,
            n_accesses: 0,
        }
    }

    /// Returns true when this access lands on a reporting boundary.
    fn tick(&mut self) -> bool {
        self.n_accesses += 1;
        self.interval != 0 && self.n_accesses % self.interval == 0
    }
}

fn operate(
    caches: &mut [NamedEngine],
    addrs: &[u64],
    heartbeat: &mut Heartbeat,
    show: bool,
    radix: Radix,
) {
    for &addr in addrs {
        for cache in caches.iter_mut() {
            let result = cache.engine.access(addr);
            if show {
                println!(
                    "{} {} -> {:?}  {}",
                    cache.name,
                    format_address(addr, radix),
                    result,
                    cache.engine.stats()
                );
                println!("{}", cache.engine.snapshot().render(radix));
            }
        }
        if heartbeat.tick() {
            info!("Accesses: {}", heartbeat.n_accesses);
        }
    }
}
