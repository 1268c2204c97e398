use std::{
    fs,
    io::{BufRead, BufReader},
    mem,
    path::Path,
    thread::{self, JoinHandle},
};

use crossbeam::channel::{Receiver, Sender};
use tracing::debug;
use xz2::read::XzDecoder;

use crate::{
    address::{parse_address, Radix},
    error::TraceError,
};

pub type AddrBlock = Result<Vec<u64>, TraceError>;

/// A stream of addresses produced on a background thread.
///
/// Blocks arrive in trace order. An `Err` block is always the last one.
pub struct Trace {
    pub rec: Receiver<AddrBlock>,
    _thread: JoinHandle<()>,
}

impl Trace {
    /// Opens a text trace of whitespace-separated addresses. `#` comments
    /// out the rest of a line. Files ending in `.xz` are decompressed.
    pub fn read(
        path: &Path,
        radix: Radix,
        addrs_per_block: usize,
        blocks_per_queue: usize,
    ) -> Result<Trace, TraceError> {
        let stream = fs::File::open(path)?;
        let compressed = path.extension().is_some_and(|ext| ext == "xz");
        debug!(path = %path.display(), compressed, "opening trace");
        if compressed {
            Ok(Trace::from_reader(
                BufReader::new(XzDecoder::new(stream)),
                radix,
                addrs_per_block,
                blocks_per_queue,
            ))
        } else {
            Ok(Trace::from_reader(
                BufReader::new(stream),
                radix,
                addrs_per_block,
                blocks_per_queue,
            ))
        }
    }

    pub fn from_reader<R: BufRead + Send + 'static>(
        reader: R,
        radix: Radix,
        addrs_per_block: usize,
        blocks_per_queue: usize,
    ) -> Trace {
        let addrs_per_block = addrs_per_block.max(1);
        let (sender, receiver) = crossbeam::channel::bounded(blocks_per_queue);
        let t = thread::spawn(move || Trace::run_thread(reader, radix, addrs_per_block, sender));
        Trace {
            rec: receiver,
            _thread: t,
        }
    }

    /// `count` uniformly distributed addresses in `0..span`, reproducible
    /// for a given seed.
    pub fn random(
        count: u64,
        span: u64,
        seed: u64,
        addrs_per_block: usize,
        blocks_per_queue: usize,
    ) -> Trace {
        let addrs_per_block = addrs_per_block.max(1);
        let span = span.max(1);
        let (sender, receiver) = crossbeam::channel::bounded(blocks_per_queue);
        let t = thread::spawn(move || {
            let mut rng = fastrand::Rng::with_seed(seed);
            let mut remaining = count;
            while remaining > 0 {
                let n = remaining.min(addrs_per_block as u64);
                let block = (0..n).map(|_| rng.u64(0..span)).collect();
                if sender.send(Ok(block)).is_err() {
                    return;
                }
                remaining -= n;
            }
        });
        Trace {
            rec: receiver,
            _thread: t,
        }
    }

    /// Drains the whole stream into memory.
    pub fn collect_all(self) -> Result<Vec<u64>, TraceError> {
        let mut addrs = Vec::new();
        for block in self.rec.iter() {
            addrs.extend(block?);
        }
        Ok(addrs)
    }

    fn run_thread<R: BufRead>(
        reader: R,
        radix: Radix,
        addrs_per_block: usize,
        queue: Sender<AddrBlock>,
    ) {
        let mut block = Vec::with_capacity(addrs_per_block);
        for (idx, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    let _ = queue.send(Ok(block));
                    let _ = queue.send(Err(err.into()));
                    return;
                }
            };
            let content = line.split_once('#').map_or(line.as_str(), |(head, _)| head);
            for token in content.split_whitespace() {
                match parse_address(token, radix) {
                    Ok(addr) => block.push(addr),
                    Err(source) => {
                        let _ = queue.send(Ok(block));
                        let _ = queue.send(Err(TraceError::Address {
                            line: idx + 1,
                            source,
                        }));
                        return;
                    }
                }
                if block.len() == addrs_per_block {
                    let full = mem::replace(&mut block, Vec::with_capacity(addrs_per_block));
                    if queue.send(Ok(full)).is_err() {
                        return;
                    }
                }
            }
        }
        if !block.is_empty() {
            let _ = queue.send(Ok(block));
        }
    }
}
