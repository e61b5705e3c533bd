use std::process;

fn main() {
    // stdout carries the reply frame, so failures go to stderr.
    if let Err(err) = partitioner::worker::serve_stdio() {
        eprintln!("peak-worker: {}", err);
        process::exit(1);
    }
}
