mod args;
mod pipe;

use clap::Parser;

use args::Args;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::parse();
    if args.chunk == 0 {
        log::error!("Chunk size must be greater than 0");
        return;
    }

    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        res = pipe::run(&mut stdin, &mut stdout, args.capacity, args.chunk, args.delimiter) => {
            match res {
                Ok(stats) => log::info!(
                    "Framed {} records from {} bytes, final capacity {}",
                    stats.records,
                    stats.bytes,
                    stats.capacity
                ),
                Err(e) => log::error!("Unable to frame input: {}", e),
            }
        },
    }
}
