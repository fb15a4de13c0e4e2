use clap::Parser;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Initial buffer capacity in bytes
    #[clap(short = 'c', long, default_value_t = 4096)]
    pub capacity: usize,

    /// Number of bytes to make room for before each read
    #[clap(short = 'n', long, default_value_t = 1024)]
    pub chunk: usize,

    /// Record delimiter, as a byte value (10 is a newline)
    #[clap(short = 'd', long, default_value_t = b'\n')]
    pub delimiter: u8,
}
