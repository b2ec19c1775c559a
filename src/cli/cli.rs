use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "qr-filetransfer",
    version,
    about = "Transfer files over the local network by scanning a QR code",
    long_about = None
)]
pub struct Cli {
    /// Files or directories to transfer
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Zip the content even when a single file is given
    #[arg(long)]
    pub zip: bool,

    /// Ignore the saved network interface and choose again
    #[arg(long)]
    pub force: bool,

    /// Increase log verbosity
    #[arg(long)]
    pub debug: bool,

    /// Reverse the colors of the QR code
    #[arg(long)]
    pub reverse: bool,

    /// Use this configuration file instead of the per-user default
    #[arg(long, env = "QR_FILETRANSFER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}
