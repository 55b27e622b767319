use std::error::Error;

use clap::Parser;
use jpeg_exif_date::parse_jpeg_file;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    files: Vec<String>,

    /// Print the IFD0 entries as well
    #[arg(short, long)]
    entries: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    for file in cli.files.iter() {
        let exif = match parse_jpeg_file(file) {
            Ok(exif) => exif,
            Err(e) => {
                eprintln!("{file}: {e}");
                continue;
            }
        };

        if exif.has_date_time() {
            println!("{file:<40}=> {}", exif.date_time());
        } else if let Some(reason) = exif.mismatch() {
            println!("{file:<40}=> ({reason})");
        } else {
            println!("{file:<40}=> (no DateTime)");
        }

        if cli.entries {
            for entry in exif.entries() {
                let name = entry
                    .exif_tag()
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| format!("Unknown(0x{:04x})", entry.tag));
                println!(
                    "    {name:<32} type={:<2} count={:<6} value/offset=0x{:08x}",
                    entry.data_type, entry.count, entry.value_or_offset
                );
            }
        }
    }

    Ok(())
}
