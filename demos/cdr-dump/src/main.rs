//! CDR dump demo
//!
//! Run with: cargo run --bin cdr-dump -- --giop 1.0 --big-endian

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use giop_cdr::{
    read_encapsulation, read_message, write_encapsulation, CdrContext, CdrDecode, CdrEncode,
    CdrOctets, CdrString, CdrWString, GiopVersion, MessageBuilder, MessageType,
};

#[derive(Parser)]
#[command(name = "cdr-dump")]
#[command(about = "Frame a sample GIOP message and decode it back")]
struct Args {
    /// GIOP version as major.minor
    #[arg(short, long, default_value = "1.2", value_parser = parse_version)]
    giop: GiopVersion,

    /// Encode big-endian instead of little-endian
    #[arg(short, long)]
    big_endian: bool,

    /// Operation name carried in the sample body
    #[arg(short, long, default_value = "echo")]
    operation: String,

    /// Log level
    #[arg(short, long, default_value = "info")]
    level: Level,
}

fn parse_version(s: &str) -> Result<GiopVersion, String> {
    let (major, minor) = s
        .split_once('.')
        .ok_or_else(|| format!("expected major.minor, got {s:?}"))?;
    let version = GiopVersion::new(
        major.parse().map_err(|e| format!("bad major: {e}"))?,
        minor.parse().map_err(|e| format!("bad minor: {e}"))?,
    );
    if !version.is_supported() {
        return Err(format!("GIOP {version} is not supported"));
    }
    Ok(version)
}

fn hex_dump(bytes: &[u8]) {
    for (i, line) in bytes.chunks(16).enumerate() {
        let hex: Vec<String> = line.iter().map(|b| format!("{b:02x}")).collect();
        let ascii: String = line
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect();
        println!("{:08x}  {:<48} {}", i * 16, hex.join(" "), ascii);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let ctx = CdrContext::with_byte_order(!args.big_endian).with_version(args.giop);
    info!("Building sample Request, GIOP {}, little_endian={}", args.giop, ctx.little_endian);

    let mut builder = MessageBuilder::new(ctx, MessageType::Request);
    builder.put(&7u32)?;
    builder.put(&true)?;
    builder.put(&CdrOctets::new(b"object-key".to_vec()))?;
    builder.put(&CdrString::new(args.operation.as_str()))?;
    write_encapsulation(builder.body(), false, |inner| 1.5f64.cdr_encode(inner))?;
    builder.put(&-3i16)?;
    builder.put(&6.02e23f64)?;
    builder.put(&CdrWString::new("wide é"))?;
    let message = builder.finish()?;

    hex_dump(&message);

    let (header, mut body) = read_message(message)?;
    info!(
        "Header: version={} type={:?} size={} little_endian={}",
        header.version,
        header.message_type,
        header.message_size,
        header.little_endian()
    );
    info!("request id = {}", u32::cdr_decode(&mut body)?);
    info!("response expected = {}", bool::cdr_decode(&mut body)?);
    info!(
        "object key = {:?}",
        String::from_utf8_lossy(CdrOctets::cdr_decode(&mut body)?.as_bytes())
    );
    info!("operation = {}", CdrString::cdr_decode(&mut body)?.as_str());
    let mut encapsulated = read_encapsulation(&mut body)?;
    info!("encapsulated double = {}", f64::cdr_decode(&mut encapsulated)?);
    info!("short = {}", i16::cdr_decode(&mut body)?);
    info!(
        "double = {} (at message offset {})",
        f64::cdr_decode(&mut body)?,
        body.message_position() - 8
    );
    info!("wstring = {}", CdrWString::cdr_decode(&mut body)?.as_str());
    info!("{} trailing body bytes", body.remaining());

    Ok(())
}
