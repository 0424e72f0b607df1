use clap::{Parser, Subcommand};
use radius_codec::{
    Attribute, AttributeType, CodecConfig, Data, Dictionary, MemoryDictionary, Packet,
    PacketCodec, ValidationMode, validate_packet,
};
use std::fs;
use std::process;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// RADIUS packet inspector - decode hex dumps with a shared secret
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "radius-inspect")]
struct Cli {
    /// Extra dictionary definitions (JSON), loaded on top of the standard set
    #[arg(short, long, value_name = "FILE")]
    dictionary: Option<String>,

    /// Codec configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a packet from a hex dump
    Decode {
        /// Shared secret
        #[arg(short, long)]
        secret: String,

        /// Request authenticator (hex); decodes the packet as a response
        #[arg(short, long, value_name = "HEX")]
        request_authenticator: Option<String>,

        /// Check required attributes; `strict` also rejects undecoded values
        #[arg(long, value_name = "MODE")]
        validate: Option<Mode>,

        /// Hex dump, or `@path` to read it from a file
        packet: String,
    },
    /// Show the dictionary entry for an attribute name or type path
    Lookup {
        /// Attribute name (`User-Name`) or type path (`26.9.1`)
        attribute: String,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Lenient,
    Strict,
}

impl From<Mode> for ValidationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Lenient => ValidationMode::Lenient,
            Mode::Strict => ValidationMode::Strict,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut dictionary = MemoryDictionary::standard();
    if let Some(path) = &cli.dictionary {
        dictionary.load_file(path)?;
        debug!(path = %path, definitions = dictionary.len(), "loaded dictionary");
    }
    let config = match &cli.config {
        Some(path) => CodecConfig::from_file(path)?,
        None => CodecConfig::default(),
    };

    match cli.command {
        Command::Decode {
            secret,
            request_authenticator,
            validate,
            packet,
        } => {
            let bytes = read_hex(&packet)?;
            let dictionary = Arc::new(dictionary);
            let codec = PacketCodec::new(dictionary.clone()).with_config(config);

            let decoded = match request_authenticator {
                Some(hex_auth) => {
                    let request_auth: [u8; 16] = hex::decode(hex_auth.trim())?
                        .try_into()
                        .map_err(|_| "request authenticator must be 16 bytes")?;
                    codec.decode_response(&bytes, secret.as_bytes(), &request_auth)?
                }
                None => codec.decode_request(&bytes, secret.as_bytes())?,
            };

            print_packet(&decoded, &*dictionary);
            if let Some(mode) = validate {
                validate_packet(&decoded, &*dictionary, mode.into())?;
                println!("Validation: ok");
            }
        }
        Command::Lookup { attribute } => lookup(&dictionary, &attribute)?,
    }

    Ok(())
}

fn read_hex(arg: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let text = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)?,
        None => arg.to_string(),
    };
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(hex::decode(digits)?)
}

fn print_packet(packet: &Packet, dictionary: &dyn Dictionary) {
    let name = dictionary
        .packet_definition(packet.code)
        .map_or("Unknown", |def| def.name.as_str());
    println!("{} ({})", name, packet.code);
    if let Some(received) = packet.received {
        println!("  Identifier: {}", received.identifier);
        println!("  Authenticator: {}", hex::encode(received.authenticator));
    }
    println!("  Attributes:");
    for attr in &packet.attributes {
        println!("    {}", describe(attr, dictionary));
    }
}

fn describe(attr: &Attribute, dictionary: &dyn Dictionary) -> String {
    let attr_type = attr.attr_type();
    let name = dictionary
        .attribute_definition_by_type(&attr_type)
        .map_or_else(|| format!("Attr-{}", attr_type), |def| def.name.clone());

    match attr.data() {
        Some(Data::Enum(value)) => {
            let label = i32::try_from(*value)
                .ok()
                .and_then(|v| dictionary.value_name(&attr_type, v));
            match label {
                Some(label) => format!("{} = {} ({})", name, label, value),
                None => format!("{} = {}", name, value),
            }
        }
        Some(data) => format!("{} = {}", name, data),
        None => {
            let value = attr.as_raw().map(|raw| raw.value()).unwrap_or_default();
            format!("{} = raw 0x{}", name, hex::encode(value))
        }
    }
}

fn lookup(dictionary: &MemoryDictionary, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let def = match key.parse::<AttributeType>() {
        Ok(attr_type) => dictionary.attribute_definition_by_type(&attr_type),
        Err(_) => dictionary.attribute_definition_by_name(key),
    }
    .ok_or_else(|| format!("no dictionary entry for {}", key))?;

    println!("{}", def.name);
    println!("  Type: {}", def.attr_type);
    println!("  Data type: {}", def.data_type);
    println!("  Codec: {:?}", def.codec);
    if let Some(filter) = def.filter {
        println!("  Filter: {:?}", filter);
    }
    Ok(())
}
