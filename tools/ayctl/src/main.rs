mod ports;
mod repl;

use std::time::Duration;

use anyhow::Context;
use ay38910::{Command, Frame, LineStream, Session, ValidationPolicy, catalog, notes};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::util::SubscriberInitExt;

use crate::ports::SerialConfig;

#[derive(Parser)]
#[command(name = "ayctl")]
#[command(version, about = "AY-3-8910 micro synth controller", long_about = None)]
struct Cli {
    /// More logging (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and type commands interactively
    Repl {
        #[command(flatten)]
        link: LinkArgs,
    },

    /// Send a single command and print the reply
    Send {
        /// `amplitude, octave, shape`
        command: String,

        #[command(flatten)]
        link: LinkArgs,
    },

    /// Print the frame a command encodes to, without a device
    Encode {
        /// `amplitude, octave, shape`
        command: String,

        /// Require every field to be in range
        #[arg(long)]
        strict: bool,
    },

    /// List the envelope shapes
    Shapes,

    /// Print the tone register table
    Notes {
        #[arg(short, long, value_enum, default_value_t = TableFormat::C)]
        format: TableFormat,
    },

    /// List serial ports
    Ports,
}

#[derive(Args)]
struct LinkArgs {
    /// Serial port (auto-detected if not specified)
    #[arg(short, long)]
    port: Option<String>,

    #[arg(short, long, default_value_t = 9600)]
    baud: u32,

    /// How long to wait for the synth's reply
    #[arg(long, default_value_t = 2000)]
    timeout_ms: u64,

    /// Require every field to be in range
    #[arg(long)]
    strict: bool,
}

impl LinkArgs {
    fn serial_config(&self) -> SerialConfig {
        SerialConfig {
            port: self.port.clone(),
            baud_rate: self.baud,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TableFormat {
    C,
    Rust,
}

fn policy(strict: bool) -> ValidationPolicy {
    if strict {
        ValidationPolicy::Strict
    } else {
        ValidationPolicy::Lenient
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .compact()
        .finish()
        .init();
}

type SerialSession = Session<LineStream<Box<dyn serialport::SerialPort>>>;

fn connect(link: &LinkArgs) -> anyhow::Result<SerialSession> {
    let config = link.serial_config();
    let port_name = ports::select_port(&config)?;
    let port = ports::open(&port_name, &config)?;

    Ok(Session::new(LineStream::new(port), policy(link.strict)))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Repl { link } => {
            let mut session = connect(&link)?;
            let result = repl::run(&mut session);
            println!("Bye!");
            result
        }
        Commands::Send { command, link } => {
            let mut session = connect(&link)?;
            let reply = session
                .submit(command.trim())
                .with_context(|| format!("Failed to send {command:?}"))?;
            println!("{}", String::from_utf8_lossy(&reply));
            Ok(())
        }
        Commands::Encode { command, strict } => {
            let command = Command::parse_with(command.trim(), policy(strict))?;
            let frame = Frame::encode(&command)?;
            println!("{frame}");
            Ok(())
        }
        Commands::Shapes => {
            println!("{}", catalog::help_listing());
            Ok(())
        }
        Commands::Notes { format } => {
            let table = notes::generate_table();
            let rendered = match format {
                TableFormat::C => notes::render_table(&table),
                TableFormat::Rust => notes::render_rust_table(&table),
            };
            print!("{rendered}");
            Ok(())
        }
        Commands::Ports => {
            for (index, device) in ports::list_devices()?.iter().enumerate() {
                println!("  [{index}] {}", device.description);
            }
            Ok(())
        }
    }
}
